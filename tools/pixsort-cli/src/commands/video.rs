//! Pixel-sort a video.

use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use pixsort_common::config::AppConfig;
use pixsort_common::error::PixsortError;
use pixsort_media::{
    write_summary, FfmpegSink, FfmpegSinkOpts, FfmpegSource, FrameProgress, PipelineOptions,
    ProgressCallback,
};

use super::SortArgs;

pub async fn run(
    config: &AppConfig,
    input: PathBuf,
    save: Option<PathBuf>,
    sort: SortArgs,
    fps: Option<f64>,
    codec: Option<String>,
    quiet: bool,
) -> anyhow::Result<()> {
    let Some(output) = save else {
        return Err(PixsortError::config("Output file required.").into());
    };
    if !input.exists() {
        return Err(PixsortError::FileNotFound { path: input }.into());
    }

    let options = PipelineOptions {
        sort: sort.resolve(config)?,
        fps,
        fallback_fps: config.output.fps,
    };
    let sink_opts = FfmpegSinkOpts {
        out_path: output.clone(),
        overwrite: true,
        codec: codec.unwrap_or_else(|| config.output.codec.clone()),
        pix_fmt: config.output.pix_fmt.clone(),
    };

    if !quiet {
        println!("Sorting: {}", input.display());
        println!("  Output: {}", output.display());
        println!(
            "  Axis: {}  Key: {} {}  Workers: {}",
            options.sort.axis,
            options.sort.key.mode,
            options.sort.key.order,
            options.sort.workers.get()
        );
    }

    let stop = Arc::new(AtomicBool::new(false));
    let interrupt = {
        let stop = Arc::clone(&stop);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Interrupt received, stopping after the current frame");
                stop.store(true, Ordering::Relaxed);
            }
        })
    };

    let progress: Option<ProgressCallback> = if quiet {
        None
    } else {
        Some(Box::new(|p: FrameProgress| {
            if p.total_frames > 0 {
                print!(
                    "\r  Progress: {:.1}% ({}/{} frames, {:.1} fps, ETA: {:.0}s)  ",
                    p.frames_done as f64 * 100.0 / p.total_frames as f64,
                    p.frames_done,
                    p.total_frames,
                    p.fps,
                    p.eta_secs,
                );
            } else {
                print!("\r  Progress: {} frames ({:.1} fps)  ", p.frames_done, p.fps);
            }
            std::io::stdout().flush().ok();
        }))
    };

    let result = tokio::task::spawn_blocking(move || {
        let mut source = FfmpegSource::open(&input)?;
        let mut sink = FfmpegSink::new(sink_opts);
        pixsort_media::run(&mut source, &mut sink, &options, progress, Some(&*stop))
    })
    .await;
    interrupt.abort();

    let summary = result??;
    let report = write_summary(&summary, &output)?;

    if !quiet {
        println!();
        if summary.interrupted {
            println!(
                "Interrupted after {} frames: {}",
                summary.frames_processed,
                output.display()
            );
        } else {
            println!(
                "Done: {} frames in {:.1}s -> {}",
                summary.frames_processed,
                summary.elapsed_secs,
                output.display()
            );
        }
        println!("  Report: {}", report.display());
    }

    Ok(())
}

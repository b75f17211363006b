//! Show video properties.

use std::path::PathBuf;

use serde::Serialize;

use pixsort_media::probe_video;

#[derive(Serialize)]
struct InfoReport {
    path: PathBuf,
    width: usize,
    height: usize,
    fps: f64,
    frame_count: u64,
    duration_secs: f64,
}

pub fn run(input: PathBuf, json: bool) -> anyhow::Result<()> {
    let info = probe_video(&input).map_err(|e| anyhow::anyhow!("Failed to probe video: {e}"))?;

    let duration_secs = if info.fps > 0.0 {
        info.frame_count as f64 / info.fps
    } else {
        0.0
    };
    let report = InfoReport {
        path: input,
        width: info.width,
        height: info.height,
        fps: info.fps,
        frame_count: info.frame_count,
        duration_secs,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Video: {}", report.path.display());
    println!("  Resolution: {}x{}", report.width, report.height);
    if report.fps > 0.0 {
        println!("  Frame rate: {:.3} fps", report.fps);
    } else {
        println!("  Frame rate: unknown");
    }
    if report.frame_count > 0 {
        println!(
            "  Frames: {} ({:.1}s)",
            report.frame_count, report.duration_secs
        );
    } else {
        println!("  Frames: unknown");
    }
    println!("  Stripes: {} rows, {} columns", report.height, report.width);

    Ok(())
}

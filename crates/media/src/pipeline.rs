//! Frame-by-frame driver: read, transform, write.
//!
//! Frames are processed strictly in order. Each frame is fully transformed
//! by the dispatcher before it is handed to the sink, so the sink never
//! sees a partially sorted frame.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;

use pixsort_common::clock::{RunClock, Throughput};
use pixsort_common::error::{PixsortError, PixsortResult};
use pixsort_core::FrameDispatcher;
use pixsort_frame_model::{Frame, SortConfig};

use crate::sink::{FrameSink, SinkConfig};
use crate::source::FrameSource;

/// Rate used when neither the caller nor the source provides one.
pub const DEFAULT_FPS: f64 = 24.0;

/// Options for one pipeline run.
#[derive(Debug, Clone, Copy)]
pub struct PipelineOptions {
    /// How every frame is sorted.
    pub sort: SortConfig,
    /// Output frame rate; overrides the source rate when set.
    pub fps: Option<f64>,
    /// Output frame rate when the source does not report one.
    pub fallback_fps: f64,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            sort: SortConfig::default(),
            fps: None,
            fallback_fps: DEFAULT_FPS,
        }
    }
}

impl PipelineOptions {
    pub fn new(sort: SortConfig) -> Self {
        Self {
            sort,
            ..Self::default()
        }
    }

    /// Output rate for a source reporting `source_fps` (0.0 when unknown).
    pub fn resolve_fps(&self, source_fps: f64) -> PixsortResult<f64> {
        let fps = match self.fps {
            Some(fps) => fps,
            None if source_fps.is_finite() && source_fps > 0.0 => source_fps,
            None => self.fallback_fps,
        };
        if !(fps.is_finite() && fps > 0.0) {
            return Err(PixsortError::config(format!(
                "frame rate must be positive, got {fps}"
            )));
        }
        Ok(fps)
    }
}

/// Progress report, sent after each frame reaches the sink.
#[derive(Debug, Clone, Copy)]
pub struct FrameProgress {
    /// Index of the frame just written.
    pub frame_index: u64,
    /// Frames written so far.
    pub frames_done: u64,
    /// Announced frame count; 0 when unknown.
    pub total_frames: u64,
    /// Processing rate so far.
    pub fps: f64,
    /// Estimated seconds remaining; 0.0 when unknown.
    pub eta_secs: f64,
}

/// Progress callback for pipeline runs.
pub type ProgressCallback = Box<dyn Fn(FrameProgress) + Send>;

/// What a finished run did.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub source: String,
    pub sink: String,
    pub width: usize,
    pub height: usize,
    /// Output frame rate.
    pub fps: f64,
    pub sort: SortConfig,
    pub frames_processed: u64,
    /// Frame count the source announced; 0 when unknown.
    pub total_frames: u64,
    pub elapsed_secs: f64,
    /// Wall-clock start, RFC 3339.
    pub started_at: String,
    /// Stopped by the stop flag before the source ran out.
    pub interrupted: bool,
    /// The source ended before its announced frame count.
    pub truncated: bool,
}

/// Transform every frame of `source` into `sink`.
///
/// `stop` is checked before each frame; once set, the sink is finalized
/// with the frames written so far. The source is closed on every path.
pub fn run(
    source: &mut dyn FrameSource,
    sink: &mut dyn FrameSink,
    options: &PipelineOptions,
    progress: Option<ProgressCallback>,
    stop: Option<&AtomicBool>,
) -> PixsortResult<RunSummary> {
    let result = drive(source, sink, options, progress.as_ref(), stop);
    let closed = source.close();
    let summary = result?;
    closed?;
    Ok(summary)
}

fn drive(
    source: &mut dyn FrameSource,
    sink: &mut dyn FrameSink,
    options: &PipelineOptions,
    progress: Option<&ProgressCallback>,
    stop: Option<&AtomicBool>,
) -> PixsortResult<RunSummary> {
    let info = source.info();
    let fps = options.resolve_fps(info.fps)?;
    let dispatcher = FrameDispatcher::new(options.sort);
    let mut frame = Frame::try_new(info.width, info.height)?;

    tracing::info!(
        source = source.name(),
        sink = sink.name(),
        width = info.width,
        height = info.height,
        fps,
        total_frames = info.frame_count,
        axis = %options.sort.axis,
        workers = options.sort.workers.get(),
        "Starting pixel sort run"
    );

    sink.begin(SinkConfig {
        width: info.width,
        height: info.height,
        fps,
    })?;

    let clock = RunClock::start();
    let mut frames_processed = 0u64;
    let mut interrupted = false;

    loop {
        if stop.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
            interrupted = true;
            tracing::info!(frames = frames_processed, "Stop requested, finishing early");
            break;
        }
        if !source.read_frame(&mut frame)? {
            break;
        }

        let stats = dispatcher.transform(&mut frame)?;
        sink.push_frame(frames_processed, &frame)?;
        tracing::debug!(
            frame = frames_processed,
            stripes = stats.stripes,
            workers = stats.workers,
            elapsed_ms = stats.elapsed.as_secs_f64() * 1000.0,
            "Frame sorted"
        );

        frames_processed += 1;
        if let Some(cb) = progress {
            let throughput = Throughput {
                frames_done: frames_processed,
                frames_total: info.frame_count,
                elapsed_secs: clock.elapsed_secs(),
            };
            cb(FrameProgress {
                frame_index: frames_processed - 1,
                frames_done: frames_processed,
                total_frames: info.frame_count,
                fps: throughput.fps(),
                eta_secs: throughput.eta_secs(),
            });
        }
    }

    sink.end()?;

    let truncated = !interrupted && info.frame_count > 0 && frames_processed < info.frame_count;
    if truncated {
        tracing::warn!(
            frames = frames_processed,
            announced = info.frame_count,
            "Source ended before its announced frame count"
        );
    }

    let summary = RunSummary {
        source: source.name().to_string(),
        sink: sink.name().to_string(),
        width: info.width,
        height: info.height,
        fps,
        sort: options.sort,
        frames_processed,
        total_frames: info.frame_count,
        elapsed_secs: clock.elapsed_secs(),
        started_at: clock.epoch_wall().to_string(),
        interrupted,
        truncated,
    };
    tracing::info!(
        frames = summary.frames_processed,
        elapsed_secs = summary.elapsed_secs,
        interrupted,
        "Pixel sort run finished"
    );
    Ok(summary)
}

/// Path of the run report written next to `output`: the full output
/// file name with `.pixsort.json` appended.
pub fn summary_path(output: &Path) -> PathBuf {
    let mut name = output
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".pixsort.json");
    output.with_file_name(name)
}

/// Write `summary` as pretty JSON next to `output`.
pub fn write_summary(summary: &RunSummary, output: &Path) -> PixsortResult<PathBuf> {
    let report_path = summary_path(output);
    std::fs::write(&report_path, serde_json::to_string_pretty(summary)?)?;
    tracing::info!(report = %report_path.display(), "Wrote run summary");
    Ok(report_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_fps_precedence() {
        let mut options = PipelineOptions::default();
        assert_eq!(options.resolve_fps(0.0).unwrap(), DEFAULT_FPS);
        assert_eq!(options.resolve_fps(30.0).unwrap(), 30.0);
        options.fps = Some(12.0);
        assert_eq!(options.resolve_fps(30.0).unwrap(), 12.0);
    }

    #[test]
    fn test_resolve_fps_rejects_non_positive() {
        let options = PipelineOptions {
            fps: Some(0.0),
            ..PipelineOptions::default()
        };
        assert!(options.resolve_fps(30.0).unwrap_err().is_config());
    }

    #[test]
    fn test_summary_path_keeps_output_extension() {
        assert_eq!(
            summary_path(Path::new("/tmp/out.mp4")),
            PathBuf::from("/tmp/out.mp4.pixsort.json")
        );
        assert_ne!(
            summary_path(Path::new("/tmp/out.mp4")),
            summary_path(Path::new("/tmp/out.png"))
        );
        assert_eq!(
            summary_path(Path::new("clip")),
            PathBuf::from("clip.pixsort.json")
        );
    }

    #[test]
    fn test_overflowing_dimensions_fail_before_sink_begins() {
        use crate::sink::InMemorySink;
        use crate::source::{InMemorySource, VideoInfo};

        struct HugeSource;
        impl FrameSource for HugeSource {
            fn info(&self) -> VideoInfo {
                VideoInfo {
                    width: usize::MAX,
                    height: 2,
                    fps: 24.0,
                    frame_count: 1,
                }
            }
            fn read_frame(&mut self, _frame: &mut Frame) -> PixsortResult<bool> {
                Ok(false)
            }
            fn name(&self) -> &str {
                "huge"
            }
        }

        let mut sink = InMemorySink::new();
        let err = run(&mut HugeSource, &mut sink, &PipelineOptions::default(), None, None)
            .unwrap_err();
        assert!(matches!(err, PixsortError::Frame { .. }));
        assert!(sink.config().is_none());

        let mut empty = InMemorySource::new(Vec::new(), 24.0).unwrap();
        assert!(run(&mut empty, &mut sink, &PipelineOptions::default(), None, None).is_ok());
    }
}

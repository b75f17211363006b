//! Pixsort Media: getting frames in and out
//!
//! Sources decode frames, sinks encode them, and the pipeline drives a
//! source through the frame dispatcher into a sink:
//! - **ffmpeg:** video decode and encode through a system `ffmpeg`
//! - **still:** single images through the `image` crate
//! - **in-memory:** sources and sinks for tests and tooling

pub mod ffmpeg;
pub mod pipeline;
pub mod sink;
pub mod source;
pub mod still;

pub use ffmpeg::{
    command_exists, ffmpeg_available, parse_probe_output, probe_video, FfmpegSink,
    FfmpegSinkOpts, FfmpegSource,
};
pub use pipeline::{
    run, summary_path, write_summary, FrameProgress, PipelineOptions, ProgressCallback,
    RunSummary, DEFAULT_FPS,
};
pub use sink::{FrameSink, InMemorySink, SinkConfig};
pub use source::{FrameSource, InMemorySource, VideoInfo};
pub use still::{ImageSink, ImageSource};

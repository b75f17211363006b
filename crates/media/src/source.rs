//! Frame sources.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use pixsort_common::error::{PixsortError, PixsortResult};
use pixsort_frame_model::Frame;

/// Stream properties known before the first frame is read.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VideoInfo {
    /// Frame width in pixels.
    pub width: usize,
    /// Frame height in pixels.
    pub height: usize,
    /// Frames per second; 0.0 when unknown (still images, some containers).
    pub fps: f64,
    /// Total frames; 0 when unknown.
    pub frame_count: u64,
}

/// Yields frames one at a time, in display order.
pub trait FrameSource: Send {
    /// Dimensions, rate, and frame count of the stream.
    fn info(&self) -> VideoInfo;

    /// Read the next frame into `frame`, which has the dimensions from
    /// [`FrameSource::info`]. Returns `false` at end of stream.
    fn read_frame(&mut self, frame: &mut Frame) -> PixsortResult<bool>;

    /// Release the underlying decoder. Called once, also on early stop.
    fn close(&mut self) -> PixsortResult<()> {
        Ok(())
    }

    /// Source name, for logs.
    fn name(&self) -> &str;
}

/// Source backed by frames already in memory (tests and tooling).
#[derive(Debug)]
pub struct InMemorySource {
    info: VideoInfo,
    frames: VecDeque<Frame>,
}

impl InMemorySource {
    /// All frames must share the same dimensions.
    pub fn new(frames: Vec<Frame>, fps: f64) -> PixsortResult<Self> {
        let (width, height) = frames
            .first()
            .map(|f| (f.width(), f.height()))
            .unwrap_or((0, 0));
        if let Some(bad) = frames
            .iter()
            .position(|f| f.width() != width || f.height() != height)
        {
            return Err(PixsortError::frame(format!(
                "frame {bad} is {}x{}, expected {width}x{height}",
                frames[bad].width(),
                frames[bad].height()
            )));
        }
        Ok(Self {
            info: VideoInfo {
                width,
                height,
                fps,
                frame_count: frames.len() as u64,
            },
            frames: frames.into(),
        })
    }

    /// Announce a different frame count than the frames actually held,
    /// to model containers whose header disagrees with their content.
    pub fn with_announced_count(mut self, frame_count: u64) -> Self {
        self.info.frame_count = frame_count;
        self
    }
}

impl FrameSource for InMemorySource {
    fn info(&self) -> VideoInfo {
        self.info
    }

    fn read_frame(&mut self, frame: &mut Frame) -> PixsortResult<bool> {
        match self.frames.pop_front() {
            Some(next) => {
                *frame = next;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use pixsort_frame_model::Pixel;

    use super::*;

    #[test]
    fn test_in_memory_source_yields_in_order() {
        let frames = vec![
            Frame::from_pixels(1, 1, vec![Pixel::new(1, 0, 0)]).unwrap(),
            Frame::from_pixels(1, 1, vec![Pixel::new(2, 0, 0)]).unwrap(),
        ];
        let mut source = InMemorySource::new(frames, 30.0).unwrap();
        assert_eq!(source.info().frame_count, 2);

        let mut frame = Frame::new(1, 1);
        assert!(source.read_frame(&mut frame).unwrap());
        assert_eq!(frame.get(0, 0), Pixel::new(1, 0, 0));
        assert!(source.read_frame(&mut frame).unwrap());
        assert_eq!(frame.get(0, 0), Pixel::new(2, 0, 0));
        assert!(!source.read_frame(&mut frame).unwrap());
    }

    #[test]
    fn test_mixed_dimensions_rejected() {
        let frames = vec![Frame::new(2, 2), Frame::new(3, 2)];
        assert!(InMemorySource::new(frames, 30.0).is_err());
    }
}

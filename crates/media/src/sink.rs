//! Frame sinks.

use pixsort_common::error::{PixsortError, PixsortResult};
use pixsort_frame_model::Frame;

/// Output stream properties, fixed before the first frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SinkConfig {
    pub width: usize,
    pub height: usize,
    pub fps: f64,
}

/// Accepts transformed frames in display order.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> PixsortResult<()>;

    /// Push one frame. `index` must strictly increase between calls.
    fn push_frame(&mut self, index: u64, frame: &Frame) -> PixsortResult<()>;

    /// Called once after the last frame is pushed.
    fn end(&mut self) -> PixsortResult<()>;

    /// Sink name, for logs.
    fn name(&self) -> &str;
}

/// Checks shared by every sink: started, in order, right size.
pub(crate) fn check_push(
    cfg: Option<&SinkConfig>,
    last_index: Option<u64>,
    index: u64,
    frame: &Frame,
) -> PixsortResult<()> {
    let cfg = cfg.ok_or_else(|| PixsortError::encode("sink not started"))?;
    if let Some(last) = last_index {
        if index <= last {
            return Err(PixsortError::encode(format!(
                "frame {index} pushed after frame {last}; frames must arrive in increasing order"
            )));
        }
    }
    if frame.width() != cfg.width || frame.height() != cfg.height {
        return Err(PixsortError::encode(format!(
            "frame {index} is {}x{}, sink expects {}x{}",
            frame.width(),
            frame.height(),
            cfg.width,
            cfg.height
        )));
    }
    Ok(())
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    last_index: Option<u64>,
    ended: bool,
    /// Frames in push order.
    pub frames: Vec<(u64, Frame)>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> PixsortResult<()> {
        self.cfg = Some(cfg);
        self.last_index = None;
        self.ended = false;
        self.frames.clear();
        Ok(())
    }

    fn push_frame(&mut self, index: u64, frame: &Frame) -> PixsortResult<()> {
        check_push(self.cfg.as_ref(), self.last_index, index, frame)?;
        self.last_index = Some(index);
        self.frames.push((index, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> PixsortResult<()> {
        self.ended = true;
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> SinkConfig {
        SinkConfig {
            width: 2,
            height: 1,
            fps: 24.0,
        }
    }

    #[test]
    fn test_push_before_begin_fails() {
        let mut sink = InMemorySink::new();
        assert!(sink.push_frame(0, &Frame::new(2, 1)).is_err());
    }

    #[test]
    fn test_out_of_order_rejected() {
        let mut sink = InMemorySink::new();
        sink.begin(cfg()).unwrap();
        sink.push_frame(3, &Frame::new(2, 1)).unwrap();
        assert!(sink.push_frame(3, &Frame::new(2, 1)).is_err());
        assert!(sink.push_frame(1, &Frame::new(2, 1)).is_err());
        sink.push_frame(4, &Frame::new(2, 1)).unwrap();
        assert_eq!(sink.frames.len(), 2);
    }

    #[test]
    fn test_size_mismatch_rejected() {
        let mut sink = InMemorySink::new();
        sink.begin(cfg()).unwrap();
        assert!(sink.push_frame(0, &Frame::new(1, 2)).is_err());
    }
}

//! Still images as single-frame streams.

use std::path::PathBuf;

use image::RgbImage;

use pixsort_common::error::{PixsortError, PixsortResult};
use pixsort_frame_model::Frame;

use crate::sink::{check_push, FrameSink, SinkConfig};
use crate::source::{FrameSource, VideoInfo};

/// Decodes one image file into a one-frame stream.
#[derive(Debug)]
pub struct ImageSource {
    frame: Option<Frame>,
    info: VideoInfo,
}

impl ImageSource {
    /// Decode `path`. Any format the `image` crate reads is accepted;
    /// alpha is dropped.
    pub fn open(path: impl Into<PathBuf>) -> PixsortResult<Self> {
        let path = path.into();
        if !path.exists() {
            return Err(PixsortError::FileNotFound { path });
        }
        let rgb = image::open(&path)?.to_rgb8();
        let (width, height) = (rgb.width() as usize, rgb.height() as usize);
        let frame = Frame::from_rgb_bytes(width, height, rgb.as_raw())?;
        tracing::debug!(path = %path.display(), width, height, "Decoded still image");

        Ok(Self {
            frame: Some(frame),
            info: VideoInfo {
                width,
                height,
                fps: 0.0,
                frame_count: 1,
            },
        })
    }
}

impl FrameSource for ImageSource {
    fn info(&self) -> VideoInfo {
        self.info
    }

    fn read_frame(&mut self, frame: &mut Frame) -> PixsortResult<bool> {
        match self.frame.take() {
            Some(decoded) => {
                *frame = decoded;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn name(&self) -> &str {
        "image"
    }
}

/// Writes a single frame to an image file; the format follows the extension.
#[derive(Debug)]
pub struct ImageSink {
    path: PathBuf,
    cfg: Option<SinkConfig>,
    frame: Option<Frame>,
}

impl ImageSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cfg: None,
            frame: None,
        }
    }
}

impl FrameSink for ImageSink {
    fn begin(&mut self, cfg: SinkConfig) -> PixsortResult<()> {
        if cfg.width == 0 || cfg.height == 0 {
            return Err(PixsortError::encode("image sink width/height must be non-zero"));
        }
        u32::try_from(cfg.width)
            .and_then(|_| u32::try_from(cfg.height))
            .map_err(|_| {
                PixsortError::encode(format!("{}x{} is too large for an image", cfg.width, cfg.height))
            })?;
        self.cfg = Some(cfg);
        self.frame = None;
        Ok(())
    }

    fn push_frame(&mut self, index: u64, frame: &Frame) -> PixsortResult<()> {
        check_push(self.cfg.as_ref(), None, index, frame)?;
        if self.frame.is_some() {
            return Err(PixsortError::unsupported(
                "image output holds a single frame",
            ));
        }
        self.frame = Some(frame.clone());
        Ok(())
    }

    fn end(&mut self) -> PixsortResult<()> {
        let Some(frame) = self.frame.take() else {
            return Err(PixsortError::encode(format!(
                "no frame was written to {}",
                self.path.display()
            )));
        };
        let (width, height) = (frame.width() as u32, frame.height() as u32);
        let image = RgbImage::from_raw(width, height, frame.to_rgb_bytes())
            .ok_or_else(|| PixsortError::encode("frame buffer does not match its dimensions"))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        image.save(&self.path)?;
        tracing::info!(path = %self.path.display(), width, height, "Wrote still image");
        Ok(())
    }

    fn name(&self) -> &str {
        "image"
    }
}

#[cfg(test)]
mod tests {
    use pixsort_frame_model::Pixel;

    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("pixsort-still-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_open_missing_image() {
        let err = ImageSource::open("/definitely/not/here.png").unwrap_err();
        assert!(matches!(err, PixsortError::FileNotFound { .. }));
    }

    #[test]
    fn test_sink_round_trips_through_png() {
        let path = temp_path("round.png");
        let frame = Frame::from_pixels(
            2,
            1,
            vec![Pixel::new(10, 20, 30), Pixel::new(200, 100, 50)],
        )
        .unwrap();

        let mut sink = ImageSink::new(&path);
        sink.begin(SinkConfig {
            width: 2,
            height: 1,
            fps: 0.0,
        })
        .unwrap();
        sink.push_frame(0, &frame).unwrap();
        sink.end().unwrap();

        let mut source = ImageSource::open(&path).unwrap();
        assert_eq!(source.info().frame_count, 1);
        let mut read = Frame::new(2, 1);
        assert!(source.read_frame(&mut read).unwrap());
        assert_eq!(read, frame);
        assert!(!source.read_frame(&mut read).unwrap());

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_sink_rejects_second_frame() {
        let mut sink = ImageSink::new(temp_path("never.png"));
        sink.begin(SinkConfig {
            width: 1,
            height: 1,
            fps: 0.0,
        })
        .unwrap();
        sink.push_frame(0, &Frame::new(1, 1)).unwrap();
        assert!(sink.push_frame(1, &Frame::new(1, 1)).is_err());
    }

    #[test]
    fn test_end_without_frame_fails() {
        let mut sink = ImageSink::new(temp_path("empty.png"));
        sink.begin(SinkConfig {
            width: 1,
            height: 1,
            fps: 0.0,
        })
        .unwrap();
        assert!(sink.end().is_err());
    }
}

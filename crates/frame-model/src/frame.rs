//! Frame storage.
//!
//! A frame is a `width x height` grid of [`Pixel`]s stored row-major.
//! Pixel `(row, col)` lives at index `row * width + col`.

use pixsort_common::error::{PixsortError, PixsortResult};

use crate::pixel::Pixel;

/// Bytes per pixel in packed `rgb24` buffers.
pub const BYTES_PER_PIXEL: usize = 3;

/// A two-dimensional grid of pixels, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: usize,
    height: usize,
    pixels: Vec<Pixel>,
}

impl Frame {
    /// Create a black frame.
    ///
    /// # Panics
    /// Panics when `width * height` overflows; use [`Frame::try_new`] for
    /// dimensions read from a file or a decoder.
    pub fn new(width: usize, height: usize) -> Self {
        match Self::try_new(width, height) {
            Ok(frame) => frame,
            Err(e) => panic!("{e}"),
        }
    }

    /// Create a black frame, rejecting dimensions whose pixel count overflows.
    pub fn try_new(width: usize, height: usize) -> PixsortResult<Self> {
        let count = width
            .checked_mul(height)
            .ok_or_else(|| PixsortError::frame(format!("{width}x{height} frame overflows")))?;
        Ok(Self {
            width,
            height,
            pixels: vec![Pixel::BLACK; count],
        })
    }

    /// Wrap existing pixels. `pixels.len()` must equal `width * height`.
    pub fn from_pixels(width: usize, height: usize, pixels: Vec<Pixel>) -> PixsortResult<Self> {
        let expected = width
            .checked_mul(height)
            .ok_or_else(|| PixsortError::frame(format!("{width}x{height} frame overflows")))?;
        if pixels.len() != expected {
            return Err(PixsortError::frame(format!(
                "{width}x{height} frame needs {expected} pixels, got {}",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build a frame from packed `rgb24` bytes.
    pub fn from_rgb_bytes(width: usize, height: usize, bytes: &[u8]) -> PixsortResult<Self> {
        let expected = frame_byte_len(width, height)?;
        if bytes.len() != expected {
            return Err(PixsortError::frame(format!(
                "{width}x{height} frame needs {expected} bytes, got {}",
                bytes.len()
            )));
        }
        let pixels = bytes
            .chunks_exact(BYTES_PER_PIXEL)
            .map(|px| Pixel::new(px[0], px[1], px[2]))
            .collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Overwrite this frame's pixels from packed `rgb24` bytes of the same size.
    ///
    /// Lets a frame source reuse one allocation across frames.
    pub fn fill_from_rgb_bytes(&mut self, bytes: &[u8]) -> PixsortResult<()> {
        let expected = self.pixels.len() * BYTES_PER_PIXEL;
        if bytes.len() != expected {
            return Err(PixsortError::frame(format!(
                "{}x{} frame needs {expected} bytes, got {}",
                self.width,
                self.height,
                bytes.len()
            )));
        }
        for (pixel, px) in self
            .pixels
            .iter_mut()
            .zip(bytes.chunks_exact(BYTES_PER_PIXEL))
        {
            *pixel = Pixel::new(px[0], px[1], px[2]);
        }
        Ok(())
    }

    /// Append this frame's pixels to `out` as packed `rgb24`.
    pub fn write_rgb_bytes(&self, out: &mut Vec<u8>) {
        out.reserve(self.pixels.len() * BYTES_PER_PIXEL);
        for pixel in &self.pixels {
            out.extend_from_slice(&pixel.0);
        }
    }

    /// Packed `rgb24` copy of this frame.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() * BYTES_PER_PIXEL);
        self.write_rgb_bytes(&mut out);
        out
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of pixels.
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// True when the frame has no pixels (zero width or height).
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// All pixels, row-major.
    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    /// All pixels, row-major, mutable.
    pub fn pixels_mut(&mut self) -> &mut [Pixel] {
        &mut self.pixels
    }

    /// Pixel at `(row, col)`.
    ///
    /// # Panics
    /// Panics when the position is outside the frame.
    pub fn get(&self, row: usize, col: usize) -> Pixel {
        self.pixels[self.index_of(row, col)]
    }

    /// Row `row` as a contiguous slice.
    pub fn row(&self, row: usize) -> &[Pixel] {
        assert!(row < self.height, "row {row} out of range (height {})", self.height);
        let start = row * self.width;
        &self.pixels[start..start + self.width]
    }

    /// Column `col` copied top to bottom.
    pub fn column(&self, col: usize) -> Vec<Pixel> {
        assert!(col < self.width, "column {col} out of range (width {})", self.width);
        (0..self.height).map(|row| self.get(row, col)).collect()
    }

    fn index_of(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.height && col < self.width,
            "({row}, {col}) outside {}x{} frame",
            self.width,
            self.height
        );
        row * self.width + col
    }
}

/// Size in bytes of one packed `rgb24` frame.
pub fn frame_byte_len(width: usize, height: usize) -> PixsortResult<usize> {
    width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(BYTES_PER_PIXEL))
        .ok_or_else(|| PixsortError::frame(format!("{width}x{height} frame overflows")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Frame {
        Frame::from_pixels(
            2,
            2,
            vec![
                Pixel::new(10, 0, 0),
                Pixel::new(5, 0, 0),
                Pixel::new(0, 0, 0),
                Pixel::new(255, 0, 0),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_addressing_is_row_major() {
        let frame = sample();
        assert_eq!(frame.get(0, 1), Pixel::new(5, 0, 0));
        assert_eq!(frame.get(1, 0), Pixel::new(0, 0, 0));
        assert_eq!(frame.row(1), &[Pixel::new(0, 0, 0), Pixel::new(255, 0, 0)]);
        assert_eq!(
            frame.column(0),
            vec![Pixel::new(10, 0, 0), Pixel::new(0, 0, 0)]
        );
    }

    #[test]
    fn test_rgb_bytes_roundtrip() {
        let frame = sample();
        let bytes = frame.to_rgb_bytes();
        assert_eq!(bytes.len(), 12);
        assert_eq!(&bytes[..6], &[10, 0, 0, 5, 0, 0]);
        assert_eq!(Frame::from_rgb_bytes(2, 2, &bytes).unwrap(), frame);
    }

    #[test]
    fn test_size_mismatch_is_rejected() {
        assert!(Frame::from_pixels(2, 2, vec![Pixel::BLACK; 3]).is_err());
        assert!(Frame::from_rgb_bytes(2, 2, &[0u8; 11]).is_err());

        let mut frame = sample();
        assert!(frame.fill_from_rgb_bytes(&[0u8; 9]).is_err());
        frame.fill_from_rgb_bytes(&[7u8; 12]).unwrap();
        assert_eq!(frame.get(1, 1), Pixel::new(7, 7, 7));
    }

    #[test]
    fn test_zero_area_frame() {
        let frame = Frame::new(0, 5);
        assert!(frame.is_empty());
        assert_eq!(frame.height(), 5);
        assert!(frame.to_rgb_bytes().is_empty());
    }

    #[test]
    fn test_try_new_rejects_overflow() {
        let err = Frame::try_new(usize::MAX, 2).unwrap_err();
        assert!(matches!(err, PixsortError::Frame { .. }));
        assert_eq!(Frame::try_new(3, 2).unwrap(), Frame::new(3, 2));
    }

    #[test]
    #[should_panic(expected = "overflows")]
    fn test_new_panics_on_overflow() {
        Frame::new(usize::MAX, usize::MAX);
    }

    #[test]
    #[should_panic]
    fn test_out_of_range_get_panics() {
        sample().get(2, 0);
    }
}

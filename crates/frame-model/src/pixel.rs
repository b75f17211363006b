//! Pixel value type.

use serde::{Deserialize, Serialize};

/// One pixel: three 8-bit channels.
///
/// The channel order is whatever the frame source produced (RGB for the
/// ffmpeg and image paths in this workspace); nothing in the sort engine
/// depends on it beyond which channel is "channel 0".
///
/// The derived `Ord` compares channels lexicographically. Sort keys use it
/// to order pixels whose keys are equal.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Pixel(pub [u8; 3]);

impl Pixel {
    pub const BLACK: Pixel = Pixel([0, 0, 0]);
    pub const WHITE: Pixel = Pixel([255, 255, 255]);

    pub const fn new(c0: u8, c1: u8, c2: u8) -> Self {
        Self([c0, c1, c2])
    }

    /// All three channels.
    pub const fn channels(self) -> [u8; 3] {
        self.0
    }

    /// Channel `index` (0, 1 or 2).
    pub fn channel(self, index: usize) -> u8 {
        self.0[index]
    }

    /// Integer mean of the three channels, truncated.
    pub fn average(self) -> u8 {
        let [a, b, c] = self.0;
        ((a as u16 + b as u16 + c as u16) / 3) as u8
    }
}

impl From<[u8; 3]> for Pixel {
    fn from(channels: [u8; 3]) -> Self {
        Self(channels)
    }
}

impl From<Pixel> for [u8; 3] {
    fn from(pixel: Pixel) -> Self {
        pixel.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_truncates() {
        assert_eq!(Pixel::new(10, 0, 0).average(), 3);
        assert_eq!(Pixel::new(5, 0, 0).average(), 1);
        assert_eq!(Pixel::new(255, 0, 0).average(), 85);
        assert_eq!(Pixel::WHITE.average(), 255);
    }

    #[test]
    fn test_ord_is_lexicographic() {
        assert!(Pixel::new(1, 0, 0) > Pixel::new(0, 255, 255));
        assert!(Pixel::new(1, 2, 3) < Pixel::new(1, 2, 4));
    }
}

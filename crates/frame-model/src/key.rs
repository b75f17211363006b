//! Sort keys and comparators.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use pixsort_common::error::PixsortError;

use crate::pixel::Pixel;

/// How a pixel is reduced to the scalar it is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyMode {
    /// `key = channel[0]`.
    Channel0,
    /// `key = (channel[0] + channel[1] + channel[2]) / 3`, integer division.
    #[default]
    Luminance,
}

impl KeyMode {
    pub fn key(self, pixel: Pixel) -> u8 {
        match self {
            KeyMode::Channel0 => pixel.channel(0),
            KeyMode::Luminance => pixel.average(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            KeyMode::Channel0 => "channel0",
            KeyMode::Luminance => "luminance",
        }
    }
}

impl fmt::Display for KeyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeyMode {
    type Err = PixsortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "channel0" | "c0" | "first" => Ok(KeyMode::Channel0),
            "luminance" | "luma" | "average" | "avg" => Ok(KeyMode::Luminance),
            other => Err(PixsortError::config(format!(
                "Unknown key mode: {other:?}. Use: channel0, luminance"
            ))),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Ascending => "ascending",
            SortOrder::Descending => "descending",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = PixsortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Ascending),
            "desc" | "descending" => Ok(SortOrder::Descending),
            other => Err(PixsortError::config(format!(
                "Unknown sort order: {other:?}. Use: ascending, descending"
            ))),
        }
    }
}

/// A complete pixel comparator: key mode plus direction.
///
/// Pixels with equal keys are ordered by their channel values, so the
/// comparator is a total order on pixel values. Two pixels compare
/// `Equal` only when they are identical, which makes any correct sort of a
/// stripe produce the same output regardless of the input arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SortKey {
    pub mode: KeyMode,
    pub order: SortOrder,
}

impl SortKey {
    pub const fn new(mode: KeyMode, order: SortOrder) -> Self {
        Self { mode, order }
    }

    pub const fn ascending(mode: KeyMode) -> Self {
        Self::new(mode, SortOrder::Ascending)
    }

    pub const fn descending(mode: KeyMode) -> Self {
        Self::new(mode, SortOrder::Descending)
    }

    /// Scalar key of `pixel`.
    #[inline]
    pub fn key(&self, pixel: Pixel) -> u8 {
        self.mode.key(pixel)
    }

    #[inline]
    pub fn compare(&self, a: Pixel, b: Pixel) -> Ordering {
        let ord = self
            .mode
            .key(a)
            .cmp(&self.mode.key(b))
            .then_with(|| a.cmp(&b));
        match self.order {
            SortOrder::Ascending => ord,
            SortOrder::Descending => ord.reverse(),
        }
    }

    /// `a` sorts strictly before `b`.
    #[inline]
    pub fn less(&self, a: Pixel, b: Pixel) -> bool {
        self.compare(a, b) == Ordering::Less
    }

    /// Whether `a` may precede `b` in sorted output, judged by key only.
    pub fn key_in_order(&self, a: Pixel, b: Pixel) -> bool {
        match self.order {
            SortOrder::Ascending => self.key(a) <= self.key(b),
            SortOrder::Descending => self.key(a) >= self.key(b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel0_is_symmetric() {
        let key = SortKey::ascending(KeyMode::Channel0);
        let a = Pixel::new(10, 0, 0);
        let b = Pixel::new(5, 200, 0);
        // Only channel 0 of both sides counts: 10 > 5 even though b's channel 1 is larger.
        assert!(key.less(b, a));
        assert!(!key.less(a, b));
    }

    #[test]
    fn test_luminance_key() {
        let key = SortKey::ascending(KeyMode::Luminance);
        assert_eq!(key.key(Pixel::new(10, 0, 0)), 3);
        assert!(key.less(Pixel::new(0, 0, 0), Pixel::new(10, 0, 0)));
    }

    #[test]
    fn test_ties_break_on_channels() {
        let key = SortKey::ascending(KeyMode::Luminance);
        let a = Pixel::new(3, 0, 0);
        let b = Pixel::new(0, 3, 0);
        assert_eq!(key.key(a), key.key(b));
        assert_eq!(key.compare(b, a), Ordering::Less);
        assert_eq!(key.compare(a, a), Ordering::Equal);
    }

    #[test]
    fn test_descending_mirrors_ascending() {
        let asc = SortKey::ascending(KeyMode::Channel0);
        let desc = SortKey::descending(KeyMode::Channel0);
        let a = Pixel::new(1, 0, 0);
        let b = Pixel::new(2, 0, 0);
        assert_eq!(asc.compare(a, b), desc.compare(b, a));
        assert!(desc.key_in_order(b, a));
        assert!(!desc.key_in_order(a, b));
    }

    #[test]
    fn test_parse_modes() {
        assert_eq!("luma".parse::<KeyMode>().unwrap(), KeyMode::Luminance);
        assert_eq!("channel0".parse::<KeyMode>().unwrap(), KeyMode::Channel0);
        assert!("hue".parse::<KeyMode>().unwrap_err().is_config());
        assert_eq!("desc".parse::<SortOrder>().unwrap(), SortOrder::Descending);
        assert!("sideways".parse::<SortOrder>().is_err());
    }

    mod props {
        use proptest::prelude::*;

        use super::*;

        fn pixel() -> impl Strategy<Value = Pixel> {
            any::<[u8; 3]>().prop_map(Pixel)
        }

        fn sort_key() -> impl Strategy<Value = SortKey> {
            (any::<bool>(), any::<bool>()).prop_map(|(luma, desc)| {
                let mode = if luma { KeyMode::Luminance } else { KeyMode::Channel0 };
                let order = if desc { SortOrder::Descending } else { SortOrder::Ascending };
                SortKey::new(mode, order)
            })
        }

        proptest! {
            #[test]
            fn compare_is_antisymmetric(key in sort_key(), a in pixel(), b in pixel()) {
                prop_assert_eq!(key.compare(a, b), key.compare(b, a).reverse());
                prop_assert_eq!(key.compare(a, b) == Ordering::Equal, a == b);
            }

            #[test]
            fn compare_agrees_with_key_order(key in sort_key(), a in pixel(), b in pixel()) {
                if key.compare(a, b) != Ordering::Greater {
                    prop_assert!(key.key_in_order(a, b));
                }
            }
        }
    }
}

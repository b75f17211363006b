//! Sort axis.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use pixsort_common::error::PixsortError;

/// Direction along which stripes are formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Stripe `i` is row `i`; pixels move horizontally ("x").
    Rows,
    /// Stripe `i` is column `i`; pixels move vertically ("y").
    #[default]
    Columns,
}

impl Axis {
    /// Number of stripes a `width x height` frame splits into.
    pub fn stripe_count(self, width: usize, height: usize) -> usize {
        match self {
            Axis::Rows => height,
            Axis::Columns => width,
        }
    }

    /// Length of each stripe of a `width x height` frame.
    pub fn stripe_len(self, width: usize, height: usize) -> usize {
        match self {
            Axis::Rows => width,
            Axis::Columns => height,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Axis::Rows => "x",
            Axis::Columns => "y",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Axis {
    type Err = PixsortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "x" | "row" | "rows" => Ok(Axis::Rows),
            "y" | "col" | "column" | "columns" => Ok(Axis::Columns),
            other => Err(PixsortError::config(format!(
                "Unknown axis: {other:?}. Use: x (rows), y (columns)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("x".parse::<Axis>().unwrap(), Axis::Rows);
        assert_eq!("Rows".parse::<Axis>().unwrap(), Axis::Rows);
        assert_eq!("y".parse::<Axis>().unwrap(), Axis::Columns);
        assert_eq!(" column ".parse::<Axis>().unwrap(), Axis::Columns);
    }

    #[test]
    fn test_unknown_axis_is_config_error() {
        let err = "t".parse::<Axis>().unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_stripe_geometry() {
        assert_eq!(Axis::Rows.stripe_count(640, 480), 480);
        assert_eq!(Axis::Rows.stripe_len(640, 480), 640);
        assert_eq!(Axis::Columns.stripe_count(640, 480), 640);
        assert_eq!(Axis::Columns.stripe_len(640, 480), 480);
    }
}

//! Pixsort Frame Model
//!
//! Defines the core data contracts shared by the sort engine and its
//! collaborators:
//! - **Pixel / Frame:** row-major grids of three-channel pixels
//! - **Axis:** whether stripes are rows or columns
//! - **SortKey:** the scalar key and direction pixels are ordered by
//! - **SortConfig:** validated per-run settings, including worker count

pub mod axis;
pub mod frame;
pub mod key;
pub mod pixel;
pub mod settings;

pub use axis::*;
pub use frame::*;
pub use key::*;
pub use pixel::*;
pub use settings::*;

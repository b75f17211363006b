//! Pixsort Core: the frame transformation engine
//!
//! Reorders the pixels of a frame along rows or columns by a brightness key:
//! - **Stripes:** disjoint in-place row and column views of a frame
//! - **StripeSorter:** in-place partition-exchange sort of one stripe
//! - **FrameDispatcher:** sorts all stripes of a frame across worker threads
//!
//! This crate is pure computation: no I/O, no global state. Everything a
//! call needs arrives in its [`SortConfig`](pixsort_frame_model::SortConfig).

pub mod dispatcher;
pub mod sorter;
pub mod stripe;

pub use dispatcher::{transform, DispatchStats, FrameDispatcher};
pub use sorter::StripeSorter;
pub use stripe::{stripes_mut, ColumnMut, ColumnsMut, Stripe, StripeMut, StripesMut};

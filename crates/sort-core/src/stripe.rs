//! Stripe views over a frame.
//!
//! A stripe is one row or one column of a [`Frame`], addressed in place.
//! Rows are plain contiguous slices. Columns are strided, so they get their
//! own view type, [`ColumnMut`].
//!
//! [`stripes_mut`] is the only way to get mutable stripes out of a frame.
//! It borrows the frame exclusively and yields every stripe exactly once,
//! and no two stripes it yields share a pixel. That is what lets the
//! dispatcher hand stripes to different threads without locks.

use std::marker::PhantomData;
use std::slice::ChunksExactMut;

use pixsort_frame_model::{Axis, Frame, Pixel};

/// An indexable, in-place sequence of pixels.
pub trait Stripe {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pixel at position `i`.
    ///
    /// # Panics
    /// Panics when `i >= self.len()`.
    fn get(&self, i: usize) -> Pixel;

    /// Exchange the pixels at `i` and `j`.
    ///
    /// # Panics
    /// Panics when either index is out of range.
    fn swap(&mut self, i: usize, j: usize);
}

impl Stripe for [Pixel] {
    fn len(&self) -> usize {
        <[Pixel]>::len(self)
    }

    fn get(&self, i: usize) -> Pixel {
        self[i]
    }

    fn swap(&mut self, i: usize, j: usize) {
        <[Pixel]>::swap(self, i, j)
    }
}

impl Stripe for Vec<Pixel> {
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn get(&self, i: usize) -> Pixel {
        self[i]
    }

    fn swap(&mut self, i: usize, j: usize) {
        self.as_mut_slice().swap(i, j)
    }
}

/// Mutable view of one column: `len` pixels spaced `stride` apart.
pub struct ColumnMut<'a> {
    /// First pixel of the column.
    head: *mut Pixel,
    len: usize,
    stride: usize,
    _frame: PhantomData<&'a mut Pixel>,
}

// SAFETY: a `ColumnMut` is an exclusive borrow of its own pixels, like
// `&mut [Pixel]`, and `Pixel` is `Send`.
unsafe impl Send for ColumnMut<'_> {}

impl ColumnMut<'_> {
    #[inline]
    fn ptr(&self, i: usize) -> *mut Pixel {
        assert!(i < self.len, "index {i} out of range for column of {}", self.len);
        // SAFETY: `i < len`, so the offset stays inside the frame buffer the
        // column was carved from (see `ColumnsMut::next`).
        unsafe { self.head.add(i * self.stride) }
    }
}

impl Stripe for ColumnMut<'_> {
    fn len(&self) -> usize {
        self.len
    }

    fn get(&self, i: usize) -> Pixel {
        // SAFETY: `ptr` bounds-checks and the pointee is initialized.
        unsafe { *self.ptr(i) }
    }

    fn swap(&mut self, i: usize, j: usize) {
        let a = self.ptr(i);
        let b = self.ptr(j);
        // SAFETY: both pointers are in bounds and owned by this column;
        // `ptr::swap` allows `a == b`.
        unsafe { std::ptr::swap(a, b) }
    }
}

/// Iterator over the columns of a row-major pixel buffer.
///
/// Column `c` touches exactly the indices `c + k * width` for
/// `k < height`. For distinct `c < width` those index sets are disjoint, and
/// each `c` is yielded once, so the yielded views never alias each other.
/// The iterator holds the buffer's exclusive borrow for `'a`, so nothing
/// else can touch the pixels while any view is alive.
pub struct ColumnsMut<'a> {
    base: *mut Pixel,
    width: usize,
    height: usize,
    next: usize,
    _frame: PhantomData<&'a mut [Pixel]>,
}

// SAFETY: same reasoning as `ColumnMut`; the iterator only hands out
// disjoint exclusive views.
unsafe impl Send for ColumnsMut<'_> {}

impl<'a> ColumnsMut<'a> {
    /// Split `pixels` (row-major, `width * height` long) into columns.
    ///
    /// # Panics
    /// Panics when the buffer length does not match the dimensions.
    pub fn new(pixels: &'a mut [Pixel], width: usize, height: usize) -> Self {
        assert_eq!(
            pixels.len(),
            width * height,
            "buffer of {} pixels is not {width}x{height}",
            pixels.len()
        );
        Self {
            base: pixels.as_mut_ptr(),
            width,
            height,
            next: 0,
            _frame: PhantomData,
        }
    }
}

impl<'a> Iterator for ColumnsMut<'a> {
    type Item = ColumnMut<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.width {
            return None;
        }
        let col = self.next;
        self.next += 1;
        Some(ColumnMut {
            // SAFETY: `col < width`, and when `height > 0` the buffer holds
            // `width * height` pixels, so `base + col` is in bounds. When
            // `height == 0` the column is empty and never dereferenced;
            // `wrapping_add` keeps the pointer arithmetic defined either way.
            head: self.base.wrapping_add(col),
            len: self.height,
            stride: self.width,
            _frame: PhantomData,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.width - self.next;
        (left, Some(left))
    }
}

impl ExactSizeIterator for ColumnsMut<'_> {}

/// One mutable stripe of either axis.
pub enum StripeMut<'a> {
    Row(&'a mut [Pixel]),
    Column(ColumnMut<'a>),
}

impl Stripe for StripeMut<'_> {
    fn len(&self) -> usize {
        match self {
            StripeMut::Row(row) => row.len(),
            StripeMut::Column(col) => col.len(),
        }
    }

    fn get(&self, i: usize) -> Pixel {
        match self {
            StripeMut::Row(row) => row[i],
            StripeMut::Column(col) => col.get(i),
        }
    }

    fn swap(&mut self, i: usize, j: usize) {
        match self {
            StripeMut::Row(row) => row.swap(i, j),
            StripeMut::Column(col) => col.swap(i, j),
        }
    }
}

/// Disjoint mutable stripes of a frame, in stripe-index order.
pub enum StripesMut<'a> {
    Rows(ChunksExactMut<'a, Pixel>),
    Columns(ColumnsMut<'a>),
    /// Frames with zero width or height have no pixels to sort.
    Empty,
}

impl<'a> Iterator for StripesMut<'a> {
    type Item = StripeMut<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            StripesMut::Rows(rows) => rows.next().map(StripeMut::Row),
            StripesMut::Columns(cols) => cols.next().map(StripeMut::Column),
            StripesMut::Empty => None,
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            StripesMut::Rows(rows) => rows.size_hint(),
            StripesMut::Columns(cols) => cols.size_hint(),
            StripesMut::Empty => (0, Some(0)),
        }
    }
}

/// Split `frame` into its stripes along `axis`.
///
/// Stripe `i` is row `i` for [`Axis::Rows`] and column `i` for
/// [`Axis::Columns`].
pub fn stripes_mut(frame: &mut Frame, axis: Axis) -> StripesMut<'_> {
    if frame.is_empty() {
        return StripesMut::Empty;
    }
    let (width, height) = (frame.width(), frame.height());
    match axis {
        Axis::Rows => StripesMut::Rows(frame.pixels_mut().chunks_exact_mut(width)),
        Axis::Columns => StripesMut::Columns(ColumnsMut::new(frame.pixels_mut(), width, height)),
    }
}

//! In-place stripe sorting.
//!
//! The core is a partition-exchange sort: pick the midpoint pixel as pivot,
//! walk a left cursor up past pixels that sort before it and a right
//! cursor down past pixels that sort after it, exchange the pair the
//! cursors stop on, and repeat until they cross.
//!
//! Two guards keep the worst case in check on long stripes:
//! - the smaller partition recurses and the larger one loops, so stack
//!   depth stays `O(log n)`
//! - after `2 * floor(log2 n)` partition rounds the remaining range is
//!   finished with heapsort, so the sort is `O(n log n)` on any input
//!
//! Short ranges finish with insertion sort. Every step is a swap of two
//! whole pixels, so the result is always a permutation of the input.

use pixsort_frame_model::{Pixel, SortKey};

use crate::stripe::Stripe;

/// Ranges this short or shorter are finished with insertion sort.
const INSERTION_THRESHOLD: usize = 16;

/// Sorts single stripes by a [`SortKey`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StripeSorter {
    key: SortKey,
}

impl StripeSorter {
    pub fn new(key: SortKey) -> Self {
        Self { key }
    }

    pub fn key(&self) -> SortKey {
        self.key
    }

    /// Sort `stripe` in place. Stripes of length 0 or 1 are left alone.
    pub fn sort<S: Stripe + ?Sized>(&self, stripe: &mut S) {
        let len = stripe.len();
        if len < 2 {
            return;
        }
        let depth_budget = 2 * len.ilog2() as usize;
        self.sort_range(stripe, 0, len - 1, depth_budget);
    }

    /// Whether `stripe` is already in sorted order.
    pub fn is_sorted<S: Stripe + ?Sized>(&self, stripe: &S) -> bool {
        (1..stripe.len()).all(|i| !self.key.less(stripe.get(i), stripe.get(i - 1)))
    }

    /// Sort the inclusive range `[lo, hi]`.
    fn sort_range<S: Stripe + ?Sized>(
        &self,
        stripe: &mut S,
        mut lo: usize,
        mut hi: usize,
        mut depth: usize,
    ) {
        while lo < hi {
            if hi - lo < INSERTION_THRESHOLD {
                self.insertion_sort(stripe, lo, hi);
                return;
            }
            if depth == 0 {
                self.heap_sort(stripe, lo, hi);
                return;
            }
            depth -= 1;

            let (left_end, right_start) = self.partition(stripe, lo, hi);
            let left_len = left_end.map_or(0, |end| end + 1 - lo);
            let right_len = if right_start <= hi {
                hi + 1 - right_start
            } else {
                0
            };

            if left_len < right_len {
                if let Some(end) = left_end {
                    self.sort_range(stripe, lo, end, depth);
                }
                lo = right_start;
            } else {
                if right_len > 1 {
                    self.sort_range(stripe, right_start, hi, depth);
                }
                match left_end {
                    Some(end) => hi = end,
                    None => return,
                }
            }
        }
    }

    /// One partition-exchange pass over `[lo, hi]`.
    ///
    /// Returns the last index of the left part (`None` when it is empty)
    /// and the first index of the right part. Everything in between is
    /// already in its final place.
    fn partition<S: Stripe + ?Sized>(
        &self,
        stripe: &mut S,
        lo: usize,
        hi: usize,
    ) -> (Option<usize>, usize) {
        let pivot: Pixel = stripe.get(lo + (hi - lo) / 2);

        // `j` may step one below `lo`, which is -1 when `lo == 0`.
        let mut i = lo as isize;
        let mut j = hi as isize;
        while i <= j {
            while self.key.less(stripe.get(i as usize), pivot) {
                i += 1;
            }
            while self.key.less(pivot, stripe.get(j as usize)) {
                j -= 1;
            }
            if i <= j {
                stripe.swap(i as usize, j as usize);
                i += 1;
                j -= 1;
            }
        }

        let left_end = if j > lo as isize {
            Some(j as usize)
        } else {
            None
        };
        (left_end, i as usize)
    }

    fn insertion_sort<S: Stripe + ?Sized>(&self, stripe: &mut S, lo: usize, hi: usize) {
        for k in lo + 1..=hi {
            let mut m = k;
            while m > lo && self.key.less(stripe.get(m), stripe.get(m - 1)) {
                stripe.swap(m, m - 1);
                m -= 1;
            }
        }
    }

    fn heap_sort<S: Stripe + ?Sized>(&self, stripe: &mut S, lo: usize, hi: usize) {
        let n = hi - lo + 1;
        for root in (0..n / 2).rev() {
            self.sift_down(stripe, lo, root, n);
        }
        for end in (1..n).rev() {
            stripe.swap(lo, lo + end);
            self.sift_down(stripe, lo, 0, end);
        }
    }

    /// Restore the max-heap property below `root` in the heap stored at
    /// `stripe[base..base + end]`.
    fn sift_down<S: Stripe + ?Sized>(
        &self,
        stripe: &mut S,
        base: usize,
        mut root: usize,
        end: usize,
    ) {
        loop {
            let mut child = 2 * root + 1;
            if child >= end {
                return;
            }
            if child + 1 < end
                && self
                    .key
                    .less(stripe.get(base + child), stripe.get(base + child + 1))
            {
                child += 1;
            }
            if !self.key.less(stripe.get(base + root), stripe.get(base + child)) {
                return;
            }
            stripe.swap(base + root, base + child);
            root = child;
        }
    }
}

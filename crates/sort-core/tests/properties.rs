use proptest::prelude::*;

use pixsort_core::transform;
use pixsort_frame_model::{Axis, Frame, KeyMode, Pixel, SortConfig, SortKey, SortOrder, WorkerCount};

fn channel() -> impl Strategy<Value = u8> {
    // Mix in a narrow range so equal keys show up often.
    prop_oneof![any::<u8>(), 0u8..3]
}

fn pixel() -> impl Strategy<Value = Pixel> {
    (channel(), channel(), channel()).prop_map(|(a, b, c)| Pixel::new(a, b, c))
}

fn frame() -> impl Strategy<Value = Frame> {
    (0usize..24, 0usize..24).prop_flat_map(|(w, h)| {
        prop::collection::vec(pixel(), w * h)
            .prop_map(move |pixels| Frame::from_pixels(w, h, pixels).unwrap())
    })
}

fn axis() -> impl Strategy<Value = Axis> {
    prop_oneof![Just(Axis::Rows), Just(Axis::Columns)]
}

fn sort_key() -> impl Strategy<Value = SortKey> {
    (
        prop_oneof![Just(KeyMode::Channel0), Just(KeyMode::Luminance)],
        prop_oneof![Just(SortOrder::Ascending), Just(SortOrder::Descending)],
    )
        .prop_map(|(mode, order)| SortKey::new(mode, order))
}

fn config(axis: Axis, key: SortKey, workers: usize) -> SortConfig {
    SortConfig::new(axis, key).with_workers(WorkerCount::new(workers).unwrap())
}

fn stripe(frame: &Frame, axis: Axis, index: usize) -> Vec<Pixel> {
    match axis {
        Axis::Rows => frame.row(index).to_vec(),
        Axis::Columns => frame.column(index),
    }
}

proptest! {
    #[test]
    fn every_stripe_is_a_permutation(frame in frame(), axis in axis(), key in sort_key(), workers in 1usize..9) {
        let mut out = frame.clone();
        transform(&mut out, &config(axis, key, workers)).unwrap();

        for s in 0..axis.stripe_count(frame.width(), frame.height()) {
            let mut before = stripe(&frame, axis, s);
            let mut after = stripe(&out, axis, s);
            before.sort();
            after.sort();
            prop_assert_eq!(before, after, "stripe {}", s);
        }
    }

    #[test]
    fn every_stripe_is_sorted_by_key(frame in frame(), axis in axis(), key in sort_key(), workers in 1usize..9) {
        let mut out = frame.clone();
        transform(&mut out, &config(axis, key, workers)).unwrap();

        for s in 0..axis.stripe_count(out.width(), out.height()) {
            let pixels = stripe(&out, axis, s);
            for pair in pixels.windows(2) {
                prop_assert!(key.key_in_order(pair[0], pair[1]), "stripe {} out of order: {:?}", s, pair);
            }
        }
    }

    #[test]
    fn transform_is_idempotent(frame in frame(), axis in axis(), key in sort_key()) {
        let cfg = config(axis, key, 4);
        let mut once = frame.clone();
        transform(&mut once, &cfg).unwrap();
        let mut twice = once.clone();
        transform(&mut twice, &cfg).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn worker_count_is_not_observable(
        frame in frame(),
        axis in axis(),
        key in sort_key(),
        n1 in 1usize..12,
        n2 in 1usize..12,
    ) {
        let mut a = frame.clone();
        transform(&mut a, &config(axis, key, n1)).unwrap();
        let mut b = frame;
        transform(&mut b, &config(axis, key, n2)).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn matches_reference_sort(frame in frame(), axis in axis(), key in sort_key()) {
        let mut out = frame.clone();
        transform(&mut out, &config(axis, key, 3)).unwrap();

        for s in 0..axis.stripe_count(frame.width(), frame.height()) {
            let mut expected = stripe(&frame, axis, s);
            expected.sort_by(|a, b| key.compare(*a, *b));
            prop_assert_eq!(stripe(&out, axis, s), expected, "stripe {}", s);
        }
    }

    #[test]
    fn single_pixel_stripes_unchanged(len in 0usize..32, axis in axis(), key in sort_key()) {
        // A 1-wide frame has length-1 rows; a 1-tall frame has length-1 columns.
        let pixels: Vec<Pixel> = (0..len).map(|i| Pixel::new(255 - i as u8, i as u8, 0)).collect();
        let (w, h) = match axis {
            Axis::Rows => (1, len),
            Axis::Columns => (len, 1),
        };
        let frame = Frame::from_pixels(w, h, pixels).unwrap();
        let mut out = frame.clone();
        transform(&mut out, &config(axis, key, 4)).unwrap();
        prop_assert_eq!(out, frame);
    }
}

#[test]
fn rows_are_independent_of_each_other() {
    // Row 1 is already sorted and must come through untouched while row 0 is reordered.
    let mut frame = Frame::from_pixels(
        3,
        2,
        vec![
            Pixel::new(200, 0, 0),
            Pixel::new(100, 0, 0),
            Pixel::new(0, 0, 0),
            Pixel::new(1, 0, 0),
            Pixel::new(2, 0, 0),
            Pixel::new(3, 0, 0),
        ],
    )
    .unwrap();
    transform(
        &mut frame,
        &config(Axis::Rows, SortKey::ascending(KeyMode::Channel0), 2),
    )
    .unwrap();
    assert_eq!(
        frame.pixels(),
        &[
            Pixel::new(0, 0, 0),
            Pixel::new(100, 0, 0),
            Pixel::new(200, 0, 0),
            Pixel::new(1, 0, 0),
            Pixel::new(2, 0, 0),
            Pixel::new(3, 0, 0),
        ]
    );
}

#[test]
fn large_constant_frame_terminates() {
    let mut frame = Frame::from_pixels(1920, 8, vec![Pixel::new(128, 128, 128); 1920 * 8]).unwrap();
    let before = frame.clone();
    transform(
        &mut frame,
        &config(Axis::Rows, SortKey::ascending(KeyMode::Luminance), 4),
    )
    .unwrap();
    assert_eq!(frame, before);
}

//! Tests for axis offsets, point queries and structural edits.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic,
    clippy::approx_constant,
    clippy::cast_possible_truncation,
    clippy::absurd_extreme_comparisons,
    clippy::cast_lossless
)]

use panegrid::{Axis, AxisItem, GridError, Visibility};
use proptest::prelude::*;
use test_case::test_case;

fn sized(sizes: &[f64]) -> Axis {
    Axis::fixed(sizes.iter().map(|&s| AxisItem::new(s)).collect()).unwrap()
}

fn visibility(code: u8) -> Visibility {
    match code % 3 {
        0 => Visibility::Visible,
        1 => Visibility::Hidden,
        _ => Visibility::Collapsed,
    }
}

#[test]
fn test_offsets_of_example_axis() {
    let mut axis = sized(&[10.0, 20.0, 30.0, 40.0, 50.0]);
    let offsets: Vec<f64> = (0..5).map(|i| axis.offset_of(i).unwrap()).collect();
    assert_eq!(offsets, vec![0.0, 10.0, 30.0, 60.0, 100.0]);
    assert_eq!(axis.total_size(), 150.0);
    assert_eq!(axis.index_at(35.0), Some(2));
}

#[test_case(0.0 => Some(0); "start")]
#[test_case(9.999 => Some(0); "just before boundary")]
#[test_case(10.0 => Some(1); "boundary resolves to later item")]
#[test_case(149.0 => Some(4); "last item")]
#[test_case(150.0 => None; "total is outside")]
#[test_case(-1.0 => None; "negative")]
fn test_index_at_boundaries(pos: f64) -> Option<u32> {
    sized(&[10.0, 20.0, 30.0, 40.0, 50.0]).index_at(pos)
}

#[test]
fn test_out_of_range_access_errors() {
    let mut axis = sized(&[10.0, 20.0]);
    assert!(matches!(axis.at(2), Err(GridError::Range { index: 2, len: 2 })));
    assert!(matches!(axis.offset_of(3), Err(GridError::Range { .. })));
    assert_eq!(axis.offset_of(2).unwrap(), 30.0);
}

#[test]
fn test_factory_accessors_reject_fixed_axis() {
    let axis = sized(&[10.0]);
    assert!(matches!(axis.cache_len(), Err(GridError::Config(_))));
    assert!(matches!(axis.cached(0), Err(GridError::Config(_))));
}

#[test]
fn test_collapsed_item_takes_no_space_hidden_does() {
    let mut axis = sized(&[10.0, 20.0, 30.0]);
    axis.set_visibility(1, Visibility::Hidden).unwrap();
    assert_eq!(axis.offset_of(2).unwrap(), 30.0);
    axis.set_visibility(1, Visibility::Collapsed).unwrap();
    assert_eq!(axis.offset_of(2).unwrap(), 10.0);
    assert_eq!(axis.index_at(10.0), Some(2));
}

#[test]
fn test_insert_and_remove_shift_offsets() {
    let mut axis = sized(&[10.0, 20.0, 30.0]);
    axis.total_size();
    axis.insert(1, AxisItem::new(5.0)).unwrap();
    assert_eq!(axis.len(), 4);
    assert_eq!(axis.offset_of(2).unwrap(), 15.0);
    let removed = axis.remove(0).unwrap();
    assert_eq!(removed.size(), 10.0);
    assert_eq!(axis.offset_of(1).unwrap(), 5.0);
    assert_eq!(axis.total_size(), 55.0);
    assert!(axis.set_count(10).is_err());
}

#[test]
fn test_virtualized_overrides_survive_eviction() {
    let mut axis = Axis::virtualized(1_000, |_| AxisItem::new(20.0), 8).unwrap();
    axis.resize(3, 50.0).unwrap();
    assert_eq!(axis.offset_of(4).unwrap(), 110.0);
    for i in 500..520 {
        axis.at(i).unwrap();
    }
    assert!(axis.cache_len().unwrap() <= 8);
    assert!(axis.cached(3).unwrap().is_none());
    assert_eq!(axis.at(3).unwrap().size(), 50.0);
    assert_eq!(axis.total_size(), 20_030.0);
}

#[test]
fn test_virtualized_set_count() {
    let mut axis = Axis::virtualized(100, |_| AxisItem::new(10.0), 16).unwrap();
    assert_eq!(axis.total_size(), 1_000.0);
    axis.set_count(40).unwrap();
    assert_eq!(axis.total_size(), 400.0);
    axis.set_count(60).unwrap();
    assert_eq!(axis.total_size(), 600.0);
    assert!(axis.insert(0, AxisItem::new(1.0)).is_err());
}

#[test]
fn test_cleanup_keeps_buffer_around_visible() {
    let mut axis = Axis::virtualized(1_000, |_| AxisItem::new(10.0), 1_000).unwrap();
    for i in 0..100 {
        axis.at(i).unwrap();
    }
    let evicted = axis.cleanup(40, 49, 5).unwrap();
    assert_eq!(evicted, 80);
    assert!(axis.cached(35).unwrap().is_some());
    assert!(axis.cached(34).unwrap().is_none());
}

proptest! {
    #[test]
    fn prop_offsets_are_prefix_sums(
        items in prop::collection::vec((0.0f64..200.0, any::<u8>()), 1..60),
    ) {
        let mut axis = Axis::fixed(
            items.iter().map(|&(s, v)| AxisItem::new(s).with_visibility(visibility(v))).collect(),
        ).unwrap();
        for i in 0..axis.len() {
            let here = axis.offset_of(i).unwrap();
            let next = axis.offset_of(i + 1).unwrap();
            let (size, code) = items[i as usize];
            let expected = if visibility(code) == Visibility::Collapsed { 0.0 } else { size };
            prop_assert!((next - (here + expected)).abs() < 1e-9);
            prop_assert_eq!(axis.size_of(i).unwrap(), expected);
        }
    }

    #[test]
    fn prop_index_at_lands_inside_item(
        sizes in prop::collection::vec(1.0f64..100.0, 1..80),
        frac in 0.0f64..1.0,
    ) {
        let mut axis = sized(&sizes);
        let pos = axis.total_size() * frac;
        let i = axis.index_at(pos).unwrap();
        let start = axis.offset_of(i).unwrap();
        let end = axis.end_of(i).unwrap();
        prop_assert!(start <= pos && pos < end);
    }

    #[test]
    fn prop_virtualized_matches_fixed(
        count in 1u32..300,
        probe in 0u32..300,
    ) {
        let size = |i: u32| 10.0 + f64::from(i % 5);
        let mut virt = Axis::virtualized(count, move |i| AxisItem::new(size(i)), 7).unwrap();
        let mut fixed = Axis::fixed((0..count).map(|i| AxisItem::new(size(i))).collect()).unwrap();
        let probe = probe.min(count);
        prop_assert_eq!(virt.offset_of(probe).unwrap(), fixed.offset_of(probe).unwrap());
        prop_assert_eq!(virt.total_size(), fixed.total_size());
    }
}

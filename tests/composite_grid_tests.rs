//! Composite grid behaviour: configuration, pane derivation, selection and
//! change notification.
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

mod common;

use common::{merge, Recorder};
use panegrid::{
    Band, Bounds, CompositeGrid, Disposable, FocusTarget, GridConfig, GridError, GridEvent, Modifiers, NavKey,
    PaneId, Point, Property, SelectionMode, SelectionUnit,
};

const CONFIG_JSON: &str = r#"{
    "rows": { "fixed": { "sizes": [20, 20, 20, 20, 20, 20], "hidden": [2] } },
    "cols": { "uniform": { "count": 8, "size": 50 } },
    "headerRows": { "uniform": { "count": 1, "size": 24 } },
    "headerCols": { "uniform": { "count": 1, "size": 40 } },
    "frozenRows": 1,
    "frozenCols": 1,
    "merges": [{ "row": 3, "rowSpan": 2, "col": 3, "colSpan": 2 }],
    "selectionUnit": "Row"
}"#;

#[test]
fn test_json_config_builds_nine_panes() {
    let config = GridConfig::from_json(CONFIG_JSON).unwrap();
    let mut grid = common::build(&config);
    assert_eq!(grid.panes().len(), 9);
    assert_eq!(grid.frozen(), (1, 1));
    assert_eq!(grid.row_count(), 6);
    assert_eq!(grid.col_count(), 8);
    assert_eq!(grid.merges().len(), 1);
    assert_eq!(grid.selection_unit(), SelectionUnit::Row);
    assert_eq!(grid.layout().headers.height, 24.0);
    assert_eq!(grid.layout().headers.width, 40.0);
    assert_eq!(grid.layout().body.x, 40.0 + 50.0);
    assert_eq!(grid.layout().body.y, 24.0 + 20.0);

    // Row unit widens the merge's rows to the full width.
    assert!(grid.focus(3, 4));
    assert!(grid.is_selected(4, 0));
    assert!(grid.is_selected(3, 7));
    assert!(!grid.is_selected(5, 0));
}

#[test]
fn test_json_defaults_apply() {
    let config = GridConfig::from_json(r#"{"rows":{"uniform":{"count":3,"size":10}},"cols":{"uniform":{"count":3,"size":10}}}"#)
        .unwrap();
    assert_eq!(config.selection_mode, SelectionMode::Extended);
    assert_eq!(config.selection_unit, SelectionUnit::Cell);
    assert_eq!(config.frozen_rows, 0);
    assert!(config.merges.is_empty());
    assert!(config.header_rows.is_none());
}

#[test]
fn test_invalid_configs_are_rejected() {
    assert!(matches!(GridConfig::from_json(r#"{"rows": 3}"#), Err(GridError::Json(_))));

    let mut config = common::config(5, 5);
    config.frozen_rows = 6;
    assert!(matches!(CompositeGrid::new(&config, common::queue()), Err(GridError::Config(_))));

    let mut config = common::config(5, 5);
    config.merges = vec![merge(4, 2, 0, 1)];
    assert!(matches!(CompositeGrid::new(&config, common::queue()), Err(GridError::Config(_))));

    let mut config = common::config(5, 5);
    config.max_native_track = 0.0;
    assert!(CompositeGrid::new(&config, common::queue()).is_err());
}

#[test]
fn test_straddling_merge_belongs_to_origin_pane() {
    let grid = common::frozen_grid(10, 10, (2, 2), &[merge(1, 3, 1, 3), merge(5, 2, 5, 2)]);
    let owner = |id: PaneId| grid.pane(id).unwrap().merges().len();
    assert_eq!(owner(PaneId::new(Band::Frozen, Band::Frozen)), 1);
    assert_eq!(owner(PaneId::BODY), 1);
    assert_eq!(owner(PaneId::new(Band::Frozen, Band::Body)), 0);
    assert_eq!(grid.pane_of(3, 3), PaneId::new(Band::Frozen, Band::Frozen));
}

#[test]
fn test_batch_groups_calls_into_one_dispatch() {
    let mut grid = common::build(&common::config(200, 5));
    let recorder = Recorder::attach(&grid);
    {
        let _batch = grid.begin_batch();
        grid.select(Bounds::cell(0, 0));
        grid.focus(50, 2);
        grid.select(Bounds::cell(60, 1));
        assert_eq!(recorder.count(), 0);
    }
    let events = recorder.take();
    assert_eq!(events.len(), 3);
    match &events[0] {
        GridEvent::PropertiesChanged { properties } => assert!(properties.contains(&Property::Scroll)),
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(events[1], GridEvent::SelectionChanged);
    assert_eq!(
        events[2],
        GridEvent::FocusChanged {
            previous: None,
            next: Some(FocusTarget { pane: PaneId::BODY, bounds: Bounds::cell(50, 2) }),
        }
    );
}

#[test]
fn test_each_call_dispatches_once() {
    let mut grid = common::build(&common::config(20, 5));
    let recorder = Recorder::attach(&grid);
    grid.select(Bounds::new(0, 2, 0, 2));
    assert_eq!(recorder.take(), vec![GridEvent::SelectionChanged]);
    grid.set_selection_mode(SelectionMode::Single);
    let events = recorder.take();
    assert!(matches!(
        &events[0],
        GridEvent::PropertiesChanged { properties } if properties.contains(&Property::SelectionMode)
    ));
    assert_eq!(events.iter().filter(|e| matches!(e, GridEvent::PropertiesChanged { .. })).count(), 1);
}

#[test]
fn test_unsubscribe_stops_delivery() {
    let mut grid = common::build(&common::config(5, 5));
    let log = std::rc::Rc::new(std::cell::Cell::new(0));
    let seen = std::rc::Rc::clone(&log);
    let id = grid.subscribe(move |_| seen.set(seen.get() + 1));
    grid.select(Bounds::cell(1, 1));
    assert_eq!(log.get(), 1);
    assert!(grid.unsubscribe(id));
    assert!(!grid.unsubscribe(id));
    grid.select(Bounds::cell(2, 2));
    assert_eq!(log.get(), 1);
}

#[test]
fn test_select_unselect_and_single_mode() {
    let mut grid = common::frozen_grid(10, 10, (2, 2), &[]);
    grid.select(Bounds::new(0, 4, 0, 4));
    grid.unselect(Bounds::new(1, 3, 1, 3));
    assert!(grid.is_selected(0, 0));
    assert!(!grid.is_selected(2, 2));
    assert!(grid.is_selected(4, 4));

    grid.set_selection_mode(SelectionMode::Single);
    grid.select(Bounds::cell(7, 7));
    grid.select(Bounds::cell(8, 8));
    assert_eq!(grid.selection(), vec![Bounds::cell(8, 8)]);

    grid.clear_selection();
    assert!(grid.selection().is_empty());
}

#[test]
fn test_selection_clipped_to_grid() {
    let mut grid = common::build(&common::config(5, 5));
    grid.select(Bounds::new(3, 40, 3, 40));
    assert_eq!(grid.selection(), vec![Bounds::new(3, 4, 3, 4)]);
    grid.select(Bounds::new(10, 12, 0, 0));
    assert_eq!(grid.selection().len(), 1);
}

#[test]
fn test_selection_grows_over_merges() {
    let mut grid = common::build(&common::config(10, 10));
    grid.set_merges(&[merge(2, 3, 2, 3)]).unwrap();
    grid.select(Bounds::cell(4, 4));
    assert_eq!(grid.selection(), vec![Bounds::new(2, 4, 2, 4)]);
}

#[test]
fn test_column_unit_selects_whole_columns() {
    let mut grid = common::build(&common::config(10, 6));
    grid.set_selection_unit(SelectionUnit::Column);
    grid.focus(3, 2);
    assert_eq!(grid.selection(), vec![Bounds::new(0, 9, 2, 2)]);
}

#[test]
fn test_set_merges_rebuild_keeps_focus_and_reports_merges() {
    let mut grid = common::build(&common::config(10, 10));
    grid.focus(2, 2);
    let recorder = Recorder::attach(&grid);
    grid.set_merges(&[merge(1, 3, 1, 3)]).unwrap();
    assert_eq!(grid.focus_target().unwrap().bounds, Bounds::new(1, 3, 1, 3));
    assert_eq!(grid.navigation().active(), Some((2, 2)));
    let events = recorder.take();
    assert!(events.iter().any(|e| matches!(
        e,
        GridEvent::PropertiesChanged { properties } if properties.contains(&Property::Merges)
    )));
    assert!(events.iter().any(|e| matches!(e, GridEvent::FocusChanged { .. })));

    assert!(grid.set_merges(&[merge(9, 2, 0, 1)]).is_err());
    assert_eq!(grid.merges().len(), 1);
}

#[test]
fn test_set_frozen_rederives_panes_and_moves_focus() {
    let mut grid = common::build(&common::config(20, 20));
    assert_eq!(grid.panes().len(), 1);
    grid.focus(1, 1);
    grid.set_frozen(3, 0).unwrap();
    assert_eq!(grid.panes().len(), 2);
    assert_eq!(grid.focus_target().unwrap().pane, PaneId::new(Band::Frozen, Band::Body));
    grid.set_frozen(3, 3).unwrap();
    assert_eq!(grid.panes().len(), 4);
    assert!(matches!(grid.set_frozen(21, 0), Err(GridError::Config(_))));
    assert_eq!(grid.frozen(), (3, 3));
}

#[test]
fn test_resize_frozen_row_moves_body() {
    let mut grid = common::frozen_grid(10, 5, (2, 0), &[]);
    assert_eq!(grid.layout().body.y, 40.0);
    grid.resize_row(0, 50.0).unwrap();
    assert_eq!(grid.layout().body.y, 70.0);
    assert!(matches!(grid.resize_row(10, 5.0), Err(GridError::Range { .. })));
}

#[test]
fn test_shrinking_count_clamps_frozen_and_drops_merges() {
    let mut grid = common::frozen_grid(10, 10, (0, 4), &[merge(0, 2, 6, 2)]);
    grid.select(Bounds::new(0, 0, 0, 9));
    grid.set_col_count(3).unwrap();
    assert_eq!(grid.col_count(), 3);
    assert_eq!(grid.frozen(), (0, 3));
    assert!(grid.merges().is_empty());
    assert!(grid.selection().iter().all(|b| b.col_end < 3));
}

#[test]
fn test_set_count_on_fixed_axis_fails() {
    let config = GridConfig::from_json(CONFIG_JSON).unwrap();
    let mut grid = common::build(&config);
    assert!(matches!(grid.set_row_count(3), Err(GridError::Config(_))));
    assert!(grid.set_col_count(12).is_ok());
    assert_eq!(grid.col_count(), 12);
}

#[test]
fn test_selection_overlay_hides_internal_edges() {
    let mut grid = common::frozen_grid(5, 5, (2, 2), &[]);
    grid.select(Bounds::new(1, 3, 1, 3));
    let overlay = grid.selection_overlay();
    assert_eq!(overlay.len(), 4);
    let area: f64 = overlay.iter().map(|r| r.w * r.h).sum();
    assert_eq!(area, 60.0 * 150.0);
    let drawn = overlay
        .iter()
        .map(|r| [r.draw_top, r.draw_bottom, r.draw_left, r.draw_right].iter().filter(|d| **d).count())
        .sum::<usize>();
    assert_eq!(drawn, 8);
}

#[test]
fn test_scroll_to_clamps_and_reports() {
    let mut grid = common::build(&common::config(100, 20));
    let recorder = Recorder::attach(&grid);
    grid.scroll_to(Point::new(10_000.0, 10_000.0));
    let snapshot = grid.snapshot();
    let body = grid.layout().body;
    assert_eq!(snapshot.scroll.y, 2_000.0 - body.height);
    assert_eq!(snapshot.scroll.x, 1_000.0 - body.width);
    assert_eq!(
        recorder.take(),
        vec![GridEvent::PropertiesChanged { properties: vec![Property::Scroll] }]
    );
}

#[test]
fn test_snapshot_serializes_camel_case() {
    let mut grid = common::build(&common::config(10, 10));
    grid.focus(1, 2);
    grid.key_down(NavKey::ArrowDown, Modifiers::SHIFT);
    let json = serde_json::to_value(grid.snapshot()).unwrap();
    assert!(json.get("nativeScroll").is_some());
    assert_eq!(json["anchor"], serde_json::json!([1, 2]));
    assert_eq!(json["focus"]["bounds"]["rowBegin"], 1);
    let selection = json["selection"].as_array().unwrap();
    assert_eq!(selection.len(), 1);
}

#[test]
fn test_dispose_is_idempotent_and_silences_grid() {
    let mut grid = common::frozen_grid(10, 10, (1, 1), &[]);
    grid.focus(3, 3);
    assert!(grid.renderer().live_count() > 0);
    let recorder = Recorder::attach(&grid);
    grid.dispose();
    grid.dispose();
    assert!(grid.is_disposed());
    assert_eq!(grid.renderer().live_count(), 0);
    assert!(!grid.focus(1, 1));
    assert!(!grid.key_down(NavKey::ArrowDown, Modifiers::NONE));
    grid.select(Bounds::cell(0, 0));
    assert!(grid.set_merges(&[merge(0, 2, 0, 2)]).is_ok());
    assert_eq!(recorder.count(), 0);
    assert!(grid.panes().is_empty());
}

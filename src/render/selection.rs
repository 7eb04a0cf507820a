//! Selection overlay helpers.
//!
//! These helpers keep selection outline math testable without a display.
//! Each pane reports its selected rectangles in pixel space; edges shared
//! with another selected rectangle (including one in a neighbouring pane)
//! are not outlined, so a selection spanning a frozen boundary reads as one
//! region.

use serde::{Deserialize, Serialize};

use crate::types::{Bounds, PixelRect};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionRect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub draw_top: bool,
    pub draw_bottom: bool,
    pub draw_left: bool,
    pub draw_right: bool,
}

fn spans_overlap(a: (u32, u32), b: (u32, u32)) -> bool {
    a.0 <= b.1 && b.0 <= a.1
}

/// Outline flags for `rect` given every selected rectangle in the grid.
pub fn edge_flags(rect: &Bounds, all: &[Bounds]) -> [bool; 4] {
    let cols = (rect.col_begin, rect.col_end);
    let rows = (rect.row_begin, rect.row_end);
    let others = || all.iter().filter(move |o| *o != rect);
    let top = !others().any(|o| {
        o.row_end.checked_add(1) == Some(rect.row_begin) && spans_overlap((o.col_begin, o.col_end), cols)
    });
    let bottom = !others().any(|o| {
        rect.row_end.checked_add(1) == Some(o.row_begin) && spans_overlap((o.col_begin, o.col_end), cols)
    });
    let left = !others().any(|o| {
        o.col_end.checked_add(1) == Some(rect.col_begin) && spans_overlap((o.row_begin, o.row_end), rows)
    });
    let right = !others().any(|o| {
        rect.col_end.checked_add(1) == Some(o.col_begin) && spans_overlap((o.row_begin, o.row_end), rows)
    });
    [top, bottom, left, right]
}

/// Build an overlay rectangle; zero-area rectangles are dropped.
pub fn selection_rect(pixels: PixelRect, rect: &Bounds, all: &[Bounds]) -> Option<SelectionRect> {
    if pixels.is_empty() {
        return None;
    }
    let [draw_top, draw_bottom, draw_left, draw_right] = edge_flags(rect, all);
    Some(SelectionRect {
        x: pixels.x,
        y: pixels.y,
        w: pixels.width,
        h: pixels.height,
        draw_top,
        draw_bottom,
        draw_left,
        draw_right,
    })
}

//! Pointer, wheel, scroll and keyboard routing.
//!
//! Coordinates are viewport-relative pixels. Pointer moves during a drag and
//! viewport resizes are only recorded here; the host's per-frame `on_tick`
//! applies the latest of each, then runs one autoscroll step if the drag
//! pointer sits past the body edge.

use serde::{Deserialize, Serialize};

use super::{CompositeGrid, SelectOp};
use crate::layout::Axis;
use crate::nav::NavContext;
use crate::pane::{Band, Pane, PaneId};
use crate::render::CellRenderer;
use crate::types::{column_range, row_range, select_all, Bounds, Modifiers, NavKey, Point, Size};

/// Largest autoscroll step per tick, in pixels.
pub const AUTOSCROLL_STEP_LIMIT: f64 = 48.0;

/// What a pointer press landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum HitTarget {
    Corner,
    ColumnHeader { col: u32 },
    RowHeader { row: u32 },
    Cell { pane: PaneId, row: u32, col: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DragKind {
    Cells,
    Rows,
    Columns,
}

/// An active selection drag.
#[derive(Debug, Clone)]
pub(super) struct Drag {
    kind: DragKind,
    anchor: (u32, u32),
    /// Selection to keep under an additive (Ctrl) drag.
    base: Vec<Bounds>,
    additive: bool,
    pointer: Point,
}

/// Maps a viewport coordinate to a data index along one axis, clamping
/// into the frozen and body regions.
struct Track {
    /// Where the data region starts (after the header band).
    origin: f64,
    frozen_shown: f64,
    frozen_full: f64,
    body: f64,
    scroll: f64,
    frozen: u32,
}

impl Track {
    fn locate(&self, axis: &mut Axis, pos: f64) -> Option<u32> {
        let last = axis.len().checked_sub(1)?;
        let local = pos - self.origin;
        let content = if self.frozen > 0 && local < self.frozen_shown {
            local.max(0.0)
        } else {
            self.frozen_full + (local - self.frozen_shown).clamp(0.0, self.body) + self.scroll
        };
        Some(axis.index_at(content).unwrap_or(last).min(last))
    }
}

/// Autoscroll delta for one axis: how far `pos` lies outside `[lo, hi]`,
/// limited per tick, and zero when the scroll offset cannot move that way.
fn edge_delta(pos: f64, lo: f64, hi: f64, offset: f64, max: f64) -> f64 {
    if pos < lo && offset > 0.0 {
        (pos - lo).max(-AUTOSCROLL_STEP_LIMIT)
    } else if pos > hi && offset < max {
        (pos - hi).min(AUTOSCROLL_STEP_LIMIT)
    } else {
        0.0
    }
}

impl<R: CellRenderer> CompositeGrid<R> {
    /// Identify what lies under a viewport point.
    pub fn hit_test(&mut self, point: Point) -> Option<HitTarget> {
        let id = self.panes.iter().find(|p| p.location().contains(point)).map(Pane::id)?;
        if id.rows == Band::Header && id.cols == Band::Header {
            return Some(HitTarget::Corner);
        }
        let (row, col) = self.with_pane(id, |pane, ax, _| pane.cell_at(ax, point)).flatten()?;
        Some(match (id.rows, id.cols) {
            (Band::Header, _) => HitTarget::ColumnHeader { col },
            (_, Band::Header) => HitTarget::RowHeader { row },
            _ => HitTarget::Cell { pane: id, row, col },
        })
    }

    /// Pointer pressed. Returns whether anything was hit.
    pub fn pointer_down(&mut self, point: Point, mods: Modifiers) -> bool {
        if self.lifecycle.is_disposed() {
            return false;
        }
        let Some(hit) = self.hit_test(point) else {
            return false;
        };
        let (rows, cols) = (self.row_count(), self.col_count());
        if rows == 0 || cols == 0 {
            return false;
        }
        let _batch = self.notifier.begin_batch();
        self.cancel_drag();
        let additive = mods.is_additive();
        let op = if additive { SelectOp::Add } else { SelectOp::Reset };
        tracing::debug!(?hit, ?mods, "pointer down");
        match hit {
            HitTarget::Corner => self.apply_selection(select_all(rows, cols), SelectOp::Reset),
            HitTarget::ColumnHeader { col } => {
                self.start_drag(DragKind::Columns, (0, col), additive, point);
                self.apply_selection(column_range(col, col, rows), op);
            }
            HitTarget::RowHeader { row } => {
                self.start_drag(DragKind::Rows, (row, 0), additive, point);
                self.apply_selection(row_range(row, row, cols), op);
            }
            HitTarget::Cell { row, col, .. } => self.press_cell(row, col, mods, point),
        }
        true
    }

    fn press_cell(&mut self, row: u32, col: u32, mods: Modifiers, point: Point) {
        let additive = mods.is_additive();
        if mods.shift && self.mode.allows_extend() && self.nav.active().is_some() {
            let selection = self.nav.extend_to(row, col, &self.merges);
            let anchor = self.nav.anchor().unwrap_or((row, col));
            self.start_drag(DragKind::Cells, anchor, false, point);
            self.apply_selection(selection, SelectOp::Reset);
            return;
        }

        // Focus moves when the interaction settles; until then the target
        // cell is protected from re-render disposal.
        self.clear_reservations();
        let owner_pane = self.pane_of(row, col);
        if let Some(pane) = self.pane_mut(owner_pane) {
            pane.reserve_focus(row, col);
        }
        let owner = self.nav.set_focus(row, col, &self.merges);

        if additive && self.is_selected(row, col) {
            self.apply_selection(owner, SelectOp::Remove);
            return;
        }
        self.start_drag(DragKind::Cells, (row, col), additive, point);
        self.apply_selection(owner, if additive { SelectOp::Add } else { SelectOp::Reset });
    }

    fn start_drag(&mut self, kind: DragKind, anchor: (u32, u32), additive: bool, pointer: Point) {
        let base = if additive { self.selection() } else { Vec::new() };
        self.drag = Some(Drag { kind, anchor, base, additive, pointer });
    }

    pub(super) fn cancel_drag(&mut self) {
        self.drag = None;
        self.pending_drag.cancel();
        self.autoscroll.cancel();
    }

    /// Whether a selection drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Pointer moved. Only recorded; applied on the next tick.
    pub fn pointer_move(&mut self, point: Point) -> bool {
        let Some(drag) = self.drag.as_mut() else {
            return false;
        };
        drag.pointer = point;
        self.pending_drag.schedule(point);
        true
    }

    /// Pointer released: settle the drag and commit the pending focus.
    pub fn pointer_up(&mut self, point: Point) -> bool {
        if self.lifecycle.is_disposed() {
            return false;
        }
        let _batch = self.notifier.begin_batch();
        let dragging = self.drag.is_some();
        if dragging {
            self.pending_drag.cancel();
            self.update_drag(point);
        }
        self.cancel_drag();

        if let Some((row, col)) = self.panes.iter().find_map(Pane::reserved) {
            let previous = self.focus_target();
            self.commit_focus(row, col, previous);
            return true;
        }
        dragging
    }

    /// Re-derive the drag selection for a pointer position.
    fn update_drag(&mut self, point: Point) {
        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        drag.pointer = point;
        let (kind, anchor, additive) = (drag.kind, drag.anchor, drag.additive);
        let base = if additive { drag.base.clone() } else { Vec::new() };
        let Some((row, col)) = self.data_cell_near(point) else {
            return;
        };
        let (rows, cols) = (self.row_count(), self.col_count());
        let rect = match kind {
            DragKind::Cells => {
                if self.nav.active().is_some() {
                    self.nav.extend_to(row, col, &self.merges)
                } else {
                    Bounds::new(anchor.0, row, anchor.1, col)
                }
            }
            DragKind::Rows => row_range(anchor.0, row, cols),
            DragKind::Columns => column_range(anchor.1, col, rows),
        };
        if additive {
            self.restore_selection(&base);
            self.apply_selection(rect, SelectOp::Add);
        } else {
            self.apply_selection(rect, SelectOp::Reset);
        }

        let delta = self.autoscroll_delta(point, kind);
        if delta == Point::ZERO {
            self.autoscroll.cancel();
        } else {
            self.autoscroll.schedule(delta);
        }
    }

    /// Data cell under a viewport point, clamped into the data region.
    fn data_cell_near(&mut self, point: Point) -> Option<(u32, u32)> {
        let layout = self.layout;
        let logical = self.scroll.logical();
        let rows = Track {
            origin: layout.headers.height,
            frozen_shown: layout.row_band(Band::Frozen).1,
            frozen_full: layout.frozen.height,
            body: layout.body.height,
            scroll: logical.y,
            frozen: self.frozen_rows,
        };
        let cols = Track {
            origin: layout.headers.width,
            frozen_shown: layout.column_band(Band::Frozen).1,
            frozen_full: layout.frozen.width,
            body: layout.body.width,
            scroll: logical.x,
            frozen: self.frozen_cols,
        };
        let row = rows.locate(&mut self.axes.rows, point.y)?;
        let col = cols.locate(&mut self.axes.cols, point.x)?;
        Some((row, col))
    }

    fn autoscroll_delta(&self, point: Point, kind: DragKind) -> Point {
        let body = self.layout.body;
        let h = &self.scroll.horizontal;
        let v = &self.scroll.vertical;
        let dx = match kind {
            DragKind::Rows => 0.0,
            _ => edge_delta(point.x, body.x, body.right(), h.logical(), h.max_logical()),
        };
        let dy = match kind {
            DragKind::Columns => 0.0,
            _ => edge_delta(point.y, body.y, body.bottom(), v.logical(), v.max_logical()),
        };
        Point::new(dx, dy)
    }

    /// Scroll by a wheel delta in logical pixels. Returns the native offsets.
    pub fn wheel(&mut self, dx: f64, dy: f64) -> Point {
        if self.lifecycle.is_disposed() {
            return self.scroll.native();
        }
        let _batch = self.notifier.begin_batch();
        let target = self.scroll.logical();
        self.scroll_logical(Point::new(target.x + dx, target.y + dy))
    }

    /// The host's scroll track moved. Returns whether the body scrolled.
    pub fn native_scroll(&mut self, native: Point) -> bool {
        if self.lifecycle.is_disposed() {
            return false;
        }
        let _batch = self.notifier.begin_batch();
        let before = self.scroll.logical();
        if !self.scroll.on_native_scroll(native) {
            return false;
        }
        self.after_scroll(before);
        true
    }

    /// Apply a navigation key. Returns `false` when nothing moved, so the
    /// host can let the key's default behavior through.
    pub fn key_down(&mut self, key: NavKey, mods: Modifiers) -> bool {
        if self.lifecycle.is_disposed() {
            return false;
        }
        let _batch = self.notifier.begin_batch();
        let page_extent = self.layout.body.height;
        let step = {
            let mut ctx = NavContext {
                rows: &mut self.axes.rows,
                cols: &mut self.axes.cols,
                merges: &self.merges,
                page_extent,
                mode: self.mode,
            };
            self.nav.handle_key(key, mods, &mut ctx)
        };
        let Some(step) = step else {
            return false;
        };
        let (row, col) = step.cursor;
        if step.extended {
            let id = self.pane_of(row, col);
            self.reveal(id, row, col);
        } else {
            let previous = self.focus_target();
            self.commit_focus(row, col, previous);
        }
        self.apply_selection(step.selection, SelectOp::Reset);
        true
    }

    /// Record a viewport size; applied on the next tick.
    pub fn request_resize(&mut self, viewport: Size) {
        if !self.lifecycle.is_disposed() {
            self.pending_resize.schedule(viewport);
        }
    }

    /// Run coalesced work once per display frame: the latest resize, the
    /// latest drag position, then one autoscroll step. Returns whether
    /// anything ran.
    pub fn on_tick(&mut self) -> bool {
        if self.lifecycle.is_disposed() {
            return false;
        }
        let _batch = self.notifier.begin_batch();
        let autoscroll = self.autoscroll.take();
        let mut ran = false;
        if let Some(viewport) = self.pending_resize.take() {
            self.set_viewport(viewport);
            ran = true;
        }
        if let Some(point) = self.pending_drag.take() {
            self.update_drag(point);
            ran = true;
        }
        let pointer = self.drag.as_ref().map(|d| d.pointer);
        if let (Some(delta), Some(pointer)) = (autoscroll, pointer) {
            let logical = self.scroll.logical();
            self.scroll_logical(Point::new(logical.x + delta.x, logical.y + delta.y));
            self.update_drag(pointer);
            tracing::trace!(?delta, "autoscroll step");
            ran = true;
        }
        ran
    }
}

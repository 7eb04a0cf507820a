//! One rectangular region of the composite grid.
//!
//! A pane sees a contiguous slice of the row axis and of the column axis.
//! It keeps a scroll offset, the set of cells it has asked the renderer to
//! materialize, its own share of the selection, and the merges whose origin
//! falls inside it. Positions covered by a merge another pane owns are left
//! to that pane and never materialized here.
//!
//! Pane content space starts at the first item of each slice: a pane whose
//! rows begin at index 2 reports row 2 at `y == 0`. Visible-range queries
//! work only in content space, so scrolled and unscrolled panes answer the
//! same question the same way.

mod cells;

pub use cells::{Cell, CellTable};

use serde::{Deserialize, Serialize};

use crate::layout::{subtract, Axis, MergeIndex, RectSet};
use crate::lifecycle::{Arrangeable, Disposable, Lifecycle};
use crate::render::{selection_rect, CellHandle, CellRenderer, CellState, SelectionRect};
use crate::types::{Bounds, PixelRect, Point, Size};

/// Which run of an axis a pane covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Band {
    /// The header axis (column-header rows, or row-header columns).
    Header,
    /// Leading frozen items of the data axis.
    Frozen,
    /// The scrollable remainder of the data axis.
    Body,
}

impl Band {
    /// Only body bands follow the scroll position.
    pub fn scrolls(self) -> bool {
        self == Band::Body
    }

    pub fn is_data(self) -> bool {
        self != Band::Header
    }
}

/// Pane identity: the row band crossed with the column band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaneId {
    pub rows: Band,
    pub cols: Band,
}

impl PaneId {
    pub const BODY: PaneId = PaneId { rows: Band::Body, cols: Band::Body };

    pub fn new(rows: Band, cols: Band) -> Self {
        Self { rows, cols }
    }

    /// Both bands hold data cells.
    pub fn is_data(&self) -> bool {
        self.rows.is_data() && self.cols.is_data()
    }
}

/// Half-open index range `[begin, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Span {
    pub begin: u32,
    pub end: u32,
}

impl Span {
    pub fn new(begin: u32, end: u32) -> Self {
        Self { begin, end: end.max(begin) }
    }

    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.begin)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.begin
    }

    pub fn contains(&self, index: u32) -> bool {
        (self.begin..self.end).contains(&index)
    }

    pub fn last(&self) -> Option<u32> {
        if self.is_empty() {
            None
        } else {
            self.end.checked_sub(1)
        }
    }

    fn pair(self) -> (u32, u32) {
        (self.begin, self.end)
    }
}

/// Mutable access to the two axes a pane slices.
pub struct PaneAxes<'a> {
    pub rows: &'a mut Axis,
    pub cols: &'a mut Axis,
}

/// Inclusive index window of `span` overlapping `[start, start + extent)`.
/// A zero extent is a point query that resolves boundaries to the later item.
fn axis_window(axis: &mut Axis, span: Span, start: f64, extent: f64) -> Option<(u32, u32)> {
    let last = span.last()?;
    let first = axis.first_ending_after(start)?.max(span.begin);
    if first > last {
        return None;
    }
    if extent <= 0.0 {
        return Some((first, first));
    }
    let end = axis.last_starting_before(start + extent)?.min(last);
    (end >= first).then_some((first, end))
}

/// Scroll offset along one dimension that brings `[start, end)` into a
/// window of `extent` pixels currently at `current`.
fn align_into(current: f64, extent: f64, start: f64, end: f64) -> f64 {
    if start < current {
        start
    } else if end > current + extent {
        (end - extent).max(0.0)
    } else {
        current
    }
}

/// A grid region.
pub struct Pane {
    id: PaneId,
    rows: Span,
    cols: Span,
    location: PixelRect,
    scroll: Point,
    cells: CellTable,
    visible: Option<Bounds>,
    selection: RectSet,
    merges: MergeIndex,
    /// Merges owned by other panes that may reach into this one.
    foreign: MergeIndex,
    focused: Option<(u32, u32)>,
    reserved: Option<(u32, u32)>,
    lifecycle: Lifecycle,
}

impl std::fmt::Debug for Pane {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pane")
            .field("id", &self.id)
            .field("rows", &self.rows)
            .field("cols", &self.cols)
            .field("location", &self.location)
            .field("scroll", &self.scroll)
            .field("cells", &self.cells.len())
            .field("visible", &self.visible)
            .finish()
    }
}

impl Pane {
    pub fn new(id: PaneId, rows: Span, cols: Span, merges: MergeIndex) -> Self {
        let mut lifecycle = Lifecycle::new();
        lifecycle.mark_initialized();
        Self {
            id,
            rows,
            cols,
            location: PixelRect::default(),
            scroll: Point::ZERO,
            cells: CellTable::new(),
            visible: None,
            selection: RectSet::new(),
            merges,
            foreign: MergeIndex::default(),
            focused: None,
            reserved: None,
            lifecycle,
        }
    }

    /// Merges whose origin lies in another pane. Cells they cover are drawn
    /// by the owning pane only.
    pub fn with_foreign_merges(mut self, foreign: MergeIndex) -> Self {
        self.foreign = foreign;
        self
    }

    pub fn id(&self) -> PaneId {
        self.id
    }

    pub fn rows(&self) -> Span {
        self.rows
    }

    pub fn cols(&self) -> Span {
        self.cols
    }

    /// Update the axis slices (item counts or frozen counts changed).
    pub fn set_spans(&mut self, rows: Span, cols: Span) {
        self.rows = rows;
        self.cols = cols;
    }

    /// Every index this pane owns, or `None` if a slice is empty.
    pub fn extent(&self) -> Option<Bounds> {
        let row_end = self.rows.last()?;
        let col_end = self.cols.last()?;
        Some(Bounds::new(self.rows.begin, row_end, self.cols.begin, col_end))
    }

    pub fn owns(&self, row: u32, col: u32) -> bool {
        self.rows.contains(row) && self.cols.contains(col)
    }

    pub fn location(&self) -> PixelRect {
        self.location
    }

    pub fn scroll(&self) -> Point {
        self.scroll
    }

    /// Set the scroll offset. Non-scrolling bands stay at 0.
    pub fn set_scroll(&mut self, scroll: Point) {
        self.scroll = Point::new(
            if self.id.cols.scrolls() { scroll.x } else { 0.0 },
            if self.id.rows.scrolls() { scroll.y } else { 0.0 },
        );
    }

    pub fn cells(&self) -> &CellTable {
        &self.cells
    }

    /// Last materialized index range.
    pub fn visible(&self) -> Option<Bounds> {
        self.visible
    }

    pub fn selection(&self) -> &RectSet {
        &self.selection
    }

    pub fn merges(&self) -> &MergeIndex {
        &self.merges
    }

    pub fn focused(&self) -> Option<(u32, u32)> {
        self.focused
    }

    pub fn reserved(&self) -> Option<(u32, u32)> {
        self.reserved
    }

    /// Content-space offset of the slice start.
    fn base(&self, axes: &mut PaneAxes<'_>) -> Point {
        Point::new(
            axes.cols.offset_of(self.cols.begin).unwrap_or(0.0),
            axes.rows.offset_of(self.rows.begin).unwrap_or(0.0),
        )
    }

    /// Pixel size of everything in the pane's slices.
    pub fn content_size(&self, axes: &mut PaneAxes<'_>) -> Size {
        let base = self.base(axes);
        let right = axes.cols.offset_of(self.cols.end).unwrap_or(base.x);
        let bottom = axes.rows.offset_of(self.rows.end).unwrap_or(base.y);
        Size::new((right - base.x).max(0.0), (bottom - base.y).max(0.0))
    }

    /// The content-space rectangle currently shown.
    pub fn window(&self) -> PixelRect {
        PixelRect::new(self.scroll.x, self.scroll.y, self.location.width, self.location.height)
    }

    /// Index range covered by a content-space rectangle.
    pub fn visible_range_for(&self, axes: &mut PaneAxes<'_>, rect: PixelRect) -> Option<Bounds> {
        let base = self.base(axes);
        let (row_begin, row_end) = axis_window(axes.rows, self.rows, base.y + rect.y, rect.height)?;
        let (col_begin, col_end) = axis_window(axes.cols, self.cols, base.x + rect.x, rect.width)?;
        Some(Bounds { row_begin, row_end, col_begin, col_end })
    }

    /// Composite-space pixel rectangle of an index rectangle.
    pub fn rect_of(&self, axes: &mut PaneAxes<'_>, bounds: &Bounds) -> PixelRect {
        let base = self.base(axes);
        let x = axes.cols.offset_of(bounds.col_begin).unwrap_or(base.x);
        let y = axes.rows.offset_of(bounds.row_begin).unwrap_or(base.y);
        let right = axes.cols.end_of(bounds.col_end).unwrap_or(x);
        let bottom = axes.rows.end_of(bounds.row_end).unwrap_or(y);
        PixelRect::new(
            self.location.x + x - base.x - self.scroll.x,
            self.location.y + y - base.y - self.scroll.y,
            right - x,
            bottom - y,
        )
    }

    fn state_for(&self, key: (u32, u32)) -> CellState {
        CellState {
            selected: self.selection.contains(key.0, key.1, Some(&self.merges)),
            focused: self.focused == Some(key),
        }
    }

    fn is_protected(&self, key: (u32, u32)) -> bool {
        self.focused == Some(key) || self.reserved == Some(key)
    }

    /// (row, col) lies under a merge another pane draws.
    fn covered_elsewhere(&self, row: u32, col: u32) -> bool {
        !self.merges.is_merged(row, col) && self.foreign.is_merged(row, col)
    }

    /// Make sure the cell owning (row, col) exists; returns its key, or
    /// `None` when another pane owns the position.
    fn ensure_cell(&mut self, row: u32, col: u32, renderer: &mut dyn CellRenderer) -> Option<(u32, u32)> {
        if self.covered_elsewhere(row, col) {
            return None;
        }
        let owner = self.merges.owner_bounds(row, col);
        let key = (owner.row_begin, owner.col_begin);
        if !self.cells.contains(key) {
            let handle = renderer.create_cell(owner, owner.row_count(), owner.col_count());
            let state = self.state_for(key);
            if state != CellState::default() {
                renderer.set_cell_state(handle, state);
            }
            self.cells.insert(Cell { handle, bounds: owner, attached: true, state });
        }
        Some(key)
    }

    /// Re-derive the visible range and diff the cell table against it.
    ///
    /// Cells leaving the range are destroyed unless focused or reserved, in
    /// which case they are only detached. Cells entering are created. Cells
    /// that stay are repositioned.
    pub fn render(&mut self, axes: &mut PaneAxes<'_>, renderer: &mut dyn CellRenderer) {
        if self.lifecycle.is_disposed() {
            return;
        }
        let next = if self.location.is_empty() {
            None
        } else {
            self.visible_range_for(axes, self.window())
        };
        let previous = self.visible;

        let mut destroyed = 0usize;
        let mut detached = 0usize;
        for key in self.cells.keys() {
            let Some(cell) = self.cells.get(key).copied() else {
                continue;
            };
            if next.is_some_and(|n| cell.bounds.intersects(&n)) {
                continue;
            }
            if self.is_protected(key) {
                if cell.attached {
                    renderer.set_cell_attached(cell.handle, false);
                    if let Some(c) = self.cells.get_mut(key) {
                        c.attached = false;
                    }
                    detached += 1;
                }
            } else if let Some(gone) = self.cells.remove(key) {
                renderer.destroy_cell(gone.handle);
                destroyed += 1;
            }
        }

        let mut created = 0usize;
        if let Some(next) = next {
            let entering = match previous {
                Some(prev) if prev.intersects(&next) => subtract(&next, &prev),
                _ => vec![next],
            };
            let before = self.cells.len();
            for strip in entering {
                for row in strip.rows() {
                    for col in strip.cols() {
                        self.ensure_cell(row, col, renderer);
                    }
                }
            }
            created = self.cells.len().saturating_sub(before);
        }
        self.visible = next;
        self.position_cells(axes, renderer);
        tracing::trace!(pane = ?self.id, ?next, created, destroyed, detached, "pane render");
    }

    /// Push pixel rectangles for every cell in the visible range.
    fn position_cells(&mut self, axes: &mut PaneAxes<'_>, renderer: &mut dyn CellRenderer) {
        let Some(visible) = self.visible else {
            return;
        };
        let targets: Vec<(u32, u32)> = self
            .cells
            .iter()
            .filter(|c| c.bounds.intersects(&visible))
            .map(Cell::origin)
            .collect();
        for key in targets {
            let Some(cell) = self.cells.get(key).copied() else {
                continue;
            };
            let rect = self.rect_of(axes, &cell.bounds);
            renderer.update_cell_bounds(cell.handle, rect, key.0, key.1);
            if !cell.attached {
                renderer.set_cell_attached(cell.handle, true);
                if let Some(c) = self.cells.get_mut(key) {
                    c.attached = true;
                }
            }
        }
    }

    /// Destroy detached cells that lost their protection.
    fn release_offscreen(&mut self, renderer: &mut dyn CellRenderer) {
        let visible = self.visible;
        for key in self.cells.keys() {
            if self.is_protected(key) {
                continue;
            }
            let Some(cell) = self.cells.get(key) else {
                continue;
            };
            if visible.is_some_and(|v| cell.bounds.intersects(&v)) {
                continue;
            }
            if let Some(gone) = self.cells.remove(key) {
                renderer.destroy_cell(gone.handle);
            }
        }
    }

    /// Push selection/focus flags that changed since the last refresh.
    fn refresh_states(&mut self, renderer: &mut dyn CellRenderer) {
        for key in self.cells.keys() {
            let state = self.state_for(key);
            if let Some(cell) = self.cells.get_mut(key) {
                if cell.state != state {
                    cell.state = state;
                    renderer.set_cell_state(cell.handle, state);
                }
            }
        }
    }

    fn clip(&self, bounds: &Bounds) -> Option<Bounds> {
        bounds.clip(self.rows.pair(), self.cols.pair())
    }

    /// Add `bounds` (clipped to this pane) to the selection.
    pub fn select(&mut self, bounds: Bounds, renderer: &mut dyn CellRenderer) {
        if self.lifecycle.is_disposed() {
            return;
        }
        if let Some(clipped) = self.clip(&bounds) {
            self.selection.select(clipped);
            self.refresh_states(renderer);
        }
    }

    /// Remove `bounds` (clipped to this pane) from the selection.
    pub fn unselect(&mut self, bounds: Bounds, renderer: &mut dyn CellRenderer) {
        if self.lifecycle.is_disposed() {
            return;
        }
        if let Some(clipped) = self.clip(&bounds) {
            self.selection.unselect(clipped);
            self.refresh_states(renderer);
        }
    }

    /// Replace the selection with `bounds` clipped to this pane, or clear it
    /// when nothing of `bounds` lies here.
    pub fn reset_selection(&mut self, bounds: Bounds, renderer: &mut dyn CellRenderer) {
        if self.lifecycle.is_disposed() {
            return;
        }
        match self.clip(&bounds) {
            Some(clipped) => self.selection.reset(clipped),
            None => self.selection.clear(),
        }
        self.refresh_states(renderer);
    }

    pub fn clear_selection(&mut self, renderer: &mut dyn CellRenderer) {
        if self.selection.is_empty() {
            return;
        }
        self.selection.clear();
        self.refresh_states(renderer);
    }

    /// Adjust scroll so (row, col), or the merge owning it, is in view.
    /// Returns whether the scroll offset changed.
    pub fn scroll_into(&mut self, axes: &mut PaneAxes<'_>, row: u32, col: u32) -> bool {
        if self.lifecycle.is_disposed() {
            return false;
        }
        let target = self.merges.owner_bounds(row, col);
        let base = self.base(axes);
        let mut scroll = self.scroll;
        if self.id.rows.scrolls() {
            let start = axes.rows.offset_of(target.row_begin).unwrap_or(base.y) - base.y;
            let end = axes.rows.end_of(target.row_end).unwrap_or(base.y) - base.y;
            scroll.y = align_into(scroll.y, self.location.height, start, end);
        }
        if self.id.cols.scrolls() {
            let start = axes.cols.offset_of(target.col_begin).unwrap_or(base.x) - base.x;
            let end = axes.cols.end_of(target.col_end).unwrap_or(base.x) - base.x;
            scroll.x = align_into(scroll.x, self.location.width, start, end);
        }
        let changed = scroll != self.scroll;
        self.scroll = scroll;
        changed
    }

    /// Scroll (row, col) into view and make its cell the focused one,
    /// creating it if needed.
    pub fn focus(
        &mut self,
        axes: &mut PaneAxes<'_>,
        row: u32,
        col: u32,
        renderer: &mut dyn CellRenderer,
    ) -> Option<CellHandle> {
        if self.lifecycle.is_disposed() {
            return None;
        }
        self.scroll_into(axes, row, col);
        self.render(axes, renderer);
        let key = self.ensure_cell(row, col, renderer)?;
        self.focused = Some(key);
        let in_view = self.visible;
        let cell = self.cells.get(key).copied()?;
        if cell.attached && !in_view.is_some_and(|v| cell.bounds.intersects(&v)) {
            renderer.set_cell_attached(cell.handle, false);
            if let Some(c) = self.cells.get_mut(key) {
                c.attached = false;
            }
        }
        self.refresh_states(renderer);
        self.release_offscreen(renderer);
        Some(cell.handle)
    }

    /// Drop focus from this pane.
    pub fn blur(&mut self, renderer: &mut dyn CellRenderer) {
        if self.focused.take().is_some() {
            self.refresh_states(renderer);
            self.release_offscreen(renderer);
        }
    }

    /// Protect the cell owning (row, col) from disposal until the pending
    /// focus is applied or cleared.
    pub fn reserve_focus(&mut self, row: u32, col: u32) {
        let owner = self.merges.owner_bounds(row, col);
        self.reserved = Some((owner.row_begin, owner.col_begin));
    }

    pub fn clear_reserved_focus(&mut self, renderer: &mut dyn CellRenderer) {
        if self.reserved.take().is_some() {
            self.release_offscreen(renderer);
        }
    }

    /// Consume the reservation and focus it. Returns the focused origin.
    pub fn apply_reserved_focus(
        &mut self,
        axes: &mut PaneAxes<'_>,
        renderer: &mut dyn CellRenderer,
    ) -> Option<(u32, u32)> {
        let key = self.reserved.take()?;
        self.focus(axes, key.0, key.1, renderer)?;
        Some(key)
    }

    /// Cell under a composite-space point. Returns the exact (row, col);
    /// callers map it to a merge origin if they need one.
    pub fn cell_at(&self, axes: &mut PaneAxes<'_>, point: Point) -> Option<(u32, u32)> {
        if !self.location.contains(point) {
            return None;
        }
        let base = self.base(axes);
        let y = base.y + point.y - self.location.y + self.scroll.y;
        let x = base.x + point.x - self.location.x + self.scroll.x;
        let row = axes.rows.index_at(y).filter(|r| self.rows.contains(*r))?;
        let col = axes.cols.index_at(x).filter(|c| self.cols.contains(*c))?;
        Some((row, col))
    }

    /// Selection outline pieces in composite pixel space, clipped to what is
    /// visible. `all` is every selected rectangle across the grid.
    pub fn selection_rects(&self, axes: &mut PaneAxes<'_>, all: &[Bounds]) -> Vec<SelectionRect> {
        let Some(visible) = self.visible else {
            return Vec::new();
        };
        self.selection
            .iter()
            .filter_map(|rect| {
                let shown = rect.intersection(&visible)?;
                let pixels = self.rect_of(axes, &shown);
                selection_rect(pixels, rect, all)
            })
            .collect()
    }

    /// Destroy every cell and forget the visible range. Selection survives.
    pub fn clear_cells(&mut self, renderer: &mut dyn CellRenderer) {
        for cell in self.cells.drain() {
            renderer.destroy_cell(cell.handle);
        }
        self.visible = None;
    }

    /// Release renderer resources, then dispose.
    pub fn dispose_with(&mut self, renderer: &mut dyn CellRenderer) {
        if self.lifecycle.is_disposed() {
            return;
        }
        self.clear_cells(renderer);
        self.dispose();
    }
}

impl Arrangeable for Pane {
    fn arrange(&mut self, rect: PixelRect) {
        self.location = PixelRect::new(rect.x, rect.y, rect.width.max(0.0), rect.height.max(0.0));
    }
}

impl Disposable for Pane {
    fn dispose(&mut self) {
        if !self.lifecycle.mark_disposed() {
            return;
        }
        self.cells = CellTable::new();
        self.visible = None;
        self.selection.clear();
        self.focused = None;
        self.reserved = None;
    }

    fn is_disposed(&self) -> bool {
        self.lifecycle.is_disposed()
    }
}

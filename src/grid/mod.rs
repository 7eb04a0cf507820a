//! The composite grid.
//!
//! A `CompositeGrid` owns the shared axes, the rendering collaborator and
//! up to nine panes crossing {header, frozen, body} row bands with the same
//! column bands. It partitions merges across panes, resolves the scrollbar
//! layout, keeps the body scroll position, and routes input to the pane under
//! the pointer or to the navigation controller.
//!
//! Every public mutation runs inside a notification batch, so a host sees one
//! change notification per call however many internal steps it took.

mod arrange;
mod input;

pub use arrange::{fit_scrollbars, Layout, ScrollbarFit, MAX_LAYOUT_PASSES};
pub use input::{HitTarget, AUTOSCROLL_STEP_LIMIT};

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};
use crate::layout::{Axis, MergeIndex, ScrollCoordinator, Visibility};
use crate::lifecycle::{Arrangeable, Disposable, Initializable, Lifecycle};
use crate::nav::NavigationController;
use crate::notify::{Batch, ChangeNotifier, FocusTarget, GridEvent, Property, SubscriptionId};
use crate::pane::{Band, Pane, PaneAxes, PaneId};
use crate::render::{CellRenderer, RenderQueue, SelectionRect, Surface};
use crate::schedule::Coalesced;
use crate::types::{
    validate_merges, AxisSpec, Bounds, GridConfig, Merge, PixelRect, Point, SelectionMode, SelectionUnit, Size,
};

use input::Drag;

/// The four axes a grid slices into panes.
pub struct GridAxes {
    pub rows: Axis,
    pub cols: Axis,
    /// Rows of the column-header band.
    pub header_rows: Option<Axis>,
    /// Columns of the row-header band.
    pub header_cols: Option<Axis>,
}

impl GridAxes {
    pub fn new(rows: Axis, cols: Axis) -> Self {
        Self { rows, cols, header_rows: None, header_cols: None }
    }

    pub fn with_header_rows(mut self, axis: Axis) -> Self {
        self.header_rows = Some(axis);
        self
    }

    pub fn with_header_cols(mut self, axis: Axis) -> Self {
        self.header_cols = Some(axis);
        self
    }

    /// Build every axis a configuration describes.
    pub fn from_config(config: &GridConfig) -> Result<Self> {
        Ok(Self {
            rows: config.rows.build()?,
            cols: config.cols.build()?,
            header_rows: config.header_rows.as_ref().map(AxisSpec::build).transpose()?,
            header_cols: config.header_cols.as_ref().map(AxisSpec::build).transpose()?,
        })
    }

    pub fn header_row_count(&self) -> u32 {
        self.header_rows.as_ref().map_or(0, Axis::len)
    }

    pub fn header_col_count(&self) -> u32 {
        self.header_cols.as_ref().map_or(0, Axis::len)
    }

    /// The row and column axes a pane slices.
    pub(crate) fn pane_axes(&mut self, id: PaneId) -> Option<PaneAxes<'_>> {
        let GridAxes { rows, cols, header_rows, header_cols } = self;
        let rows = match id.rows {
            Band::Header => header_rows.as_mut()?,
            Band::Frozen | Band::Body => rows,
        };
        let cols = match id.cols {
            Band::Header => header_cols.as_mut()?,
            Band::Frozen | Band::Body => cols,
        };
        Some(PaneAxes { rows, cols })
    }

    fn dispose(&mut self) {
        self.rows.dispose();
        self.cols.dispose();
        if let Some(axis) = self.header_rows.as_mut() {
            axis.dispose();
        }
        if let Some(axis) = self.header_cols.as_mut() {
            axis.dispose();
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SelectOp {
    Reset,
    Add,
    Remove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dim {
    Rows,
    Cols,
}

/// Data cell band for an index along an axis with `frozen` leading items.
pub fn band_of(index: u32, frozen: u32) -> Band {
    if index < frozen {
        Band::Frozen
    } else {
        Band::Body
    }
}

/// Host-facing summary of focus, selection and scroll state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSnapshot {
    pub focus: Option<FocusTarget>,
    pub active: Option<(u32, u32)>,
    pub anchor: Option<(u32, u32)>,
    pub selection: Vec<Bounds>,
    pub scroll: Point,
    pub native_scroll: Point,
    pub track: Size,
    pub body: PixelRect,
}

/// Headless virtualized grid.
pub struct CompositeGrid<R: CellRenderer = RenderQueue> {
    axes: GridAxes,
    frozen_rows: u32,
    frozen_cols: u32,
    /// Grid-wide data merges; panes hold their own partitions.
    merges: MergeIndex,
    column_header_merges: Vec<Merge>,
    row_header_merges: Vec<Merge>,
    panes: Vec<Pane>,
    scroll: ScrollCoordinator,
    layout: Layout,
    nav: NavigationController,
    /// Pane holding the committed focus.
    focus_pane: Option<PaneId>,
    mode: SelectionMode,
    unit: SelectionUnit,
    renderer: R,
    notifier: Rc<ChangeNotifier>,
    drag: Option<Drag>,
    pending_drag: Coalesced<Point>,
    pending_resize: Coalesced<Size>,
    autoscroll: Coalesced<Point>,
    cache_buffer: u32,
    scrollbar_size: f64,
    lifecycle: Lifecycle,
}

impl<R: CellRenderer> std::fmt::Debug for CompositeGrid<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeGrid")
            .field("rows", &self.axes.rows.len())
            .field("cols", &self.axes.cols.len())
            .field("frozen", &(self.frozen_rows, self.frozen_cols))
            .field("panes", &self.panes.len())
            .field("layout", &self.layout)
            .field("focus", &self.focus_pane)
            .finish()
    }
}

impl<R: CellRenderer> CompositeGrid<R> {
    /// Build a grid from a JSON-shaped configuration.
    pub fn new(config: &GridConfig, renderer: R) -> Result<Self> {
        config.validate()?;
        let axes = GridAxes::from_config(config)?;
        Self::with_axes(config, axes, renderer)
    }

    /// Build a grid over caller-supplied axes. The axis specs in `config`
    /// are ignored; everything else applies.
    pub fn with_axes(config: &GridConfig, axes: GridAxes, renderer: R) -> Result<Self> {
        if config.max_native_track.is_nan() || config.max_native_track <= 0.0 {
            return Err(GridError::config("maxNativeTrack must be positive"));
        }
        config.validate_counts(
            axes.rows.len(),
            axes.cols.len(),
            axes.header_row_count(),
            axes.header_col_count(),
        )?;
        let measured = renderer.measure(Surface::Viewport);
        let mut grid = Self {
            axes,
            frozen_rows: config.frozen_rows,
            frozen_cols: config.frozen_cols,
            merges: MergeIndex::new(&config.merges),
            column_header_merges: config.column_header_merges.clone(),
            row_header_merges: config.row_header_merges.clone(),
            panes: Vec::new(),
            scroll: ScrollCoordinator::new(config.max_native_track),
            layout: Layout { viewport: sanitize(measured), ..Layout::default() },
            nav: NavigationController::new(),
            focus_pane: None,
            mode: config.selection_mode,
            unit: config.selection_unit,
            renderer,
            notifier: ChangeNotifier::new(),
            drag: None,
            pending_drag: Coalesced::new(),
            pending_resize: Coalesced::new(),
            autoscroll: Coalesced::new(),
            cache_buffer: config.cache_buffer,
            scrollbar_size: config.scrollbar_size,
            lifecycle: Lifecycle::new(),
        };
        grid.initialize()?;
        Ok(grid)
    }

    // ---- accessors ----

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn axes(&self) -> &GridAxes {
        &self.axes
    }

    pub fn row_count(&self) -> u32 {
        self.axes.rows.len()
    }

    pub fn col_count(&self) -> u32 {
        self.axes.cols.len()
    }

    /// Frozen (rows, cols).
    pub fn frozen(&self) -> (u32, u32) {
        (self.frozen_rows, self.frozen_cols)
    }

    pub fn panes(&self) -> &[Pane] {
        &self.panes
    }

    pub fn pane(&self, id: PaneId) -> Option<&Pane> {
        self.panes.iter().find(|p| p.id() == id)
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn scroll_state(&self) -> &ScrollCoordinator {
        &self.scroll
    }

    pub fn navigation(&self) -> &NavigationController {
        &self.nav
    }

    pub fn merges(&self) -> &MergeIndex {
        &self.merges
    }

    pub fn selection_mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn selection_unit(&self) -> SelectionUnit {
        self.unit
    }

    /// Every selected rectangle across the data panes.
    pub fn selection(&self) -> Vec<Bounds> {
        self.panes
            .iter()
            .filter(|p| p.id().is_data())
            .flat_map(|p| p.selection().iter().copied())
            .collect()
    }

    /// Whether (row, col) paints as selected.
    pub fn is_selected(&self, row: u32, col: u32) -> bool {
        self.panes
            .iter()
            .filter(|p| p.id().is_data())
            .any(|p| p.selection().contains(row, col, Some(&self.merges)))
    }

    /// The committed focus: its pane and cell rectangle.
    pub fn focus_target(&self) -> Option<FocusTarget> {
        let id = self.focus_pane?;
        let (row, col) = self.pane(id)?.focused()?;
        Some(FocusTarget { pane: id, bounds: self.merges.owner_bounds(row, col) })
    }

    /// Pane that owns a data cell (by the origin of its merge).
    pub fn pane_of(&self, row: u32, col: u32) -> PaneId {
        let owner = self.merges.owner_bounds(row, col);
        PaneId::new(band_of(owner.row_begin, self.frozen_rows), band_of(owner.col_begin, self.frozen_cols))
    }

    // ---- notifications ----

    pub fn subscribe(&self, listener: impl FnMut(&GridEvent) + 'static) -> SubscriptionId {
        self.notifier.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    /// Group several calls into one notification.
    pub fn begin_batch(&self) -> Batch {
        self.notifier.begin_batch()
    }

    // ---- mutation surface ----

    /// Replace the data merges. Triggers a full re-layout.
    pub fn set_merges(&mut self, merges: &[Merge]) -> Result<()> {
        if self.lifecycle.is_disposed() {
            return Ok(());
        }
        validate_merges(merges, self.row_count(), self.col_count(), "merge")?;
        let _batch = self.notifier.begin_batch();
        self.merges = MergeIndex::new(merges);
        self.notifier.property_changed(Property::Merges);
        self.rebuild();
        Ok(())
    }

    /// Replace the merges of the column-header and row-header bands.
    pub fn set_header_merges(&mut self, column_header: &[Merge], row_header: &[Merge]) -> Result<()> {
        if self.lifecycle.is_disposed() {
            return Ok(());
        }
        validate_merges(column_header, self.axes.header_row_count(), self.col_count(), "column header merge")?;
        validate_merges(row_header, self.row_count(), self.axes.header_col_count(), "row header merge")?;
        let _batch = self.notifier.begin_batch();
        self.column_header_merges = column_header.to_vec();
        self.row_header_merges = row_header.to_vec();
        self.notifier.property_changed(Property::Merges);
        self.rebuild();
        Ok(())
    }

    pub fn set_selection_mode(&mut self, mode: SelectionMode) {
        if self.lifecycle.is_disposed() || self.mode == mode {
            return;
        }
        let _batch = self.notifier.begin_batch();
        self.mode = mode;
        self.notifier.property_changed(Property::SelectionMode);
        self.rebuild();
    }

    pub fn set_selection_unit(&mut self, unit: SelectionUnit) {
        if self.lifecycle.is_disposed() || self.unit == unit {
            return;
        }
        let _batch = self.notifier.begin_batch();
        self.unit = unit;
        self.notifier.property_changed(Property::SelectionUnit);
        self.rebuild();
    }

    /// Change the frozen row/column counts. Re-derives the panes.
    pub fn set_frozen(&mut self, rows: u32, cols: u32) -> Result<()> {
        if self.lifecycle.is_disposed() {
            return Ok(());
        }
        if rows > self.row_count() || cols > self.col_count() {
            return Err(GridError::config(format!(
                "frozen {rows}x{cols} exceeds the {}x{} grid",
                self.row_count(),
                self.col_count()
            )));
        }
        if (rows, cols) == (self.frozen_rows, self.frozen_cols) {
            return Ok(());
        }
        let _batch = self.notifier.begin_batch();
        self.frozen_rows = rows;
        self.frozen_cols = cols;
        self.notifier.property_changed(Property::Layout);
        self.rebuild();
        Ok(())
    }

    pub fn resize_row(&mut self, index: u32, size: f64) -> Result<()> {
        self.edit_axis(Dim::Rows, |axis| axis.resize(index, size))
    }

    pub fn resize_col(&mut self, index: u32, size: f64) -> Result<()> {
        self.edit_axis(Dim::Cols, |axis| axis.resize(index, size))
    }

    pub fn set_row_visibility(&mut self, index: u32, visibility: Visibility) -> Result<()> {
        self.edit_axis(Dim::Rows, |axis| axis.set_visibility(index, visibility))
    }

    pub fn set_col_visibility(&mut self, index: u32, visibility: Visibility) -> Result<()> {
        self.edit_axis(Dim::Cols, |axis| axis.set_visibility(index, visibility))
    }

    /// Change the item count of a virtualized row axis.
    pub fn set_row_count(&mut self, count: u32) -> Result<()> {
        self.set_count(Dim::Rows, count)
    }

    /// Change the item count of a virtualized column axis.
    pub fn set_col_count(&mut self, count: u32) -> Result<()> {
        self.set_count(Dim::Cols, count)
    }

    /// Focus a data cell, scrolling it into view. Returns `false` when the
    /// cell is out of range.
    pub fn focus(&mut self, row: u32, col: u32) -> bool {
        if self.lifecycle.is_disposed() || row >= self.row_count() || col >= self.col_count() {
            return false;
        }
        let _batch = self.notifier.begin_batch();
        let previous = self.focus_target();
        let owner = self.nav.set_focus(row, col, &self.merges);
        self.commit_focus(row, col, previous);
        self.apply_selection(owner, SelectOp::Reset);
        true
    }

    /// Add a rectangle to the selection.
    pub fn select(&mut self, bounds: Bounds) {
        self.mutate_selection(bounds, SelectOp::Add);
    }

    /// Remove a rectangle from the selection.
    pub fn unselect(&mut self, bounds: Bounds) {
        self.mutate_selection(bounds, SelectOp::Remove);
    }

    /// Replace the selection with one rectangle.
    pub fn reset_selection(&mut self, bounds: Bounds) {
        self.mutate_selection(bounds, SelectOp::Reset);
    }

    pub fn clear_selection(&mut self) {
        if self.lifecycle.is_disposed() {
            return;
        }
        let _batch = self.notifier.begin_batch();
        let CompositeGrid { panes, renderer, .. } = self;
        for pane in panes.iter_mut() {
            pane.clear_selection(renderer);
        }
        self.notifier.selection_changed();
    }

    /// Scroll the body to a logical offset. Returns the native offsets the
    /// host should give its scroll track.
    pub fn scroll_to(&mut self, logical: Point) -> Point {
        if self.lifecycle.is_disposed() {
            return self.scroll.native();
        }
        let _batch = self.notifier.begin_batch();
        self.scroll_logical(logical)
    }

    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            focus: self.focus_target(),
            active: self.nav.active(),
            anchor: self.nav.anchor(),
            selection: self.selection(),
            scroll: self.scroll.logical(),
            native_scroll: self.scroll.native(),
            track: self.scroll.track_size(),
            body: self.layout.body,
        }
    }

    /// Selection outline pieces for every data pane, in grid pixel space.
    pub fn selection_overlay(&mut self) -> Vec<SelectionRect> {
        let all = self.selection();
        let CompositeGrid { axes, panes, .. } = self;
        panes
            .iter()
            .filter(|p| p.id().is_data())
            .flat_map(|pane| {
                axes.pane_axes(pane.id())
                    .map(|mut ax| pane.selection_rects(&mut ax, &all))
                    .unwrap_or_default()
            })
            .collect()
    }

    // ---- internals ----

    fn pane_mut(&mut self, id: PaneId) -> Option<&mut Pane> {
        self.panes.iter_mut().find(|p| p.id() == id)
    }

    /// Run `f` on a pane together with its axes and the renderer.
    fn with_pane<T>(
        &mut self,
        id: PaneId,
        f: impl FnOnce(&mut Pane, &mut PaneAxes<'_>, &mut dyn CellRenderer) -> T,
    ) -> Option<T> {
        let CompositeGrid { axes, panes, renderer, .. } = self;
        let pane = panes.iter_mut().find(|p| p.id() == id)?;
        let mut ax = axes.pane_axes(id)?;
        Some(f(pane, &mut ax, renderer))
    }

    fn axis_mut(&mut self, dim: Dim) -> &mut Axis {
        match dim {
            Dim::Rows => &mut self.axes.rows,
            Dim::Cols => &mut self.axes.cols,
        }
    }

    /// Size or visibility edit: incremental re-layout only.
    fn edit_axis(&mut self, dim: Dim, edit: impl FnOnce(&mut Axis) -> Result<()>) -> Result<()> {
        if self.lifecycle.is_disposed() {
            return Ok(());
        }
        let _batch = self.notifier.begin_batch();
        edit(self.axis_mut(dim))?;
        self.notifier.property_changed(Property::AxisItems);
        self.relayout();
        Ok(())
    }

    fn set_count(&mut self, dim: Dim, count: u32) -> Result<()> {
        if self.lifecycle.is_disposed() {
            return Ok(());
        }
        let old = self.axis_mut(dim).len();
        if old == count {
            return Ok(());
        }
        let _batch = self.notifier.begin_batch();
        self.axis_mut(dim).set_count(count)?;
        self.notifier.property_changed(Property::AxisItems);

        if count < old {
            // Pane spans still reflect the old count, so clipping keeps working.
            let last = old - 1;
            let cut = match dim {
                Dim::Rows => Bounds::new(count, last, 0, self.col_count().saturating_sub(1)),
                Dim::Cols => Bounds::new(0, self.row_count().saturating_sub(1), count, last),
            };
            let CompositeGrid { panes, renderer, .. } = self;
            for pane in panes.iter_mut().filter(|p| p.id().is_data()) {
                pane.unselect(cut, renderer);
            }
            self.notifier.selection_changed();
        }

        let (rows, cols) = (self.row_count(), self.col_count());
        let mut structural = false;
        if self.frozen_rows > rows || self.frozen_cols > cols {
            self.frozen_rows = self.frozen_rows.min(rows);
            self.frozen_cols = self.frozen_cols.min(cols);
            structural = true;
        }
        let fits = |m: &Merge, r: u32, c: u32| {
            let b = m.bounds();
            b.row_end < r && b.col_end < c
        };
        let kept: Vec<Merge> = self.merges.merges().iter().copied().filter(|m| fits(m, rows, cols)).collect();
        if kept.len() != self.merges.len() {
            self.merges = MergeIndex::new(&kept);
            self.notifier.property_changed(Property::Merges);
            structural = true;
        }
        let header_rows = self.axes.header_row_count();
        let header_cols = self.axes.header_col_count();
        let before = self.column_header_merges.len() + self.row_header_merges.len();
        self.column_header_merges.retain(|m| fits(m, header_rows, cols));
        self.row_header_merges.retain(|m| fits(m, rows, header_cols));
        if self.column_header_merges.len() + self.row_header_merges.len() != before {
            structural = true;
        }

        if structural {
            self.rebuild();
        } else {
            self.nav.clamp_to(rows, cols);
            if self.nav.active().is_none() {
                self.drop_focus();
            }
            self.relayout();
        }
        Ok(())
    }

    fn mutate_selection(&mut self, bounds: Bounds, op: SelectOp) {
        if self.lifecycle.is_disposed() {
            return;
        }
        let _batch = self.notifier.begin_batch();
        self.apply_selection(bounds, op);
    }

    /// Push a selection change to every data pane. Bounds are clipped to the
    /// grid, widened by the selection unit and grown to cover merges.
    fn apply_selection(&mut self, bounds: Bounds, op: SelectOp) {
        if !self.mode.allows_selection() {
            return;
        }
        let (rows, cols) = (self.row_count(), self.col_count());
        let Some(bounds) = bounds.clip((0, rows), (0, cols)) else {
            return;
        };
        let bounds = self.merges.expand(self.unit.expand(bounds, rows, cols));
        let op = match (op, self.mode) {
            (SelectOp::Add, SelectionMode::Single) => SelectOp::Reset,
            (op, _) => op,
        };
        let CompositeGrid { panes, renderer, .. } = self;
        for pane in panes.iter_mut().filter(|p| p.id().is_data()) {
            match op {
                SelectOp::Reset => pane.reset_selection(bounds, renderer),
                SelectOp::Add => pane.select(bounds, renderer),
                SelectOp::Remove => pane.unselect(bounds, renderer),
            }
        }
        self.notifier.selection_changed();
    }

    /// Replace the selection with already-expanded rectangles.
    fn restore_selection(&mut self, rects: &[Bounds]) {
        let CompositeGrid { panes, renderer, .. } = self;
        for pane in panes.iter_mut().filter(|p| p.id().is_data()) {
            pane.clear_selection(renderer);
            for rect in rects {
                pane.select(*rect, renderer);
            }
        }
    }

    /// Scroll the owning pane so (row, col) is visible and carry the new
    /// offset to every pane sharing the scrolled band.
    fn reveal(&mut self, id: PaneId, row: u32, col: u32) {
        let Some(Some(wanted)) =
            self.with_pane(id, |pane, ax, _| pane.scroll_into(ax, row, col).then(|| pane.scroll()))
        else {
            return;
        };
        let current = self.scroll.logical();
        let target = Point::new(
            if id.cols.scrolls() { wanted.x } else { current.x },
            if id.rows.scrolls() { wanted.y } else { current.y },
        );
        self.scroll_logical(target);
    }

    fn scroll_logical(&mut self, target: Point) -> Point {
        let before = self.scroll.logical();
        let native = self.scroll.scroll_to(target);
        self.after_scroll(before);
        native
    }

    fn after_scroll(&mut self, before: Point) {
        if self.scroll.logical() != before {
            self.notifier.property_changed(Property::Scroll);
        }
        self.sync_scroll();
    }

    /// Move the committed focus to (row, col): blur the old pane, scroll the
    /// target into view and focus it there.
    fn commit_focus(&mut self, row: u32, col: u32, previous: Option<FocusTarget>) {
        let owner = self.merges.owner_bounds(row, col);
        let id = self.pane_of(row, col);
        if let Some(old) = self.focus_pane.filter(|p| *p != id) {
            let CompositeGrid { panes, renderer, .. } = self;
            if let Some(pane) = panes.iter_mut().find(|p| p.id() == old) {
                pane.blur(renderer);
            }
        }
        self.reveal(id, row, col);
        let key = (owner.row_begin, owner.col_begin);
        self.with_pane(id, |pane, ax, renderer| {
            if pane.reserved() == Some(key) {
                pane.apply_reserved_focus(ax, renderer);
            } else {
                pane.focus(ax, row, col, renderer);
            }
        });
        self.focus_pane = Some(id);
        tracing::debug!(pane = ?id, row, col, "focus committed");
        self.notifier.focus_changed(previous, Some(FocusTarget { pane: id, bounds: owner }));
    }

    /// Blur the focused pane, if any, and report focus lost.
    fn drop_focus(&mut self) {
        let previous = self.focus_target();
        let Some(id) = self.focus_pane.take() else {
            return;
        };
        let CompositeGrid { panes, renderer, .. } = self;
        if let Some(pane) = panes.iter_mut().find(|p| p.id() == id) {
            pane.blur(renderer);
        }
        if previous.is_some() {
            self.notifier.focus_changed(previous, None);
        }
    }

    /// Drop pending-focus reservations in every pane.
    fn clear_reservations(&mut self) {
        let CompositeGrid { panes, renderer, .. } = self;
        for pane in panes.iter_mut() {
            pane.clear_reserved_focus(renderer);
        }
    }

    /// Tear down and re-derive every pane, then restore focus at the same
    /// position. Selection starts over.
    fn rebuild(&mut self) {
        let previous = self.focus_target();
        let active = self.nav.active();
        self.cancel_drag();
        let CompositeGrid { panes, renderer, .. } = self;
        for pane in panes.iter_mut() {
            pane.dispose_with(renderer);
        }
        self.panes = self.derive_panes();
        self.focus_pane = None;
        self.nav.reset();
        self.relayout();
        self.notifier.selection_changed();

        let (rows, cols) = (self.row_count(), self.col_count());
        match active.filter(|&(r, c)| r < rows && c < cols) {
            Some((row, col)) => {
                let owner = self.nav.set_focus(row, col, &self.merges);
                self.commit_focus(row, col, previous);
                self.apply_selection(owner, SelectOp::Reset);
            }
            None if previous.is_some() => self.notifier.focus_changed(previous, None),
            None => {}
        }
    }
}

fn sanitize(size: Size) -> Size {
    Size::new(size.width.max(0.0), size.height.max(0.0))
}

impl<R: CellRenderer> Initializable for CompositeGrid<R> {
    /// Derive the panes and run the first layout.
    fn initialize(&mut self) -> Result<()> {
        if !self.lifecycle.mark_initialized() {
            return Err(GridError::config("grid is already initialized"));
        }
        self.panes = self.derive_panes();
        self.relayout();
        Ok(())
    }
}

impl<R: CellRenderer> Arrangeable for CompositeGrid<R> {
    /// Apply a new viewport immediately. Only the size is used; pane
    /// rectangles are relative to the grid's own origin.
    fn arrange(&mut self, rect: PixelRect) {
        if self.lifecycle.is_disposed() {
            return;
        }
        let _batch = self.notifier.begin_batch();
        self.set_viewport(rect.size());
    }
}

impl<R: CellRenderer> Disposable for CompositeGrid<R> {
    fn dispose(&mut self) {
        if !self.lifecycle.mark_disposed() {
            return;
        }
        self.cancel_drag();
        self.pending_resize.cancel();
        let CompositeGrid { panes, renderer, .. } = self;
        for pane in panes.iter_mut() {
            pane.dispose_with(renderer);
        }
        self.panes.clear();
        self.axes.dispose();
        self.nav.reset();
        self.focus_pane = None;
        tracing::debug!("grid disposed");
    }

    fn is_disposed(&self) -> bool {
        self.lifecycle.is_disposed()
    }
}

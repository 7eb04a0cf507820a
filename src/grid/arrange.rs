//! Pane derivation and layout.

use serde::{Deserialize, Serialize};

use super::{band_of, CompositeGrid};
use crate::layout::{Axis, MergeIndex};
use crate::lifecycle::Arrangeable;
use crate::notify::Property;
use crate::pane::{Band, Pane, PaneId, Span};
use crate::render::{CellRenderer, Surface};
use crate::types::{Merge, PixelRect, Size};

/// Passes the scrollbar fixed point may take before giving up.
pub const MAX_LAYOUT_PASSES: u32 = 4;

/// Which scrollbars the body needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollbarFit {
    pub horizontal: bool,
    pub vertical: bool,
    pub passes: u32,
    /// `false` when the pass cap was hit and the last values were kept.
    pub settled: bool,
}

/// Resolve scrollbar visibility for `content` shown in `space`.
///
/// Starts with no scrollbars, checks overflow in each dimension, reserves
/// `thickness` on the orthogonal side for each bar found, and repeats until
/// both flags stop changing or [`MAX_LAYOUT_PASSES`] is reached. A vertical
/// bar takes `thickness.width`; a horizontal one `thickness.height`.
pub fn fit_scrollbars(content: Size, space: Size, thickness: Size) -> ScrollbarFit {
    let mut fit = ScrollbarFit::default();
    for pass in 1..=MAX_LAYOUT_PASSES {
        let width = space.width - if fit.vertical { thickness.width } else { 0.0 };
        let height = space.height - if fit.horizontal { thickness.height } else { 0.0 };
        let horizontal = content.width > width;
        let vertical = content.height > height;
        fit.passes = pass;
        if horizontal == fit.horizontal && vertical == fit.vertical {
            fit.settled = true;
            return fit;
        }
        fit.horizontal = horizontal;
        fit.vertical = vertical;
    }
    tracing::warn!(
        passes = MAX_LAYOUT_PASSES,
        horizontal = fit.horizontal,
        vertical = fit.vertical,
        "scrollbar layout did not settle, keeping last pass"
    );
    fit
}

/// Resolved grid geometry.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    pub viewport: Size,
    /// Shown row-header width and column-header height.
    pub headers: Size,
    /// Full pixel extent of the frozen columns (width) and rows (height).
    pub frozen: Size,
    /// The scrollable region.
    pub body: PixelRect,
    /// Scrollable content behind the body.
    pub content: Size,
    pub scrollbars: ScrollbarFit,
}

impl Layout {
    /// Horizontal (start, extent) of a column band.
    pub fn column_band(&self, band: Band) -> (f64, f64) {
        match band {
            Band::Header => (0.0, self.headers.width),
            Band::Frozen => (self.headers.width, (self.body.x - self.headers.width).max(0.0)),
            Band::Body => (self.body.x, self.body.width),
        }
    }

    /// Vertical (start, extent) of a row band.
    pub fn row_band(&self, band: Band) -> (f64, f64) {
        match band {
            Band::Header => (0.0, self.headers.height),
            Band::Frozen => (self.headers.height, (self.body.y - self.headers.height).max(0.0)),
            Band::Body => (self.body.y, self.body.height),
        }
    }

    pub fn pane_rect(&self, id: PaneId) -> PixelRect {
        let (x, width) = self.column_band(id.cols);
        let (y, height) = self.row_band(id.rows);
        PixelRect::new(x, y, width, height)
    }
}

/// Index range a band covers along one axis.
fn band_span(band: Band, len: u32, frozen: u32, header: u32) -> Span {
    let frozen = frozen.min(len);
    match band {
        Band::Header => Span::new(0, header),
        Band::Frozen => Span::new(0, frozen),
        Band::Body => Span::new(frozen, len),
    }
}

/// Bands present along one axis, leading first.
fn bands(frozen: u32, header: u32) -> Vec<Band> {
    let mut out = Vec::with_capacity(3);
    if header > 0 {
        out.push(Band::Header);
    }
    if frozen > 0 {
        out.push(Band::Frozen);
    }
    out.push(Band::Body);
    out
}

fn total(axis: Option<&mut Axis>) -> f64 {
    axis.map_or(0.0, |a| a.total_size())
}

impl<R: CellRenderer> CompositeGrid<R> {
    fn spans(&self, id: PaneId) -> (Span, Span) {
        (
            band_span(id.rows, self.row_count(), self.frozen_rows, self.axes.header_row_count()),
            band_span(id.cols, self.col_count(), self.frozen_cols, self.axes.header_col_count()),
        )
    }

    /// Merges a pane owns, and the ones it must leave to their owners.
    /// Each merge goes to the pane holding its origin.
    fn partition(&self, id: PaneId) -> (MergeIndex, MergeIndex) {
        let (frozen_rows, frozen_cols) = (self.frozen_rows, self.frozen_cols);
        let owned = |m: &Merge, rows: bool, cols: bool| {
            (!rows || band_of(m.row, frozen_rows) == id.rows) && (!cols || band_of(m.col, frozen_cols) == id.cols)
        };
        let split = |merges: &[Merge], rows: bool, cols: bool| {
            (
                MergeIndex::filtered(merges, |m| owned(m, rows, cols)),
                MergeIndex::filtered(merges, |m| !owned(m, rows, cols)),
            )
        };
        match (id.rows, id.cols) {
            (Band::Header, Band::Header) => (MergeIndex::default(), MergeIndex::default()),
            (Band::Header, _) => split(&self.column_header_merges, false, true),
            (_, Band::Header) => split(&self.row_header_merges, true, false),
            _ => split(self.merges.merges(), true, true),
        }
    }

    /// One pane per (row band, column band) pair.
    pub(super) fn derive_panes(&self) -> Vec<Pane> {
        let row_bands = bands(self.frozen_rows, self.axes.header_row_count());
        let col_bands = bands(self.frozen_cols, self.axes.header_col_count());
        let mut panes = Vec::with_capacity(row_bands.len() * col_bands.len());
        for &rows in &row_bands {
            for &cols in &col_bands {
                let id = PaneId::new(rows, cols);
                let (row_span, col_span) = self.spans(id);
                let (merges, foreign) = self.partition(id);
                tracing::debug!(
                    pane = ?id,
                    ?row_span,
                    ?col_span,
                    merges = merges.len(),
                    foreign = foreign.len(),
                    "derived pane"
                );
                panes.push(Pane::new(id, row_span, col_span, merges).with_foreign_merges(foreign));
            }
        }
        panes
    }

    /// Scrollbar thickness as (vertical width, horizontal height).
    fn scrollbar_thickness(&self) -> Size {
        let pick = |measured: f64| if measured > 0.0 { measured } else { self.scrollbar_size };
        Size::new(
            pick(self.renderer.measure(Surface::VerticalScrollbar).width),
            pick(self.renderer.measure(Surface::HorizontalScrollbar).height),
        )
    }

    /// Apply a viewport size and lay out again.
    pub(super) fn set_viewport(&mut self, viewport: Size) {
        self.layout.viewport = super::sanitize(viewport);
        self.relayout();
    }

    /// Recompute geometry from the current axes and viewport, re-arrange
    /// every pane and render it.
    pub(super) fn relayout(&mut self) {
        if self.lifecycle.is_disposed() {
            return;
        }
        let viewport = self.layout.viewport;
        let header_w = total(self.axes.header_cols.as_mut());
        let header_h = total(self.axes.header_rows.as_mut());
        let frozen_w = self.axes.cols.offset_of(self.frozen_cols).unwrap_or(0.0);
        let frozen_h = self.axes.rows.offset_of(self.frozen_rows).unwrap_or(0.0);
        let content = Size::new(
            (self.axes.cols.total_size() - frozen_w).max(0.0),
            (self.axes.rows.total_size() - frozen_h).max(0.0),
        );

        let headers = Size::new(header_w.min(viewport.width), header_h.min(viewport.height));
        let frozen_shown = Size::new(
            frozen_w.min(viewport.width - headers.width),
            frozen_h.min(viewport.height - headers.height),
        );
        let space = Size::new(
            (viewport.width - headers.width - frozen_shown.width).max(0.0),
            (viewport.height - headers.height - frozen_shown.height).max(0.0),
        );
        let thickness = self.scrollbar_thickness();
        let scrollbars = fit_scrollbars(content, space, thickness);
        let body = PixelRect::new(
            headers.width + frozen_shown.width,
            headers.height + frozen_shown.height,
            (space.width - if scrollbars.vertical { thickness.width } else { 0.0 }).max(0.0),
            (space.height - if scrollbars.horizontal { thickness.height } else { 0.0 }).max(0.0),
        );

        let layout = Layout { viewport, headers, frozen: Size::new(frozen_w, frozen_h), body, content, scrollbars };
        if layout != self.layout {
            tracing::debug!(?body, ?content, ?scrollbars, "layout changed");
            self.layout = layout;
            self.notifier.property_changed(Property::Layout);
        }

        let before = self.scroll.logical();
        self.scroll.update_extent(content, body.size());

        for index in 0..self.panes.len() {
            let Some(id) = self.panes.get(index).map(Pane::id) else {
                continue;
            };
            let (rows, cols) = self.spans(id);
            if let Some(pane) = self.panes.get_mut(index) {
                pane.set_spans(rows, cols);
                pane.arrange(layout.pane_rect(id));
            }
        }
        self.after_scroll(before);
    }

    /// Give every pane the coordinator's offset and re-render.
    pub(super) fn sync_scroll(&mut self) {
        let logical = self.scroll.logical();
        let CompositeGrid { axes, panes, renderer, .. } = self;
        for pane in panes.iter_mut() {
            pane.set_scroll(logical);
            if let Some(mut ax) = axes.pane_axes(pane.id()) {
                pane.render(&mut ax, renderer);
            }
        }
        self.trim_caches();
    }

    /// Evict virtualized items far from the body's visible range.
    fn trim_caches(&mut self) {
        let Some(visible) = self.pane(PaneId::BODY).and_then(Pane::visible) else {
            return;
        };
        let buffer = self.cache_buffer;
        let axes = [
            (&mut self.axes.rows, visible.row_begin, visible.row_end),
            (&mut self.axes.cols, visible.col_begin, visible.col_end),
        ];
        for (axis, lo, hi) in axes {
            if axis.is_virtualized() {
                if let Err(error) = axis.cleanup(lo, hi, buffer) {
                    tracing::warn!(%error, lo, hi, "axis cache cleanup failed");
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::grid::GridAxes;
    use crate::render::RenderQueue;
    use crate::types::GridConfig;
    use test_case::test_case;

    #[test_case(Size::new(100.0, 100.0), false, false, 1 ; "fits")]
    #[test_case(Size::new(300.0, 100.0), true, false, 2 ; "wide only")]
    #[test_case(Size::new(300.0, 300.0), true, true, 2 ; "both")]
    #[test_case(Size::new(195.0, 300.0), true, true, 3 ; "vertical bar forces horizontal")]
    fn test_fit_scrollbars(content: Size, horizontal: bool, vertical: bool, passes: u32) {
        let fit = fit_scrollbars(content, Size::new(200.0, 200.0), Size::new(10.0, 10.0));
        assert_eq!((fit.horizontal, fit.vertical, fit.passes, fit.settled), (horizontal, vertical, passes, true));
    }

    #[test]
    fn test_fit_scrollbars_caps_oscillation() {
        // A negative vertical thickness widens the body when the bar appears,
        // which removes the horizontal bar, which removes the vertical bar.
        let fit = fit_scrollbars(Size::new(105.0, 95.0), Size::new(100.0, 100.0), Size::new(-10.0, 10.0));
        assert!(!fit.settled);
        assert_eq!(fit.passes, MAX_LAYOUT_PASSES);
    }

    #[test]
    fn test_bands() {
        assert_eq!(bands(0, 0), vec![Band::Body]);
        assert_eq!(bands(2, 1), vec![Band::Header, Band::Frozen, Band::Body]);
        assert_eq!(band_span(Band::Body, 10, 3, 0), Span::new(3, 10));
        assert_eq!(band_span(Band::Frozen, 2, 3, 0), Span::new(0, 2));
    }

    #[test]
    fn test_layout_geometry() {
        let mut config = GridConfig::uniform(100, 20.0, 20, 50.0);
        config.frozen_rows = 2;
        config.frozen_cols = 1;
        let axes = GridAxes::from_config(&config)
            .unwrap()
            .with_header_rows(Axis::uniform(1, 30.0).unwrap())
            .with_header_cols(Axis::uniform(1, 40.0).unwrap());
        let g = CompositeGrid::with_axes(&config, axes, RenderQueue::new(Size::new(500.0, 300.0), 12.0)).unwrap();
        let layout = g.layout();
        assert_eq!(layout.headers, Size::new(40.0, 30.0));
        assert_eq!(layout.frozen, Size::new(50.0, 40.0));
        assert_eq!(layout.body, PixelRect::new(90.0, 70.0, 398.0, 218.0));
        assert_eq!(layout.content, Size::new(950.0, 1960.0));
        assert!(layout.scrollbars.horizontal && layout.scrollbars.vertical);

        let corner = g.pane(PaneId::new(Band::Header, Band::Header)).unwrap();
        assert_eq!(corner.location(), PixelRect::new(0.0, 0.0, 40.0, 30.0));
        let top = g.pane(PaneId::new(Band::Frozen, Band::Body)).unwrap();
        assert_eq!(top.location(), PixelRect::new(90.0, 30.0, 398.0, 40.0));
        assert_eq!(g.scroll_state().vertical.viewport(), 218.0);
    }

    #[test]
    fn test_scrollbar_fallback_when_unmeasured() {
        let config = GridConfig::uniform(100, 20.0, 2, 50.0);
        let g = CompositeGrid::new(&config, RenderQueue::new(Size::new(200.0, 100.0), 0.0)).unwrap();
        // Only the vertical bar; its width falls back to the configured size.
        assert!(g.layout().scrollbars.vertical);
        assert!(!g.layout().scrollbars.horizontal);
        assert_eq!(g.layout().body.width, 200.0 - config.scrollbar_size);
    }
}

//! Logical (content-space) vs native (scroll-track) scroll offsets.
//!
//! Hosts cap how large a scrollable element may be, so content taller than
//! the cap is mapped onto a shorter native track. The ratio between the two
//! is the zoom factor:
//!
//! ```text
//! T = min(Tmax, C)
//! zoom = (C - V) / (T - V)   if T < C
//!      = 1                   otherwise
//! logical = native * zoom
//! ```

use crate::types::{Point, Size};

/// Scroll state along one dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisScroll {
    content: f64,
    viewport: f64,
    track: f64,
    zoom: f64,
    compressed: bool,
    native: f64,
    logical: f64,
}

impl Default for AxisScroll {
    fn default() -> Self {
        Self {
            content: 0.0,
            viewport: 0.0,
            track: 0.0,
            zoom: 1.0,
            compressed: false,
            native: 0.0,
            logical: 0.0,
        }
    }
}

impl AxisScroll {
    /// Recompute track and zoom for new extents, keeping the logical offset
    /// (clamped) and re-deriving the native one.
    pub fn update_extent(&mut self, content: f64, viewport: f64, max_track: f64) {
        self.content = content.max(0.0);
        self.viewport = viewport.max(0.0);
        self.track = self.content.min(max_track.max(0.0));
        self.compressed = self.track < self.content && self.track > self.viewport;
        self.zoom = if self.compressed {
            (self.content - self.viewport) / (self.track - self.viewport)
        } else {
            1.0
        };
        self.logical = self.logical.clamp(0.0, self.max_logical());
        self.native = self.logical / self.zoom;
    }

    /// Apply a native scroll notification. Returns whether the logical offset
    /// moved.
    ///
    /// Under compression the candidate is accepted only when it lands in a
    /// different `floor(logical / zoom)` bucket than the current offset, or
    /// when the track hits either end.
    pub fn on_native_scroll(&mut self, native: f64) -> bool {
        if native.is_nan() {
            return false;
        }
        let native = native.clamp(0.0, self.max_native());
        self.native = native;
        let candidate = (native * self.zoom).clamp(0.0, self.max_logical());
        let at_edge = native <= 0.0 || native >= self.max_native();
        let accept = !self.compressed || at_edge || {
            let before = (self.logical / self.zoom).floor();
            let after = (candidate / self.zoom).floor();
            (before - after).abs() >= 0.5
        };
        if !accept {
            tracing::debug!(native, candidate, zoom = self.zoom, "native scroll within bucket, ignored");
            return false;
        }
        let moved = (candidate - self.logical).abs() > 0.0;
        self.logical = candidate;
        moved
    }

    /// Programmatic scroll. Returns the native offset the host track should
    /// be set to.
    pub fn scroll_to_logical(&mut self, logical: f64) -> f64 {
        if !logical.is_nan() {
            self.logical = logical.clamp(0.0, self.max_logical());
        }
        self.native = self.logical / self.zoom;
        self.native
    }

    pub fn logical(&self) -> f64 {
        self.logical
    }

    pub fn native(&self) -> f64 {
        self.native
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Size of the native scroll track.
    pub fn track(&self) -> f64 {
        self.track
    }

    pub fn content(&self) -> f64 {
        self.content
    }

    pub fn viewport(&self) -> f64 {
        self.viewport
    }

    pub fn max_logical(&self) -> f64 {
        (self.content - self.viewport).max(0.0)
    }

    pub fn max_native(&self) -> f64 {
        (self.track - self.viewport).max(0.0)
    }

    /// Whether content overflows the viewport.
    pub fn overflows(&self) -> bool {
        self.content > self.viewport
    }
}

/// Scroll state for both dimensions of the scrollable body.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollCoordinator {
    pub horizontal: AxisScroll,
    pub vertical: AxisScroll,
    max_track: f64,
}

impl ScrollCoordinator {
    pub fn new(max_track: f64) -> Self {
        Self {
            horizontal: AxisScroll::default(),
            vertical: AxisScroll::default(),
            max_track,
        }
    }

    pub fn max_track(&self) -> f64 {
        self.max_track
    }

    /// Recompute zoom for both dimensions.
    pub fn update_extent(&mut self, content: Size, viewport: Size) {
        self.horizontal.update_extent(content.width, viewport.width, self.max_track);
        self.vertical.update_extent(content.height, viewport.height, self.max_track);
    }

    /// Apply a native scroll notification for both dimensions. Returns whether
    /// either logical offset moved.
    pub fn on_native_scroll(&mut self, native: Point) -> bool {
        let moved_x = self.horizontal.on_native_scroll(native.x);
        let moved_y = self.vertical.on_native_scroll(native.y);
        moved_x || moved_y
    }

    /// Scroll to a logical offset; returns the native offsets to apply.
    pub fn scroll_to(&mut self, logical: Point) -> Point {
        Point::new(
            self.horizontal.scroll_to_logical(logical.x),
            self.vertical.scroll_to_logical(logical.y),
        )
    }

    /// Scroll by a logical delta (wheel input); returns the native offsets.
    pub fn scroll_by(&mut self, dx: f64, dy: f64) -> Point {
        let target = Point::new(self.horizontal.logical() + dx, self.vertical.logical() + dy);
        self.scroll_to(target)
    }

    pub fn logical(&self) -> Point {
        Point::new(self.horizontal.logical(), self.vertical.logical())
    }

    pub fn native(&self) -> Point {
        Point::new(self.horizontal.native(), self.vertical.native())
    }

    /// Native track dimensions the host should give its scroll surface.
    pub fn track_size(&self) -> Size {
        Size::new(self.horizontal.track(), self.vertical.track())
    }
}

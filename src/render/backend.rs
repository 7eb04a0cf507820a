//! Rendering collaborator seam.
//!
//! The engine never touches a display surface. Panes issue these calls as
//! cells enter, move within, and leave their visible range, and read back
//! measured surface sizes during layout.

use serde::{Deserialize, Serialize};

use crate::types::{Bounds, PixelRect, Size};

/// Opaque handle to a host-side cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellHandle(pub u64);

/// Surfaces the engine asks the host to measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Surface {
    /// The whole grid viewport.
    Viewport,
    /// Thickness of a vertical scrollbar is its `width`.
    VerticalScrollbar,
    /// Thickness of a horizontal scrollbar is its `height`.
    HorizontalScrollbar,
}

/// Visual state flags pushed to a cell whenever selection or focus changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CellState {
    pub selected: bool,
    pub focused: bool,
}

/// Trait for rendering collaborators.
///
/// Implementations own whatever represents a cell on screen; the engine
/// only holds the returned [`CellHandle`].
pub trait CellRenderer {
    /// Materialize a cell covering `bounds` (a merge or a single cell).
    fn create_cell(&mut self, bounds: Bounds, span_rows: u32, span_cols: u32) -> CellHandle;

    /// Position a cell in composite pixel space.
    fn update_cell_bounds(&mut self, handle: CellHandle, rect: PixelRect, row: u32, col: u32);

    fn destroy_cell(&mut self, handle: CellHandle);

    /// Detach a cell from display without destroying it, or reattach it.
    fn set_cell_attached(&mut self, _handle: CellHandle, _attached: bool) {}

    /// Selection/focus changed for a live cell.
    fn set_cell_state(&mut self, _handle: CellHandle, _state: CellState) {}

    fn measure(&self, surface: Surface) -> Size;
}

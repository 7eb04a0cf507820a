//! Command-buffer renderer.
//!
//! Records every call as a serializable command the host drains once per
//! frame, and tracks which handles are live so callers can check cell
//! bookkeeping without a display.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::backend::{CellHandle, CellRenderer, CellState, Surface};
use crate::types::{Bounds, PixelRect, Size};

/// One recorded renderer call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum RenderCommand {
    #[serde(rename_all = "camelCase")]
    Create { handle: CellHandle, bounds: Bounds, span_rows: u32, span_cols: u32 },
    #[serde(rename_all = "camelCase")]
    Update { handle: CellHandle, rect: PixelRect, row: u32, col: u32 },
    Destroy { handle: CellHandle },
    Attach { handle: CellHandle, attached: bool },
    State { handle: CellHandle, state: CellState },
}

/// Host-side view of a live cell.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveCell {
    pub bounds: Bounds,
    pub rect: Option<PixelRect>,
    pub attached: bool,
    pub state: CellState,
}

/// A [`CellRenderer`] that queues commands.
#[derive(Debug, Clone)]
pub struct RenderQueue {
    next: u64,
    commands: Vec<RenderCommand>,
    live: HashMap<CellHandle, LiveCell>,
    viewport: Size,
    scrollbar: f64,
    created: u64,
    destroyed: u64,
}

impl RenderQueue {
    /// `viewport` answers [`Surface::Viewport`]; `scrollbar` is the
    /// thickness reported for both scrollbars.
    pub fn new(viewport: Size, scrollbar: f64) -> Self {
        Self {
            next: 1,
            commands: Vec::new(),
            live: HashMap::new(),
            viewport,
            scrollbar,
            created: 0,
            destroyed: 0,
        }
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    pub fn set_scrollbar(&mut self, thickness: f64) {
        self.scrollbar = thickness;
    }

    /// Take every command recorded since the last drain.
    pub fn drain(&mut self) -> Vec<RenderCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    pub fn live(&self, handle: CellHandle) -> Option<&LiveCell> {
        self.live.get(&handle)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Live cells currently attached to the display.
    pub fn attached_count(&self) -> usize {
        self.live.values().filter(|c| c.attached).count()
    }

    /// Live cell whose bounds start at (row, col).
    pub fn find(&self, row: u32, col: u32) -> Option<(CellHandle, &LiveCell)> {
        self.live
            .iter()
            .find(|(_, c)| c.bounds.row_begin == row && c.bounds.col_begin == col)
            .map(|(h, c)| (*h, c))
    }

    /// Total creates and destroys over the queue's life.
    pub fn totals(&self) -> (u64, u64) {
        (self.created, self.destroyed)
    }
}

impl CellRenderer for RenderQueue {
    fn create_cell(&mut self, bounds: Bounds, span_rows: u32, span_cols: u32) -> CellHandle {
        let handle = CellHandle(self.next);
        self.next += 1;
        self.created += 1;
        self.live.insert(
            handle,
            LiveCell { bounds, rect: None, attached: true, state: CellState::default() },
        );
        self.commands.push(RenderCommand::Create { handle, bounds, span_rows, span_cols });
        handle
    }

    fn update_cell_bounds(&mut self, handle: CellHandle, rect: PixelRect, row: u32, col: u32) {
        if let Some(cell) = self.live.get_mut(&handle) {
            cell.rect = Some(rect);
        }
        self.commands.push(RenderCommand::Update { handle, rect, row, col });
    }

    fn destroy_cell(&mut self, handle: CellHandle) {
        if self.live.remove(&handle).is_some() {
            self.destroyed += 1;
        } else {
            tracing::warn!(handle = handle.0, "destroy of unknown cell handle");
        }
        self.commands.push(RenderCommand::Destroy { handle });
    }

    fn set_cell_attached(&mut self, handle: CellHandle, attached: bool) {
        if let Some(cell) = self.live.get_mut(&handle) {
            cell.attached = attached;
        }
        self.commands.push(RenderCommand::Attach { handle, attached });
    }

    fn set_cell_state(&mut self, handle: CellHandle, state: CellState) {
        if let Some(cell) = self.live.get_mut(&handle) {
            cell.state = state;
        }
        self.commands.push(RenderCommand::State { handle, state });
    }

    fn measure(&self, surface: Surface) -> Size {
        match surface {
            Surface::Viewport => self.viewport,
            Surface::VerticalScrollbar => Size::new(self.scrollbar, 0.0),
            Surface::HorizontalScrollbar => Size::new(0.0, self.scrollbar),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_records_lifecycle() {
        let mut q = RenderQueue::new(Size::new(100.0, 50.0), 10.0);
        let h = q.create_cell(Bounds::cell(1, 2), 1, 1);
        q.update_cell_bounds(h, PixelRect::new(0.0, 0.0, 10.0, 10.0), 1, 2);
        q.set_cell_attached(h, false);
        assert_eq!(q.live_count(), 1);
        assert_eq!(q.attached_count(), 0);
        assert_eq!(q.find(1, 2).map(|(handle, _)| handle), Some(h));
        q.destroy_cell(h);
        assert_eq!(q.live_count(), 0);
        assert_eq!(q.totals(), (1, 1));
        assert_eq!(q.drain().len(), 4);
        assert!(q.commands().is_empty());
    }

    #[test]
    fn test_measure() {
        let q = RenderQueue::new(Size::new(100.0, 50.0), 14.0);
        assert_eq!(q.measure(Surface::Viewport), Size::new(100.0, 50.0));
        assert_eq!(q.measure(Surface::VerticalScrollbar).width, 14.0);
        assert_eq!(q.measure(Surface::HorizontalScrollbar).height, 14.0);
    }

    #[test]
    fn test_command_json_shape() {
        let cmd = RenderCommand::Create { handle: CellHandle(3), bounds: Bounds::cell(0, 0), span_rows: 1, span_cols: 1 };
        let json = serde_json::to_value(&cmd).unwrap();
        assert_eq!(json["op"], "create");
        assert_eq!(json["spanRows"], 1);
        assert_eq!(json["handle"], 3);
    }
}

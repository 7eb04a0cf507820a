//! Rendering collaborator interface.
//!
//! This module provides:
//! - The `CellRenderer` trait panes drive as cells enter and leave view
//! - A command-queue implementation for hosts and tests
//! - Selection outline geometry

pub mod backend;
pub mod queue;
pub mod selection;

pub use backend::{CellHandle, CellRenderer, CellState, Surface};
pub use queue::{LiveCell, RenderCommand, RenderQueue};
pub use selection::{edge_flags, selection_rect, SelectionRect};

//! panegrid - headless virtualized grid engine
//!
//! Lays out very large row/column grids split into up to nine panes:
//! - Virtualized axes with O(log n) offset and point queries
//! - Frozen rows/columns and header bands
//! - Merged cells, multi-rectangle selection, keyboard navigation
//! - Scroll coordination past the browser's native track limit
//!
//! The engine never draws. It tells a rendering collaborator which cells to
//! create, move and destroy, and reads measured sizes back.
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { GridView } from 'panegrid';
//! await init();
//! const view = new GridView(JSON.stringify(config), width, height, 12);
//! view.keyDown('ArrowDown', false, false, false);
//! paint(view.takeCommands());
//! ```
//!
//! # Usage (Rust)
//!
//! ```
//! use panegrid::{CompositeGrid, GridConfig, Modifiers, NavKey, RenderQueue, Size};
//!
//! let config = GridConfig::uniform(1_000_000, 20.0, 50, 80.0);
//! let renderer = RenderQueue::new(Size::new(800.0, 600.0), 12.0);
//! let mut grid = CompositeGrid::new(&config, renderer).unwrap();
//! grid.focus(0, 0);
//! grid.key_down(NavKey::PageDown, Modifiers::NONE);
//! assert!(grid.navigation().active().unwrap().0 > 0);
//! ```

pub mod error;
pub mod focus_trap;
pub mod grid;
pub mod layout;
pub mod lifecycle;
pub mod nav;
pub mod notify;
pub mod pane;
pub mod render;
pub mod schedule;
pub mod types;
pub mod viewer;

use wasm_bindgen::prelude::*;

pub use error::{GridError, Result};
pub use focus_trap::{FocusTrapManager, TrapId};
pub use grid::{CompositeGrid, GridAxes, GridSnapshot, HitTarget, Layout};
pub use layout::{Axis, AxisItem, MergeIndex, RectSet, ScrollCoordinator, Visibility};
pub use lifecycle::{Arrangeable, Disposable, Initializable, LifecycleState};
pub use nav::NavigationController;
pub use notify::{FocusTarget, GridEvent, Property};
pub use pane::{Band, Pane, PaneId};
pub use render::{CellHandle, CellRenderer, RenderCommand, RenderQueue, Surface};
pub use viewer::{FocusTraps, GridView};

pub use types::*;

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

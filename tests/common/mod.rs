//! Common test utilities: grid builders and a notification recorder.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic,
    clippy::approx_constant,
    clippy::cast_possible_truncation,
    clippy::absurd_extreme_comparisons,
    clippy::cast_lossless
)]

use std::cell::RefCell;
use std::rc::Rc;

use panegrid::{CompositeGrid, GridConfig, GridEvent, Merge, RenderQueue, Size};

/// Viewport every helper grid is measured with.
pub const VIEWPORT: Size = Size { width: 400.0, height: 300.0 };
pub const SCROLLBAR: f64 = 10.0;

pub fn queue() -> RenderQueue {
    RenderQueue::new(VIEWPORT, SCROLLBAR)
}

/// Uniform grid: 20px rows, 50px columns.
pub fn config(rows: u32, cols: u32) -> GridConfig {
    GridConfig::uniform(rows, 20.0, cols, 50.0)
}

pub fn build(config: &GridConfig) -> CompositeGrid {
    CompositeGrid::new(config, queue()).expect("valid config")
}

/// `rows` x `cols` grid with frozen leading rows/columns and merges.
pub fn frozen_grid(rows: u32, cols: u32, frozen: (u32, u32), merges: &[Merge]) -> CompositeGrid {
    let mut config = config(rows, cols);
    config.frozen_rows = frozen.0;
    config.frozen_cols = frozen.1;
    config.merges = merges.to_vec();
    build(&config)
}

pub fn merge(row: u32, row_span: u32, col: u32, col_span: u32) -> Merge {
    Merge::new(row, row_span, col, col_span).unwrap()
}

/// Collects every notification a grid emits.
#[derive(Clone, Default)]
pub struct Recorder {
    events: Rc<RefCell<Vec<GridEvent>>>,
}

impl Recorder {
    pub fn attach(grid: &CompositeGrid) -> Self {
        let recorder = Self::default();
        let sink = Rc::clone(&recorder.events);
        grid.subscribe(move |event| sink.borrow_mut().push(event.clone()));
        recorder
    }

    pub fn take(&self) -> Vec<GridEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    pub fn count(&self) -> usize {
        self.events.borrow().len()
    }
}

//! Materialized-cell bookkeeping for one pane.

use std::collections::BTreeMap;

use crate::render::{CellHandle, CellState};
use crate::types::Bounds;

/// A cell the renderer currently holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub handle: CellHandle,
    /// Full rectangle: a merge, or a single cell.
    pub bounds: Bounds,
    pub attached: bool,
    pub state: CellState,
}

impl Cell {
    pub fn origin(&self) -> (u32, u32) {
        (self.bounds.row_begin, self.bounds.col_begin)
    }
}

/// Cells keyed by their origin (row_begin, col_begin).
#[derive(Debug, Clone, Default)]
pub struct CellTable {
    cells: BTreeMap<(u32, u32), Cell>,
}

impl CellTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: (u32, u32)) -> Option<&Cell> {
        self.cells.get(&key)
    }

    pub fn get_mut(&mut self, key: (u32, u32)) -> Option<&mut Cell> {
        self.cells.get_mut(&key)
    }

    pub fn contains(&self, key: (u32, u32)) -> bool {
        self.cells.contains_key(&key)
    }

    pub fn insert(&mut self, cell: Cell) {
        self.cells.insert(cell.origin(), cell);
    }

    pub fn remove(&mut self, key: (u32, u32)) -> Option<Cell> {
        self.cells.remove(&key)
    }

    /// Snapshot of every key, for loops that mutate the table.
    pub fn keys(&self) -> Vec<(u32, u32)> {
        self.cells.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cell> {
        self.cells.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Cell> {
        self.cells.values_mut()
    }

    /// Remove and return every cell.
    pub fn drain(&mut self) -> Vec<Cell> {
        std::mem::take(&mut self.cells).into_values().collect()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

//! Precomputed lookup from covered cell to owning merge.

use std::collections::HashMap;

use crate::types::{Bounds, Merge};

/// Merge lookup by (row, col).
#[derive(Debug, Clone, Default)]
pub struct MergeIndex {
    merges: Vec<Merge>,
    /// Every covered cell -> position in `merges`.
    by_cell: HashMap<(u32, u32), usize>,
}

impl MergeIndex {
    /// Index the given merges. A merge overlapping one indexed earlier is dropped.
    pub fn new(merges: &[Merge]) -> Self {
        let mut index = Self::default();
        for merge in merges {
            let b = merge.bounds();
            let overlaps = b
                .rows()
                .any(|r| b.cols().any(|c| index.by_cell.contains_key(&(r, c))));
            if overlaps {
                tracing::warn!(row = merge.row, col = merge.col, "skipping overlapping merge");
                continue;
            }
            let slot = index.merges.len();
            index.merges.push(*merge);
            for r in b.rows() {
                for c in b.cols() {
                    index.by_cell.insert((r, c), slot);
                }
            }
        }
        index
    }

    /// Index only the merges satisfying `keep`.
    pub fn filtered(merges: &[Merge], keep: impl Fn(&Merge) -> bool) -> Self {
        let kept: Vec<Merge> = merges.iter().copied().filter(|m| keep(m)).collect();
        Self::new(&kept)
    }

    pub fn get(&self, row: u32, col: u32) -> Option<&Merge> {
        let slot = *self.by_cell.get(&(row, col))?;
        self.merges.get(slot)
    }

    pub fn is_merged(&self, row: u32, col: u32) -> bool {
        self.by_cell.contains_key(&(row, col))
    }

    /// The merge rectangle covering (row, col), or the single cell.
    pub fn owner_bounds(&self, row: u32, col: u32) -> Bounds {
        self.get(row, col)
            .map_or_else(|| Bounds::cell(row, col), Merge::bounds)
    }

    /// Grow `bounds` until no merge straddles its edge.
    pub fn expand(&self, bounds: Bounds) -> Bounds {
        let mut out = bounds;
        loop {
            let grown = self
                .merges
                .iter()
                .map(Merge::bounds)
                .filter(|m| m.intersects(&out))
                .fold(out, |acc, m| acc.union(&m));
            if grown == out {
                return out;
            }
            out = grown;
        }
    }

    /// Merges intersecting `bounds`.
    pub fn intersecting<'a>(&'a self, bounds: &'a Bounds) -> impl Iterator<Item = &'a Merge> + 'a {
        self.merges.iter().filter(move |m| m.bounds().intersects(bounds))
    }

    pub fn merges(&self) -> &[Merge] {
        &self.merges
    }

    pub fn len(&self) -> usize {
        self.merges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.merges.is_empty()
    }
}

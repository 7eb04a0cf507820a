use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Inclusive rectangle in row/column index space.
///
/// An unset rectangle is expressed as `Option<Bounds>::None`; a `Bounds`
/// value always satisfies `row_begin <= row_end` and `col_begin <= col_end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub row_begin: u32,
    pub row_end: u32,
    pub col_begin: u32,
    pub col_end: u32,
}

impl Bounds {
    /// Build a rectangle from two corners in any order.
    pub fn new(row_a: u32, row_b: u32, col_a: u32, col_b: u32) -> Self {
        Self {
            row_begin: row_a.min(row_b),
            row_end: row_a.max(row_b),
            col_begin: col_a.min(col_b),
            col_end: col_a.max(col_b),
        }
    }

    /// Single-cell rectangle.
    pub fn cell(row: u32, col: u32) -> Self {
        Self::new(row, row, col, col)
    }

    pub fn rows(&self) -> RangeInclusive<u32> {
        self.row_begin..=self.row_end
    }

    pub fn cols(&self) -> RangeInclusive<u32> {
        self.col_begin..=self.col_end
    }

    pub fn row_count(&self) -> u32 {
        self.row_end - self.row_begin + 1
    }

    pub fn col_count(&self) -> u32 {
        self.col_end - self.col_begin + 1
    }

    pub fn area(&self) -> u64 {
        u64::from(self.row_count()) * u64::from(self.col_count())
    }

    pub fn is_single_cell(&self) -> bool {
        self.row_begin == self.row_end && self.col_begin == self.col_end
    }

    pub fn contains(&self, row: u32, col: u32) -> bool {
        self.rows().contains(&row) && self.cols().contains(&col)
    }

    pub fn contains_bounds(&self, other: &Bounds) -> bool {
        self.row_begin <= other.row_begin
            && other.row_end <= self.row_end
            && self.col_begin <= other.col_begin
            && other.col_end <= self.col_end
    }

    pub fn intersects(&self, other: &Bounds) -> bool {
        self.row_begin <= other.row_end
            && other.row_begin <= self.row_end
            && self.col_begin <= other.col_end
            && other.col_begin <= self.col_end
    }

    pub fn intersection(&self, other: &Bounds) -> Option<Bounds> {
        if !self.intersects(other) {
            return None;
        }
        Some(Bounds {
            row_begin: self.row_begin.max(other.row_begin),
            row_end: self.row_end.min(other.row_end),
            col_begin: self.col_begin.max(other.col_begin),
            col_end: self.col_end.min(other.col_end),
        })
    }

    /// Smallest rectangle covering both.
    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            row_begin: self.row_begin.min(other.row_begin),
            row_end: self.row_end.max(other.row_end),
            col_begin: self.col_begin.min(other.col_begin),
            col_end: self.col_end.max(other.col_end),
        }
    }

    /// Same column range and `other` starts on the row after `self` ends.
    pub fn stacks_above(&self, other: &Bounds) -> bool {
        self.col_begin == other.col_begin
            && self.col_end == other.col_end
            && self.row_end.checked_add(1) == Some(other.row_begin)
    }

    /// Same row range and `other` starts on the column after `self` ends.
    pub fn sits_left_of(&self, other: &Bounds) -> bool {
        self.row_begin == other.row_begin
            && self.row_end == other.row_end
            && self.col_end.checked_add(1) == Some(other.col_begin)
    }

    /// Clip to a row range `[row_lo, row_hi)` and column range `[col_lo, col_hi)`.
    pub fn clip(&self, rows: (u32, u32), cols: (u32, u32)) -> Option<Bounds> {
        let (row_lo, row_hi) = rows;
        let (col_lo, col_hi) = cols;
        if row_hi <= row_lo || col_hi <= col_lo {
            return None;
        }
        let limit = Bounds::new(row_lo, row_hi - 1, col_lo, col_hi - 1);
        self.intersection(&limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes_corners() {
        let b = Bounds::new(5, 2, 7, 1);
        assert_eq!(b, Bounds { row_begin: 2, row_end: 5, col_begin: 1, col_end: 7 });
        assert_eq!(b.area(), 4 * 7);
    }

    #[test]
    fn test_intersection() {
        let a = Bounds::new(0, 4, 0, 4);
        let b = Bounds::new(3, 8, 2, 2);
        assert_eq!(a.intersection(&b), Some(Bounds::new(3, 4, 2, 2)));
        assert_eq!(a.intersection(&Bounds::cell(5, 5)), None);
    }

    #[test]
    fn test_adjacency() {
        let top = Bounds::new(0, 1, 2, 3);
        let bottom = Bounds::new(2, 4, 2, 3);
        assert!(top.stacks_above(&bottom));
        assert!(!bottom.stacks_above(&top));
        let left = Bounds::new(0, 1, 0, 1);
        assert!(left.sits_left_of(&top));
    }

    #[test]
    fn test_clip() {
        let b = Bounds::new(0, 9, 0, 9);
        assert_eq!(b.clip((2, 4), (0, 2)), Some(Bounds::new(2, 3, 0, 1)));
        assert_eq!(b.clip((10, 12), (0, 2)), None);
        assert_eq!(b.clip((0, 0), (0, 2)), None);
    }
}

use serde::{Deserialize, Serialize};

use super::Bounds;

/// How much the user may select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SelectionMode {
    /// Focus moves but nothing is ever selected.
    None,
    /// One rectangle at a time; extend modifiers are ignored.
    Single,
    /// Multi-rectangle selection grown from an anchor.
    #[default]
    Extended,
}

impl SelectionMode {
    pub fn allows_selection(self) -> bool {
        self != SelectionMode::None
    }

    pub fn allows_extend(self) -> bool {
        self == SelectionMode::Extended
    }
}

/// Granularity a selection act expands to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SelectionUnit {
    /// Whole rows.
    Row,
    /// Whole columns.
    Column,
    /// Cell-granular (default)
    #[default]
    Cell,
}

impl SelectionUnit {
    /// Expand `bounds` to whole rows or columns of a `row_count` x `col_count` grid.
    pub fn expand(self, bounds: Bounds, row_count: u32, col_count: u32) -> Bounds {
        match self {
            SelectionUnit::Cell => bounds,
            SelectionUnit::Row => row_range(bounds.row_begin, bounds.row_end, col_count),
            SelectionUnit::Column => column_range(bounds.col_begin, bounds.col_end, row_count),
        }
    }
}

/// Entire rows `start..=end` of a grid with `col_count` columns.
pub fn row_range(start: u32, end: u32, col_count: u32) -> Bounds {
    Bounds::new(start, end, 0, col_count.saturating_sub(1))
}

/// Entire columns `start..=end` of a grid with `row_count` rows.
pub fn column_range(start: u32, end: u32, row_count: u32) -> Bounds {
    Bounds::new(0, row_count.saturating_sub(1), start, end)
}

/// Every cell of a `row_count` x `col_count` grid.
pub fn select_all(row_count: u32, col_count: u32) -> Bounds {
    Bounds::new(0, row_count.saturating_sub(1), 0, col_count.saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_expand() {
        let b = Bounds::new(2, 3, 4, 4);
        assert_eq!(SelectionUnit::Cell.expand(b, 10, 8), b);
        assert_eq!(SelectionUnit::Row.expand(b, 10, 8), Bounds::new(2, 3, 0, 7));
        assert_eq!(SelectionUnit::Column.expand(b, 10, 8), Bounds::new(0, 9, 4, 4));
    }

    #[test]
    fn test_mode_flags() {
        assert!(!SelectionMode::None.allows_selection());
        assert!(SelectionMode::Single.allows_selection());
        assert!(!SelectionMode::Single.allows_extend());
        assert!(SelectionMode::Extended.allows_extend());
    }
}

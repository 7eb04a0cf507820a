use serde::{Deserialize, Serialize};

use super::Bounds;
use crate::error::{GridError, Result};

/// A rectangle of cells rendered and selected as one logical cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Merge {
    pub row: u32,
    pub row_span: u32,
    pub col: u32,
    pub col_span: u32,
}

impl Merge {
    /// Build a merge; spans must be at least 1.
    pub fn new(row: u32, row_span: u32, col: u32, col_span: u32) -> Result<Self> {
        let merge = Self { row, row_span, col, col_span };
        merge.validate()?;
        Ok(merge)
    }

    pub fn validate(&self) -> Result<()> {
        if self.row_span == 0 || self.col_span == 0 {
            return Err(GridError::config(format!(
                "merge at ({}, {}) has a zero span",
                self.row, self.col
            )));
        }
        if self.row.checked_add(self.row_span).is_none()
            || self.col.checked_add(self.col_span).is_none()
        {
            return Err(GridError::config(format!(
                "merge at ({}, {}) overflows the index space",
                self.row, self.col
            )));
        }
        Ok(())
    }

    /// Rectangle covered by the merge. Assumes a validated merge.
    pub fn bounds(&self) -> Bounds {
        Bounds {
            row_begin: self.row,
            row_end: self.row + self.row_span.max(1) - 1,
            col_begin: self.col,
            col_end: self.col + self.col_span.max(1) - 1,
        }
    }

    pub fn is_origin(&self, row: u32, col: u32) -> bool {
        self.row == row && self.col == col
    }
}

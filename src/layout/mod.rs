//! Geometry along axes, selection algebra, merge lookup and scroll mapping.
//!
//! This module handles:
//! - Cumulative offsets over fixed or virtualized row/column axes
//! - Binary search from pixel offsets to item indices
//! - Rectangle set algebra for multi-rectangle selections
//! - Merge lookup by covered cell
//! - Logical/native scroll compression

mod axis;
mod item_cache;
mod merge_index;
mod rect_set;
mod scroll;

pub use axis::{Axis, AxisItem, ItemFactory, Visibility};
pub use item_cache::FifoCache;
pub use merge_index::MergeIndex;
pub use rect_set::{merge_adjacent, subtract, RectSet};
pub use scroll::{AxisScroll, ScrollCoordinator};

/// Saturating `usize -> u32`.
pub(crate) fn to_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

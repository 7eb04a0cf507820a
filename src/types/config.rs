//! Grid construction configuration.
//!
//! The JSON form is what the wasm host and the CLI hand in; programmatic
//! callers can also build [`Axis`] values with custom factories and pass them
//! to `CompositeGrid::with_axes`.

use serde::{Deserialize, Serialize};

use super::{Merge, SelectionMode, SelectionUnit};
use crate::error::{GridError, Result};
use crate::layout::{Axis, AxisItem, Visibility};

/// Default cap on a native scroll track, in pixels. Browsers clamp element
/// sizes somewhere between ~17M and ~33M px; stay well below both.
pub const DEFAULT_MAX_NATIVE_TRACK: f64 = 10_000_000.0;

/// Items kept around the visible window when trimming virtualized caches.
pub const DEFAULT_CACHE_BUFFER: u32 = 16;

/// Scrollbar thickness used when the renderer cannot measure one.
pub const DEFAULT_SCROLLBAR_SIZE: f64 = 12.0;

/// Default virtualized-axis cache limit.
pub const DEFAULT_CACHE_LIMIT: usize = 4096;

/// Declarative axis definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AxisSpec {
    /// Every item listed explicitly.
    #[serde(rename_all = "camelCase")]
    Fixed {
        sizes: Vec<f64>,
        #[serde(default)]
        hidden: Vec<u32>,
        #[serde(default)]
        collapsed: Vec<u32>,
    },
    /// `count` items of `size` pixels, materialized lazily.
    #[serde(rename_all = "camelCase")]
    Uniform {
        count: u32,
        size: f64,
        #[serde(default = "default_cache_limit")]
        cache_limit: usize,
    },
}

fn default_cache_limit() -> usize {
    DEFAULT_CACHE_LIMIT
}

impl AxisSpec {
    pub fn count(&self) -> u32 {
        match self {
            AxisSpec::Fixed { sizes, .. } => u32::try_from(sizes.len()).unwrap_or(u32::MAX),
            AxisSpec::Uniform { count, .. } => *count,
        }
    }

    /// Materialize the described axis.
    pub fn build(&self) -> Result<Axis> {
        match self {
            AxisSpec::Fixed { sizes, hidden, collapsed } => {
                let mut items: Vec<AxisItem> = sizes.iter().map(|&s| AxisItem::new(s)).collect();
                for (list, visibility) in [(hidden, Visibility::Hidden), (collapsed, Visibility::Collapsed)] {
                    for &index in list {
                        let item = items.get_mut(index as usize).ok_or_else(|| {
                            GridError::config(format!(
                                "{visibility:?} index {index} exceeds axis length {}",
                                sizes.len()
                            ))
                        })?;
                        *item = item.clone().with_visibility(visibility);
                    }
                }
                Axis::fixed(items)
            }
            AxisSpec::Uniform { count, size, cache_limit } => {
                let size = *size;
                Axis::virtualized(*count, move |_| AxisItem::new(size), *cache_limit)
            }
        }
    }
}

/// Top-level grid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridConfig {
    pub rows: AxisSpec,
    pub cols: AxisSpec,
    /// Rows of the column-header band (above the data).
    #[serde(default)]
    pub header_rows: Option<AxisSpec>,
    /// Columns of the row-header band (left of the data).
    #[serde(default)]
    pub header_cols: Option<AxisSpec>,
    #[serde(default)]
    pub frozen_rows: u32,
    #[serde(default)]
    pub frozen_cols: u32,
    #[serde(default)]
    pub merges: Vec<Merge>,
    /// Merges inside the column-header band (header rows x data columns).
    #[serde(default)]
    pub column_header_merges: Vec<Merge>,
    /// Merges inside the row-header band (data rows x header columns).
    #[serde(default)]
    pub row_header_merges: Vec<Merge>,
    #[serde(default)]
    pub selection_mode: SelectionMode,
    #[serde(default)]
    pub selection_unit: SelectionUnit,
    #[serde(default = "default_max_native_track")]
    pub max_native_track: f64,
    #[serde(default = "default_cache_buffer")]
    pub cache_buffer: u32,
    #[serde(default = "default_scrollbar_size")]
    pub scrollbar_size: f64,
}

fn default_max_native_track() -> f64 {
    DEFAULT_MAX_NATIVE_TRACK
}

fn default_cache_buffer() -> u32 {
    DEFAULT_CACHE_BUFFER
}

fn default_scrollbar_size() -> f64 {
    DEFAULT_SCROLLBAR_SIZE
}

impl GridConfig {
    /// Grid with uniform virtualized rows and columns and nothing else.
    pub fn uniform(rows: u32, row_height: f64, cols: u32, col_width: f64) -> Self {
        Self {
            rows: AxisSpec::Uniform { count: rows, size: row_height, cache_limit: DEFAULT_CACHE_LIMIT },
            cols: AxisSpec::Uniform { count: cols, size: col_width, cache_limit: DEFAULT_CACHE_LIMIT },
            header_rows: None,
            header_cols: None,
            frozen_rows: 0,
            frozen_cols: 0,
            merges: Vec::new(),
            column_header_merges: Vec::new(),
            row_header_merges: Vec::new(),
            selection_mode: SelectionMode::default(),
            selection_unit: SelectionUnit::default(),
            max_native_track: DEFAULT_MAX_NATIVE_TRACK,
            cache_buffer: DEFAULT_CACHE_BUFFER,
            scrollbar_size: DEFAULT_SCROLLBAR_SIZE,
        }
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: GridConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations no grid can be built from.
    pub fn validate(&self) -> Result<()> {
        if self.max_native_track.is_nan() || self.max_native_track <= 0.0 {
            return Err(GridError::config("maxNativeTrack must be positive"));
        }
        let header_rows = self.header_rows.as_ref().map_or(0, AxisSpec::count);
        let header_cols = self.header_cols.as_ref().map_or(0, AxisSpec::count);
        self.validate_counts(self.rows.count(), self.cols.count(), header_rows, header_cols)
    }

    /// Check frozen counts and merges against concrete axis lengths.
    pub fn validate_counts(&self, rows: u32, cols: u32, header_rows: u32, header_cols: u32) -> Result<()> {
        if self.frozen_rows > rows {
            return Err(GridError::config(format!(
                "frozenRows {} exceeds row count {rows}",
                self.frozen_rows
            )));
        }
        if self.frozen_cols > cols {
            return Err(GridError::config(format!(
                "frozenCols {} exceeds column count {cols}",
                self.frozen_cols
            )));
        }
        validate_merges(&self.merges, rows, cols, "merge")?;
        validate_merges(&self.column_header_merges, header_rows, cols, "column header merge")?;
        validate_merges(&self.row_header_merges, rows, header_cols, "row header merge")?;
        Ok(())
    }
}

/// Reject merges with zero spans or extending past a `rows` x `cols` grid.
pub fn validate_merges(merges: &[Merge], rows: u32, cols: u32, what: &str) -> Result<()> {
    for merge in merges {
        merge.validate()?;
        let b = merge.bounds();
        if b.row_end >= rows || b.col_end >= cols {
            return Err(GridError::config(format!(
                "{what} at ({}, {}) extends past the {rows}x{cols} grid",
                merge.row, merge.col
            )));
        }
    }
    Ok(())
}

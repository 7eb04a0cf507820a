//! Ordered, sized, visibility-tagged items along one dimension.
//!
//! An axis either owns its items directly (fixed) or materializes them on
//! demand from a factory (virtualized). Cumulative offsets live in a prefix
//! array that only ever grows forward; any size or visibility change throws
//! the whole prefix away.
//!
//! Item `index`/`offset` fields are written by the axis and nothing else.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::item_cache::FifoCache;
use super::to_u32;
use crate::error::{GridError, Result};
use crate::lifecycle::{Disposable, Lifecycle};

/// Visibility of a row or column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Visibility {
    #[default]
    Visible,
    /// Occupies space but is not interactive.
    Hidden,
    /// Takes no space.
    Collapsed,
}

/// One row or column.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisItem {
    index: Option<u32>,
    offset: f64,
    size: f64,
    visibility: Visibility,
}

impl AxisItem {
    /// New, unplaced item. Negative or NaN sizes become 0.
    pub fn new(size: f64) -> Self {
        Self {
            index: None,
            offset: 0.0,
            size: sanitize_size(size),
            visibility: Visibility::Visible,
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Position in the owning axis; `None` before placement.
    pub fn index(&self) -> Option<u32> {
        self.index
    }

    /// Cumulative start offset; 0 before placement.
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Declared size, regardless of visibility.
    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Space actually occupied: 0 iff collapsed.
    pub fn effective_size(&self) -> f64 {
        match self.visibility {
            Visibility::Collapsed => 0.0,
            Visibility::Visible | Visibility::Hidden => self.size,
        }
    }

    /// Whether navigation may land on this item.
    pub fn is_interactive(&self) -> bool {
        self.visibility == Visibility::Visible
    }

    fn place(&mut self, index: u32, offset: f64) {
        self.index = Some(index);
        self.offset = offset;
    }

    fn unplace(&mut self) {
        self.index = None;
        self.offset = 0.0;
    }
}

fn sanitize_size(size: f64) -> f64 {
    if size.is_finite() && size > 0.0 {
        size
    } else {
        0.0
    }
}

/// Builds the item at a given index of a virtualized axis.
pub type ItemFactory = Box<dyn Fn(u32) -> AxisItem>;

/// Size/visibility changes applied to a virtualized item. Kept outside the
/// cache so they survive eviction.
#[derive(Debug, Clone, Copy, Default)]
struct Override {
    size: Option<f64>,
    visibility: Option<Visibility>,
}

impl Override {
    fn apply(&self, item: &mut AxisItem) {
        if let Some(size) = self.size {
            item.size = size;
        }
        if let Some(visibility) = self.visibility {
            item.visibility = visibility;
        }
    }
}

enum Source {
    Fixed(Vec<AxisItem>),
    Virtual {
        count: u32,
        factory: ItemFactory,
        cache: FifoCache<u32, AxisItem>,
        overrides: HashMap<u32, Override>,
    },
}

/// Ordered item sequence with cumulative-offset queries.
pub struct Axis {
    source: Source,
    /// `prefix[i]` is the offset of item `i`; the last entry is the running
    /// total of every item computed so far. Never empty.
    prefix: Vec<f64>,
    lifecycle: Lifecycle,
}

impl std::fmt::Debug for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Axis")
            .field("len", &self.len())
            .field("virtualized", &self.is_virtualized())
            .field("computed", &self.computed())
            .finish()
    }
}

impl Axis {
    /// Axis over an explicit item list. Offsets are computed immediately.
    pub fn fixed(items: Vec<AxisItem>) -> Result<Self> {
        if u32::try_from(items.len()).is_err() {
            return Err(GridError::config("fixed axis has more than u32::MAX items"));
        }
        let mut axis = Self {
            source: Source::Fixed(items),
            prefix: vec![0.0],
            lifecycle: Lifecycle::new(),
        };
        axis.lifecycle.mark_initialized();
        axis.invalidate();
        Ok(axis)
    }

    /// Fixed axis of uniformly sized items.
    pub fn uniform(count: u32, size: f64) -> Result<Self> {
        Self::fixed((0..count).map(|_| AxisItem::new(size)).collect())
    }

    /// Lazily materialized axis of `count` items. At most `cache_limit` items
    /// are kept materialized at once.
    pub fn virtualized(
        count: u32,
        factory: impl Fn(u32) -> AxisItem + 'static,
        cache_limit: usize,
    ) -> Result<Self> {
        if cache_limit == 0 {
            return Err(GridError::config("virtualized axis needs a cache limit of at least 1"));
        }
        let mut axis = Self {
            source: Source::Virtual {
                count,
                factory: Box::new(factory),
                cache: FifoCache::new(cache_limit),
                overrides: HashMap::new(),
            },
            prefix: vec![0.0],
            lifecycle: Lifecycle::new(),
        };
        axis.lifecycle.mark_initialized();
        Ok(axis)
    }

    pub fn len(&self) -> u32 {
        match &self.source {
            Source::Fixed(items) => to_u32(items.len()),
            Source::Virtual { count, .. } => *count,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_virtualized(&self) -> bool {
        matches!(self.source, Source::Virtual { .. })
    }

    /// Number of items whose cumulative offsets are currently cached.
    pub fn computed(&self) -> u32 {
        to_u32(self.prefix.len().saturating_sub(1))
    }

    fn check_index(&self, index: u32) -> Result<()> {
        let len = self.len();
        if index >= len {
            return Err(GridError::Range { index, len });
        }
        Ok(())
    }

    /// Bounds-checked item access. Virtualized items are materialized and
    /// cached with their offset; the prefix is walked up to `index` first.
    pub fn at(&mut self, index: u32) -> Result<&AxisItem> {
        self.check_index(index)?;
        self.extend_to(index);
        let known_offset = self.prefix.get(index as usize).copied();
        match &mut self.source {
            Source::Fixed(items) => items
                .get(index as usize)
                .ok_or(GridError::Range { index, len: to_u32(items.len()) }),
            Source::Virtual { factory, cache, overrides, .. } => {
                let item = cache.get_or_insert_with(index, || {
                    let mut item = factory(index);
                    if let Some(o) = overrides.get(&index) {
                        o.apply(&mut item);
                    }
                    item
                });
                item.place(index, known_offset.unwrap_or(0.0));
                Ok(item)
            }
        }
    }

    /// Effective size of an item without caching it.
    pub fn size_of(&self, index: u32) -> Result<f64> {
        self.check_index(index)?;
        Ok(self.peek(index, AxisItem::effective_size))
    }

    pub fn visibility_of(&self, index: u32) -> Result<Visibility> {
        self.check_index(index)?;
        Ok(self.peek(index, AxisItem::visibility))
    }

    /// Read a property of an item, building a transient one if it is not cached.
    fn peek<T>(&self, index: u32, read: impl Fn(&AxisItem) -> T) -> T {
        match &self.source {
            Source::Fixed(items) => match items.get(index as usize) {
                Some(item) => read(item),
                None => read(&AxisItem::new(0.0)),
            },
            Source::Virtual { factory, cache, overrides, .. } => match cache.get(&index) {
                Some(item) => read(item),
                None => {
                    let mut item = factory(index);
                    if let Some(o) = overrides.get(&index) {
                        o.apply(&mut item);
                    }
                    read(&item)
                }
            },
        }
    }

    /// Cumulative offset of `index`. `index == len()` yields the total size.
    ///
    /// O(1) for already computed indices, O(k) for a forward jump of k.
    pub fn offset_of(&mut self, index: u32) -> Result<f64> {
        let len = self.len();
        if index > len {
            return Err(GridError::Range { index, len });
        }
        self.extend_to(index);
        Ok(self.prefix.get(index as usize).copied().unwrap_or(0.0))
    }

    /// Offset one past the end of `index`.
    pub fn end_of(&mut self, index: u32) -> Result<f64> {
        self.check_index(index)?;
        self.offset_of(index + 1)
    }

    pub fn total_size(&mut self) -> f64 {
        let len = self.len();
        self.extend_to(len);
        self.running_total()
    }

    fn running_total(&self) -> f64 {
        self.prefix.last().copied().unwrap_or(0.0)
    }

    /// Grow the prefix until it holds offset `target`.
    fn extend_to(&mut self, target: u32) {
        let target = target.min(self.len()) as usize;
        while self.prefix.len() <= target {
            if !self.extend_one() {
                break;
            }
        }
    }

    /// Grow the prefix until the running total satisfies `done` or every item is computed.
    fn extend_until(&mut self, done: impl Fn(f64) -> bool) {
        while !done(self.running_total()) {
            if !self.extend_one() {
                break;
            }
        }
    }

    fn extend_one(&mut self) -> bool {
        let next = to_u32(self.prefix.len().saturating_sub(1));
        if next >= self.len() {
            return false;
        }
        let start = self.running_total();
        let size = match &mut self.source {
            Source::Fixed(items) => items.get(next as usize).map_or(0.0, AxisItem::effective_size),
            Source::Virtual { factory, cache, overrides, .. } => match cache.get_mut(&next) {
                Some(item) => {
                    item.place(next, start);
                    item.effective_size()
                }
                None => {
                    let mut item = factory(next);
                    if let Some(o) = overrides.get(&next) {
                        o.apply(&mut item);
                    }
                    item.effective_size()
                }
            },
        };
        self.prefix.push(start + size);
        true
    }

    /// Throw away cumulative offsets. Fixed axes recompute every offset in
    /// one pass; virtualized axes recompute lazily.
    fn invalidate(&mut self) {
        self.prefix.clear();
        self.prefix.push(0.0);
        match &mut self.source {
            Source::Fixed(items) => {
                let mut total = 0.0;
                for (i, item) in items.iter_mut().enumerate() {
                    item.place(to_u32(i), total);
                    total += item.effective_size();
                    self.prefix.push(total);
                }
            }
            Source::Virtual { .. } => {}
        }
    }

    /// Change an item's size.
    pub fn resize(&mut self, index: u32, size: f64) -> Result<()> {
        if self.lifecycle.is_disposed() {
            return Ok(());
        }
        self.check_index(index)?;
        let size = sanitize_size(size);
        self.mutate(index, |item| item.size = size, |o| o.size = Some(size));
        Ok(())
    }

    /// Change an item's visibility.
    pub fn set_visibility(&mut self, index: u32, visibility: Visibility) -> Result<()> {
        if self.lifecycle.is_disposed() {
            return Ok(());
        }
        self.check_index(index)?;
        self.mutate(
            index,
            |item| item.visibility = visibility,
            |o| o.visibility = Some(visibility),
        );
        Ok(())
    }

    fn mutate(&mut self, index: u32, edit: impl Fn(&mut AxisItem), record: impl Fn(&mut Override)) {
        match &mut self.source {
            Source::Fixed(items) => {
                if let Some(item) = items.get_mut(index as usize) {
                    edit(item);
                }
            }
            Source::Virtual { cache, overrides, .. } => {
                record(overrides.entry(index).or_default());
                if let Some(item) = cache.get_mut(&index) {
                    edit(item);
                }
            }
        }
        self.invalidate();
    }

    /// Insert an item before `index` (fixed axes only; `index == len()` appends).
    pub fn insert(&mut self, index: u32, item: AxisItem) -> Result<()> {
        if self.lifecycle.is_disposed() {
            return Ok(());
        }
        let len = self.len();
        let Source::Fixed(items) = &mut self.source else {
            return Err(GridError::config("insert is only supported on fixed axes; use set_count"));
        };
        if index > len {
            return Err(GridError::Range { index, len });
        }
        if len == u32::MAX {
            return Err(GridError::config("fixed axis is full"));
        }
        items.insert(index as usize, item);
        self.invalidate();
        Ok(())
    }

    /// Remove the item at `index` (fixed axes only).
    pub fn remove(&mut self, index: u32) -> Result<AxisItem> {
        self.check_index(index)?;
        let Source::Fixed(items) = &mut self.source else {
            return Err(GridError::config("remove is only supported on fixed axes; use set_count"));
        };
        let mut removed = items.remove(index as usize);
        removed.unplace();
        self.invalidate();
        Ok(removed)
    }

    /// Change the item count of a virtualized axis.
    pub fn set_count(&mut self, new_count: u32) -> Result<()> {
        if self.lifecycle.is_disposed() {
            return Ok(());
        }
        let Source::Virtual { count, cache, overrides, .. } = &mut self.source else {
            return Err(GridError::config("set_count is only supported on virtualized axes"));
        };
        *count = new_count;
        cache.retain(|&i| i < new_count);
        overrides.retain(|&i, _| i < new_count);
        let keep = new_count as usize + 1;
        if self.prefix.len() > keep {
            self.prefix.truncate(keep);
        }
        Ok(())
    }

    /// Drop cached items outside `[visible_start - buffer, visible_end + buffer]`.
    /// Returns how many were evicted.
    pub fn cleanup(&mut self, visible_start: u32, visible_end: u32, buffer: u32) -> Result<usize> {
        let Source::Virtual { cache, .. } = &mut self.source else {
            return Err(GridError::config("cleanup called on a fixed axis"));
        };
        let lo = visible_start.saturating_sub(buffer);
        let hi = visible_end.saturating_add(buffer);
        let evicted = cache.retain(|&i| (lo..=hi).contains(&i));
        if evicted > 0 {
            tracing::debug!(evicted, lo, hi, "evicted virtualized axis items");
        }
        Ok(evicted)
    }

    /// Cached item at `index`, if materialized (virtualized axes only).
    pub fn cached(&self, index: u32) -> Result<Option<&AxisItem>> {
        match &self.source {
            Source::Virtual { cache, .. } => Ok(cache.get(&index)),
            Source::Fixed(_) => Err(GridError::config("cached() called on a fixed axis")),
        }
    }

    /// Number of materialized items (virtualized axes only).
    pub fn cache_len(&self) -> Result<usize> {
        match &self.source {
            Source::Virtual { cache, .. } => Ok(cache.len()),
            Source::Fixed(_) => Err(GridError::config("cache_len() called on a fixed axis")),
        }
    }

    /// Smallest index whose end lies strictly after `pos`.
    pub fn first_ending_after(&mut self, pos: f64) -> Option<u32> {
        self.extend_until(|total| total > pos);
        let ends = self.prefix.get(1..)?;
        let i = ends.partition_point(|&end| end <= pos);
        (i < ends.len()).then(|| to_u32(i))
    }

    /// Largest index whose start lies strictly before `pos`.
    pub fn last_starting_before(&mut self, pos: f64) -> Option<u32> {
        self.extend_until(|total| total >= pos);
        let starts = self.prefix.get(..self.prefix.len().saturating_sub(1))?;
        let n = starts.partition_point(|&start| start < pos);
        n.checked_sub(1).map(to_u32)
    }

    /// Item covering `pos`. Exact boundaries resolve to the later item;
    /// positions outside `[0, total)` yield `None`.
    pub fn index_at(&mut self, pos: f64) -> Option<u32> {
        if pos.is_nan() || pos < 0.0 {
            return None;
        }
        self.extend_until(|total| total > pos);
        if self.running_total() <= pos {
            return None;
        }
        let starts = self.prefix.get(..self.prefix.len().saturating_sub(1))?;
        let n = starts.partition_point(|&start| start <= pos);
        n.checked_sub(1).map(to_u32)
    }

    /// Nearest interactive index at or beyond `from`, probing linearly in the
    /// given direction.
    pub fn probe_interactive(&self, from: u32, forward: bool) -> Option<u32> {
        let len = self.len();
        if from >= len {
            return None;
        }
        let mut i = from;
        loop {
            if self.peek(i, AxisItem::is_interactive) {
                return Some(i);
            }
            if forward {
                i += 1;
                if i >= len {
                    return None;
                }
            } else {
                i = i.checked_sub(1)?;
            }
        }
    }

    pub fn is_interactive(&self, index: u32) -> bool {
        index < self.len() && self.peek(index, AxisItem::is_interactive)
    }
}

impl Disposable for Axis {
    fn dispose(&mut self) {
        if !self.lifecycle.mark_disposed() {
            return;
        }
        match &mut self.source {
            Source::Fixed(items) => {
                items.iter_mut().for_each(AxisItem::unplace);
                items.clear();
            }
            Source::Virtual { count, cache, overrides, .. } => {
                cache.values_mut().for_each(AxisItem::unplace);
                cache.clear();
                overrides.clear();
                *count = 0;
            }
        }
        self.prefix.clear();
        self.prefix.push(0.0);
    }

    fn is_disposed(&self) -> bool {
        self.lifecycle.is_disposed()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn sized(sizes: &[f64]) -> Axis {
        Axis::fixed(sizes.iter().map(|&s| AxisItem::new(s)).collect()).unwrap()
    }

    #[test]
    fn test_offsets() {
        let mut axis = sized(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        let offsets: Vec<f64> = (0..5).map(|i| axis.offset_of(i).unwrap()).collect();
        assert_eq!(offsets, vec![0.0, 10.0, 30.0, 60.0, 100.0]);
        assert_eq!(axis.total_size(), 150.0);
        assert_eq!(axis.at(3).unwrap().offset(), 60.0);
        assert_eq!(axis.at(3).unwrap().index(), Some(3));
    }

    #[test]
    fn test_point_query() {
        let mut axis = sized(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        assert_eq!(axis.index_at(35.0), Some(2));
        assert_eq!(axis.index_at(30.0), Some(2));
        assert_eq!(axis.index_at(29.999), Some(1));
        assert_eq!(axis.index_at(0.0), Some(0));
        assert_eq!(axis.index_at(150.0), None);
        assert_eq!(axis.index_at(-1.0), None);
    }

    #[test]
    fn test_range_queries() {
        let mut axis = sized(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        // [25, 65): items 1..=3
        assert_eq!(axis.first_ending_after(25.0), Some(1));
        assert_eq!(axis.last_starting_before(65.0), Some(3));
        // Boundaries: item ending exactly at 30 is excluded, item starting at 60 excluded.
        assert_eq!(axis.first_ending_after(30.0), Some(2));
        assert_eq!(axis.last_starting_before(60.0), Some(2));
        assert_eq!(axis.first_ending_after(150.0), None);
        assert_eq!(axis.last_starting_before(0.0), None);
    }

    #[test]
    fn test_out_of_range() {
        let mut axis = sized(&[10.0, 20.0]);
        assert!(matches!(axis.at(2), Err(GridError::Range { index: 2, len: 2 })));
        assert!(axis.offset_of(2).is_ok());
        assert!(matches!(axis.offset_of(3), Err(GridError::Range { .. })));
    }

    #[test]
    fn test_collapsed_and_hidden() {
        let mut axis = sized(&[10.0, 20.0, 30.0]);
        axis.set_visibility(1, Visibility::Collapsed).unwrap();
        assert_eq!(axis.offset_of(2).unwrap(), 10.0);
        assert_eq!(axis.total_size(), 40.0);
        axis.set_visibility(1, Visibility::Hidden).unwrap();
        assert_eq!(axis.offset_of(2).unwrap(), 30.0);
        assert!(!axis.is_interactive(1));
        assert_eq!(axis.probe_interactive(1, true), Some(2));
        assert_eq!(axis.probe_interactive(1, false), Some(0));
    }

    #[test]
    fn test_resize_recomputes_fixed_offsets() {
        let mut axis = sized(&[10.0, 10.0, 10.0]);
        axis.resize(0, 25.0).unwrap();
        assert_eq!(axis.at(2).unwrap().offset(), 35.0);
        assert_eq!(axis.total_size(), 45.0);
    }

    #[test]
    fn test_insert_remove() {
        let mut axis = sized(&[10.0, 10.0]);
        axis.insert(1, AxisItem::new(5.0)).unwrap();
        assert_eq!(axis.len(), 3);
        assert_eq!(axis.offset_of(2).unwrap(), 15.0);
        let removed = axis.remove(0).unwrap();
        assert_eq!(removed.index(), None);
        assert_eq!(axis.offset_of(1).unwrap(), 5.0);
        assert!(axis.insert(9, AxisItem::new(1.0)).is_err());
    }

    #[test]
    fn test_virtualized_lazy_extension() {
        let calls = Rc::new(Cell::new(0u32));
        let counter = Rc::clone(&calls);
        let mut axis = Axis::virtualized(
            1_000_000,
            move |i| {
                counter.set(counter.get() + 1);
                AxisItem::new(if i % 2 == 0 { 10.0 } else { 20.0 })
            },
            64,
        )
        .unwrap();
        assert_eq!(axis.offset_of(4).unwrap(), 60.0);
        assert_eq!(axis.computed(), 4);
        let after_first = calls.get();
        // Cached prefix: no factory calls.
        assert_eq!(axis.offset_of(2).unwrap(), 30.0);
        assert_eq!(calls.get(), after_first);
        // Forward jump walks only the gap.
        assert_eq!(axis.offset_of(10).unwrap(), 150.0);
        assert_eq!(calls.get(), after_first + 6);
    }

    #[test]
    fn test_virtualized_resize_survives_eviction() {
        let mut axis = Axis::virtualized(100, |_| AxisItem::new(10.0), 4).unwrap();
        axis.at(3).unwrap();
        axis.resize(3, 50.0).unwrap();
        assert_eq!(axis.computed(), 0);
        assert_eq!(axis.offset_of(5).unwrap(), 90.0);
        for i in 10..20 {
            axis.at(i).unwrap();
        }
        assert!(axis.cached(3).unwrap().is_none());
        assert_eq!(axis.at(3).unwrap().size(), 50.0);
    }

    #[test]
    fn test_virtualized_item_placed_ahead_of_prefix() {
        let mut axis = Axis::virtualized(1000, |_| AxisItem::new(10.0), 16).unwrap();
        let item = axis.at(500).unwrap();
        assert_eq!(item.index(), Some(500));
        assert_eq!(item.offset(), 5000.0);
        assert_eq!(axis.cached(500).unwrap().map(AxisItem::offset), Some(5000.0));
    }

    #[test]
    fn test_virtualized_cache_bounded() {
        let mut axis = Axis::virtualized(1000, |_| AxisItem::new(10.0), 8).unwrap();
        for i in 0..100 {
            axis.at(i).unwrap();
        }
        assert_eq!(axis.cache_len().unwrap(), 8);
    }

    #[test]
    fn test_cleanup_window() {
        let mut axis = Axis::virtualized(1000, |_| AxisItem::new(10.0), 100).unwrap();
        for i in 0..50 {
            axis.at(i).unwrap();
        }
        let evicted = axis.cleanup(20, 25, 2).unwrap();
        assert_eq!(evicted, 50 - 10);
        assert!(axis.cached(18).unwrap().is_some());
        assert!(axis.cached(17).unwrap().is_none());
        assert!(axis.cached(27).unwrap().is_some());
        assert!(axis.cached(28).unwrap().is_none());
    }

    #[test]
    fn test_factory_accessors_reject_fixed_axis() {
        let mut axis = sized(&[10.0]);
        assert!(matches!(axis.cleanup(0, 0, 0), Err(GridError::Config(_))));
        assert!(matches!(axis.cached(0), Err(GridError::Config(_))));
        assert!(matches!(axis.set_count(3), Err(GridError::Config(_))));
        assert!(Axis::virtualized(1, |_| AxisItem::new(1.0), 0).is_err());
    }

    #[test]
    fn test_set_count() {
        let mut axis = Axis::virtualized(10, |_| AxisItem::new(10.0), 16).unwrap();
        assert_eq!(axis.total_size(), 100.0);
        axis.set_count(4).unwrap();
        assert_eq!(axis.total_size(), 40.0);
        axis.set_count(6).unwrap();
        assert_eq!(axis.total_size(), 60.0);
    }

    #[test]
    fn test_dispose_idempotent() {
        let mut axis = sized(&[10.0, 20.0]);
        axis.dispose();
        axis.dispose();
        assert!(axis.is_disposed());
        assert_eq!(axis.len(), 0);
        assert!(axis.resize(0, 5.0).is_ok());
    }
}

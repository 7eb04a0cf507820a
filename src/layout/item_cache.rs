//! Insertion-ordered bounded cache.
//!
//! Backs virtualized axes: materialized items are kept until either the
//! capacity is exceeded (oldest inserted goes first) or a window-based
//! cleanup drops them.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

/// A bounded cache that evicts in insertion order. Lookups do not promote
/// entries.
pub struct FifoCache<K: Hash + Eq + Clone, V> {
    entries: HashMap<K, V>,
    order: VecDeque<K>,
    capacity: usize,
}

impl<K: Hash + Eq + Clone, V> FifoCache<K, V> {
    /// Create a new cache. A capacity of 0 is treated as 1.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.entries.get_mut(key)
    }

    /// Return the cached value, creating it with `make` if absent.
    ///
    /// Room is made before inserting, so the new entry is never the one evicted.
    pub fn get_or_insert_with(&mut self, key: K, make: impl FnOnce() -> V) -> &mut V {
        if !self.entries.contains_key(&key) {
            while self.entries.len() >= self.capacity {
                if !self.evict_oldest() {
                    break;
                }
            }
            self.order.push_back(key.clone());
        }
        self.entries.entry(key).or_insert_with(make)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        let value = self.entries.remove(key)?;
        self.order.retain(|k| k != key);
        Some(value)
    }

    /// Keep only entries whose key satisfies `keep`. Returns the number dropped.
    pub fn retain(&mut self, mut keep: impl FnMut(&K) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|k, _| keep(k));
        let entries = &self.entries;
        self.order.retain(|k| entries.contains_key(k));
        before - self.entries.len()
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut V> {
        self.entries.values_mut()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    fn evict_oldest(&mut self) -> bool {
        match self.order.pop_front() {
            Some(oldest) => {
                self.entries.remove(&oldest);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evicts_oldest_first() {
        let mut cache: FifoCache<u32, &str> = FifoCache::new(2);
        cache.get_or_insert_with(1, || "a");
        cache.get_or_insert_with(2, || "b");
        cache.get_or_insert_with(3, || "c");
        assert!(!cache.contains_key(&1));
        assert_eq!(cache.get(&2), Some(&"b"));
        assert_eq!(cache.get(&3), Some(&"c"));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_existing_entry_not_replaced() {
        let mut cache: FifoCache<u32, i32> = FifoCache::new(2);
        cache.get_or_insert_with(1, || 10);
        let v = cache.get_or_insert_with(1, || 99);
        assert_eq!(*v, 10);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_lookup_does_not_promote() {
        let mut cache: FifoCache<u32, i32> = FifoCache::new(2);
        cache.get_or_insert_with(1, || 1);
        cache.get_or_insert_with(2, || 2);
        let _ = cache.get(&1);
        cache.get_or_insert_with(3, || 3);
        assert!(!cache.contains_key(&1));
    }

    #[test]
    fn test_retain_window() {
        let mut cache: FifoCache<u32, u32> = FifoCache::new(10);
        for i in 0..10 {
            cache.get_or_insert_with(i, || i);
        }
        let dropped = cache.retain(|&k| (3..=5).contains(&k));
        assert_eq!(dropped, 7);
        assert_eq!(cache.len(), 3);
        // Order queue stays consistent with entries after retain.
        for i in 20..27 {
            cache.get_or_insert_with(i, || i);
        }
        assert_eq!(cache.len(), 10);
        assert!(cache.contains_key(&3));
    }

    #[test]
    fn test_zero_capacity_clamped() {
        let mut cache: FifoCache<u32, u32> = FifoCache::new(0);
        assert_eq!(cache.capacity(), 1);
        cache.get_or_insert_with(1, || 1);
        cache.get_or_insert_with(2, || 2);
        assert_eq!(cache.len(), 1);
        assert!(cache.contains_key(&2));
    }
}

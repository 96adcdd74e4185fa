//! Bounded memoisation cache for generated suggestions.
//!
//! Evicts by insertion order: the oldest inserted query goes first no matter
//! how often it has been read since. Entries are never updated in place.

use std::collections::{HashMap, VecDeque};

/// Default number of queries kept.
pub const DEFAULT_CAPACITY: usize = 1000;

/// Normalised query → ordered suggestion list, bounded by `capacity`.
#[derive(Debug)]
pub struct SuggestionCache {
    entries: HashMap<String, Vec<String>>,
    order: VecDeque<String>,
    capacity: usize,
}

impl Default for SuggestionCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl SuggestionCache {
    /// Create an empty cache. A capacity of 0 is treated as 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity,
        }
    }

    /// Look up the suggestions stored for `key`.
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    /// Whether `key` has an entry.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Store `suggestions` under `key`.
    ///
    /// An existing entry is left untouched. When the insert pushes the cache
    /// past its capacity, the single oldest inserted entry is dropped and its
    /// key returned.
    pub fn insert(&mut self, key: String, suggestions: Vec<String>) -> Option<String> {
        if self.entries.contains_key(&key) {
            return None;
        }
        self.order.push_back(key.clone());
        self.entries.insert(key, suggestions);

        if self.entries.len() > self.capacity {
            let oldest = self.order.pop_front()?;
            self.entries.remove(&oldest);
            return Some(oldest);
        }
        None
    }

    /// Number of cached queries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of cached queries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

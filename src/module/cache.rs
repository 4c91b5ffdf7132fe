//! Read-through cache of raw documents.
//!
//! Every import site gets its own parsed [`super::Module`], but the same file
//! imported from several places only has to be read and decoded once. The
//! cache stores the decoded document sections, never evaluated state, so it
//! does not change results.

use std::collections::HashMap;

use crate::value::Map;

/// Decoded document sections keyed by resolved path.
///
/// Lives as long as its [`super::EvalContext`]; file changes made while a
/// context is alive are not picked up.
#[derive(Debug, Default)]
pub struct DocumentCache {
    documents: HashMap<String, Vec<Map>>,
    hits: usize,
    misses: usize,
}

/// Snapshot of cache counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub entries: usize,
}

impl CacheStats {
    /// Hit rate as a percentage.
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

impl DocumentCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a copy of the cached sections for `path`, counting a hit or miss.
    pub fn get(&mut self, path: &str) -> Option<Vec<Map>> {
        if let Some(documents) = self.documents.get(path) {
            self.hits += 1;
            Some(documents.clone())
        } else {
            self.misses += 1;
            None
        }
    }

    pub fn insert(&mut self, path: impl Into<String>, documents: Vec<Map>) {
        self.documents.insert(path.into(), documents);
    }

    /// Drop all entries and reset the counters.
    pub fn clear(&mut self) {
        self.documents.clear();
        self.hits = 0;
        self.misses = 0;
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            entries: self.documents.len(),
        }
    }
}

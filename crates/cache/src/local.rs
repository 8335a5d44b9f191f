//! Run-scoped in-memory image cache backed by DashMap.
//! Keyed by source URL so repeated references to one creative cost a single
//! network round trip per run.

use bytes::Bytes;
use dashmap::DashMap;
use std::sync::Arc;

/// Downloaded image bytes for the lifetime of one aggregation run.
#[derive(Clone)]
pub struct ImageStore {
    store: Arc<DashMap<String, Bytes>>,
    max_entries: usize,
}

impl ImageStore {
    pub fn new(max_entries: usize) -> Self {
        Self {
            store: Arc::new(DashMap::new()),
            max_entries,
        }
    }

    /// Cached bytes for `url`, if a previous fetch succeeded.
    pub fn get(&self, url: &str) -> Option<Bytes> {
        match self.store.get(url) {
            Some(entry) => {
                metrics::counter!("cache.image.hit").increment(1);
                Some(entry.value().clone())
            }
            None => {
                metrics::counter!("cache.image.miss").increment(1);
                None
            }
        }
    }

    /// Insert fetched bytes. When full, new URLs are not admitted; the caller
    /// still gets its bytes, only later references refetch.
    pub fn put(&self, url: &str, bytes: Bytes) {
        if self.store.len() >= self.max_entries && !self.store.contains_key(url) {
            metrics::counter!("cache.image.rejected").increment(1);
            return;
        }
        self.store.insert(url.to_string(), bytes);
    }

    pub fn contains(&self, url: &str) -> bool {
        self.store.contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Total cached payload in bytes.
    pub fn total_bytes(&self) -> usize {
        self.store.iter().map(|e| e.value().len()).sum()
    }
}

//! In-memory document store with least-recently-used eviction
//!
//! Each entry is a fully built [`DocumentIndex`] behind an `Arc`. `put`
//! swaps the whole entry under the lock, so a reader either sees the
//! previous index or the new one, never a partial build.

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use parking_lot::Mutex;

use super::builder::DocumentIndex;
use crate::error::{Error, Result};

/// Keyed store of document indexes, safe to share across request tasks
pub struct DocumentStore {
    entries: Mutex<LruCache<String, Arc<DocumentIndex>>>,
}

impl DocumentStore {
    /// Create a store holding at most `capacity` documents, or unbounded
    pub fn new(capacity: Option<usize>) -> Self {
        let cache = match capacity.and_then(NonZeroUsize::new) {
            Some(cap) => LruCache::new(cap),
            None => LruCache::unbounded(),
        };
        Self {
            entries: Mutex::new(cache),
        }
    }

    /// Publish an index under its key, returning the entry it replaced
    ///
    /// Last writer wins. Inserting past capacity evicts the least recently
    /// used document.
    pub fn put(&self, index: DocumentIndex) -> Option<Arc<DocumentIndex>> {
        let key = index.key.clone();
        let pushed = self.entries.lock().push(key.clone(), Arc::new(index));

        match pushed {
            Some((old_key, old)) if old_key == key => {
                tracing::info!("Replaced index for '{}'", key);
                Some(old)
            }
            Some((evicted, _)) => {
                tracing::info!("Evicted least recently used document '{}'", evicted);
                None
            }
            None => None,
        }
    }

    /// Look up a document, marking it as recently used
    pub fn get(&self, key: &str) -> Result<Arc<DocumentIndex>> {
        self.entries
            .lock()
            .get(key)
            .cloned()
            .ok_or_else(|| Error::NotFound(key.to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of documents held, `None` when unbounded
    pub fn capacity(&self) -> Option<usize> {
        let cap = self.entries.lock().cap().get();
        (cap != usize::MAX).then_some(cap)
    }

    /// All stored indexes, most recently used first
    pub fn entries(&self) -> Vec<Arc<DocumentIndex>> {
        self.entries
            .lock()
            .iter()
            .map(|(_, index)| Arc::clone(index))
            .collect()
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new(Some(100))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{FlatIndexProvider, VectorIndexProvider};
    use chrono::Utc;

    fn index(key: &str, chunk_count: usize) -> DocumentIndex {
        DocumentIndex {
            key: key.to_string(),
            index: FlatIndexProvider::default().build(Vec::new()).unwrap(),
            chunk_count,
            page_count: 1,
            content_hash: String::new(),
            ingested_at: Utc::now(),
        }
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let store = DocumentStore::default();
        assert!(store.is_empty());
        assert!(matches!(store.get("missing.pdf"), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_put_replaces_whole_entry() {
        let store = DocumentStore::new(Some(4));
        assert!(store.put(index("a.pdf", 3)).is_none());

        let replaced = store.put(index("a.pdf", 7)).unwrap();
        assert_eq!(replaced.chunk_count, 3);
        assert_eq!(store.get("a.pdf").unwrap().chunk_count, 7);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_evicts_least_recently_used() {
        let store = DocumentStore::new(Some(2));
        store.put(index("a.pdf", 1));
        store.put(index("b.pdf", 1));

        // Touch a so that b becomes the eviction candidate
        store.get("a.pdf").unwrap();
        assert!(store.put(index("c.pdf", 1)).is_none());

        assert!(store.get("b.pdf").is_err());
        let keys: Vec<String> = store.entries().iter().map(|e| e.key.clone()).collect();
        assert_eq!(keys, vec!["c.pdf", "a.pdf"]);
        assert_eq!(store.capacity(), Some(2));
    }

    #[test]
    fn test_unbounded_store() {
        let store = DocumentStore::new(None);
        for i in 0..150 {
            store.put(index(&format!("{}.pdf", i), 1));
        }
        assert_eq!(store.len(), 150);
        assert_eq!(store.capacity(), None);
    }

    #[test]
    fn test_concurrent_readers_see_complete_entries() {
        let store = Arc::new(DocumentStore::new(Some(8)));
        store.put(index("shared.pdf", 1));

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for n in 0..100 {
                        if i == 0 {
                            store.put(index("shared.pdf", n + 1));
                        } else {
                            let entry = store.get("shared.pdf").unwrap();
                            assert!(entry.chunk_count >= 1);
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(store.get("shared.pdf").unwrap().chunk_count, 100);
    }
}

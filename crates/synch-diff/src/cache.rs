//! Bounded memoization of built scripts, keyed on the
//! `(source digest, target digest)` pair.
//!
//! Keys are 64 bytes regardless of input size, so a full cache holds only
//! the scripts themselves, never the strings they were built from.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use lru::LruCache;
use synch_types::{Digest, EditScript};

/// Hit/miss counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// LRU cache of edit scripts.
///
/// Safe to share between threads. Scripts are immutable and share their
/// operation list, so a hit costs one reference-count bump.
pub struct ScriptCache {
    entries: Mutex<LruCache<(Digest, Digest), EditScript>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ScriptCache {
    /// Create a cache holding at most `capacity` scripts.
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Look up a script, marking it most recently used.
    pub fn get(&self, source: &Digest, target: &Digest) -> Option<EditScript> {
        let key = (*source, *target);
        let found = self.entries.lock().expect("lock poisoned").get(&key).cloned();
        let counter = if found.is_some() { &self.hits } else { &self.misses };
        counter.fetch_add(1, Ordering::Relaxed);
        found
    }

    /// Store a script, evicting the least recently used entry when full.
    pub fn insert(&self, source: Digest, target: Digest, script: EditScript) {
        self.entries
            .lock()
            .expect("lock poisoned")
            .put((source, target), script);
    }

    /// Number of cached scripts.
    pub fn len(&self) -> usize {
        self.entries.lock().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of cached scripts.
    pub fn capacity(&self) -> usize {
        self.entries.lock().expect("lock poisoned").cap().get()
    }

    /// Drop all entries. Counters are kept.
    pub fn clear(&self) {
        self.entries.lock().expect("lock poisoned").clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl std::fmt::Debug for ScriptCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptCache")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .field("stats", &self.stats())
            .finish()
    }
}

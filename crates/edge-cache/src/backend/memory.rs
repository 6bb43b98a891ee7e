//! In-process cache tier.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::{BackendCapabilities, CacheBackend, CacheExpiry, CacheItem, CacheStats};

/// A stored entry.
///
/// The data is wrapped in `Arc` so hits hand out a reference count instead
/// of copying the encoded entity.
#[derive(Debug)]
struct StoredEntry {
    data: Arc<Vec<u8>>,
    expires_at: Option<Instant>,
    tags: Vec<String>,
}

impl StoredEntry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// Entries and the tag → keys index, kept under one lock so a tag
/// invalidation never interleaves with a single-key write.
#[derive(Debug, Default)]
struct MemoryStore {
    entries: HashMap<String, StoredEntry>,
    tags: HashMap<String, HashSet<String>>,
}

impl MemoryStore {
    fn unlink_tags(&mut self, key: &str, tags: &[String]) {
        for tag in tags {
            if let Some(keys) = self.tags.get_mut(tag) {
                keys.remove(key);
                if keys.is_empty() {
                    self.tags.remove(tag);
                }
            }
        }
    }

    fn insert(&mut self, key: String, data: Vec<u8>, expiry: CacheExpiry, tags: &[String]) {
        if let Some(previous) = self.entries.remove(&key) {
            self.unlink_tags(&key, &previous.tags);
        }
        for tag in tags {
            self.tags.entry(tag.clone()).or_default().insert(key.clone());
        }
        let expires_at = match expiry {
            CacheExpiry::Permanent => None,
            CacheExpiry::After(ttl) => Some(Instant::now() + ttl),
        };
        self.entries.insert(
            key,
            StoredEntry {
                data: Arc::new(data),
                expires_at,
                tags: tags.to_vec(),
            },
        );
    }

    /// Removes `key` only if it is still expired at `now`; a concurrent
    /// rewrite between the read and the write lock wins.
    fn remove_expired(&mut self, key: &str, now: Instant) {
        if self.entries.get(key).is_some_and(|entry| entry.is_expired(now)) {
            self.remove(key);
        }
    }

    fn remove(&mut self, key: &str) -> bool {
        match self.entries.remove(key) {
            Some(entry) => {
                self.unlink_tags(key, &entry.tags);
                true
            }
            None => false,
        }
    }
}

/// In-process tagged cache.
///
/// Lives for the lifetime of the process (or of whatever owns it) and always
/// supports tag invalidation. Invalidated entries are dropped on the spot;
/// only expired entries linger until read or collected.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    store: RwLock<MemoryStore>,
    hits: AtomicU64,
    misses: AtomicU64,
    invalidations: AtomicU64,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend already wrapped for sharing.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Removes expired entries.
    ///
    /// Returns the number of entries removed.
    pub fn garbage_collect(&self) -> usize {
        let now = Instant::now();
        let mut store = self.store.write();
        let stale: Vec<String> = store
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();
        for key in &stale {
            store.remove(key);
        }
        if !stale.is_empty() {
            tracing::debug!(removed = stale.len(), "memory cache garbage collected");
        }
        stale.len()
    }

    /// Returns `true` if `key` currently holds a servable entry.
    pub fn contains(&self, key: &str) -> bool {
        self.store
            .read()
            .entries
            .get(key)
            .is_some_and(|entry| !entry.is_expired(Instant::now()))
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.store.read().entries.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
        }
    }

    fn lookup(&self, key: &str) -> Option<Arc<Vec<u8>>> {
        let now = Instant::now();
        let (result, expired) = match self.store.read().entries.get(key) {
            Some(entry) if entry.is_expired(now) => (None, true),
            Some(entry) => (Some(Arc::clone(&entry.data)), false),
            None => (None, false),
        };
        if expired {
            self.store.write().remove_expired(key, now);
        }

        if result.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            crate::metrics::record_cache_hit("memory");
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            crate::metrics::record_cache_miss("memory");
        }
        result
    }
}

#[async_trait]
impl CacheBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Option<Arc<Vec<u8>>> {
        self.lookup(key)
    }

    async fn set(&self, key: &str, value: Vec<u8>, expiry: CacheExpiry, tags: &[String]) {
        self.store.write().insert(key.to_string(), value, expiry, tags);
    }

    async fn set_multiple(&self, items: Vec<(String, CacheItem)>) {
        let mut store = self.store.write();
        for (key, item) in items {
            store.insert(key, item.value, item.expiry, &item.tags);
        }
    }

    async fn delete(&self, key: &str) {
        self.store.write().remove(key);
    }

    async fn delete_multiple(&self, keys: &[String]) {
        let mut store = self.store.write();
        for key in keys {
            store.remove(key);
        }
    }

    async fn invalidate(&self, key: &str) {
        if self.store.write().remove(key) {
            self.invalidations.fetch_add(1, Ordering::Relaxed);
        }
    }

    async fn invalidate_tags(&self, tags: &[String]) {
        let mut store = self.store.write();
        let mut invalidated = 0u64;
        for tag in tags {
            let Some(keys) = store.tags.remove(tag) else {
                continue;
            };
            for key in keys {
                if store.remove(&key) {
                    invalidated += 1;
                }
            }
        }
        if invalidated > 0 {
            self.invalidations.fetch_add(invalidated, Ordering::Relaxed);
            tracing::debug!(?tags, invalidated, "memory cache tags invalidated");
        }
    }

    async fn delete_all(&self) {
        let mut store = self.store.write();
        store.entries.clear();
        store.tags.clear();
    }

    fn capabilities(&self) -> BackendCapabilities {
        BackendCapabilities {
            tag_invalidation: true,
        }
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

//! Tagged key-value backing stores.
//!
//! Every typed cache in this crate sits on a [`CacheBackend`]: a key-value
//! store whose entries carry invalidation tags. Invalidating a tag drops every
//! entry carrying it, which is how relationships between entities are
//! expressed without the store knowing anything about them.
//!
//! ## Implementations
//!
//! - [`MemoryBackend`]: in-process tier, lives as long as the process
//! - [`RedisBackend`]: persistent tier shared across processes
//! - [`NullBackend`]: stores nothing and has no tag support
//!
//! Backends never fail loudly. A store that cannot be reached logs a warning
//! and behaves like an empty cache, since every read path can fall back to
//! the remote API.

pub mod memory;
pub mod null;
pub mod redis_backend;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

pub use memory::MemoryBackend;
pub use null::NullBackend;
pub use redis_backend::{RedisBackend, create_persistent_backend};

/// Shared handle to a backend.
pub type DynBackend = Arc<dyn CacheBackend>;

/// How long an entry may be served.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheExpiry {
    /// Until explicitly deleted or invalidated.
    #[default]
    Permanent,
    After(Duration),
}

/// A value to write together with its expiry and tags.
#[derive(Debug, Clone)]
pub struct CacheItem {
    pub value: Vec<u8>,
    pub expiry: CacheExpiry,
    pub tags: Vec<String>,
}

impl CacheItem {
    pub fn new(value: Vec<u8>, expiry: CacheExpiry, tags: Vec<String>) -> Self {
        Self { value, expiry, tags }
    }
}

/// Optional features of a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendCapabilities {
    /// Whether `invalidate_tags` actually invalidates anything.
    pub tag_invalidation: bool,
}

/// Backend counters for monitoring.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of stored entries, including invalidated ones not yet collected.
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    /// Number of entries invalidated directly or through a tag.
    pub invalidations: u64,
}

impl CacheStats {
    /// Hit rate as a percentage.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

/// Tagged key-value store contract.
///
/// `invalidate` and `delete` both make subsequent reads miss; `delete` also
/// releases the entry while `invalidate` may leave it for garbage collection.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Returns the value of a valid, unexpired entry.
    async fn get(&self, key: &str) -> Option<Arc<Vec<u8>>>;

    /// Bulk read. Misses are omitted from the result.
    async fn get_multiple(&self, keys: &[String]) -> HashMap<String, Arc<Vec<u8>>> {
        let mut found = HashMap::with_capacity(keys.len());
        for key in keys {
            if let Some(value) = self.get(key).await {
                found.insert(key.clone(), value);
            }
        }
        found
    }

    /// Writes an entry, replacing any previous entry and its tags.
    async fn set(&self, key: &str, value: Vec<u8>, expiry: CacheExpiry, tags: &[String]);

    async fn set_multiple(&self, items: Vec<(String, CacheItem)>) {
        for (key, item) in items {
            self.set(&key, item.value, item.expiry, &item.tags).await;
        }
    }

    async fn delete(&self, key: &str);

    async fn delete_multiple(&self, keys: &[String]) {
        for key in keys {
            self.delete(key).await;
        }
    }

    async fn invalidate(&self, key: &str);

    async fn invalidate_multiple(&self, keys: &[String]) {
        for key in keys {
            self.invalidate(key).await;
        }
    }

    /// Invalidates every entry carrying any of `tags`.
    ///
    /// Backends without tag support ignore the call; check
    /// [`capabilities`](Self::capabilities) first when that matters.
    async fn invalidate_tags(&self, tags: &[String]);

    async fn delete_all(&self);

    fn capabilities(&self) -> BackendCapabilities;

    /// Returns the name of this backend for logging.
    fn backend_name(&self) -> &'static str;
}

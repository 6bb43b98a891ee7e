//! Persistent cache tier on Redis.
//!
//! ## Key Layout
//!
//! - `{prefix}:{key}` holds the encoded value, with `EX` when it expires
//! - `{prefix}:tag:{tag}` is a set of the full keys carrying `tag`
//!
//! Tag sets are not pruned when an entry expires or is deleted; invalidating
//! a tag deletes whatever keys the set still names, missing keys included.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use deadpool_redis::Pool;
use redis::AsyncCommands;

use super::{BackendCapabilities, CacheBackend, CacheExpiry, CacheItem, DynBackend, MemoryBackend};
use crate::config::RedisConfig;

/// Keys requested per `SCAN` round trip in [`RedisBackend::delete_all`].
const SCAN_BATCH: usize = 500;

/// Redis-backed tagged cache.
#[derive(Clone)]
pub struct RedisBackend {
    pool: Pool,
    prefix: String,
}

impl RedisBackend {
    pub fn new(pool: Pool, prefix: impl Into<String>) -> Self {
        Self {
            pool,
            prefix: prefix.into(),
        }
    }

    #[inline]
    fn key(&self, key: &str) -> String {
        format!("{}:{key}", self.prefix)
    }

    #[inline]
    fn tag_key(&self, tag: &str) -> String {
        format!("{}:tag:{tag}", self.prefix)
    }

    /// Check if Redis is reachable (for health checks).
    pub async fn is_available(&self) -> bool {
        self.pool.get().await.is_ok()
    }

    async fn connection(&self) -> Option<deadpool_redis::Connection> {
        match self.pool.get().await {
            Ok(conn) => Some(conn),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to get Redis connection");
                None
            }
        }
    }

    fn queue_write(&self, pipe: &mut redis::Pipeline, key: &str, item: &CacheItem) {
        let full_key = self.key(key);
        match item.expiry {
            CacheExpiry::Permanent => {
                pipe.set(&full_key, item.value.as_slice()).ignore();
            }
            CacheExpiry::After(ttl) => {
                // EX 0 is rejected by Redis.
                let secs = ttl.as_secs().max(1);
                pipe.set_ex(&full_key, item.value.as_slice(), secs).ignore();
            }
        }
        for tag in &item.tags {
            pipe.sadd(self.tag_key(tag), &full_key).ignore();
        }
    }

    async fn write(&self, items: &[(String, CacheItem)]) {
        if items.is_empty() {
            return;
        }
        let Some(mut conn) = self.connection().await else {
            return;
        };
        let mut pipe = redis::pipe();
        pipe.atomic();
        for (key, item) in items {
            self.queue_write(&mut pipe, key, item);
        }
        let result: redis::RedisResult<()> = pipe.query_async(&mut conn).await;
        match result {
            Ok(()) => tracing::debug!(entries = items.len(), "cache set (persistent)"),
            Err(e) => tracing::warn!(error = %e, "Redis SET error"),
        }
    }

    async fn remove_keys(&self, full_keys: Vec<String>) {
        if full_keys.is_empty() {
            return;
        }
        let Some(mut conn) = self.connection().await else {
            return;
        };
        if let Err(e) = conn.del::<_, ()>(&full_keys).await {
            tracing::warn!(error = %e, "Redis DEL error");
        }
    }
}

#[async_trait]
impl CacheBackend for RedisBackend {
    async fn get(&self, key: &str) -> Option<Arc<Vec<u8>>> {
        let mut conn = self.connection().await?;
        match conn.get::<_, Option<Vec<u8>>>(self.key(key)).await {
            Ok(Some(data)) => {
                tracing::debug!(key = %key, "cache hit (persistent)");
                crate::metrics::record_cache_hit("persistent");
                Some(Arc::new(data))
            }
            Ok(None) => {
                crate::metrics::record_cache_miss("persistent");
                None
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Redis GET error");
                crate::metrics::record_cache_miss("persistent");
                None
            }
        }
    }

    async fn set(&self, key: &str, value: Vec<u8>, expiry: CacheExpiry, tags: &[String]) {
        let item = CacheItem::new(value, expiry, tags.to_vec());
        self.write(&[(key.to_string(), item)]).await;
    }

    async fn set_multiple(&self, items: Vec<(String, CacheItem)>) {
        self.write(&items).await;
    }

    async fn delete(&self, key: &str) {
        self.remove_keys(vec![self.key(key)]).await;
    }

    async fn delete_multiple(&self, keys: &[String]) {
        self.remove_keys(keys.iter().map(|k| self.key(k)).collect())
            .await;
    }

    /// Redis has no notion of an invalid entry, so this deletes.
    async fn invalidate(&self, key: &str) {
        self.delete(key).await;
    }

    async fn invalidate_multiple(&self, keys: &[String]) {
        self.delete_multiple(keys).await;
    }

    async fn invalidate_tags(&self, tags: &[String]) {
        let Some(mut conn) = self.connection().await else {
            return;
        };
        let mut doomed = Vec::new();
        for tag in tags {
            let tag_key = self.tag_key(tag);
            match conn.smembers::<_, Vec<String>>(&tag_key).await {
                Ok(keys) => doomed.extend(keys),
                Err(e) => {
                    tracing::warn!(tag = %tag, error = %e, "Redis SMEMBERS error");
                }
            }
            doomed.push(tag_key);
        }
        if let Err(e) = conn.del::<_, ()>(&doomed).await {
            tracing::warn!(error = %e, "Redis DEL error");
        } else {
            tracing::debug!(?tags, "cache tags invalidated (persistent)");
        }
    }

    async fn delete_all(&self) {
        let Some(mut conn) = self.connection().await else {
            return;
        };
        let pattern = format!("{}:*", self.prefix);
        let mut cursor: u64 = 0;
        let mut deleted = 0usize;
        loop {
            let page: redis::RedisResult<(u64, Vec<String>)> = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await;
            let (next, keys) = match page {
                Ok(page) => page,
                Err(e) => {
                    tracing::warn!(error = %e, "Redis SCAN error");
                    return;
                }
            };
            if !keys.is_empty() {
                match conn.del::<_, ()>(&keys).await {
                    Ok(()) => deleted += keys.len(),
                    Err(e) => tracing::warn!(error = %e, "Redis DEL error"),
                }
            }
            if next == 0 {
                break;
            }
            cursor = next;
        }
        tracing::debug!(prefix = %self.prefix, deleted, "redis cache cleared");
    }

    fn capabilities(&self) -> BackendCapabilities {
        BackendCapabilities {
            tag_invalidation: true,
        }
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}

/// Create the persistent tier from configuration.
///
/// Gracefully degrades to an in-process [`MemoryBackend`] when Redis is
/// disabled or cannot be reached.
pub async fn create_persistent_backend(config: &RedisConfig) -> DynBackend {
    if !config.enabled {
        tracing::info!("Redis disabled, persistent tier is process-local");
        return Arc::new(MemoryBackend::new());
    }

    tracing::info!(url = %config.url, "Connecting to Redis");

    let timeout = Duration::from_millis(config.timeout_ms);
    let mut redis_config = deadpool_redis::Config::from_url(&config.url);
    let mut pool_config = deadpool_redis::PoolConfig::new(config.pool_size);
    pool_config.timeouts.wait = Some(timeout);
    pool_config.timeouts.create = Some(timeout);
    pool_config.timeouts.recycle = Some(timeout);
    redis_config.pool = Some(pool_config);

    let pool = match redis_config.create_pool(Some(deadpool_redis::Runtime::Tokio1)) {
        Ok(pool) => pool,
        Err(e) => {
            tracing::warn!(
                error = %e,
                "Failed to create Redis pool. Falling back to local cache."
            );
            return Arc::new(MemoryBackend::new());
        }
    };

    match pool.get().await {
        Ok(_) => {
            tracing::info!("Connected to Redis");
            Arc::new(RedisBackend::new(pool, config.key_prefix.clone()))
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                "Failed to connect to Redis. Falling back to local cache."
            );
            Arc::new(MemoryBackend::new())
        }
    }
}

//! Typed entity store over a tagged backend.
//!
//! An [`EntityCache`] keeps full entity values in a [`CacheBackend`] and the
//! set of known ids in a paired [`EntityIdCache`]. Families that need more
//! than "one entry per primary id" customise the cache through
//! [`EntityCacheHooks`]: extra keys and tags per entity, and secondary writes
//! or invalidations after a save or a removal.

use std::collections::HashSet;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use edge_core::Entity;

use crate::backend::{CacheBackend, CacheExpiry, CacheItem, DynBackend};
use crate::codec;
use crate::id_cache::EntityIdCache;

/// One backend entry to write for an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedItem {
    pub cache_id: String,
    pub tags: Vec<String>,
}

impl PreparedItem {
    pub fn new(cache_id: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            cache_id: cache_id.into(),
            tags,
        }
    }
}

/// Per-family customisation points of [`EntityCache`].
#[async_trait]
pub trait EntityCacheHooks<E: Entity>: Send + Sync {
    /// Entries to write for `entity`. Every entry stores the whole entity.
    ///
    /// Defaults to one entry keyed and tagged by the primary id.
    fn prepare_cache_item(&self, entity: &E) -> Vec<PreparedItem> {
        vec![PreparedItem::new(entity.id(), vec![entity.id().to_string()])]
    }

    /// Runs after `entities` were written.
    async fn after_save(&self, _backend: &dyn CacheBackend, _entities: &[E]) {}

    /// Runs after `removed` were dropped from the cache.
    async fn after_remove(&self, _backend: &dyn CacheBackend, _removed: &[E]) {}
}

/// Hooks that keep the default single-entry layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultHooks;

#[async_trait]
impl<E: Entity> EntityCacheHooks<E> for DefaultHooks {}

/// Full entity values of one family, keyed by id.
pub struct EntityCache<E: Entity, H = DefaultHooks> {
    name: &'static str,
    backend: DynBackend,
    id_cache: EntityIdCache<E>,
    hooks: H,
    all_entities: AtomicBool,
    _entity: PhantomData<fn(&E)>,
}

impl<E: Entity> EntityCache<E, DefaultHooks> {
    pub fn new(name: &'static str, backend: DynBackend) -> Self {
        Self::with_parts(name, backend, EntityIdCache::new(), DefaultHooks)
    }
}

impl<E: Entity, H: EntityCacheHooks<E>> EntityCache<E, H> {
    pub fn with_parts(
        name: &'static str,
        backend: DynBackend,
        id_cache: EntityIdCache<E>,
        hooks: H,
    ) -> Self {
        Self {
            name,
            backend,
            id_cache,
            hooks,
            all_entities: AtomicBool::new(false),
            _entity: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn backend(&self) -> &DynBackend {
        &self.backend
    }

    pub fn id_cache(&self) -> &EntityIdCache<E> {
        &self.id_cache
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    /// Writes `entities`, replacing whatever was cached under their keys.
    pub async fn save_entities(&self, entities: &[E]) {
        if entities.is_empty() {
            return;
        }
        let mut items = Vec::with_capacity(entities.len());
        for entity in entities {
            let Some(value) = codec::encode_logged(entity, entity.id()) else {
                continue;
            };
            for prepared in self.hooks.prepare_cache_item(entity) {
                items.push((
                    prepared.cache_id,
                    CacheItem::new(value.clone(), CacheExpiry::Permanent, prepared.tags),
                ));
            }
        }
        self.backend.set_multiple(items).await;
        self.id_cache.save_entities(entities);
        self.hooks.after_save(self.backend.as_ref(), entities).await;
        tracing::debug!(cache = self.name, count = entities.len(), "entities cached");
    }

    /// Drops the given ids, whether the cache holds their values or only
    /// tracks them in the id cache. Unknown ids are ignored.
    pub async fn remove_entities<S: AsRef<str>>(&self, ids: &[S]) {
        if ids.is_empty() {
            return;
        }
        let keys: Vec<String> = ids.iter().map(|id| id.as_ref().to_string()).collect();
        let removed = self.get_entities(ids).await;
        let tracked = keys.iter().any(|key| self.id_cache.contains(key));
        if removed.is_empty() && !tracked {
            return;
        }

        if !removed.is_empty() {
            self.backend.delete_multiple(&keys).await;
        }
        // Alias entries of an id-only entity are still reachable by tag.
        self.backend.invalidate_tags(&keys).await;

        self.id_cache.remove_entities(&removed);
        self.id_cache.remove_ids(&keys);
        self.all_entities.store(false, Ordering::Release);

        if !removed.is_empty() {
            self.hooks.after_remove(self.backend.as_ref(), &removed).await;
        }
        crate::metrics::record_invalidation(self.name);
        tracing::debug!(cache = self.name, count = removed.len(), "entities removed");
    }

    /// Cached entities for `ids`, in input order, misses omitted.
    ///
    /// An empty `ids` returns every entity the id cache tracks. The result
    /// is never guaranteed complete; see [`is_all_entities_in_cache`].
    ///
    /// [`is_all_entities_in_cache`]: Self::is_all_entities_in_cache
    pub async fn get_entities<S: AsRef<str>>(&self, ids: &[S]) -> Vec<E> {
        let keys: Vec<String> = if ids.is_empty() {
            self.id_cache.get_ids()
        } else {
            let mut seen = HashSet::new();
            ids.iter()
                .map(|id| id.as_ref().to_string())
                .filter(|id| seen.insert(id.clone()))
                .collect()
        };
        if keys.is_empty() {
            return Vec::new();
        }

        let found = self.backend.get_multiple(&keys).await;
        let mut entities = Vec::with_capacity(found.len());
        for key in &keys {
            let Some(data) = found.get(key) else {
                continue;
            };
            match codec::decode_logged::<E>(data, key) {
                Some(entity) => entities.push(entity),
                None => self.backend.delete(key).await,
            }
        }
        entities
    }

    pub async fn get_entity(&self, id: &str) -> Option<E> {
        self.get_entities(&[id]).await.into_iter().next()
    }

    /// Sets the completeness flag of this cache and of its id cache.
    pub fn all_entities_in_cache(&self, all: bool) {
        self.all_entities.store(all, Ordering::Release);
        self.id_cache.all_ids_in_cache(all);
    }

    pub fn is_all_entities_in_cache(&self) -> bool {
        self.all_entities.load(Ordering::Acquire) && self.id_cache.is_all_ids_in_cache()
    }

    /// Clears `ids`, or the whole bin when `ids` is empty.
    pub async fn reset<S: AsRef<str>>(&self, ids: &[S]) {
        if ids.is_empty() {
            self.backend.delete_all().await;
            self.id_cache.reset();
            self.all_entities.store(false, Ordering::Release);
            tracing::debug!(cache = self.name, "cache reset");
            return;
        }
        self.remove_entities(ids).await;
        // Entries keyed by an alias of a listed id are reached through tags.
        let tags: Vec<String> = ids.iter().map(|id| id.as_ref().to_string()).collect();
        self.backend.invalidate_tags(&tags).await;
    }
}

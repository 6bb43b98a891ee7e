use std::sync::Arc;

use dashmap::DashMap;
use edge_core::{App, AppOwner};

use super::cache::AppCache;
use crate::error::CacheError;
use crate::id_cache::EntityIdCache;
use crate::CacheResult;

fn app_name(app: &App) -> String {
    app.name.clone()
}

/// Name-addressed view of one owner's apps.
///
/// Values live in the shared [`AppCache`]; this view only tracks which app
/// names of the owner are known.
pub struct AppCacheByOwner {
    owner: AppOwner,
    app_cache: Arc<AppCache>,
    name_cache: EntityIdCache<App>,
}

impl AppCacheByOwner {
    pub fn new(owner: AppOwner, app_cache: Arc<AppCache>) -> Self {
        Self {
            owner,
            app_cache,
            name_cache: EntityIdCache::with_extractor(app_name),
        }
    }

    pub fn owner(&self) -> &AppOwner {
        &self.owner
    }

    pub fn app_cache(&self) -> &Arc<AppCache> {
        &self.app_cache
    }

    /// Known app names of the owner.
    pub fn id_cache(&self) -> &EntityIdCache<App> {
        &self.name_cache
    }

    /// Caches apps of this owner.
    ///
    /// Fails without caching anything if one of the apps belongs to another
    /// owner.
    pub async fn save_entities(&self, apps: &[App]) -> CacheResult<()> {
        if let Some(foreign) = apps.iter().find(|app| app.owner.id() != self.owner.id()) {
            return Err(CacheError::invalid_argument(format!(
                "app {} belongs to {}, not {}",
                foreign.name, foreign.owner, self.owner
            )));
        }
        self.app_cache.save_apps_to_cache(apps).await;
        self.name_cache.save_entities(apps);
        Ok(())
    }

    /// Drops the named apps. Names that are not cached are skipped.
    pub async fn remove_entities<S: AsRef<str>>(&self, names: &[S]) {
        let removed = self
            .app_cache
            .remove_apps_by_name(self.owner.id(), names)
            .await;
        // Names may be tracked without a resolvable map entry.
        let requested: Vec<&str> = names.iter().map(|name| name.as_ref()).collect();
        let tracked = requested.iter().any(|name| self.name_cache.contains(name));
        self.name_cache.remove_ids(&requested);
        if tracked || !removed.is_empty() {
            self.all_entities_in_cache(false);
        }
    }

    /// Cached apps by name; an empty `names` returns all cached apps of the
    /// owner.
    pub async fn get_entities<S: AsRef<str>>(&self, names: &[S]) -> Vec<App> {
        let owner_id = self.owner.id();
        if names.is_empty() {
            return self
                .app_cache
                .get_apps_from_cache_by_owner(owner_id)
                .await
                .unwrap_or_default();
        }
        let Some(map) = self.app_cache.get_app_ids_from_cache_by_owner(owner_id).await else {
            return Vec::new();
        };
        let app_ids: Vec<&String> = names
            .iter()
            .filter_map(|name| map.get(name.as_ref()))
            .collect();
        if app_ids.len() != names.len() {
            tracing::debug!(
                owner = %self.owner,
                requested = names.len(),
                resolved = app_ids.len(),
                "not every app name is cached"
            );
        }
        self.app_cache
            .apps()
            .get_entities(&app_ids)
            .await
            .into_iter()
            .filter(|app| app.owner.id() == owner_id)
            .collect()
    }

    pub async fn get_entity(&self, name: &str) -> Option<App> {
        self.app_cache
            .get_app_from_cache_by_name(self.owner.id(), name)
            .await
    }

    pub fn all_entities_in_cache(&self, all: bool) {
        if all {
            self.app_cache.all_apps_loaded_for_owner(self.owner.id());
        } else {
            self.app_cache.not_all_apps_loaded_for_owner(self.owner.id());
        }
        self.name_cache.all_ids_in_cache(all);
    }

    pub fn is_all_entities_in_cache(&self) -> bool {
        self.app_cache.is_all_apps_loaded_for_owner(self.owner.id())
    }
}

/// Hands out one [`AppCacheByOwner`] per owner, all sharing one
/// [`AppCache`].
pub struct AppCacheByOwnerFactory {
    app_cache: Arc<AppCache>,
    caches: DashMap<String, Arc<AppCacheByOwner>>,
}

impl AppCacheByOwnerFactory {
    pub fn new(app_cache: Arc<AppCache>) -> Self {
        Self {
            app_cache,
            caches: DashMap::new(),
        }
    }

    pub fn app_cache(&self) -> &Arc<AppCache> {
        &self.app_cache
    }

    pub fn get_app_cache(&self, owner: &AppOwner) -> Arc<AppCacheByOwner> {
        self.caches
            .entry(owner.id().to_string())
            .or_insert_with(|| {
                Arc::new(AppCacheByOwner::new(owner.clone(), Arc::clone(&self.app_cache)))
            })
            .clone()
    }

    /// Forgets the owner's view. Cached apps are left alone.
    pub fn remove_app_cache(&self, owner_id: &str) {
        self.caches.remove(owner_id);
    }
}

use std::sync::Arc;

use edge_core::{App, AppOwner, is_email};

use super::by_owner::{AppCacheByOwner, AppCacheByOwnerFactory};
use crate::CacheResult;
use crate::developer::DeveloperCache;

/// Developer app cache addressed by developer email or UUID.
///
/// App caches are keyed by developer UUID. An email owner is resolved
/// through the developer cache only; when that misses, lookups return
/// nothing so the caller falls through to the API.
pub struct DeveloperAppCache {
    factory: Arc<AppCacheByOwnerFactory>,
    developers: Arc<DeveloperCache>,
}

impl DeveloperAppCache {
    pub fn new(factory: Arc<AppCacheByOwnerFactory>, developers: Arc<DeveloperCache>) -> Self {
        Self {
            factory,
            developers,
        }
    }

    pub fn factory(&self) -> &Arc<AppCacheByOwnerFactory> {
        &self.factory
    }

    /// Maps an email or UUID to the UUID owner, from cached data only.
    pub async fn resolve_owner(&self, developer: &str) -> Option<AppOwner> {
        if !is_email(developer) {
            return Some(AppOwner::Developer(developer.to_string()));
        }
        let resolved = self.developers.developer_id_for(developer).await;
        if resolved.is_none() {
            tracing::debug!(email = %developer, "developer id not cached");
        }
        resolved.map(AppOwner::Developer)
    }

    pub async fn get_app_cache(&self, developer: &str) -> Option<Arc<AppCacheByOwner>> {
        let owner = self.resolve_owner(developer).await?;
        Some(self.factory.get_app_cache(&owner))
    }

    pub async fn get_entities<S: AsRef<str>>(&self, developer: &str, names: &[S]) -> Vec<App> {
        match self.get_app_cache(developer).await {
            Some(cache) => cache.get_entities(names).await,
            None => Vec::new(),
        }
    }

    pub async fn get_entity(&self, developer: &str, name: &str) -> Option<App> {
        self.get_app_cache(developer).await?.get_entity(name).await
    }

    /// Caches apps of one developer.
    ///
    /// Apps always carry the owner UUID, so an unresolvable email falls back
    /// to the owner of the apps themselves.
    pub async fn save_entities(&self, developer: &str, apps: &[App]) -> CacheResult<()> {
        let owner = match self.resolve_owner(developer).await {
            Some(owner) => owner,
            None => match apps.first() {
                Some(app) => app.owner.clone(),
                None => return Ok(()),
            },
        };
        self.factory.get_app_cache(&owner).save_entities(apps).await
    }

    pub async fn remove_entities<S: AsRef<str>>(&self, developer: &str, names: &[S]) {
        if let Some(cache) = self.get_app_cache(developer).await {
            cache.remove_entities(names).await;
        }
    }

    pub async fn is_all_entities_in_cache(&self, developer: &str) -> bool {
        match self.get_app_cache(developer).await {
            Some(cache) => cache.is_all_entities_in_cache(),
            None => false,
        }
    }

    pub async fn all_entities_in_cache(&self, developer: &str, all: bool) {
        if let Some(cache) = self.get_app_cache(developer).await {
            cache.all_entities_in_cache(all);
        }
    }
}

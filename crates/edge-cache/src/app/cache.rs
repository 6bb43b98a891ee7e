use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;
use edge_core::{App, AppType, Entity};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::CacheResult;
use crate::backend::{CacheExpiry, DynBackend};
use crate::codec;
use crate::entity_cache::{EntityCache, EntityCacheHooks, PreparedItem};
use crate::id_cache::EntityIdCache;
use crate::tags::app_names_tag;

/// App name → app UUID, for one owner.
pub type AppNameMap = BTreeMap<String, String>;

/// Tags every app with its UUID, its owner and its app type.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppCacheHooks;

#[async_trait]
impl EntityCacheHooks<App> for AppCacheHooks {
    fn prepare_cache_item(&self, entity: &App) -> Vec<PreparedItem> {
        vec![PreparedItem::new(
            entity.id(),
            vec![
                entity.app_id.clone(),
                entity.owner.id().to_string(),
                entity.app_type().as_str().to_string(),
            ],
        )]
    }
}

fn name_map_key(owner_id: &str) -> String {
    format!("owner:{owner_id}")
}

/// Stored form of an owner's name map.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct OwnerIndex {
    app_type: AppType,
    names: AppNameMap,
}

/// Organization-wide app store.
///
/// Apps are keyed by UUID. Each owner additionally has one name map entry,
/// tagged with the owner id, so dropping an owner's tag drops its apps and
/// its map together.
pub struct AppCache {
    apps: EntityCache<App, AppCacheHooks>,
    loaded_owners: RwLock<HashSet<String>>,
}

impl AppCache {
    pub fn new(backend: DynBackend) -> Self {
        Self {
            apps: EntityCache::with_parts("app", backend, EntityIdCache::new(), AppCacheHooks),
            loaded_owners: RwLock::new(HashSet::new()),
        }
    }

    /// The underlying UUID-keyed entity cache.
    pub fn apps(&self) -> &EntityCache<App, AppCacheHooks> {
        &self.apps
    }

    fn backend(&self) -> &DynBackend {
        self.apps.backend()
    }

    pub async fn save_apps_to_cache(&self, apps: &[App]) {
        if apps.is_empty() {
            return;
        }
        self.apps.save_entities(apps).await;

        let mut by_owner: BTreeMap<&str, Vec<&App>> = BTreeMap::new();
        for app in apps {
            by_owner.entry(app.owner.id()).or_default().push(app);
        }
        for (owner_id, owned) in by_owner {
            // Merge: an earlier partial fetch may have stored other names.
            let mut index = self.read_index(owner_id).await.unwrap_or(OwnerIndex {
                app_type: owned[0].app_type(),
                names: AppNameMap::new(),
            });
            for app in &owned {
                index.names.insert(app.name.clone(), app.app_id.clone());
            }
            self.write_index(owner_id, &index).await;
        }
    }

    async fn read_index(&self, owner_id: &str) -> Option<OwnerIndex> {
        let key = name_map_key(owner_id);
        let data = self.backend().get(&key).await?;
        let index = codec::decode_logged(&data, &key);
        if index.is_none() {
            self.backend().delete(&key).await;
        }
        index
    }

    async fn write_index(&self, owner_id: &str, index: &OwnerIndex) {
        let key = name_map_key(owner_id);
        let Some(value) = codec::encode_logged(index, &key) else {
            return;
        };
        let tags = vec![
            owner_id.to_string(),
            app_names_tag(owner_id),
            index.app_type.as_str().to_string(),
        ];
        self.backend()
            .set(&key, value, CacheExpiry::Permanent, &tags)
            .await;
    }

    pub async fn get_app_from_cache_by_app_id(&self, app_id: &str) -> Option<App> {
        self.apps.get_entity(app_id).await
    }

    pub async fn get_app_from_cache_by_name(&self, owner_id: &str, name: &str) -> Option<App> {
        let names = self.get_app_ids_from_cache_by_owner(owner_id).await?;
        let app = self.get_app_from_cache_by_app_id(names.get(name)?).await?;
        // The map may outlive a rename; never serve another app.
        (app.name == name && app.owner.id() == owner_id).then_some(app)
    }

    /// The owner's name → UUID map, if one is cached.
    pub async fn get_app_ids_from_cache_by_owner(&self, owner_id: &str) -> Option<AppNameMap> {
        self.read_index(owner_id).await.map(|index| index.names)
    }

    /// Every cached app of the owner, in name order.
    pub async fn get_apps_from_cache_by_owner(&self, owner_id: &str) -> Option<Vec<App>> {
        let names = self.get_app_ids_from_cache_by_owner(owner_id).await?;
        let ids: Vec<&String> = names.values().collect();
        Some(self.apps.get_entities(&ids).await)
    }

    /// Drops an app from the store and from its owner's name map.
    pub async fn remove_app_from_cache(&self, app: &App) {
        self.apps.remove_entities(&[app.app_id.as_str()]).await;
        self.backend().invalidate_tags(&[app.app_id.clone()]).await;
        self.unlink_names(app.owner.id(), |name, id| name == app.name || id == app.app_id)
            .await;
        self.not_all_apps_loaded_for_owner(app.owner.id());
    }

    /// Drops the named apps of one owner. Names missing from the owner's
    /// map are skipped. Returns the names that were resolved.
    pub async fn remove_apps_by_name<S: AsRef<str>>(
        &self,
        owner_id: &str,
        names: &[S],
    ) -> Vec<String> {
        let Some(map) = self.get_app_ids_from_cache_by_owner(owner_id).await else {
            return Vec::new();
        };
        let resolved: Vec<(String, String)> = names
            .iter()
            .filter_map(|name| {
                map.get_key_value(name.as_ref())
                    .map(|(n, id)| (n.clone(), id.clone()))
            })
            .collect();
        if resolved.is_empty() {
            return Vec::new();
        }

        for (_, app_id) in &resolved {
            match self.get_app_from_cache_by_app_id(app_id).await {
                Some(app) => self.remove_app_from_cache(&app).await,
                None => {
                    // Entry already gone; still forget the id and the name.
                    self.apps.id_cache().remove_ids(&[app_id]);
                }
            }
        }
        let doomed: HashSet<&str> = resolved.iter().map(|(n, _)| n.as_str()).collect();
        self.unlink_names(owner_id, |name, _| doomed.contains(name))
            .await;
        self.not_all_apps_loaded_for_owner(owner_id);
        resolved.into_iter().map(|(name, _)| name).collect()
    }

    async fn unlink_names<F>(&self, owner_id: &str, doomed: F)
    where
        F: Fn(&str, &str) -> bool,
    {
        let Some(mut index) = self.read_index(owner_id).await else {
            return;
        };
        let before = index.names.len();
        index.names.retain(|name, id| !doomed(name.as_str(), id.as_str()));
        if index.names.len() == before {
            return;
        }
        if index.names.is_empty() {
            self.backend().delete(&name_map_key(owner_id)).await;
        } else {
            self.write_index(owner_id, &index).await;
        }
    }

    /// Drops every app of an owner together with its name map.
    pub async fn remove_owner(&self, owner_id: &str) {
        if let Some(names) = self.get_app_ids_from_cache_by_owner(owner_id).await {
            let ids: Vec<&String> = names.values().collect();
            self.apps.remove_entities(&ids).await;
        }
        self.backend()
            .invalidate_tags(&[owner_id.to_string(), app_names_tag(owner_id)])
            .await;
        self.not_all_apps_loaded_for_owner(owner_id);
        crate::metrics::record_invalidation("app");
    }

    pub fn all_apps_loaded_for_owner(&self, owner_id: &str) {
        self.loaded_owners.write().insert(owner_id.to_string());
    }

    pub fn not_all_apps_loaded_for_owner(&self, owner_id: &str) {
        self.loaded_owners.write().remove(owner_id);
    }

    pub fn is_all_apps_loaded_for_owner(&self, owner_id: &str) -> bool {
        self.loaded_owners.read().contains(owner_id)
    }

    /// Clears the given app ids, or everything when `ids` is empty.
    pub async fn reset_cache<S: AsRef<str>>(&self, ids: &[S]) {
        if ids.is_empty() {
            self.apps.reset::<&str>(&[]).await;
            self.loaded_owners.write().clear();
            return;
        }
        for app in self.apps.get_entities(ids).await {
            self.unlink_names(app.owner.id(), |_, id| id == app.app_id)
                .await;
            self.not_all_apps_loaded_for_owner(app.owner.id());
        }
        self.apps.reset(ids).await;
    }

    /// Invalidates every app of one type (`developer_app`, `company_app`).
    pub async fn reset_cache_by_app_type(&self, app_type: &str) -> CacheResult<()> {
        let app_type: AppType = app_type.parse()?;
        self.backend()
            .invalidate_tags(&[app_type.as_str().to_string()])
            .await;
        self.apps.id_cache().reset();
        self.apps.all_entities_in_cache(false);
        self.loaded_owners.write().clear();
        crate::metrics::record_invalidation("app");
        tracing::debug!(app_type = %app_type, "app cache reset by type");
        Ok(())
    }
}

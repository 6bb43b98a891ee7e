//! Developers, reachable by UUID or by email.

use async_trait::async_trait;
use edge_core::{Developer, Entity, is_email};

use crate::backend::{CacheBackend, CacheExpiry, DynBackend};
use crate::codec;
use crate::entity_cache::{EntityCache, EntityCacheHooks, PreparedItem};
use crate::id_cache::EntityIdCache;
use crate::tags::developer_tag;

/// Writes every developer under both identifiers.
///
/// Both entries carry the UUID, the email and the `developer:{email}` tag, so
/// invalidating either identifier drops both entries.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeveloperCacheHooks;

impl DeveloperCacheHooks {
    fn tags(developer: &Developer) -> Vec<String> {
        vec![
            developer.developer_id.clone(),
            developer.email.clone(),
            developer_tag(&developer.email),
        ]
    }
}

#[async_trait]
impl EntityCacheHooks<Developer> for DeveloperCacheHooks {
    fn prepare_cache_item(&self, entity: &Developer) -> Vec<PreparedItem> {
        vec![PreparedItem::new(entity.id(), Self::tags(entity))]
    }

    async fn after_save(&self, backend: &dyn CacheBackend, entities: &[Developer]) {
        for developer in entities {
            let Some(value) = codec::encode_logged(developer, &developer.email) else {
                continue;
            };
            backend
                .set(
                    &developer.email,
                    value,
                    CacheExpiry::Permanent,
                    &Self::tags(developer),
                )
                .await;
        }
    }

    async fn after_remove(&self, backend: &dyn CacheBackend, removed: &[Developer]) {
        let tags: Vec<String> = removed
            .iter()
            .flat_map(|d| [d.developer_id.clone(), d.email.clone()])
            .collect();
        backend.invalidate_tags(&tags).await;
    }
}

/// Developer entity cache. Its id cache tracks emails.
pub type DeveloperCache = EntityCache<Developer, DeveloperCacheHooks>;

fn developer_email(developer: &Developer) -> String {
    developer.email.clone()
}

impl EntityCache<Developer, DeveloperCacheHooks> {
    pub fn for_developers(backend: DynBackend) -> Self {
        Self::with_parts(
            "developer",
            backend,
            EntityIdCache::with_extractor(developer_email),
            DeveloperCacheHooks,
        )
    }

    /// Looks up a developer by email. Returns `None` for anything that is not
    /// an email address.
    pub async fn get_by_email(&self, email: &str) -> Option<Developer> {
        if !is_email(email) {
            return None;
        }
        self.get_entity(email).await
    }

    /// Resolves an email to a developer UUID from cached data only.
    pub async fn developer_id_for(&self, email: &str) -> Option<String> {
        self.get_by_email(email).await.map(|d| d.developer_id)
    }
}

//! One instance of every cache, wired together.

use std::sync::Arc;

use edge_core::Company;

use crate::app::{AppCache, AppCacheByOwnerFactory, DeveloperAppCache};
use crate::backend::{DynBackend, MemoryBackend, create_persistent_backend};
use crate::config::CacheConfig;
use crate::developer::DeveloperCache;
use crate::developer_companies::DeveloperCompaniesCache;
use crate::entity_cache::EntityCache;
use crate::membership::{AppGroupMembershipObjectCache, CompanyMembershipObjectCache};
use crate::tags::{developer_tag, member_tag};

/// Company entity cache, keyed by company name.
pub type CompanyCache = EntityCache<Company>;

/// The cache bundle handed to controllers.
///
/// Entity families each get their own in-process bin; both membership
/// caches share the persistent backend.
pub struct EdgeCaches {
    pub developers: Arc<DeveloperCache>,
    pub companies: Arc<CompanyCache>,
    pub apps: Arc<AppCache>,
    pub app_owners: Arc<AppCacheByOwnerFactory>,
    pub developer_apps: Arc<DeveloperAppCache>,
    pub developer_companies: Arc<DeveloperCompaniesCache>,
    pub company_memberships: Arc<CompanyMembershipObjectCache>,
    pub appgroup_memberships: Arc<AppGroupMembershipObjectCache>,
}

impl EdgeCaches {
    pub fn new(persistent: DynBackend, config: &CacheConfig) -> Self {
        let expiration = config.membership.expiration();

        let developers = Arc::new(DeveloperCache::for_developers(MemoryBackend::shared()));
        let apps = Arc::new(AppCache::new(MemoryBackend::shared()));
        let app_owners = Arc::new(AppCacheByOwnerFactory::new(Arc::clone(&apps)));
        let developer_apps = Arc::new(DeveloperAppCache::new(
            Arc::clone(&app_owners),
            Arc::clone(&developers),
        ));

        Self {
            developers,
            companies: Arc::new(CompanyCache::new("company", MemoryBackend::shared())),
            apps,
            app_owners,
            developer_apps,
            developer_companies: Arc::new(DeveloperCompaniesCache::new(MemoryBackend::shared())),
            company_memberships: Arc::new(CompanyMembershipObjectCache::new(
                MemoryBackend::shared(),
                Arc::clone(&persistent),
                expiration,
            )),
            appgroup_memberships: Arc::new(AppGroupMembershipObjectCache::new(
                MemoryBackend::shared(),
                persistent,
                expiration,
            )),
        }
    }

    /// Bundle whose persistent tier is process-local.
    pub fn in_memory(config: &CacheConfig) -> Self {
        Self::new(MemoryBackend::shared(), config)
    }

    /// Bundle with the persistent tier from `config.redis`.
    pub async fn from_config(config: &CacheConfig) -> Self {
        let persistent = create_persistent_backend(&config.redis).await;
        tracing::info!(
            backend = persistent.backend_name(),
            expiration = ?config.membership.expiration(),
            "edge caches ready"
        );
        Self::new(persistent, config)
    }

    /// Drops everything cached about a developer's team memberships.
    pub async fn invalidate_member(&self, email: &str) {
        let members = [member_tag(email)];
        self.company_memberships.invalidate_memberships(&members).await;
        self.appgroup_memberships.invalidate_memberships(&members).await;
        self.developer_companies
            .invalidate(&[developer_tag(email)])
            .await;
    }
}

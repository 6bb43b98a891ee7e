//! Company names per developer.

use crate::backend::{CacheExpiry, DynBackend};
use crate::codec;
use crate::tags::{company_tag, developer_tag};

/// Caches, per developer email, the companies the developer belongs to.
///
/// Entries are tagged `developer:{email}` and `company:{name}` for each
/// company, so a change on either side drops them.
pub struct DeveloperCompaniesCache {
    backend: DynBackend,
}

impl DeveloperCompaniesCache {
    pub fn new(backend: DynBackend) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &DynBackend {
        &self.backend
    }

    pub async fn get(&self, email: &str) -> Option<Vec<String>> {
        let data = self.backend.get(email).await?;
        let companies = codec::decode_logged(&data, email);
        if companies.is_none() {
            self.backend.delete(email).await;
        }
        companies
    }

    pub async fn save(&self, email: &str, companies: &[String]) {
        let Some(value) = codec::encode_logged(&companies, email) else {
            return;
        };
        let tags: Vec<String> = std::iter::once(developer_tag(email))
            .chain(companies.iter().map(|c| company_tag(c)))
            .collect();
        self.backend
            .set(email, value, CacheExpiry::Permanent, &tags)
            .await;
    }

    pub async fn remove(&self, email: &str) {
        self.backend.delete(email).await;
        crate::metrics::record_invalidation("developer_companies");
    }

    pub async fn invalidate(&self, tags: &[String]) {
        self.backend.invalidate_tags(tags).await;
        crate::metrics::record_invalidation("developer_companies");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_company_change_drops_member_lists() {
        let cache = DeveloperCompaniesCache::new(Arc::new(MemoryBackend::new()));
        cache
            .save("a@example.com", &["acme".to_string(), "globex".to_string()])
            .await;
        cache.save("b@example.com", &["initech".to_string()]).await;

        assert_eq!(
            cache.get("a@example.com").await,
            Some(vec!["acme".to_string(), "globex".to_string()])
        );

        cache.invalidate(&[company_tag("acme")]).await;
        assert!(cache.get("a@example.com").await.is_none());
        assert!(cache.get("b@example.com").await.is_some());

        cache.invalidate(&[developer_tag("b@example.com")]).await;
        assert!(cache.get("b@example.com").await.is_none());
    }

    #[tokio::test]
    async fn test_empty_list_is_a_hit() {
        let cache = DeveloperCompaniesCache::new(Arc::new(MemoryBackend::new()));
        cache.save("a@example.com", &[]).await;
        assert_eq!(cache.get("a@example.com").await, Some(vec![]));

        cache.remove("a@example.com").await;
        assert!(cache.get("a@example.com").await.is_none());
    }
}

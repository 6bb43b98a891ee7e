use std::sync::Arc;

use edge_cache::EdgeCaches;
use edge_core::{Developer, DeveloperClient, DeveloperStatus};

use crate::ControllerResult;
use crate::paging::read_all;

/// Developer read-through and write-through controller.
///
/// Every `id_or_email` accepts the developer UUID or email.
pub struct DeveloperController {
    client: Arc<dyn DeveloperClient>,
    caches: Arc<EdgeCaches>,
}

impl DeveloperController {
    pub fn new(client: Arc<dyn DeveloperClient>, caches: Arc<EdgeCaches>) -> Self {
        Self { client, caches }
    }

    pub async fn load(&self, id_or_email: &str) -> ControllerResult<Developer> {
        if let Some(developer) = self.caches.developers.get_entity(id_or_email).await {
            return Ok(developer);
        }
        let developer = self.client.load(id_or_email).await?;
        self.caches.developers.save_entities(&[developer.clone()]).await;
        Ok(developer)
    }

    pub async fn create(&self, developer: &Developer) -> ControllerResult<Developer> {
        let created = self.client.create(developer).await?;
        self.caches.developers.save_entities(&[created.clone()]).await;
        Ok(created)
    }

    pub async fn update(&self, developer: &Developer) -> ControllerResult<Developer> {
        let previous = self
            .caches
            .developers
            .get_entity(&developer.developer_id)
            .await;
        let updated = self.client.update(developer).await?;
        self.evict(&updated).await;
        if let Some(previous) = previous
            && previous.email != updated.email
        {
            self.caches.invalidate_member(&previous.email).await;
        }
        self.caches.developers.save_entities(&[updated.clone()]).await;
        Ok(updated)
    }

    pub async fn delete(&self, id_or_email: &str) -> ControllerResult<Developer> {
        let deleted = self.client.delete(id_or_email).await?;
        self.evict(&deleted).await;
        self.caches.apps.remove_owner(&deleted.developer_id).await;
        Ok(deleted)
    }

    pub async fn set_status(
        &self,
        id_or_email: &str,
        status: DeveloperStatus,
    ) -> ControllerResult<()> {
        self.client.set_status(id_or_email, status).await?;
        self.caches.developers.remove_entities(&[id_or_email]).await;
        Ok(())
    }

    /// Every developer, read from the API unless a full listing is cached.
    pub async fn get_entities(&self) -> ControllerResult<Vec<Developer>> {
        let cache = &self.caches.developers;
        if cache.is_all_entities_in_cache() {
            return Ok(cache.get_entities::<&str>(&[]).await);
        }
        let client = Arc::clone(&self.client);
        let developers = read_all(move |pager| {
            let client = Arc::clone(&client);
            async move { client.list(pager.as_ref()).await }
        })
        .await?;
        cache.save_entities(&developers).await;
        cache.all_entities_in_cache(true);
        Ok(developers)
    }

    /// Every developer email.
    pub async fn get_entity_ids(&self) -> ControllerResult<Vec<String>> {
        let ids = self.caches.developers.id_cache();
        if ids.is_all_ids_in_cache() {
            return Ok(ids.get_ids());
        }
        let client = Arc::clone(&self.client);
        let emails = read_all(move |pager| {
            let client = Arc::clone(&client);
            async move { client.list_ids(pager.as_ref()).await }
        })
        .await?;
        ids.save_ids(emails.iter().cloned());
        ids.all_ids_in_cache(true);
        Ok(emails)
    }

    /// Drops a developer under both identifiers, along with its app view
    /// and everything tagged with its email.
    async fn evict(&self, developer: &Developer) {
        self.caches
            .developers
            .remove_entities(&[developer.developer_id.as_str(), developer.email.as_str()])
            .await;
        self.caches.invalidate_member(&developer.email).await;
        self.caches
            .app_owners
            .remove_app_cache(&developer.developer_id);
        tracing::debug!(developer = %developer.email, "developer evicted");
    }
}

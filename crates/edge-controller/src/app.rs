use std::sync::Arc;

use edge_cache::EdgeCaches;
use edge_core::{App, AppClient};

use crate::ControllerResult;
use crate::paging::read_all;

/// Organization-wide app controller, addressed by app UUID.
///
/// Listing every app does not make any single owner complete; only the
/// owner-scoped controllers mark owners.
pub struct AppController {
    client: Arc<dyn AppClient>,
    caches: Arc<EdgeCaches>,
}

impl AppController {
    pub fn new(client: Arc<dyn AppClient>, caches: Arc<EdgeCaches>) -> Self {
        Self { client, caches }
    }

    pub async fn load_app(&self, app_id: &str) -> ControllerResult<App> {
        if let Some(app) = self.caches.apps.get_app_from_cache_by_app_id(app_id).await {
            return Ok(app);
        }
        let app = self.client.load(app_id).await?;
        self.caches.apps.save_apps_to_cache(&[app.clone()]).await;
        Ok(app)
    }

    pub async fn list_app_ids(&self) -> ControllerResult<Vec<String>> {
        let ids = self.caches.apps.apps().id_cache();
        if ids.is_all_ids_in_cache() {
            return Ok(ids.get_ids());
        }
        let client = Arc::clone(&self.client);
        let app_ids = read_all(move |pager| {
            let client = Arc::clone(&client);
            async move { client.list_ids(pager.as_ref()).await }
        })
        .await?;
        ids.save_ids(app_ids.iter().cloned());
        ids.all_ids_in_cache(true);
        Ok(app_ids)
    }

    /// Every app of the organization. Credentials are stripped unless
    /// `include_credentials` is set; the cache always keeps them.
    pub async fn list_apps(&self, include_credentials: bool) -> ControllerResult<Vec<App>> {
        let cache = self.caches.apps.apps();
        let mut apps = if cache.is_all_entities_in_cache() {
            cache.get_entities::<&str>(&[]).await
        } else {
            let client = Arc::clone(&self.client);
            let apps = read_all(move |pager| {
                let client = Arc::clone(&client);
                async move { client.list(pager.as_ref()).await }
            })
            .await?;
            self.caches.apps.save_apps_to_cache(&apps).await;
            cache.all_entities_in_cache(true);
            apps
        };
        if !include_credentials {
            for app in &mut apps {
                app.credentials.clear();
            }
        }
        Ok(apps)
    }
}

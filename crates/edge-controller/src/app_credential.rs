use std::sync::Arc;

use edge_cache::EdgeCaches;
use edge_core::{App, AppCredential, AppCredentialClient, AppOwner, CredentialStatus};

use crate::ControllerResult;
use crate::app_by_owner::owner_view;

/// Credential operations of one app.
///
/// Credentials are cached inside their app, so every mutation drops the
/// whole app and the next read reloads it.
pub struct AppCredentialController {
    owner: AppOwner,
    app_name: String,
    client: Arc<dyn AppCredentialClient>,
    caches: Arc<EdgeCaches>,
}

impl AppCredentialController {
    pub fn new(
        owner: AppOwner,
        app_name: impl Into<String>,
        client: Arc<dyn AppCredentialClient>,
        caches: Arc<EdgeCaches>,
    ) -> Self {
        Self {
            owner,
            app_name: app_name.into(),
            client,
            caches,
        }
    }

    pub async fn generate(
        &self,
        api_products: &[String],
        expires_in_secs: Option<i64>,
    ) -> ControllerResult<App> {
        let app = self
            .client
            .generate(&self.owner, &self.app_name, api_products, expires_in_secs)
            .await?;
        self.evict_app().await;
        self.caches.apps.remove_app_from_cache(&app).await;
        Ok(app)
    }

    pub async fn add_products(
        &self,
        consumer_key: &str,
        api_products: &[String],
    ) -> ControllerResult<AppCredential> {
        let credential = self
            .client
            .add_products(&self.owner, &self.app_name, consumer_key, api_products)
            .await?;
        self.evict_app().await;
        Ok(credential)
    }

    pub async fn delete_credential(&self, consumer_key: &str) -> ControllerResult<AppCredential> {
        let credential = self
            .client
            .delete(&self.owner, &self.app_name, consumer_key)
            .await?;
        self.evict_app().await;
        Ok(credential)
    }

    pub async fn set_status(
        &self,
        consumer_key: &str,
        status: CredentialStatus,
    ) -> ControllerResult<()> {
        self.client
            .set_status(&self.owner, &self.app_name, consumer_key, status)
            .await?;
        self.evict_app().await;
        Ok(())
    }

    async fn evict_app(&self) {
        match owner_view(&self.caches, &self.owner).await {
            Some(view) => view.remove_entities(&[self.app_name.as_str()]).await,
            None => tracing::debug!(
                owner = %self.owner,
                app = %self.app_name,
                "app owner not resolvable from cache, nothing to evict"
            ),
        }
    }
}

use std::sync::Arc;

use edge_cache::{AppCacheByOwner, EdgeCaches};
use edge_core::{App, AppByOwnerClient, AppOwner};

use crate::ControllerResult;

/// Finds the cache view of an owner.
///
/// A developer given by email resolves only through cached developers;
/// `None` means the owner's apps cannot be found in the cache.
pub(crate) async fn owner_view(
    caches: &EdgeCaches,
    owner: &AppOwner,
) -> Option<Arc<AppCacheByOwner>> {
    match owner {
        AppOwner::Developer(developer) => caches.developer_apps.get_app_cache(developer).await,
        AppOwner::Company(_) => Some(caches.app_owners.get_app_cache(owner)),
    }
}

/// App controller scoped to one developer or company, addressed by app
/// name.
pub struct AppByOwnerController {
    owner: AppOwner,
    client: Arc<dyn AppByOwnerClient>,
    caches: Arc<EdgeCaches>,
}

impl AppByOwnerController {
    /// Developer apps; `developer` is the developer UUID or email.
    pub fn for_developer(
        developer: impl Into<String>,
        client: Arc<dyn AppByOwnerClient>,
        caches: Arc<EdgeCaches>,
    ) -> Self {
        Self {
            owner: AppOwner::Developer(developer.into()),
            client,
            caches,
        }
    }

    pub fn for_company(
        company: impl Into<String>,
        client: Arc<dyn AppByOwnerClient>,
        caches: Arc<EdgeCaches>,
    ) -> Self {
        Self {
            owner: AppOwner::Company(company.into()),
            client,
            caches,
        }
    }

    pub fn owner(&self) -> &AppOwner {
        &self.owner
    }

    /// The view to write `apps` into. Apps carry the resolved owner, so an
    /// unresolvable email falls back to it.
    async fn write_view(&self, apps: &[App]) -> Option<Arc<AppCacheByOwner>> {
        if let Some(view) = owner_view(&self.caches, &self.owner).await {
            return Some(view);
        }
        apps.first()
            .map(|app| self.caches.app_owners.get_app_cache(&app.owner))
    }

    async fn save(&self, apps: &[App]) -> ControllerResult<Option<Arc<AppCacheByOwner>>> {
        let view = self.write_view(apps).await;
        if let Some(view) = &view {
            view.save_entities(apps).await?;
        }
        Ok(view)
    }

    pub async fn load(&self, name: &str) -> ControllerResult<App> {
        if let Some(view) = owner_view(&self.caches, &self.owner).await
            && let Some(app) = view.get_entity(name).await
        {
            return Ok(app);
        }
        let app = self.client.load(&self.owner, name).await?;
        self.save(std::slice::from_ref(&app)).await?;
        Ok(app)
    }

    /// Every app of the owner, read from the API unless the owner is
    /// complete in the cache.
    pub async fn get_entities(&self) -> ControllerResult<Vec<App>> {
        if let Some(view) = owner_view(&self.caches, &self.owner).await
            && view.is_all_entities_in_cache()
        {
            return Ok(view.get_entities::<&str>(&[]).await);
        }
        let apps = self.client.list(&self.owner).await?;
        if let Some(view) = self.save(&apps).await? {
            view.all_entities_in_cache(true);
        }
        Ok(apps)
    }

    /// Names of every app of the owner.
    pub async fn get_entity_ids(&self) -> ControllerResult<Vec<String>> {
        let view = owner_view(&self.caches, &self.owner).await;
        if let Some(view) = &view
            && view.id_cache().is_all_ids_in_cache()
        {
            return Ok(view.id_cache().get_ids());
        }
        let names = self.client.list_names(&self.owner).await?;
        if let Some(view) = view {
            // Owner listings are never paginated.
            view.id_cache().save_ids(names.iter().cloned());
            view.id_cache().all_ids_in_cache(true);
        }
        Ok(names)
    }

    pub async fn create(&self, app: &App) -> ControllerResult<App> {
        let created = self.client.create(&self.owner, app).await?;
        self.save(std::slice::from_ref(&created)).await?;
        Ok(created)
    }

    pub async fn update(&self, app: &App) -> ControllerResult<App> {
        let updated = self.client.update(&self.owner, app).await?;
        // App names are immutable, so the write replaces the entry in place.
        self.save(std::slice::from_ref(&updated)).await?;
        Ok(updated)
    }

    pub async fn delete(&self, name: &str) -> ControllerResult<App> {
        let deleted = self.client.delete(&self.owner, name).await?;
        if let Some(view) = owner_view(&self.caches, &self.owner).await {
            view.remove_entities(&[name]).await;
        }
        self.caches.apps.remove_app_from_cache(&deleted).await;
        Ok(deleted)
    }
}

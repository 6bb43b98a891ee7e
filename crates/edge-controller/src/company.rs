use std::sync::Arc;

use edge_cache::EdgeCaches;
use edge_cache::tags::company_tag;
use edge_core::{Company, CompanyClient};

use crate::ControllerResult;
use crate::paging::read_all;

/// Company read-through and write-through controller, keyed by name.
pub struct CompanyController {
    client: Arc<dyn CompanyClient>,
    caches: Arc<EdgeCaches>,
}

impl CompanyController {
    pub fn new(client: Arc<dyn CompanyClient>, caches: Arc<EdgeCaches>) -> Self {
        Self { client, caches }
    }

    pub async fn load(&self, name: &str) -> ControllerResult<Company> {
        if let Some(company) = self.caches.companies.get_entity(name).await {
            return Ok(company);
        }
        let company = self.client.load(name).await?;
        self.caches.companies.save_entities(&[company.clone()]).await;
        Ok(company)
    }

    pub async fn create(&self, company: &Company) -> ControllerResult<Company> {
        let created = self.client.create(company).await?;
        self.caches.companies.save_entities(&[created.clone()]).await;
        Ok(created)
    }

    pub async fn update(&self, company: &Company) -> ControllerResult<Company> {
        let updated = self.client.update(company).await?;
        self.caches.companies.remove_entities(&[updated.name.as_str()]).await;
        self.caches.companies.save_entities(&[updated.clone()]).await;
        Ok(updated)
    }

    /// Deletes a company with its cached apps and membership.
    pub async fn delete(&self, name: &str) -> ControllerResult<Company> {
        let deleted = self.client.delete(name).await?;
        self.caches.companies.remove_entities(&[name]).await;
        self.caches.company_memberships.remove_membership(name).await;
        self.caches
            .developer_companies
            .invalidate(&[company_tag(name)])
            .await;
        self.caches.apps.remove_owner(name).await;
        self.caches.app_owners.remove_app_cache(name);
        Ok(deleted)
    }

    pub async fn get_entities(&self) -> ControllerResult<Vec<Company>> {
        let cache = &self.caches.companies;
        if cache.is_all_entities_in_cache() {
            return Ok(cache.get_entities::<&str>(&[]).await);
        }
        let client = Arc::clone(&self.client);
        let companies = read_all(move |pager| {
            let client = Arc::clone(&client);
            async move { client.list(pager.as_ref()).await }
        })
        .await?;
        cache.save_entities(&companies).await;
        cache.all_entities_in_cache(true);
        Ok(companies)
    }

    pub async fn get_entity_ids(&self) -> ControllerResult<Vec<String>> {
        let ids = self.caches.companies.id_cache();
        if ids.is_all_ids_in_cache() {
            return Ok(ids.get_ids());
        }
        let client = Arc::clone(&self.client);
        let names = read_all(move |pager| {
            let client = Arc::clone(&client);
            async move { client.list_ids(pager.as_ref()).await }
        })
        .await?;
        ids.save_ids(names.iter().cloned());
        ids.all_ids_in_cache(true);
        Ok(names)
    }
}

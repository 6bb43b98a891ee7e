//! In-memory stand-in for the management API that counts calls.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use edge_cache::{CacheConfig, EdgeCaches};
use edge_core::{
    App, AppByOwnerClient, AppClient, AppCredential, AppCredentialClient, AppGroupMembership,
    AppOwner, Company, CompanyClient, CompanyMembership, CredentialProduct, CredentialStatus,
    Developer, DeveloperClient, DeveloperCompaniesClient, DeveloperStatus, EdgeError, EdgeResult,
    Entity, Page, Pager, TeamMembersClient,
};
use parking_lot::Mutex;

#[derive(Default)]
struct State {
    developers: BTreeMap<String, Developer>,
    companies: BTreeMap<String, Company>,
    apps: BTreeMap<String, App>,
    company_members: BTreeMap<String, CompanyMembership>,
    appgroup_members: BTreeMap<String, AppGroupMembership>,
    next_id: usize,
}

impl State {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }

    fn developer(&self, id_or_email: &str) -> Option<&Developer> {
        self.developers
            .values()
            .find(|d| d.developer_id == id_or_email || d.email == id_or_email)
    }

    /// The owner as the API stores it: developers by UUID.
    fn resolve_owner(&self, owner: &AppOwner) -> EdgeResult<AppOwner> {
        match owner {
            AppOwner::Developer(id) => self
                .developer(id)
                .map(|d| AppOwner::Developer(d.developer_id.clone()))
                .ok_or_else(|| EdgeError::not_found("developer", id.as_str())),
            AppOwner::Company(name) => {
                if self.companies.contains_key(name) {
                    Ok(owner.clone())
                } else {
                    Err(EdgeError::not_found("company", name.as_str()))
                }
            }
        }
    }

    fn app_mut(&mut self, owner: &AppOwner, name: &str) -> EdgeResult<&mut App> {
        let owner = self.resolve_owner(owner)?;
        self.apps
            .values_mut()
            .find(|a| a.owner == owner && a.name == name)
            .ok_or_else(|| EdgeError::not_found("app", name))
    }
}

/// Fake management API.
pub struct FakeEdge {
    state: Mutex<State>,
    calls: Mutex<HashMap<&'static str, usize>>,
    page_size: Option<usize>,
}

impl FakeEdge {
    pub fn new() -> Arc<Self> {
        Self::with_page_size(None)
    }

    pub fn with_page_size(page_size: Option<usize>) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(State::default()),
            calls: Mutex::new(HashMap::new()),
            page_size,
        })
    }

    /// Number of calls made to `op`, e.g. `"developer.load"`.
    pub fn calls(&self, op: &str) -> usize {
        self.calls.lock().get(op).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().values().sum()
    }

    fn record(&self, op: &'static str) {
        *self.calls.lock().entry(op).or_default() += 1;
    }

    pub fn add_developer(&self, id: &str, email: &str) -> Developer {
        let developer = Developer::new(id, email);
        self.state
            .lock()
            .developers
            .insert(id.to_string(), developer.clone());
        developer
    }

    pub fn add_company(&self, name: &str) -> Company {
        let company = Company::new(name);
        self.state
            .lock()
            .companies
            .insert(name.to_string(), company.clone());
        company
    }

    pub fn add_app(&self, id: &str, name: &str, owner: AppOwner) -> App {
        let app = App::new(id, name, owner);
        self.state.lock().apps.insert(id.to_string(), app.clone());
        app
    }

    pub fn add_company_members(&self, team: &str, emails: &[&str]) {
        let mut state = self.state.lock();
        let membership = state.company_members.entry(team.to_string()).or_default();
        for email in emails {
            membership.add_member(*email, None);
        }
    }

    pub fn add_appgroup_member(&self, team: &str, email: &str, roles: &[&str]) {
        self.state
            .lock()
            .appgroup_members
            .entry(team.to_string())
            .or_default()
            .add_member(email, roles.iter().map(|r| r.to_string()).collect());
    }

    /// Edits a developer behind the cache's back.
    pub fn rename_developer(&self, id: &str, first_name: &str) {
        if let Some(d) = self.state.lock().developers.get_mut(id) {
            d.first_name = first_name.to_string();
        }
    }

    fn page<T: Clone>(&self, items: Vec<(String, T)>, pager: Option<&Pager>) -> Page<T> {
        let start = pager
            .and_then(|p| p.start_key.as_deref())
            .map(|key| items.iter().position(|(k, _)| k.as_str() >= key).unwrap_or(items.len()))
            .unwrap_or(0);
        let limit = pager
            .and_then(|p| p.limit)
            .or(self.page_size)
            .unwrap_or(usize::MAX);
        let rest = &items[start..];
        let taken: Vec<T> = rest.iter().take(limit).map(|(_, v)| v.clone()).collect();
        let next_start_key = rest.get(limit).map(|(k, _)| k.clone());
        Page {
            items: taken,
            next_start_key,
        }
    }
}

/// A bundle with an in-process persistent tier.
pub fn caches() -> Arc<EdgeCaches> {
    Arc::new(EdgeCaches::in_memory(&CacheConfig::default()))
}

#[async_trait]
impl DeveloperClient for FakeEdge {
    async fn load(&self, id_or_email: &str) -> EdgeResult<Developer> {
        self.record("developer.load");
        self.state
            .lock()
            .developer(id_or_email)
            .cloned()
            .ok_or_else(|| EdgeError::not_found("developer", id_or_email))
    }

    async fn create(&self, developer: &Developer) -> EdgeResult<Developer> {
        self.record("developer.create");
        let mut state = self.state.lock();
        let mut created = developer.clone();
        if created.developer_id.is_empty() {
            created.developer_id = state.next_id("generated-dev");
        }
        state
            .developers
            .insert(created.developer_id.clone(), created.clone());
        Ok(created)
    }

    async fn update(&self, developer: &Developer) -> EdgeResult<Developer> {
        self.record("developer.update");
        let mut state = self.state.lock();
        let id = state
            .developer(&developer.developer_id)
            .map(|d| d.developer_id.clone())
            .ok_or_else(|| EdgeError::not_found("developer", developer.developer_id.as_str()))?;
        state.developers.insert(id, developer.clone());
        Ok(developer.clone())
    }

    async fn delete(&self, id_or_email: &str) -> EdgeResult<Developer> {
        self.record("developer.delete");
        let mut state = self.state.lock();
        let id = state
            .developer(id_or_email)
            .map(|d| d.developer_id.clone())
            .ok_or_else(|| EdgeError::not_found("developer", id_or_email))?;
        state
            .developers
            .remove(&id)
            .ok_or_else(|| EdgeError::not_found("developer", id_or_email))
    }

    async fn set_status(&self, id_or_email: &str, status: DeveloperStatus) -> EdgeResult<()> {
        self.record("developer.set_status");
        let mut state = self.state.lock();
        let id = state
            .developer(id_or_email)
            .map(|d| d.developer_id.clone())
            .ok_or_else(|| EdgeError::not_found("developer", id_or_email))?;
        if let Some(d) = state.developers.get_mut(&id) {
            d.status = status;
        }
        Ok(())
    }

    async fn list(&self, pager: Option<&Pager>) -> EdgeResult<Page<Developer>> {
        self.record("developer.list");
        let items = self
            .state
            .lock()
            .developers
            .values()
            .map(|d| (d.email.clone(), d.clone()))
            .collect::<BTreeMap<_, _>>()
            .into_iter()
            .collect();
        Ok(self.page(items, pager))
    }

    async fn list_ids(&self, pager: Option<&Pager>) -> EdgeResult<Page<String>> {
        self.record("developer.list_ids");
        let mut emails: Vec<String> = self
            .state
            .lock()
            .developers
            .values()
            .map(|d| d.email.clone())
            .collect();
        emails.sort();
        let items = emails.into_iter().map(|e| (e.clone(), e)).collect();
        Ok(self.page(items, pager))
    }
}

#[async_trait]
impl CompanyClient for FakeEdge {
    async fn load(&self, name: &str) -> EdgeResult<Company> {
        self.record("company.load");
        self.state
            .lock()
            .companies
            .get(name)
            .cloned()
            .ok_or_else(|| EdgeError::not_found("company", name))
    }

    async fn create(&self, company: &Company) -> EdgeResult<Company> {
        self.record("company.create");
        self.state
            .lock()
            .companies
            .insert(company.name.clone(), company.clone());
        Ok(company.clone())
    }

    async fn update(&self, company: &Company) -> EdgeResult<Company> {
        self.record("company.update");
        let mut state = self.state.lock();
        if !state.companies.contains_key(&company.name) {
            return Err(EdgeError::not_found("company", company.name.as_str()));
        }
        state
            .companies
            .insert(company.name.clone(), company.clone());
        Ok(company.clone())
    }

    async fn delete(&self, name: &str) -> EdgeResult<Company> {
        self.record("company.delete");
        let mut state = self.state.lock();
        state.company_members.remove(name);
        state
            .companies
            .remove(name)
            .ok_or_else(|| EdgeError::not_found("company", name))
    }

    async fn list(&self, pager: Option<&Pager>) -> EdgeResult<Page<Company>> {
        self.record("company.list");
        let items = self
            .state
            .lock()
            .companies
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Ok(self.page(items, pager))
    }

    async fn list_ids(&self, pager: Option<&Pager>) -> EdgeResult<Page<String>> {
        self.record("company.list_ids");
        let items = self
            .state
            .lock()
            .companies
            .keys()
            .map(|k| (k.clone(), k.clone()))
            .collect();
        Ok(self.page(items, pager))
    }
}

#[async_trait]
impl AppClient for FakeEdge {
    async fn load(&self, app_id: &str) -> EdgeResult<App> {
        self.record("app.load");
        self.state
            .lock()
            .apps
            .get(app_id)
            .cloned()
            .ok_or_else(|| EdgeError::not_found(App::ENTITY_TYPE, app_id))
    }

    async fn list(&self, pager: Option<&Pager>) -> EdgeResult<Page<App>> {
        self.record("app.list");
        let items = self
            .state
            .lock()
            .apps
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Ok(self.page(items, pager))
    }

    async fn list_ids(&self, pager: Option<&Pager>) -> EdgeResult<Page<String>> {
        self.record("app.list_ids");
        let items = self
            .state
            .lock()
            .apps
            .keys()
            .map(|k| (k.clone(), k.clone()))
            .collect();
        Ok(self.page(items, pager))
    }
}

#[async_trait]
impl AppByOwnerClient for FakeEdge {
    async fn load(&self, owner: &AppOwner, name: &str) -> EdgeResult<App> {
        self.record("owner_app.load");
        let mut state = self.state.lock();
        state.app_mut(owner, name).map(|app| app.clone())
    }

    async fn create(&self, owner: &AppOwner, app: &App) -> EdgeResult<App> {
        self.record("owner_app.create");
        let mut state = self.state.lock();
        let owner = state.resolve_owner(owner)?;
        let mut created = app.clone();
        created.owner = owner;
        if created.app_id.is_empty() {
            created.app_id = state.next_id("generated-app");
        }
        state.apps.insert(created.app_id.clone(), created.clone());
        Ok(created)
    }

    async fn update(&self, owner: &AppOwner, app: &App) -> EdgeResult<App> {
        self.record("owner_app.update");
        let mut state = self.state.lock();
        let stored = state.app_mut(owner, &app.name)?;
        stored.display_name = app.display_name.clone();
        stored.callback_url = app.callback_url.clone();
        stored.attributes = app.attributes.clone();
        Ok(stored.clone())
    }

    async fn delete(&self, owner: &AppOwner, name: &str) -> EdgeResult<App> {
        self.record("owner_app.delete");
        let mut state = self.state.lock();
        let app_id = state.app_mut(owner, name)?.app_id.clone();
        state
            .apps
            .remove(&app_id)
            .ok_or_else(|| EdgeError::not_found("app", name))
    }

    async fn list(&self, owner: &AppOwner) -> EdgeResult<Vec<App>> {
        self.record("owner_app.list");
        let state = self.state.lock();
        let owner = state.resolve_owner(owner)?;
        Ok(state
            .apps
            .values()
            .filter(|a| a.owner == owner)
            .cloned()
            .collect())
    }

    async fn list_names(&self, owner: &AppOwner) -> EdgeResult<Vec<String>> {
        self.record("owner_app.list_names");
        let state = self.state.lock();
        let owner = state.resolve_owner(owner)?;
        Ok(state
            .apps
            .values()
            .filter(|a| a.owner == owner)
            .map(|a| a.name.clone())
            .collect())
    }
}

#[async_trait]
impl AppCredentialClient for FakeEdge {
    async fn generate(
        &self,
        owner: &AppOwner,
        app_name: &str,
        api_products: &[String],
        _expires_in_secs: Option<i64>,
    ) -> EdgeResult<App> {
        self.record("credential.generate");
        let mut state = self.state.lock();
        let key = state.next_id("key");
        let app = state.app_mut(owner, app_name)?;
        app.credentials.push(AppCredential {
            consumer_key: key.clone(),
            consumer_secret: format!("{key}-secret"),
            status: CredentialStatus::Approved,
            api_products: api_products
                .iter()
                .map(|p| CredentialProduct {
                    api_product: p.clone(),
                    status: CredentialStatus::Approved,
                })
                .collect(),
            issued_at: None,
            expires_at: None,
        });
        Ok(app.clone())
    }

    async fn add_products(
        &self,
        owner: &AppOwner,
        app_name: &str,
        consumer_key: &str,
        api_products: &[String],
    ) -> EdgeResult<AppCredential> {
        self.record("credential.add_products");
        let mut state = self.state.lock();
        let app = state.app_mut(owner, app_name)?;
        let credential = app
            .credentials
            .iter_mut()
            .find(|c| c.consumer_key == consumer_key)
            .ok_or_else(|| EdgeError::not_found("credential", consumer_key))?;
        credential
            .api_products
            .extend(api_products.iter().map(|p| CredentialProduct {
                api_product: p.clone(),
                status: CredentialStatus::Approved,
            }));
        Ok(credential.clone())
    }

    async fn delete(
        &self,
        owner: &AppOwner,
        app_name: &str,
        consumer_key: &str,
    ) -> EdgeResult<AppCredential> {
        self.record("credential.delete");
        let mut state = self.state.lock();
        let app = state.app_mut(owner, app_name)?;
        let index = app
            .credentials
            .iter()
            .position(|c| c.consumer_key == consumer_key)
            .ok_or_else(|| EdgeError::not_found("credential", consumer_key))?;
        Ok(app.credentials.remove(index))
    }

    async fn set_status(
        &self,
        owner: &AppOwner,
        app_name: &str,
        consumer_key: &str,
        status: CredentialStatus,
    ) -> EdgeResult<()> {
        self.record("credential.set_status");
        let mut state = self.state.lock();
        let app = state.app_mut(owner, app_name)?;
        let credential = app
            .credentials
            .iter_mut()
            .find(|c| c.consumer_key == consumer_key)
            .ok_or_else(|| EdgeError::not_found("credential", consumer_key))?;
        credential.status = status;
        Ok(())
    }
}

#[async_trait]
impl TeamMembersClient<CompanyMembership> for FakeEdge {
    async fn get_members(&self, team: &str) -> EdgeResult<CompanyMembership> {
        self.record("company_members.get");
        self.state
            .lock()
            .company_members
            .get(team)
            .cloned()
            .ok_or_else(|| EdgeError::not_found("company", team))
    }

    async fn set_members(
        &self,
        team: &str,
        membership: &CompanyMembership,
    ) -> EdgeResult<CompanyMembership> {
        self.record("company_members.set");
        let mut state = self.state.lock();
        let stored = state.company_members.entry(team.to_string()).or_default();
        for (email, role) in membership.members() {
            stored.add_member(email.clone(), role.clone());
        }
        // Like the real API, only the submitted members come back.
        Ok(membership.clone())
    }

    async fn remove_member(&self, team: &str, email: &str) -> EdgeResult<()> {
        self.record("company_members.remove");
        if let Some(m) = self.state.lock().company_members.get_mut(team) {
            m.remove_member(email);
        }
        Ok(())
    }
}

#[async_trait]
impl TeamMembersClient<AppGroupMembership> for FakeEdge {
    async fn get_members(&self, team: &str) -> EdgeResult<AppGroupMembership> {
        self.record("appgroup_members.get");
        self.state
            .lock()
            .appgroup_members
            .get(team)
            .cloned()
            .ok_or_else(|| EdgeError::not_found("appgroup", team))
    }

    async fn set_members(
        &self,
        team: &str,
        membership: &AppGroupMembership,
    ) -> EdgeResult<AppGroupMembership> {
        self.record("appgroup_members.set");
        let mut state = self.state.lock();
        let stored = state.appgroup_members.entry(team.to_string()).or_default();
        for (email, roles) in membership.members() {
            stored.add_member(email.clone(), roles.clone());
        }
        Ok(membership.clone())
    }

    async fn remove_member(&self, team: &str, email: &str) -> EdgeResult<()> {
        self.record("appgroup_members.remove");
        if let Some(m) = self.state.lock().appgroup_members.get_mut(team) {
            m.remove_member(email);
        }
        Ok(())
    }
}

#[async_trait]
impl DeveloperCompaniesClient for FakeEdge {
    async fn get_companies(&self, developer_email: &str) -> EdgeResult<Vec<String>> {
        self.record("developer_companies.get");
        Ok(self
            .state
            .lock()
            .company_members
            .iter()
            .filter(|(_, m)| m.contains(developer_email))
            .map(|(team, _)| team.clone())
            .collect())
    }
}

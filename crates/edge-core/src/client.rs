//! Remote collaborator contracts.
//!
//! These traits describe the calls the cache layer needs from the management
//! API. The HTTP client that implements them lives outside this workspace;
//! tests implement them in memory.

use async_trait::async_trait;

use crate::EdgeResult;
use crate::app::{App, AppCredential, AppOwner, CredentialStatus};
use crate::company::Company;
use crate::developer::{Developer, DeveloperStatus};
use crate::membership::MembershipObject;

/// Cursor for paginated listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pager {
    /// Identifier to start the page at; `None` starts at the beginning.
    pub start_key: Option<String>,
    /// Maximum number of items in the page; `None` lets the API decide.
    pub limit: Option<usize>,
}

impl Pager {
    pub fn new(limit: usize) -> Self {
        Self {
            start_key: None,
            limit: Some(limit),
        }
    }

    pub fn starting_at(mut self, start_key: impl Into<String>) -> Self {
        self.start_key = Some(start_key.into());
        self
    }
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Start key of the following page; `None` when this is the last page.
    pub next_start_key: Option<String>,
}

impl<T> Page<T> {
    /// A single page holding the complete listing.
    pub fn complete(items: Vec<T>) -> Self {
        Self {
            items,
            next_start_key: None,
        }
    }

    pub fn is_last(&self) -> bool {
        self.next_start_key.is_none()
    }
}

/// Developer endpoints. Every `id_or_email` accepts the UUID or the email.
#[async_trait]
pub trait DeveloperClient: Send + Sync {
    async fn load(&self, id_or_email: &str) -> EdgeResult<Developer>;

    async fn create(&self, developer: &Developer) -> EdgeResult<Developer>;

    async fn update(&self, developer: &Developer) -> EdgeResult<Developer>;

    /// Deletes a developer and returns the deleted entity.
    async fn delete(&self, id_or_email: &str) -> EdgeResult<Developer>;

    async fn set_status(&self, id_or_email: &str, status: DeveloperStatus) -> EdgeResult<()>;

    async fn list(&self, pager: Option<&Pager>) -> EdgeResult<Page<Developer>>;

    /// Lists developer emails.
    async fn list_ids(&self, pager: Option<&Pager>) -> EdgeResult<Page<String>>;
}

/// Company endpoints, keyed by company name.
#[async_trait]
pub trait CompanyClient: Send + Sync {
    async fn load(&self, name: &str) -> EdgeResult<Company>;

    async fn create(&self, company: &Company) -> EdgeResult<Company>;

    async fn update(&self, company: &Company) -> EdgeResult<Company>;

    async fn delete(&self, name: &str) -> EdgeResult<Company>;

    async fn list(&self, pager: Option<&Pager>) -> EdgeResult<Page<Company>>;

    async fn list_ids(&self, pager: Option<&Pager>) -> EdgeResult<Page<String>>;
}

/// Organization-wide app endpoints, keyed by app UUID.
#[async_trait]
pub trait AppClient: Send + Sync {
    async fn load(&self, app_id: &str) -> EdgeResult<App>;

    /// Lists every app, credentials included.
    async fn list(&self, pager: Option<&Pager>) -> EdgeResult<Page<App>>;

    async fn list_ids(&self, pager: Option<&Pager>) -> EdgeResult<Page<String>>;
}

/// App endpoints scoped to one owner, keyed by app name.
#[async_trait]
pub trait AppByOwnerClient: Send + Sync {
    async fn load(&self, owner: &AppOwner, name: &str) -> EdgeResult<App>;

    async fn create(&self, owner: &AppOwner, app: &App) -> EdgeResult<App>;

    async fn update(&self, owner: &AppOwner, app: &App) -> EdgeResult<App>;

    async fn delete(&self, owner: &AppOwner, name: &str) -> EdgeResult<App>;

    /// Lists all apps of the owner. Owner listings are never paginated.
    async fn list(&self, owner: &AppOwner) -> EdgeResult<Vec<App>>;

    async fn list_names(&self, owner: &AppOwner) -> EdgeResult<Vec<String>>;
}

/// Credential endpoints of one app.
#[async_trait]
pub trait AppCredentialClient: Send + Sync {
    /// Issues a new credential and returns the updated app.
    async fn generate(
        &self,
        owner: &AppOwner,
        app_name: &str,
        api_products: &[String],
        expires_in_secs: Option<i64>,
    ) -> EdgeResult<App>;

    async fn add_products(
        &self,
        owner: &AppOwner,
        app_name: &str,
        consumer_key: &str,
        api_products: &[String],
    ) -> EdgeResult<AppCredential>;

    async fn delete(&self, owner: &AppOwner, app_name: &str, consumer_key: &str) -> EdgeResult<AppCredential>;

    async fn set_status(
        &self,
        owner: &AppOwner,
        app_name: &str,
        consumer_key: &str,
        status: CredentialStatus,
    ) -> EdgeResult<()>;
}

/// Whole-membership endpoints of a team.
#[async_trait]
pub trait TeamMembersClient<M: MembershipObject>: Send + Sync {
    async fn get_members(&self, team: &str) -> EdgeResult<M>;

    /// Adds or updates the given members. The response is not guaranteed to
    /// contain the complete resulting membership.
    async fn set_members(&self, team: &str, membership: &M) -> EdgeResult<M>;

    async fn remove_member(&self, team: &str, email: &str) -> EdgeResult<()>;
}

/// Reverse membership lookup.
#[async_trait]
pub trait DeveloperCompaniesClient: Send + Sync {
    /// Names of the companies the developer is a member of.
    async fn get_companies(&self, developer_email: &str) -> EdgeResult<Vec<String>>;
}

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::attributes::Attributes;
use crate::entity::Entity;

/// Developer account status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeveloperStatus {
    #[default]
    Active,
    Inactive,
}

/// A developer registered in the organization.
///
/// Developers have two unique identifiers: the opaque `developer_id` (a UUID
/// assigned by the API) and the `email` address. The API accepts either.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Developer {
    pub developer_id: String,
    pub email: String,
    pub user_name: String,
    pub first_name: String,
    pub last_name: String,
    pub status: DeveloperStatus,
    pub organization_name: Option<String>,
    /// Names of the companies the developer is a member of.
    pub companies: Vec<String>,
    /// Names of the developer's apps.
    pub apps: Vec<String>,
    pub attributes: Attributes,
    pub created_at: Option<OffsetDateTime>,
    pub last_modified_at: Option<OffsetDateTime>,
}

impl Developer {
    /// Creates an active developer with no apps, companies or attributes.
    pub fn new(developer_id: impl Into<String>, email: impl Into<String>) -> Self {
        let email = email.into();
        Self {
            developer_id: developer_id.into(),
            user_name: email.split('@').next().unwrap_or_default().to_string(),
            email,
            first_name: String::new(),
            last_name: String::new(),
            status: DeveloperStatus::Active,
            organization_name: None,
            companies: Vec::new(),
            apps: Vec::new(),
            attributes: Attributes::new(),
            created_at: None,
            last_modified_at: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == DeveloperStatus::Active
    }
}

impl Entity for Developer {
    const ENTITY_TYPE: &'static str = "developer";

    fn id(&self) -> &str {
        &self.developer_id
    }
}

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::attributes::Attributes;
use crate::entity::Entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompanyStatus {
    #[default]
    Active,
    Inactive,
}

/// A company (exposed as a "team"); identified by its name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub name: String,
    pub display_name: String,
    pub status: CompanyStatus,
    pub organization: Option<String>,
    /// Names of the company's apps.
    pub apps: Vec<String>,
    pub attributes: Attributes,
    pub created_at: Option<OffsetDateTime>,
    pub last_modified_at: Option<OffsetDateTime>,
}

impl Company {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            display_name: name.clone(),
            name,
            status: CompanyStatus::Active,
            organization: None,
            apps: Vec::new(),
            attributes: Attributes::new(),
            created_at: None,
            last_modified_at: None,
        }
    }
}

impl Entity for Company {
    const ENTITY_TYPE: &'static str = "company";

    fn id(&self) -> &str {
        &self.name
    }
}

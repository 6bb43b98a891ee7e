//! Apps, their owners and credentials.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::attributes::Attributes;
use crate::entity::Entity;

/// The developer or company an app belongs to.
///
/// App names are unique only within one owner.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppOwner {
    /// Developer id (UUID). When an owner is built from caller input this may
    /// also hold the developer's email; apps returned by the API always carry
    /// the UUID.
    Developer(String),
    /// Company name.
    Company(String),
}

impl AppOwner {
    pub fn id(&self) -> &str {
        match self {
            Self::Developer(id) | Self::Company(id) => id,
        }
    }

    pub fn app_type(&self) -> AppType {
        match self {
            Self::Developer(_) => AppType::DeveloperApp,
            Self::Company(_) => AppType::CompanyApp,
        }
    }
}

impl fmt::Display for AppOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Developer(id) => write!(f, "developer:{id}"),
            Self::Company(name) => write!(f, "company:{name}"),
        }
    }
}

/// The kind of app, derived from its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppType {
    DeveloperApp,
    CompanyApp,
}

impl AppType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DeveloperApp => "developer_app",
            Self::CompanyApp => "company_app",
        }
    }
}

impl fmt::Display for AppType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing an unrecognized app type name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown app type: {0}")]
pub struct UnknownAppType(pub String);

impl FromStr for AppType {
    type Err = UnknownAppType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "developer_app" => Ok(Self::DeveloperApp),
            "company_app" => Ok(Self::CompanyApp),
            other => Err(UnknownAppType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppStatus {
    #[default]
    Approved,
    Revoked,
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialStatus {
    #[default]
    Approved,
    Revoked,
    Pending,
}

/// An API product attached to a credential, with its approval status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialProduct {
    pub api_product: String,
    pub status: CredentialStatus,
}

/// A consumer key/secret pair issued to an app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppCredential {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub status: CredentialStatus,
    pub api_products: Vec<CredentialProduct>,
    pub issued_at: Option<OffsetDateTime>,
    /// `None` means the credential never expires.
    pub expires_at: Option<OffsetDateTime>,
}

/// An app registered by a developer or a company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct App {
    /// UUID assigned by the API; unique across the organization.
    pub app_id: String,
    /// Unique within the owner only.
    pub name: String,
    pub display_name: String,
    pub owner: AppOwner,
    pub status: AppStatus,
    pub callback_url: Option<String>,
    pub credentials: Vec<AppCredential>,
    pub api_products: Vec<String>,
    pub attributes: Attributes,
    pub created_at: Option<OffsetDateTime>,
    pub last_modified_at: Option<OffsetDateTime>,
}

impl App {
    pub fn new(app_id: impl Into<String>, name: impl Into<String>, owner: AppOwner) -> Self {
        let name = name.into();
        Self {
            app_id: app_id.into(),
            display_name: name.clone(),
            name,
            owner,
            status: AppStatus::Approved,
            callback_url: None,
            credentials: Vec::new(),
            api_products: Vec::new(),
            attributes: Attributes::new(),
            created_at: None,
            last_modified_at: None,
        }
    }

    pub fn app_type(&self) -> AppType {
        self.owner.app_type()
    }

    /// Looks up a credential by consumer key.
    pub fn credential(&self, consumer_key: &str) -> Option<&AppCredential> {
        self.credentials.iter().find(|c| c.consumer_key == consumer_key)
    }
}

impl Entity for App {
    const ENTITY_TYPE: &'static str = "app";

    fn id(&self) -> &str {
        &self.app_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_type_round_trip_names() {
        assert_eq!("developer_app".parse::<AppType>().unwrap(), AppType::DeveloperApp);
        assert_eq!("company_app".parse::<AppType>().unwrap(), AppType::CompanyApp);
        assert_eq!(AppType::CompanyApp.to_string(), "company_app");
    }

    #[test]
    fn test_unknown_app_type() {
        let err = "bogus_type".parse::<AppType>().unwrap_err();
        assert_eq!(err, UnknownAppType("bogus_type".into()));
        assert_eq!(err.to_string(), "Unknown app type: bogus_type");
    }

    #[test]
    fn test_owner_derives_type() {
        let app = App::new("u1", "a", AppOwner::Company("acme".into()));
        assert_eq!(app.app_type(), AppType::CompanyApp);
        assert_eq!(app.owner.id(), "acme");
        assert_eq!(app.owner.to_string(), "company:acme");
    }

    #[test]
    fn test_serde_shape() {
        let app = App::new("u1", "a", AppOwner::Developer("d1".into()));
        let json = serde_json::to_value(&app).unwrap();
        assert_eq!(json["owner"]["Developer"], "d1");
        assert_eq!(json["status"], "approved");
    }
}

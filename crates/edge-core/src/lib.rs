//! # edge-core
//!
//! Value types and collaborator contracts shared by the Apigee Edge cache
//! layer.
//!
//! This crate does not talk to the network and does not cache anything. It
//! defines:
//! - The entities the management API hands out ([`Developer`], [`Company`],
//!   [`App`] and their credentials) and the [`Entity`] trait the caches key on
//! - Team membership values ([`CompanyMembership`], [`AppGroupMembership`])
//! - The remote client traits a caller's environment implements
//!   ([`DeveloperClient`], [`AppByOwnerClient`], [`TeamMembersClient`], ...)
//! - [`EdgeError`], the error type every remote call returns
//!
//! ## Example
//!
//! ```ignore
//! use edge_core::{DeveloperClient, EdgeError, Developer};
//!
//! async fn load(client: &dyn DeveloperClient, email: &str) -> Result<Developer, EdgeError> {
//!     client.load(email).await
//! }
//! ```

pub mod app;
pub mod attributes;
pub mod client;
pub mod company;
pub mod developer;
pub mod email;
pub mod entity;
mod error;
pub mod membership;

pub use app::{App, AppCredential, AppOwner, AppStatus, AppType, CredentialProduct, CredentialStatus, UnknownAppType};
pub use attributes::{AttributeKind, AttributeMapping, AttributeValue, Attributes, FieldMapping};
pub use client::{
    AppByOwnerClient, AppClient, AppCredentialClient, CompanyClient, DeveloperClient,
    DeveloperCompaniesClient, Page, Pager, TeamMembersClient,
};
pub use company::{Company, CompanyStatus};
pub use developer::{Developer, DeveloperStatus};
pub use email::is_email;
pub use entity::Entity;
pub use error::EdgeError;
pub use membership::{AppGroupMembership, CompanyMembership, MembershipObject};

/// Type alias for results of remote calls.
pub type EdgeResult<T> = Result<T, EdgeError>;

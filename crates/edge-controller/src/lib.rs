//! # edge-controller
//!
//! Controllers that put the caches of `edge-cache` in front of the
//! management API.
//!
//! Reads try the cache first, call the remote client on a miss and cache
//! the result. Writes go to the remote client first and then evict the
//! affected entries; a cached value is never patched from a write response.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use edge_cache::{CacheConfig, EdgeCaches};
//! use edge_controller::DeveloperController;
//!
//! let caches = Arc::new(EdgeCaches::in_memory(&CacheConfig::default()));
//! let developers = DeveloperController::new(client, caches);
//! let developer = developers.load("jane@example.com").await?;
//! ```

mod app;
mod app_by_owner;
mod app_credential;
mod company;
mod developer;
mod error;
mod members;
mod paging;
mod team_membership;

pub use app::AppController;
pub use app_by_owner::AppByOwnerController;
pub use app_credential::AppCredentialController;
pub use company::CompanyController;
pub use developer::DeveloperController;
pub use error::ControllerError;
pub use members::{AppGroupMembersController, CompanyMembersController, MembersController};
pub use team_membership::TeamMembershipManager;

/// Type alias for controller results.
pub type ControllerResult<T> = Result<T, ControllerError>;

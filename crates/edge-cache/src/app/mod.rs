//! App caches.
//!
//! Apps have two identifier spaces: the organization-wide UUID and a name
//! that is unique only within the owning developer or company.
//!
//! - [`AppCache`] stores apps by UUID and keeps a name → UUID map per owner
//! - [`AppCacheByOwner`] is the name-addressed view of one owner's apps
//! - [`DeveloperAppCache`] accepts a developer email or UUID as the owner

mod by_owner;
mod cache;
mod developer;

pub use by_owner::{AppCacheByOwner, AppCacheByOwnerFactory};
pub use cache::{AppCache, AppCacheHooks, AppNameMap};
pub use developer::DeveloperAppCache;

//! # edge-cache
//!
//! Tagged, multi-tier caches for Apigee Edge developers, companies, apps and
//! team memberships.
//!
//! ## Overview
//!
//! - [`CacheBackend`]: tagged key-value store (memory, Redis, null)
//! - [`EntityIdCache`] / [`EntityCache`]: entity values plus the set of known
//!   ids and a completeness flag
//! - [`DeveloperCache`]: developers reachable by UUID or email
//! - [`AppCache`], [`AppCacheByOwner`], [`DeveloperAppCache`]: apps by UUID,
//!   or by name within one owner
//! - [`MembershipObjectCache`]: whole team memberships over a memory tier
//!   and a persistent tier
//! - [`EdgeCaches`]: all of the above, built from [`CacheConfig`]
//!
//! ## Example
//!
//! ```ignore
//! use edge_cache::{CacheConfig, EdgeCaches};
//!
//! let config = edge_cache::config::loader::load_config(None)?;
//! let caches = EdgeCaches::from_config(&config).await;
//!
//! if let Some(developer) = caches.developers.get_entity("jane@example.com").await {
//!     println!("{}", developer.developer_id);
//! }
//! ```

pub mod app;
pub mod backend;
mod codec;
pub mod config;
pub mod developer;
pub mod developer_companies;
pub mod entity_cache;
mod error;
pub mod id_cache;
pub mod membership;
pub mod metrics;
pub mod observability;
pub mod registry;
pub mod tags;

pub use app::{AppCache, AppCacheByOwner, AppCacheByOwnerFactory, AppCacheHooks, AppNameMap, DeveloperAppCache};
pub use backend::{
    BackendCapabilities, CacheBackend, CacheExpiry, CacheItem, CacheStats, DynBackend,
    MemoryBackend, NullBackend, RedisBackend, create_persistent_backend,
};
pub use config::{CacheConfig, LoggingConfig, MembershipCacheConfig, RedisConfig};
pub use developer::{DeveloperCache, DeveloperCacheHooks};
pub use developer_companies::DeveloperCompaniesCache;
pub use entity_cache::{DefaultHooks, EntityCache, EntityCacheHooks, PreparedItem};
pub use error::CacheError;
pub use observability::{LogLevelHandle, init_tracing_from_config};
pub use id_cache::{EntityIdCache, IdExtractor};
pub use membership::{
    AppGroupMembershipObjectCache, CompanyMembershipObjectCache, MembershipExpiration,
    MembershipObjectCache,
};
pub use registry::{CompanyCache, EdgeCaches};

/// Type alias for cache operation results.
pub type CacheResult<T> = Result<T, CacheError>;

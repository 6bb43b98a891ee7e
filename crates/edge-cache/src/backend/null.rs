use std::sync::Arc;

use async_trait::async_trait;

use super::{BackendCapabilities, CacheBackend, CacheExpiry};

/// A backend that stores nothing.
///
/// Stands in for a tier that is switched off, and for persistent stores that
/// cannot invalidate by tag.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullBackend;

#[async_trait]
impl CacheBackend for NullBackend {
    async fn get(&self, _key: &str) -> Option<Arc<Vec<u8>>> {
        None
    }

    async fn set(&self, _key: &str, _value: Vec<u8>, _expiry: CacheExpiry, _tags: &[String]) {
        // No-op
    }

    async fn delete(&self, _key: &str) {
        // No-op
    }

    async fn invalidate(&self, _key: &str) {
        // No-op
    }

    async fn invalidate_tags(&self, _tags: &[String]) {
        // No-op
    }

    async fn delete_all(&self) {
        // No-op
    }

    fn capabilities(&self) -> BackendCapabilities {
        BackendCapabilities {
            tag_invalidation: false,
        }
    }

    fn backend_name(&self) -> &'static str {
        "null"
    }
}

//! Controller error type.

use edge_cache::CacheError;
use edge_core::EdgeError;

/// Errors raised by controllers.
///
/// Cache misses never surface here; only remote failures and invalid cache
/// arguments do.
#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    #[error(transparent)]
    Edge(#[from] EdgeError),

    #[error(transparent)]
    Cache(#[from] CacheError),
}

impl ControllerError {
    /// Returns `true` if the remote side reported a missing entity.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Edge(e) if e.is_not_found())
    }

    /// Returns `true` if the error came from an invalid cache argument.
    #[must_use]
    pub fn is_invalid_argument(&self) -> bool {
        match self {
            Self::Edge(e) => matches!(e, EdgeError::InvalidArgument { .. }),
            Self::Cache(e) => e.is_invalid_argument(),
        }
    }
}

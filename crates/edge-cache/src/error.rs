//! Cache error types.
//!
//! The cache layer is exception-light: a miss is `None`, removal of unknown
//! ids is a no-op and backend I/O problems degrade to misses. Only programmer
//! errors surface as [`CacheError`].

/// Errors raised by cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// A caller passed an argument the cache cannot act on.
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the problem.
        message: String,
    },

    /// A value could not be encoded or decoded.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Description of the codec failure.
        message: String,
    },

    /// A backend could not be set up.
    #[error("Backend error: {message}")]
    Backend {
        /// Description of the backend failure.
        message: String,
    },

    /// The tracing filter could not be built or swapped.
    #[error("Logging error: {message}")]
    Logging {
        /// Description of the logging failure.
        message: String,
    },
}

impl CacheError {
    /// Creates a new `InvalidArgument` error.
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Creates a new `Serialization` error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Creates a new `Backend` error.
    #[must_use]
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }

    /// Creates a new `Logging` error.
    #[must_use]
    pub fn logging(message: impl Into<String>) -> Self {
        Self::Logging {
            message: message.into(),
        }
    }

    /// Returns `true` if this is an invalid argument error.
    #[must_use]
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }
}

impl From<edge_core::UnknownAppType> for CacheError {
    fn from(err: edge_core::UnknownAppType) -> Self {
        Self::invalid_argument(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CacheError::invalid_argument("Unknown app type: x");
        assert_eq!(err.to_string(), "Invalid argument: Unknown app type: x");
        assert!(err.is_invalid_argument());
        assert!(!CacheError::serialization("bad").is_invalid_argument());
    }
}

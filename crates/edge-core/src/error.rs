//! Errors raised by remote collaborators and entity mapping.

/// Errors that can occur while talking to the management API.
#[derive(Debug, thiserror::Error)]
pub enum EdgeError {
    /// The requested entity does not exist on the remote side.
    #[error("Entity not found: {entity_type}/{id}")]
    NotFound {
        /// Entity type name, e.g. `developer`.
        entity_type: String,
        /// The identifier that was looked up.
        id: String,
    },

    /// A caller passed a structurally invalid value.
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// What was wrong with the argument.
        message: String,
    },

    /// The management API answered with an error status.
    #[error("Remote error ({status}): {message}")]
    Remote {
        /// HTTP status code reported by the API.
        status: u16,
        /// Error message reported by the API.
        message: String,
    },

    /// The request never produced a response.
    #[error("Transport error: {message}")]
    Transport {
        /// Description of the transport failure.
        message: String,
    },
}

impl EdgeError {
    /// Creates a new `NotFound` error.
    #[must_use]
    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }

    /// Creates a new `InvalidArgument` error.
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Creates a new `Remote` error.
    #[must_use]
    pub fn remote(status: u16, message: impl Into<String>) -> Self {
        Self::Remote {
            status,
            message: message.into(),
        }
    }

    /// Creates a new `Transport` error.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Returns `true` if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::Remote { status: 404, .. })
    }
}

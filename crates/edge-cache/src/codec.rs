//! MessagePack encoding of cached values.
//!
//! Failures are logged and reported as `None`; a value that cannot be
//! decoded is treated as a miss by the callers.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::CacheError;

/// Encode a value as a MessagePack map with named fields.
pub(crate) fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, CacheError> {
    rmp_serde::to_vec_named(value).map_err(|e| CacheError::serialization(e.to_string()))
}

pub(crate) fn decode<T: DeserializeOwned>(data: &[u8]) -> Result<T, CacheError> {
    rmp_serde::from_slice(data).map_err(|e| CacheError::serialization(e.to_string()))
}

/// Encode for a cache write, logging failures.
pub(crate) fn encode_logged<T: Serialize>(value: &T, key: &str) -> Option<Vec<u8>> {
    match encode(value) {
        Ok(data) => Some(data),
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "Failed to serialize value for cache");
            None
        }
    }
}

/// Decode a cache read, logging failures.
pub(crate) fn decode_logged<T: DeserializeOwned>(data: &[u8], key: &str) -> Option<T> {
    match decode(data) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "Failed to deserialize cached value");
            None
        }
    }
}

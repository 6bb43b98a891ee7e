use std::fmt::Debug;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// A cacheable remote object.
///
/// Cached values are immutable snapshots: a cache replaces an entry
/// wholesale and never patches it in place, so implementors only need to be
/// cloneable and serializable.
pub trait Entity: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Entity type name used in logs and error messages.
    const ENTITY_TYPE: &'static str;

    /// Primary identifier of the entity.
    fn id(&self) -> &str;
}

//! Key-value store trait

#[cfg(test)]
use mockall::automock;

use crate::storage::error::StorageError;

/// String-keyed persistent store
///
/// Implementations use interior mutability so a store can be shared behind
/// an `Arc`.
#[cfg_attr(test, automock)]
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored value, or `None` when the key was never written
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

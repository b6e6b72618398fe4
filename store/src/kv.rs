//! Key-value store trait.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::StoreError;

/// A string-keyed, string-valued store.
///
/// Writes are last-write-wins; there is a single logical writer.
pub trait KvStore {
    /// Retrieve a value, `None` if the key was never written.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store a value, replacing any previous one.
    fn put(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete an entry. Deleting a missing key is not an error.
    fn delete(&self, key: &str) -> Result<(), StoreError>;

    /// Read and deserialize a JSON value.
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError>
    where
        Self: Sized,
    {
        match self.get(key)? {
            None => Ok(None),
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| StoreError::Serialization {
                    key: key.to_string(),
                    reason: e.to_string(),
                }),
        }
    }

    /// Serialize and store a JSON value.
    fn put_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError>
    where
        Self: Sized,
    {
        let raw = serde_json::to_string(value).map_err(|e| StoreError::Serialization {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        self.put(key, &raw)
    }
}

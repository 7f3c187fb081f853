//! Key-value store seam
//!
//! The persistent store is an injected collaborator: every operation that
//! persists takes a store handle explicitly. [`MemoryStore`] is the
//! in-process implementation used by the CLI and tests.

use async_trait::async_trait;
use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Store failures
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Backend could not be reached or rejected the request
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Stored value does not have the expected shape
    #[error("stored value is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Opaque namespaced JSON key-value store
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Value under `namespace`/`key`, if any
    async fn get(&self, namespace: &[String], key: &str) -> Result<Option<Value>, StoreError>;

    /// Replace the value under `namespace`/`key`
    async fn put(&self, namespace: &[String], key: &str, value: Value) -> Result<(), StoreError>;
}

/// Read and decode a typed value
///
/// # Errors
/// Returns error if the store fails or the value does not decode as `T`
pub async fn get_json<T, S>(
    store: &S,
    namespace: &[String],
    key: &str,
) -> Result<Option<T>, StoreError>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    match store.get(namespace, key).await? {
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
        None => Ok(None),
    }
}

/// Encode and write a typed value
///
/// # Errors
/// Returns error if encoding or the store fails
pub async fn put_json<T, S>(
    store: &S,
    namespace: &[String],
    key: &str,
    value: &T,
) -> Result<(), StoreError>
where
    T: Serialize + Sync,
    S: KeyValueStore + ?Sized,
{
    store.put(namespace, key, serde_json::to_value(value)?).await
}

type StoreKey = (Vec<String>, String);

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<StoreKey, Value>,
}

impl MemoryStore {
    /// Create empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored values
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, namespace: &[String], key: &str) -> Result<Option<Value>, StoreError> {
        let lookup = (namespace.to_vec(), key.to_string());
        Ok(self.entries.get(&lookup).map(|entry| entry.value().clone()))
    }

    async fn put(&self, namespace: &[String], key: &str, value: Value) -> Result<(), StoreError> {
        self.entries
            .insert((namespace.to_vec(), key.to_string()), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ns(parts: &[&str]) -> Vec<String> {
        parts.iter().map(ToString::to_string).collect()
    }

    #[tokio::test]
    async fn memory_store_round_trip() {
        let store = MemoryStore::new();
        let namespace = ns(&["notes", "asst", "thread"]);

        assert!(store.get(&namespace, "k").await.unwrap().is_none());
        store.put(&namespace, "k", json!({"a": 1})).await.unwrap();
        assert_eq!(store.get(&namespace, "k").await.unwrap(), Some(json!({"a": 1})));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn namespaces_are_isolated() {
        let store = MemoryStore::new();
        store.put(&ns(&["notes", "a", "t1"]), "k", json!(1)).await.unwrap();
        assert!(store.get(&ns(&["notes", "a", "t2"]), "k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn typed_helpers() {
        let store = MemoryStore::new();
        let namespace = ns(&["x"]);
        put_json(&store, &namespace, "k", &vec![1, 2]).await.unwrap();
        let back: Option<Vec<i32>> = get_json(&store, &namespace, "k").await.unwrap();
        assert_eq!(back, Some(vec![1, 2]));

        let wrong: Result<Option<String>, _> = get_json(&store, &namespace, "k").await;
        assert!(matches!(wrong, Err(StoreError::Malformed(_))));
    }
}

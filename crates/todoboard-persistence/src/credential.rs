use std::sync::Arc;

use serde_json::Value;
use todoboard_core::{TodoboardError, TodoboardResult};

use crate::traits::KeyValueStore;

/// Storage key the API token lives under.
pub const API_KEY_STORAGE_KEY: &str = "TODOIST_API_KEY";

/// Reads and writes the Todoist API token in a [`KeyValueStore`].
#[derive(Clone)]
pub struct CredentialStore {
    storage: Arc<dyn KeyValueStore>,
}

impl CredentialStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// The stored token, if one is present and is a JSON string.
    ///
    /// Anything else under the key (numbers, objects, blank strings) counts as
    /// no credential, as does a storage file that cannot be read.
    pub async fn load(&self) -> Option<String> {
        match self.storage.get_item(API_KEY_STORAGE_KEY).await {
            Ok(Some(Value::String(key))) if !key.trim().is_empty() => Some(key),
            Ok(Some(other)) => {
                tracing::warn!("Ignoring non-string credential of type {}", kind(&other));
                None
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Failed to read stored credential: {}", e);
                None
            }
        }
    }

    pub async fn save(&self, key: &str) -> TodoboardResult<()> {
        let key = key.trim();
        if key.is_empty() {
            return Err(TodoboardError::Validation("API key must not be empty".into()));
        }
        self.storage
            .set_item(API_KEY_STORAGE_KEY, Value::String(key.to_string()))
            .await
    }

    pub async fn clear(&self) -> TodoboardResult<bool> {
        self.storage.remove_item(API_KEY_STORAGE_KEY).await
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStorage;
    use serde_json::json;

    #[tokio::test]
    async fn test_absent_key_loads_none() {
        let store = CredentialStore::new(Arc::new(MemoryStorage::new()));
        assert_eq!(store.load().await, None);
    }

    #[tokio::test]
    async fn test_non_string_value_loads_none() {
        for value in [json!(42), json!({"key": "abc"}), json!(null), json!("  ")] {
            let storage = MemoryStorage::with_item(API_KEY_STORAGE_KEY, value);
            let store = CredentialStore::new(Arc::new(storage));
            assert_eq!(store.load().await, None);
        }
    }

    #[tokio::test]
    async fn test_save_trims_and_reloads() {
        let store = CredentialStore::new(Arc::new(MemoryStorage::new()));
        store.save("  0123abcd \n").await.unwrap();
        assert_eq!(store.load().await.as_deref(), Some("0123abcd"));
    }

    #[tokio::test]
    async fn test_save_rejects_blank() {
        let storage = Arc::new(MemoryStorage::new());
        let store = CredentialStore::new(storage.clone());
        assert!(matches!(
            store.save("   ").await,
            Err(TodoboardError::Validation(_))
        ));
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn test_clear() {
        let store = CredentialStore::new(Arc::new(MemoryStorage::new()));
        store.save("abc").await.unwrap();
        assert!(store.clear().await.unwrap());
        assert!(!store.clear().await.unwrap());
        assert_eq!(store.load().await, None);
    }
}

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use todoboard_core::{TodoboardError, TodoboardResult};
use tokio::sync::Mutex;

use crate::store::atomic_writer::AtomicWriter;
use crate::traits::KeyValueStore;

type Entries = BTreeMap<String, Value>;

/// Key/value storage backed by a single JSON object file.
///
/// Every operation reads the file afresh, so edits made by another process
/// between calls are picked up. Writes from this process are serialized.
#[derive(Debug)]
pub struct LocalStorage {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl LocalStorage {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_entries(&self) -> TodoboardResult<Entries> {
        let Some(bytes) = AtomicWriter::read_if_exists(&self.path).await? else {
            return Ok(Entries::new());
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Entries::new());
        }
        serde_json::from_slice(&bytes).map_err(|e| {
            TodoboardError::Serialization(format!(
                "storage file {} is not a JSON object: {e}",
                self.path.display()
            ))
        })
    }

    async fn write_entries(&self, entries: &Entries) -> TodoboardResult<()> {
        let bytes = serde_json::to_vec_pretty(entries)
            .map_err(|e| TodoboardError::Serialization(e.to_string()))?;
        AtomicWriter::write_atomic(&self.path, &bytes).await
    }
}

#[async_trait]
impl KeyValueStore for LocalStorage {
    async fn get_item(&self, key: &str) -> TodoboardResult<Option<Value>> {
        let mut entries = self.read_entries().await?;
        Ok(entries.remove(key))
    }

    async fn set_item(&self, key: &str, value: Value) -> TodoboardResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.read_entries().await?;
        entries.insert(key.to_string(), value);
        self.write_entries(&entries).await?;
        tracing::info!("Stored {} in {}", key, self.path.display());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> TodoboardResult<bool> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.read_entries().await?;
        if entries.remove(key).is_none() {
            return Ok(false);
        }
        self.write_entries(&entries).await?;
        tracing::info!("Removed {} from {}", key, self.path.display());
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path().join("storage.json"));
        assert_eq!(storage.get_item("anything").await.unwrap(), None);
        assert!(!storage.remove_item("anything").await.unwrap());
    }

    #[tokio::test]
    async fn test_set_get_remove() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path().join("storage.json"));

        storage.set_item("theme", json!("dark")).await.unwrap();
        storage.set_item("count", json!(3)).await.unwrap();
        assert_eq!(storage.get_item("theme").await.unwrap(), Some(json!("dark")));

        assert!(storage.remove_item("theme").await.unwrap());
        assert_eq!(storage.get_item("theme").await.unwrap(), None);
        assert_eq!(storage.get_item("count").await.unwrap(), Some(json!(3)));
    }

    #[tokio::test]
    async fn test_preserves_foreign_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, r#"{"other":{"nested":true}}"#).unwrap();

        let storage = LocalStorage::new(&path);
        storage.set_item("mine", json!("x")).await.unwrap();

        let raw: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw, json!({"mine": "x", "other": {"nested": true}}));
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "[1, 2").unwrap();

        let storage = LocalStorage::new(&path);
        let err = storage.get_item("k").await.unwrap_err();
        assert!(matches!(err, TodoboardError::Serialization(_)));
    }

    #[tokio::test]
    async fn test_blank_file_is_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "\n").unwrap();

        let storage = LocalStorage::new(&path);
        assert_eq!(storage.get_item("k").await.unwrap(), None);
    }
}

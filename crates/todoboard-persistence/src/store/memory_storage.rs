use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use todoboard_core::TodoboardResult;

use crate::traits::KeyValueStore;

/// Non-persistent store for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, Value>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(key: &str, value: Value) -> Self {
        let storage = Self::default();
        storage.entries.lock().insert(key.to_string(), value);
        storage
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStorage {
    async fn get_item(&self, key: &str) -> TodoboardResult<Option<Value>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: Value) -> TodoboardResult<()> {
        self.entries.lock().insert(key.to_string(), value);
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> TodoboardResult<bool> {
        Ok(self.entries.lock().remove(key).is_some())
    }
}

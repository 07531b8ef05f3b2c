use async_trait::async_trait;
use serde_json::Value;
use todoboard_core::TodoboardResult;

/// String-keyed store of JSON values, modelled on browser local storage.
///
/// Reads of a missing key return `Ok(None)`; only I/O and malformed backing
/// data are errors.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get_item(&self, key: &str) -> TodoboardResult<Option<Value>>;

    async fn set_item(&self, key: &str, value: Value) -> TodoboardResult<()>;

    /// Returns whether the key was present.
    async fn remove_item(&self, key: &str) -> TodoboardResult<bool>;
}

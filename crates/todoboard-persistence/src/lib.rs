//! Local persisted state: a JSON key/value file standing in for browser
//! local storage, and the API credential kept inside it.

pub mod credential;
pub mod store;
pub mod traits;

pub use credential::{CredentialStore, API_KEY_STORAGE_KEY};
pub use store::*;
pub use traits::KeyValueStore;

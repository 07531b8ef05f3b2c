pub mod config;
pub mod debounce;
pub mod error;
pub mod input;
pub mod result;

pub use config::AppConfig;
pub use debounce::Debouncer;
pub use error::TodoboardError;
pub use input::TextInput;
pub use result::TodoboardResult;

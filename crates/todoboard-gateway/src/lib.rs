//! Access to the remote task service.
//!
//! [`TaskGateway`] is the seam the rest of the client talks to.
//! [`TodoistClient`] speaks the Todoist REST API; [`InMemoryGateway`] keeps
//! everything in process and records every call.

pub mod error;
pub mod memory;
pub mod models;
pub mod todoist;
pub mod traits;

pub use error::{GatewayError, GatewayResult};
pub use memory::{GatewayCall, InMemoryGateway};
pub use models::{NewTask, TaskUpdate};
pub use todoist::TodoistClient;
pub use traits::TaskGateway;

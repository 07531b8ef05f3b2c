//! Cache of remote resources with optimistic writes and invalidation.

mod client;
mod state;

pub use client::{Mutation, QueryClient, QueryMessage};
pub use state::{QueryKey, QueryState, QueryStatus};

//! Client side of the task tracker
//!
//! This crate talks to the GraphQL API and keeps what the list view shows:
//! - A transport abstraction with an HTTP implementation
//! - Typed wrappers for the four task operations
//! - A normalized entity cache with optimistic toggle records
//! - The list view state machine and the controller that drives it

pub mod api;
pub mod cache;
pub mod controller;
pub mod error;
pub mod transport;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{TaskEntity, TaskPatch, TodoApi};
pub use cache::{EntityKey, MutationId, MutationRecord, NormalizedCache, OptimisticToggle};
pub use controller::TodoController;
pub use error::{ClientError, Result};
pub use transport::{ClientConfig, GraphqlRequest, GraphqlTransport, HttpTransport};
pub use view::{ListView, TaskItem};

//! GraphQL schema for the task API
//!
//! Exposes the store operations as one query and three mutations. The
//! repository is injected as schema data so resolvers stay independent of
//! the concrete store.

mod error;
mod resolvers;
mod types;

use std::sync::Arc;

use async_graphql::{EmptySubscription, Schema};
use todo_core::task::TaskRepository;

pub use resolvers::{MutationRoot, QueryRoot};

pub type TodoSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Build the schema over the given repository
pub fn build_schema(repository: Arc<dyn TaskRepository>) -> TodoSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(repository)
        .finish()
}

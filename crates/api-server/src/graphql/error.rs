//! Mapping from store errors to GraphQL errors

use async_graphql::ErrorExtensions;
use tracing::error;

/// `extensions.code` for caller input that failed validation
pub const BAD_USER_INPUT: &str = "BAD_USER_INPUT";

/// `extensions.code` for failures independent of the caller's input
pub const INTERNAL_SERVER_ERROR: &str = "INTERNAL_SERVER_ERROR";

/// Convert a store error into a typed GraphQL error.
///
/// Validation failures keep their message. Everything else is logged and
/// reported with a generic message so storage details stay server-side.
pub fn into_graphql_error(err: todo_core::Error) -> async_graphql::Error {
    match err {
        todo_core::Error::InvalidInput(message) => async_graphql::Error::new(message)
            .extend_with(|_, ext| ext.set("code", BAD_USER_INPUT)),
        other => {
            error!("Resolver failed: {}", other);
            internal_error()
        }
    }
}

pub(crate) fn internal_error() -> async_graphql::Error {
    async_graphql::Error::new("Internal server error")
        .extend_with(|_, ext| ext.set("code", INTERNAL_SERVER_ERROR))
}

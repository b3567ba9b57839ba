//! GraphQL object types

use async_graphql::SimpleObject;
use chrono::SecondsFormat;
use todo_core::task::{Task, TaskId};
use tracing::error;

use super::error::internal_error;

/// A task as exposed over GraphQL
#[derive(Debug, Clone, PartialEq, Eq, SimpleObject)]
#[graphql(name = "Task")]
pub struct TaskObject {
    pub id: i32,
    pub title: String,
    #[graphql(name = "is_completed")]
    pub is_completed: bool,
    /// RFC 3339 creation time in UTC
    #[graphql(name = "created_at")]
    pub created_at: String,
}

impl TryFrom<Task> for TaskObject {
    type Error = async_graphql::Error;

    fn try_from(task: Task) -> Result<Self, Self::Error> {
        let id = i32::try_from(task.id.get()).map_err(|_| {
            error!("Task id {} does not fit a GraphQL Int", task.id);
            internal_error()
        })?;

        Ok(Self {
            id,
            title: task.title,
            is_completed: task.is_completed,
            created_at: task.created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        })
    }
}

/// Convert a GraphQL `Int` argument into a store id
pub(crate) fn task_id(id: i32) -> TaskId {
    TaskId(i64::from(id))
}

//! Task repository trait
//!
//! Defines the interface for task storage operations.

use async_trait::async_trait;

use super::model::{NewTask, Task, TaskId};
use crate::Result;

/// Repository interface for task CRUD operations
///
/// Each call is independent: implementations keep no per-caller state, so
/// any operation is safe to retry.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Get all tasks, newest first
    async fn list(&self) -> Result<Vec<Task>>;

    /// Get a task by ID
    async fn get(&self, id: TaskId) -> Result<Option<Task>>;

    /// Create a new task with a store-assigned id and timestamp
    async fn create(&self, task: NewTask) -> Result<Task>;

    /// Set the completion flag of an existing task
    ///
    /// Returns [`Error::TaskNotFound`](crate::Error::TaskNotFound) when no
    /// task has the given id.
    async fn set_completion(&self, id: TaskId, completed: bool) -> Result<Task>;

    /// Delete a task by ID, reporting whether a row was removed
    async fn delete(&self, id: TaskId) -> Result<bool>;
}

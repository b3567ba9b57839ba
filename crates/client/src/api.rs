//! Typed task operations
//!
//! Each operation is a fixed GraphQL document plus a decoder for its
//! response data.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::Result;
use crate::transport::{GraphqlRequest, GraphqlTransport};

pub const GET_TODOS: &str = r#"
query GetTodos {
  getTodos {
    id
    title
    is_completed
  }
}
"#;

pub const ADD_TODO: &str = r#"
mutation AddTodo($title: String!) {
  addTodo(title: $title) {
    id
    title
    is_completed
  }
}
"#;

pub const UPDATE_TODO: &str = r#"
mutation UpdateTodo($id: Int!, $is_completed: Boolean!) {
  updateTodo(id: $id, is_completed: $is_completed) {
    id
    is_completed
  }
}
"#;

pub const DELETE_TODO: &str = r#"
mutation DeleteTodo($id: Int!) {
  deleteTodo(id: $id)
}
"#;

/// A task as selected by the list query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskEntity {
    pub id: i64,
    pub title: String,
    pub is_completed: bool,
}

/// The fields an update returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPatch {
    pub id: i64,
    pub is_completed: bool,
}

#[derive(Deserialize)]
struct GetTodosData {
    #[serde(rename = "getTodos")]
    get_todos: Vec<TaskEntity>,
}

#[derive(Deserialize)]
struct AddTodoData {
    #[serde(rename = "addTodo")]
    add_todo: TaskEntity,
}

#[derive(Deserialize)]
struct UpdateTodoData {
    #[serde(rename = "updateTodo")]
    update_todo: Option<TaskPatch>,
}

#[derive(Deserialize)]
struct DeleteTodoData {
    #[serde(rename = "deleteTodo")]
    delete_todo: bool,
}

/// Task operations over a transport
pub struct TodoApi<T> {
    transport: T,
}

impl<T: GraphqlTransport> TodoApi<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch all tasks in store order
    pub async fn get_todos(&self) -> Result<Vec<TaskEntity>> {
        let data = self
            .transport
            .execute(GraphqlRequest::new("GetTodos", GET_TODOS, Value::Null))
            .await?;
        Ok(serde_json::from_value::<GetTodosData>(data)?.get_todos)
    }

    /// Create a task; the server trims and validates the title
    pub async fn add_todo(&self, title: &str) -> Result<TaskEntity> {
        let data = self
            .transport
            .execute(GraphqlRequest::new(
                "AddTodo",
                ADD_TODO,
                json!({ "title": title }),
            ))
            .await?;
        Ok(serde_json::from_value::<AddTodoData>(data)?.add_todo)
    }

    /// Set the completion flag; `None` when the task no longer exists
    pub async fn update_todo(&self, id: i64, is_completed: bool) -> Result<Option<TaskPatch>> {
        let data = self
            .transport
            .execute(GraphqlRequest::new(
                "UpdateTodo",
                UPDATE_TODO,
                json!({ "id": id, "is_completed": is_completed }),
            ))
            .await?;
        Ok(serde_json::from_value::<UpdateTodoData>(data)?.update_todo)
    }

    /// Delete a task, returning whether it existed
    pub async fn delete_todo(&self, id: i64) -> Result<bool> {
        let data = self
            .transport
            .execute(GraphqlRequest::new(
                "DeleteTodo",
                DELETE_TODO,
                json!({ "id": id }),
            ))
            .await?;
        Ok(serde_json::from_value::<DeleteTodoData>(data)?.delete_todo)
    }
}

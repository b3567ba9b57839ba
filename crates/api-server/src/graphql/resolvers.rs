//! Query and mutation resolvers

use std::sync::Arc;

use async_graphql::{Context, Object, Result};
use todo_core::task::{NewTask, TaskRepository};
use tracing::{debug, info, warn};

use super::error::into_graphql_error;
use super::types::{task_id, TaskObject};

fn repository<'a>(ctx: &Context<'a>) -> Result<&'a Arc<dyn TaskRepository>> {
    ctx.data::<Arc<dyn TaskRepository>>()
}

#[derive(Debug, Default, Clone, Copy)]
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// All tasks, newest first
    async fn get_todos(&self, ctx: &Context<'_>) -> Result<Vec<TaskObject>> {
        let tasks = repository(ctx)?.list().await.map_err(into_graphql_error)?;
        tasks.into_iter().map(TaskObject::try_from).collect()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Create a task; the title is trimmed and must not be blank
    async fn add_todo(&self, ctx: &Context<'_>, title: String) -> Result<TaskObject> {
        let new_task = NewTask::new(&title).map_err(into_graphql_error)?;
        let repository = repository(ctx)?;
        let task = repository
            .create(new_task)
            .await
            .map_err(into_graphql_error)?;

        let id = task.id;
        match TaskObject::try_from(task) {
            Ok(object) => {
                info!("Task {} created", id);
                Ok(object)
            }
            Err(err) => {
                // A task the caller cannot address must not outlive the error
                if let Err(e) = repository.delete(id).await {
                    warn!("Failed to remove unaddressable task {}: {}", id, e);
                }
                Err(err)
            }
        }
    }

    /// Set the completion flag; resolves to null when the task no longer exists
    async fn update_todo(
        &self,
        ctx: &Context<'_>,
        id: i32,
        #[graphql(name = "is_completed")] is_completed: bool,
    ) -> Result<Option<TaskObject>> {
        let id = task_id(id);
        match repository(ctx)?.set_completion(id, is_completed).await {
            Ok(task) => TaskObject::try_from(task).map(Some),
            Err(err) if err.is_not_found() => {
                debug!("Task {} vanished before update", id);
                Ok(None)
            }
            Err(err) => Err(into_graphql_error(err)),
        }
    }

    /// Delete a task, returning whether it existed
    async fn delete_todo(&self, ctx: &Context<'_>, id: i32) -> Result<bool> {
        let id = task_id(id);
        let removed = repository(ctx)?
            .delete(id)
            .await
            .map_err(into_graphql_error)?;

        if removed {
            info!("Task {} deleted", id);
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_graphql::{value, Request, Variables};
    use async_trait::async_trait;
    use chrono::Utc;
    use serde_json::{json, Value};
    use todo_core::task::{SqliteTaskStore, Task, TaskId};

    use crate::graphql::error::{BAD_USER_INPUT, INTERNAL_SERVER_ERROR};
    use crate::graphql::{build_schema, TodoSchema};

    use super::*;

    /// Repository whose backing database is unreachable
    struct UnavailableRepository;

    fn unavailable() -> todo_core::Error {
        todo_core::Error::Storage("disk I/O error: SELECT id FROM todos".to_string())
    }

    #[async_trait]
    impl TaskRepository for UnavailableRepository {
        async fn list(&self) -> todo_core::Result<Vec<Task>> {
            Err(unavailable())
        }

        async fn get(&self, _id: TaskId) -> todo_core::Result<Option<Task>> {
            Err(unavailable())
        }

        async fn create(&self, _task: NewTask) -> todo_core::Result<Task> {
            Err(unavailable())
        }

        async fn set_completion(&self, _id: TaskId, _completed: bool) -> todo_core::Result<Task> {
            Err(unavailable())
        }

        async fn delete(&self, _id: TaskId) -> todo_core::Result<bool> {
            Err(unavailable())
        }
    }

    /// Repository whose ids have outgrown a GraphQL `Int`
    #[derive(Default)]
    struct ExhaustedIdRepository {
        deleted: Mutex<Vec<TaskId>>,
    }

    const OVERSIZED_ID: i64 = i32::MAX as i64 + 1;

    #[async_trait]
    impl TaskRepository for ExhaustedIdRepository {
        async fn list(&self) -> todo_core::Result<Vec<Task>> {
            Ok(Vec::new())
        }

        async fn get(&self, _id: TaskId) -> todo_core::Result<Option<Task>> {
            Ok(None)
        }

        async fn create(&self, task: NewTask) -> todo_core::Result<Task> {
            Ok(Task {
                id: TaskId(OVERSIZED_ID),
                title: task.title().to_string(),
                is_completed: false,
                created_at: Utc::now(),
            })
        }

        async fn set_completion(&self, id: TaskId, _completed: bool) -> todo_core::Result<Task> {
            Err(todo_core::Error::TaskNotFound(id))
        }

        async fn delete(&self, id: TaskId) -> todo_core::Result<bool> {
            self.deleted.lock().unwrap().push(id);
            Ok(true)
        }
    }

    fn assert_internal_error(response: &async_graphql::Response) {
        assert_eq!(response.errors.len(), 1, "{:?}", response.errors);
        let error = serde_json::to_value(&response.errors[0]).unwrap();
        assert_eq!(error["message"], "Internal server error");
        assert_eq!(error["extensions"]["code"], INTERNAL_SERVER_ERROR);
        assert!(!error.to_string().contains("SELECT"));
    }

    async fn build_test_schema() -> (TodoSchema, Arc<SqliteTaskStore>) {
        let store = SqliteTaskStore::in_memory().await.unwrap();
        store.migrate().await.unwrap();
        let store = Arc::new(store);
        let repository: Arc<dyn TaskRepository> = store.clone();
        (build_schema(repository), store)
    }

    async fn run(schema: &TodoSchema, query: &str, variables: Value) -> async_graphql::Response {
        schema
            .execute(Request::new(query).variables(Variables::from_json(variables)))
            .await
    }

    async fn todos(schema: &TodoSchema) -> Value {
        let response = run(
            schema,
            "{ getTodos { id title is_completed created_at } }",
            json!({}),
        )
        .await;
        assert!(response.errors.is_empty(), "{:?}", response.errors);
        response.data.into_json().unwrap()["getTodos"].clone()
    }

    const ADD: &str = "mutation AddTodo($title: String!) { addTodo(title: $title) { id title is_completed } }";
    const UPDATE: &str = "mutation UpdateTodo($id: Int!, $is_completed: Boolean!) { updateTodo(id: $id, is_completed: $is_completed) { id is_completed } }";
    const DELETE: &str = "mutation DeleteTodo($id: Int!) { deleteTodo(id: $id) }";

    #[tokio::test]
    async fn get_todos_on_empty_store_is_empty_list() {
        let (schema, _store) = build_test_schema().await;
        assert_eq!(todos(&schema).await, json!([]));
    }

    #[tokio::test]
    async fn add_todo_then_list_contains_it() {
        let (schema, _store) = build_test_schema().await;

        let response = run(&schema, ADD, json!({ "title": "X" })).await;
        assert!(response.errors.is_empty(), "{:?}", response.errors);
        let data = response.data.into_json().unwrap();
        assert_eq!(data["addTodo"]["title"], "X");
        assert_eq!(data["addTodo"]["is_completed"], false);

        let listed = todos(&schema).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);
        assert_eq!(listed[0]["title"], "X");
        assert_eq!(listed[0]["is_completed"], false);
        assert!(listed[0]["created_at"].as_str().unwrap().ends_with('Z'));
    }

    #[tokio::test]
    async fn add_todo_trims_title() {
        let (schema, _store) = build_test_schema().await;

        let response = run(&schema, ADD, json!({ "title": "  Walk the dog  " })).await;
        let data = response.data.into_json().unwrap();
        assert_eq!(data["addTodo"]["title"], "Walk the dog");
    }

    #[tokio::test]
    async fn add_todo_rejects_blank_title() {
        let (schema, store) = build_test_schema().await;

        let response = run(&schema, ADD, json!({ "title": "   " })).await;

        assert_eq!(response.errors.len(), 1);
        let error = serde_json::to_value(&response.errors[0]).unwrap();
        assert_eq!(error["message"], "Title cannot be empty");
        assert_eq!(error["extensions"]["code"], BAD_USER_INPUT);
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_todo_sets_completion_idempotently() {
        let (schema, store) = build_test_schema().await;
        let task = store.create(NewTask::new("Toggle").unwrap()).await.unwrap();
        let id = task.id.get();

        for _ in 0..2 {
            let response = run(&schema, UPDATE, json!({ "id": id, "is_completed": true })).await;
            assert!(response.errors.is_empty(), "{:?}", response.errors);
            let data = response.data.into_json().unwrap();
            assert_eq!(data["updateTodo"], json!({ "id": id, "is_completed": true }));
        }

        let listed = todos(&schema).await;
        assert_eq!(listed[0]["is_completed"], true);
    }

    #[tokio::test]
    async fn update_todo_on_missing_task_is_null() {
        let (schema, _store) = build_test_schema().await;

        let response = run(&schema, UPDATE, json!({ "id": 404, "is_completed": true })).await;

        assert!(response.errors.is_empty(), "{:?}", response.errors);
        assert_eq!(response.data, value!({ "updateTodo": null }));
    }

    #[tokio::test]
    async fn delete_todo_reports_whether_task_existed() {
        let (schema, store) = build_test_schema().await;
        let task = store.create(NewTask::new("Doomed").unwrap()).await.unwrap();
        let id = task.id.get();

        let first = run(&schema, DELETE, json!({ "id": id })).await;
        assert_eq!(first.data, value!({ "deleteTodo": true }));
        assert_eq!(todos(&schema).await, json!([]));

        let second = run(&schema, DELETE, json!({ "id": id })).await;
        assert!(second.errors.is_empty());
        assert_eq!(second.data, value!({ "deleteTodo": false }));
        assert!(store.get(TaskId(id)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn get_todos_returns_newest_first() {
        let (schema, store) = build_test_schema().await;
        let first = store.create(NewTask::new("First Task").unwrap()).await.unwrap();
        let second = store.create(NewTask::new("Second Task").unwrap()).await.unwrap();
        store.set_completion(second.id, true).await.unwrap();

        let listed = todos(&schema).await;

        assert_eq!(listed[0]["id"], second.id.get());
        assert_eq!(listed[0]["title"], "Second Task");
        assert_eq!(listed[0]["is_completed"], true);
        assert_eq!(listed[1]["id"], first.id.get());
        assert_eq!(listed[1]["title"], "First Task");
        assert_eq!(listed[1]["is_completed"], false);
    }

    #[tokio::test]
    async fn store_failure_is_masked_as_internal_error() {
        let schema = build_schema(Arc::new(UnavailableRepository));

        let response = run(&schema, "{ getTodos { id } }", json!({})).await;

        assert_internal_error(&response);
        assert_eq!(response.data, value!(null));
    }

    #[tokio::test]
    async fn update_todo_reports_store_failure_instead_of_null() {
        let schema = build_schema(Arc::new(UnavailableRepository));

        let response = run(&schema, UPDATE, json!({ "id": 1, "is_completed": true })).await;

        assert_internal_error(&response);
        assert_eq!(response.data, value!({ "updateTodo": null }));
    }

    #[tokio::test]
    async fn add_todo_removes_task_whose_id_does_not_fit_int() {
        let repository = Arc::new(ExhaustedIdRepository::default());
        let schema = build_schema(repository.clone());

        let response = run(&schema, ADD, json!({ "title": "Too many" })).await;

        assert_internal_error(&response);
        assert_eq!(*repository.deleted.lock().unwrap(), vec![TaskId(OVERSIZED_ID)]);
    }

    #[tokio::test]
    async fn sdl_uses_wire_field_names() {
        let (schema, _store) = build_test_schema().await;
        let sdl = schema.sdl();

        assert!(sdl.contains("type Task"));
        assert!(sdl.contains("is_completed: Boolean!"));
        assert!(sdl.contains("created_at: String!"));
        assert!(sdl.contains("getTodos: [Task!]!"));
        assert!(sdl.contains("addTodo(title: String!): Task!"));
        assert!(sdl.contains("updateTodo(id: Int!, is_completed: Boolean!): Task"));
        assert!(sdl.contains("deleteTodo(id: Int!): Boolean!"));
    }
}

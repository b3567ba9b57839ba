//! Application state

use std::sync::Arc;

use todo_core::task::{SqliteTaskStore, TaskRepository};

use crate::config::ServerConfig;
use crate::graphql::{build_schema, TodoSchema};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    task_store: Arc<SqliteTaskStore>,
    schema: TodoSchema,
}

impl AppState {
    /// Open the configured database and build the GraphQL schema over it
    pub async fn new(config: &ServerConfig) -> todo_core::Result<Self> {
        let task_store = SqliteTaskStore::connect(&config.database_url).await?;
        task_store.migrate().await?;
        Ok(Self::with_store(task_store))
    }

    /// Build state around an already migrated store
    pub fn with_store(task_store: SqliteTaskStore) -> Self {
        let task_store = Arc::new(task_store);
        let repository: Arc<dyn TaskRepository> = task_store.clone();
        let schema = build_schema(repository);

        Self {
            inner: Arc::new(AppStateInner { task_store, schema }),
        }
    }

    /// Get reference to the task store
    pub fn task_store(&self) -> &SqliteTaskStore {
        &self.inner.task_store
    }

    /// Get reference to the GraphQL schema
    pub fn schema(&self) -> &TodoSchema {
        &self.inner.schema
    }
}

//! List controller
//!
//! Owns the cache and the query status and applies every state change the
//! list view can observe. Toggles are optimistic; creates and deletes wait
//! for the server and then refetch the list.

use tracing::{info, warn};

use crate::api::{TaskEntity, TaskPatch, TodoApi};
use crate::cache::{EntityKey, MutationRecord, NormalizedCache, OptimisticToggle};
use crate::error::Result;
use crate::transport::GraphqlTransport;
use crate::view::{ListView, TaskItem};

#[derive(Debug, Clone, PartialEq, Eq)]
enum QueryStatus {
    Loading,
    Failed(String),
    Loaded,
}

/// Drives the task list against a GraphQL transport
pub struct TodoController<T> {
    api: TodoApi<T>,
    cache: NormalizedCache,
    query: QueryStatus,
    adding: bool,
    mutation_error: Option<String>,
}

impl<T: GraphqlTransport> TodoController<T> {
    pub fn new(transport: T) -> Self {
        Self {
            api: TodoApi::new(transport),
            cache: NormalizedCache::new(),
            query: QueryStatus::Loading,
            adding: false,
            mutation_error: None,
        }
    }

    pub fn cache(&self) -> &NormalizedCache {
        &self.cache
    }

    /// Whether a create is in flight
    pub fn is_adding(&self) -> bool {
        self.adding
    }

    /// Message of the last failed mutation, shown inline next to the list
    pub fn mutation_error(&self) -> Option<&str> {
        self.mutation_error.as_deref()
    }

    /// The state the list renders from
    pub fn view(&self) -> ListView {
        if let QueryStatus::Failed(message) = &self.query {
            return ListView::Error {
                message: message.clone(),
            };
        }
        match self.cache.read_list() {
            Some(tasks) => ListView::Ready {
                tasks: tasks
                    .into_iter()
                    .map(|task| TaskItem {
                        pending: self.cache.is_pending(EntityKey::task(task.id)),
                        id: task.id,
                        title: task.title,
                        is_completed: task.is_completed,
                    })
                    .collect(),
            },
            None => ListView::Loading,
        }
    }

    /// Fetch the list and store it in the cache.
    ///
    /// On failure the view switches to its error state; cached data is kept.
    pub async fn load(&mut self) -> Result<()> {
        self.query = QueryStatus::Loading;
        match self.api.get_todos().await {
            Ok(tasks) => {
                self.cache.write_list(tasks);
                self.query = QueryStatus::Loaded;
                Ok(())
            }
            Err(e) => {
                warn!("Loading tasks failed: {}", e);
                self.query = QueryStatus::Failed(e.to_string());
                Err(e)
            }
        }
    }

    /// Create a task from the input text and refetch the list.
    ///
    /// Blank input is ignored without contacting the server.
    pub async fn add(&mut self, text: &str) -> Result<Option<TaskEntity>> {
        if text.trim().is_empty() {
            return Ok(None);
        }

        self.adding = true;
        self.mutation_error = None;
        let result = self.api.add_todo(text).await;
        self.adding = false;

        match result {
            Ok(task) => {
                info!("Added task {}", task.id);
                self.refetch().await;
                Ok(Some(task))
            }
            Err(e) => {
                self.mutation_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Apply the optimistic half of a toggle.
    ///
    /// The view reflects the predicted value as soon as this returns.
    pub fn begin_toggle(&mut self, id: i64) -> Option<OptimisticToggle> {
        self.mutation_error = None;
        self.cache.begin_toggle(id)
    }

    /// Send the request for a begun toggle
    pub async fn send_toggle(&self, toggle: &OptimisticToggle) -> Result<Option<TaskPatch>> {
        self.api.update_todo(toggle.id, toggle.is_completed).await
    }

    /// Settle a toggle with whatever the server answered
    pub fn finish_toggle(
        &mut self,
        toggle: OptimisticToggle,
        result: Result<Option<TaskPatch>>,
    ) -> Option<MutationRecord> {
        match result {
            Ok(server) => self.cache.confirm(toggle.mutation, server),
            Err(e) => {
                warn!("Toggle of task {} failed: {}", toggle.id, e);
                self.mutation_error = Some(e.to_string());
                self.cache.fail(toggle.mutation)
            }
        }
    }

    /// Flip the completion flag of a cached task.
    ///
    /// Returns `None` when the task is no longer cached.
    pub async fn toggle(&mut self, id: i64) -> Option<MutationRecord> {
        let toggle = self.begin_toggle(id)?;
        let result = self.send_toggle(&toggle).await;
        self.finish_toggle(toggle, result)
    }

    /// Delete a task and refetch the list
    pub async fn delete(&mut self, id: i64) -> Result<bool> {
        self.mutation_error = None;
        match self.api.delete_todo(id).await {
            Ok(removed) => {
                info!("Delete task {}: removed={}", id, removed);
                self.refetch().await;
                Ok(removed)
            }
            Err(e) => {
                self.mutation_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    async fn refetch(&mut self) {
        // A failed refetch already shows in the view's error state
        if let Err(e) = self.load().await {
            warn!("Refetch failed: {}", e);
        }
    }
}

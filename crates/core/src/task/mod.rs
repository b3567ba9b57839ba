//! Task module
//!
//! This module contains task-related types and the SQLite store adapter.

mod model;
mod repository;
mod sqlite_store;

pub use model::*;
pub use repository::TaskRepository;
pub use sqlite_store::SqliteTaskStore;

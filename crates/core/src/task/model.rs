//! Task model definitions

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Store-assigned task identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub i64);

impl TaskId {
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A persisted to-do item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Validated input for creating a task.
///
/// The title is trimmed on construction and can never be empty, so a store
/// receiving a `NewTask` does not need to re-check it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    title: String,
}

impl NewTask {
    /// Create a new task input with the given title
    pub fn new(title: impl AsRef<str>) -> Result<Self> {
        let title = title.as_ref().trim();
        if title.is_empty() {
            return Err(Error::InvalidInput("Title cannot be empty".to_string()));
        }
        Ok(Self {
            title: title.to_string(),
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }
}

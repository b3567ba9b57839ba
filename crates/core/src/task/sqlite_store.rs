//! SQLite-backed task storage implementation
//!
//! Stores tasks in a single `todos` table. The table keeps the completion
//! flag as an `INTEGER` holding 0 or 1; conversion to and from `bool` happens
//! only in this module.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;
use tracing::debug;

use super::model::{NewTask, Task, TaskId};
use super::repository::TaskRepository;
use crate::{Error, Result};

const TASK_COLUMNS: &str = "id, title, is_completed, created_at";

/// Row shape as stored in SQLite
#[derive(Debug, FromRow)]
struct TaskRow {
    id: i64,
    title: String,
    is_completed: i64,
    created_at: String,
}

impl TryFrom<TaskRow> for Task {
    type Error = Error;

    fn try_from(row: TaskRow) -> Result<Self> {
        Ok(Task {
            id: TaskId(row.id),
            title: row.title,
            is_completed: flag_to_bool(row.is_completed)?,
            created_at: parse_timestamp(&row.created_at)?,
        })
    }
}

fn bool_to_flag(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

fn flag_to_bool(flag: i64) -> Result<bool> {
    match flag {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(Error::Storage(format!(
            "Invalid is_completed value: {}",
            other
        ))),
    }
}

/// Parse a stored timestamp.
///
/// New rows carry RFC 3339 text; rows written with SQLite's
/// `CURRENT_TIMESTAMP` carry `YYYY-MM-DD HH:MM:SS` in UTC.
fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| Error::Storage(format!("Invalid created_at {:?}: {}", raw, e)))
}

/// Task store backed by an SQLite connection pool
#[derive(Clone)]
pub struct SqliteTaskStore {
    pool: SqlitePool,
}

impl SqliteTaskStore {
    /// Open the database at the given URL, creating it if missing.
    ///
    /// Accepts `sqlx` SQLite URLs such as `sqlite://data/todos.db`. The
    /// parent directory of a file database is created on demand.
    pub async fn connect(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

        if let Some(parent) = options.get_filename().parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Open a private in-memory database
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;

        // The database lives as long as its only connection does.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Create the `todos` table if it doesn't exist
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS todos (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                is_completed INTEGER NOT NULL DEFAULT 0 CHECK (is_completed IN (0, 1)),
                created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Check that the database answers queries
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Close every connection; later calls fail with a database error
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl TaskRepository for SqliteTaskStore {
    async fn list(&self) -> Result<Vec<Task>> {
        let rows: Vec<TaskRow> = sqlx::query_as(&format!(
            "SELECT {} FROM todos ORDER BY julianday(created_at) DESC, id DESC",
            TASK_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Task::try_from).collect()
    }

    async fn get(&self, id: TaskId) -> Result<Option<Task>> {
        let row: Option<TaskRow> =
            sqlx::query_as(&format!("SELECT {} FROM todos WHERE id = ?1", TASK_COLUMNS))
                .bind(id.get())
                .fetch_optional(&self.pool)
                .await?;

        row.map(Task::try_from).transpose()
    }

    async fn create(&self, task: NewTask) -> Result<Task> {
        let row: TaskRow = sqlx::query_as(&format!(
            "INSERT INTO todos (title) VALUES (?1) RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(task.title())
        .fetch_one(&self.pool)
        .await?;

        let created = Task::try_from(row)?;
        debug!("Created task {}", created.id);
        Ok(created)
    }

    async fn set_completion(&self, id: TaskId, completed: bool) -> Result<Task> {
        let row: Option<TaskRow> = sqlx::query_as(&format!(
            "UPDATE todos SET is_completed = ?1 WHERE id = ?2 RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(bool_to_flag(completed))
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Task::try_from(row),
            None => Err(Error::TaskNotFound(id)),
        }
    }

    async fn delete(&self, id: TaskId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM todos WHERE id = ?1")
            .bind(id.get())
            .execute(&self.pool)
            .await?;

        let removed = result.rows_affected() > 0;
        debug!("Delete task {}: removed={}", id, removed);
        Ok(removed)
    }
}

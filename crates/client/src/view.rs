//! List view state
//!
//! The list renders from exactly one of three states. An empty task list is
//! the Empty sub-state of `Ready`, never an error.

/// One rendered task row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub id: i64,
    pub title: String,
    pub is_completed: bool,
    /// A toggle on this task is awaiting the server
    pub pending: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListView {
    /// No data yet
    Loading,
    /// The list query failed
    Error { message: String },
    /// Data present, in store order
    Ready { tasks: Vec<TaskItem> },
}

impl ListView {
    /// Whether this is the Empty sub-state of `Ready`
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Ready { tasks } if tasks.is_empty())
    }

    pub fn tasks(&self) -> &[TaskItem] {
        match self {
            Self::Ready { tasks } => tasks,
            _ => &[],
        }
    }

    /// Plain-text rendering, one line per row
    pub fn render_lines(&self) -> Vec<String> {
        match self {
            Self::Loading => vec!["Loading...".to_string()],
            Self::Error { message } => vec![message.clone()],
            Self::Ready { tasks } if tasks.is_empty() => vec!["No tasks".to_string()],
            Self::Ready { tasks } => tasks
                .iter()
                .map(|task| {
                    let mark = if task.is_completed { 'x' } else { ' ' };
                    let suffix = if task.pending { " …" } else { "" };
                    format!("[{}] {}{}", mark, task.title, suffix)
                })
                .collect(),
        }
    }
}

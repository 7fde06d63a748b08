//! Tasks and filters as the scenarios describe them

use serde::{Deserialize, Serialize};
use std::fmt;

/// Completion status of a task
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Active,
    Completed,
}

impl TaskStatus {
    pub fn is_completed(self) -> bool {
        matches!(self, TaskStatus::Completed)
    }

    pub fn toggled(self) -> Self {
        match self {
            TaskStatus::Active => TaskStatus::Completed,
            TaskStatus::Completed => TaskStatus::Active,
        }
    }
}

/// A single to-do item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub text: String,
    #[serde(default)]
    pub status: TaskStatus,
}

impl Task {
    pub fn new(status: TaskStatus, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            status,
        }
    }

    pub fn active(text: impl Into<String>) -> Self {
        Self::new(TaskStatus::Active, text)
    }

    pub fn completed(text: impl Into<String>) -> Self {
        Self::new(TaskStatus::Completed, text)
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} ({:?})", self.text, self.status)
    }
}

/// Build several tasks sharing one status
pub fn tasks<I, S>(status: TaskStatus, texts: I) -> Vec<Task>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    texts.into_iter().map(|t| Task::new(status, t)).collect()
}

/// Collapse whitespace runs and trim, the way rendered row text reads
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// View mode controlling which rows are rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

impl Filter {
    /// Exact text of the filter link in the footer
    pub fn link_text(self) -> &'static str {
        match self {
            Filter::All => "All",
            Filter::Active => "Active",
            Filter::Completed => "Completed",
        }
    }

    /// Hash route the application switches to
    pub fn route(self) -> &'static str {
        match self {
            Filter::All => "#/",
            Filter::Active => "#/active",
            Filter::Completed => "#/completed",
        }
    }

    /// Whether a task with this status is rendered under the filter
    pub fn shows(self, status: TaskStatus) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => !status.is_completed(),
            Filter::Completed => status.is_completed(),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.link_text())
    }
}

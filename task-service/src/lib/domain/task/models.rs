use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;

use crate::domain::task::errors::TaskIdError;
use crate::domain::task::errors::TaskStatusError;
use crate::domain::task::errors::TaskTitleError;
use crate::domain::user::models::UserId;

/// Task unique identifier value object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub i64);

impl TaskId {
    /// Parse a task ID from string.
    ///
    /// # Arguments
    /// * `s` - Decimal identifier, typically a path segment
    ///
    /// # Returns
    /// Parsed TaskId
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a positive integer
    pub fn from_string(s: &str) -> Result<Self, TaskIdError> {
        match s.parse::<i64>() {
            Ok(id) if id > 0 => Ok(TaskId(id)),
            Ok(id) => Err(TaskIdError::InvalidFormat(format!(
                "identifier must be positive, got {}",
                id
            ))),
            Err(e) => Err(TaskIdError::InvalidFormat(e.to_string())),
        }
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Task aggregate.
///
/// Owned by exactly one user. Soft-deleted tasks never surface as a `Task`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub owner_id: UserId,
    pub title: TaskTitle,
    pub description: String,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Task title value object.
///
/// Trimmed, non-empty, at most 255 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskTitle(String);

impl TaskTitle {
    const MAX_LENGTH: usize = 255;

    /// Create a new validated task title.
    ///
    /// # Errors
    /// * `Empty` - Title is blank
    /// * `TooLong` - Title exceeds 255 characters
    pub fn new(title: String) -> Result<Self, TaskTitleError> {
        let trimmed = title.trim();

        if trimmed.is_empty() {
            return Err(TaskTitleError::Empty);
        }

        let length = trimmed.chars().count();
        if length > Self::MAX_LENGTH {
            return Err(TaskTitleError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Task lifecycle state.
///
/// `Started` on creation. Callers may set either state on update, including
/// moving a completed task back to started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskStatus {
    #[default]
    Started,
    Completed,
}

impl TaskStatus {
    /// Wire and storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Started => "started",
            TaskStatus::Completed => "completed",
        }
    }
}

impl FromStr for TaskStatus {
    type Err = TaskStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "started" => Ok(TaskStatus::Started),
            "completed" => Ok(TaskStatus::Completed),
            other => Err(TaskStatusError::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Command to create a new task.
#[derive(Debug, Clone)]
pub struct CreateTaskCommand {
    pub title: TaskTitle,
    pub description: String,
}

impl CreateTaskCommand {
    pub fn new(title: TaskTitle, description: String) -> Self {
        Self { title, description }
    }
}

/// Task record ready to be persisted; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub owner_id: UserId,
    pub title: TaskTitle,
    pub description: String,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
}

/// Command to update an existing task with optional validated fields.
///
/// All fields are optional to support partial updates.
/// Only provided fields will be updated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTaskCommand {
    pub title: Option<TaskTitle>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
}

impl UpdateTaskCommand {
    /// Apply the supplied fields to a task, leaving the rest untouched.
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }

        if let Some(description) = &self.description {
            task.description = description.clone();
        }

        if let Some(status) = self.status {
            task.status = status;
        }
    }
}

use thiserror::Error;

use crate::domain::task::models::TaskId;

/// Error type for TaskId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskIdError {
    #[error("Invalid task identifier: {0}")]
    InvalidFormat(String),
}

/// Error type for TaskTitle validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskTitleError {
    #[error("Task title is empty")]
    Empty,

    #[error("Task title too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error type for TaskStatus parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskStatusError {
    #[error("Unknown task status '{0}' (expected 'started' or 'completed')")]
    Unknown(String),
}

/// Top-level error type for all task-related operations
#[derive(Debug, Clone, Error)]
pub enum TaskError {
    #[error("Invalid task ID: {0}")]
    InvalidTaskId(#[from] TaskIdError),

    #[error("Invalid task title: {0}")]
    InvalidTitle(#[from] TaskTitleError),

    #[error("Invalid task status: {0}")]
    InvalidStatus(#[from] TaskStatusError),

    /// Also returned when the task exists but belongs to someone else.
    #[error("Task not found: {0}")]
    NotFound(TaskId),

    // Infrastructure errors
    #[error("Database error: {0}")]
    DatabaseError(String),
}

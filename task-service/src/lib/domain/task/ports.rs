use async_trait::async_trait;

use crate::domain::task::errors::TaskError;
use crate::domain::task::models::CreateTaskCommand;
use crate::domain::task::models::NewTask;
use crate::domain::task::models::Task;
use crate::domain::task::models::TaskId;
use crate::domain::task::models::UpdateTaskCommand;
use crate::domain::user::models::UserId;

/// Port for task domain service operations.
///
/// Every operation is scoped to `owner`, the identity verified for the
/// current request. A task owned by someone else is reported as `NotFound`.
#[async_trait]
pub trait TaskServicePort: Send + Sync + 'static {
    /// Create a task owned by `owner`, in the `Started` state.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn create_task(&self, owner: UserId, command: CreateTaskCommand)
        -> Result<Task, TaskError>;

    /// List the owner's tasks in insertion order.
    ///
    /// # Returns
    /// Possibly empty vector of tasks
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_tasks(&self, owner: UserId) -> Result<Vec<Task>, TaskError>;

    /// Apply a partial update to one of the owner's tasks.
    ///
    /// # Errors
    /// * `NotFound` - No such task for this owner
    /// * `DatabaseError` - Database operation failed
    async fn update_task(
        &self,
        owner: UserId,
        id: TaskId,
        command: UpdateTaskCommand,
    ) -> Result<Task, TaskError>;

    /// Soft-delete one of the owner's tasks.
    ///
    /// # Errors
    /// * `NotFound` - No such task for this owner, or already deleted
    /// * `DatabaseError` - Database operation failed
    async fn delete_task(&self, owner: UserId, id: TaskId) -> Result<(), TaskError>;
}

/// Persistence operations for the task aggregate.
///
/// Implementations must apply the ownership filter (`id` and `owner` and not
/// deleted) inside a single statement for `update` and `delete`.
#[async_trait]
pub trait TaskRepository: Send + Sync + 'static {
    /// Persist a new task.
    ///
    /// # Returns
    /// Created task with its assigned identifier
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, task: NewTask) -> Result<Task, TaskError>;

    /// Retrieve all non-deleted tasks of an owner, ordered by id.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_owner(&self, owner: UserId) -> Result<Vec<Task>, TaskError>;

    /// Update the supplied fields of a task matching `id` and `owner`.
    ///
    /// # Returns
    /// Task as stored after the update
    ///
    /// # Errors
    /// * `NotFound` - No non-deleted task matches the filter
    /// * `DatabaseError` - Database operation failed
    async fn update(
        &self,
        id: TaskId,
        owner: UserId,
        command: UpdateTaskCommand,
    ) -> Result<Task, TaskError>;

    /// Mark a task matching `id` and `owner` as deleted.
    ///
    /// # Errors
    /// * `NotFound` - No non-deleted task matches the filter
    /// * `DatabaseError` - Database operation failed
    async fn delete(&self, id: TaskId, owner: UserId) -> Result<(), TaskError>;
}

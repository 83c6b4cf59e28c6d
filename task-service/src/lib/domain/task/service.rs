use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use super::errors::TaskError;
use super::models::CreateTaskCommand;
use super::models::NewTask;
use super::models::Task;
use super::models::TaskId;
use super::models::TaskStatus;
use super::models::UpdateTaskCommand;
use super::ports::TaskRepository;
use super::ports::TaskServicePort;
use crate::domain::user::models::UserId;

/// Concrete implementation of TaskServicePort.
///
/// Generic over repository for testability.
pub struct TaskService<TR>
where
    TR: TaskRepository,
{
    task_repository: Arc<TR>,
}

impl<TR> TaskService<TR>
where
    TR: TaskRepository,
{
    pub fn new(task_repository: Arc<TR>) -> Self {
        Self { task_repository }
    }
}

#[async_trait]
impl<TR> TaskServicePort for TaskService<TR>
where
    TR: TaskRepository + 'static,
{
    async fn create_task(
        &self,
        owner: UserId,
        command: CreateTaskCommand,
    ) -> Result<Task, TaskError> {
        let task = NewTask {
            owner_id: owner,
            title: command.title,
            description: command.description,
            status: TaskStatus::Started,
            created_at: Utc::now(),
        };

        let created = self.task_repository.create(task).await?;
        tracing::info!(task_id = %created.id, owner_id = %owner, "Task created");

        Ok(created)
    }

    async fn list_tasks(&self, owner: UserId) -> Result<Vec<Task>, TaskError> {
        self.task_repository.find_by_owner(owner).await
    }

    async fn update_task(
        &self,
        owner: UserId,
        id: TaskId,
        command: UpdateTaskCommand,
    ) -> Result<Task, TaskError> {
        let updated = self.task_repository.update(id, owner, command).await?;
        tracing::info!(task_id = %id, owner_id = %owner, status = %updated.status, "Task updated");

        Ok(updated)
    }

    async fn delete_task(&self, owner: UserId, id: TaskId) -> Result<(), TaskError> {
        self.task_repository.delete(id, owner).await?;
        tracing::info!(task_id = %id, owner_id = %owner, "Task deleted");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use mockall::mock;
    use mockall::predicate::*;

    use super::*;
    use crate::domain::task::models::TaskTitle;

    mock! {
        pub TestTaskRepository {}

        #[async_trait]
        impl TaskRepository for TestTaskRepository {
            async fn create(&self, task: NewTask) -> Result<Task, TaskError>;
            async fn find_by_owner(&self, owner: UserId) -> Result<Vec<Task>, TaskError>;
            async fn update(&self, id: TaskId, owner: UserId, command: UpdateTaskCommand) -> Result<Task, TaskError>;
            async fn delete(&self, id: TaskId, owner: UserId) -> Result<(), TaskError>;
        }
    }

    fn stored_task(id: i64, owner: UserId, title: &str) -> Task {
        Task {
            id: TaskId(id),
            owner_id: owner,
            title: TaskTitle::new(title.to_string()).unwrap(),
            description: String::new(),
            status: TaskStatus::Started,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_task_starts_in_started_state() {
        let mut task_repository = MockTestTaskRepository::new();
        let owner = UserId(3);

        task_repository
            .expect_create()
            .withf(move |task| {
                task.owner_id == owner
                    && task.title.as_str() == "buy milk"
                    && task.status == TaskStatus::Started
            })
            .times(1)
            .returning(|task| {
                Ok(Task {
                    id: TaskId(1),
                    owner_id: task.owner_id,
                    title: task.title,
                    description: task.description,
                    status: task.status,
                    created_at: task.created_at,
                    updated_at: task.created_at,
                })
            });

        let service = TaskService::new(Arc::new(task_repository));

        let command = CreateTaskCommand::new(
            TaskTitle::new("buy milk".to_string()).unwrap(),
            "2 litres".to_string(),
        );

        let task = service.create_task(owner, command).await.unwrap();
        assert_eq!(task.id, TaskId(1));
        assert_eq!(task.owner_id, owner);
        assert_eq!(task.status, TaskStatus::Started);
        assert_eq!(task.description, "2 litres");
    }

    #[tokio::test]
    async fn test_list_tasks_is_scoped_to_owner() {
        let mut task_repository = MockTestTaskRepository::new();
        let owner = UserId(3);

        task_repository
            .expect_find_by_owner()
            .with(eq(owner))
            .times(1)
            .returning(move |_| {
                Ok(vec![
                    stored_task(1, owner, "first"),
                    stored_task(2, owner, "second"),
                ])
            });

        let service = TaskService::new(Arc::new(task_repository));

        let tasks = service.list_tasks(owner).await.unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].title.as_str(), "first");
        assert_eq!(tasks[1].title.as_str(), "second");
    }

    #[tokio::test]
    async fn test_list_tasks_empty() {
        let mut task_repository = MockTestTaskRepository::new();

        task_repository
            .expect_find_by_owner()
            .times(1)
            .returning(|_| Ok(vec![]));

        let service = TaskService::new(Arc::new(task_repository));

        let tasks = service.list_tasks(UserId(9)).await.unwrap();
        assert!(tasks.is_empty());
    }

    #[tokio::test]
    async fn test_update_task_passes_owner_filter() {
        let mut task_repository = MockTestTaskRepository::new();
        let owner = UserId(3);

        task_repository
            .expect_update()
            .withf(move |id, o, command| {
                *id == TaskId(5)
                    && *o == owner
                    && command.status == Some(TaskStatus::Completed)
                    && command.title.is_none()
            })
            .times(1)
            .returning(move |id, owner, command| {
                let mut task = stored_task(id.0, owner, "buy milk");
                command.apply_to(&mut task);
                Ok(task)
            });

        let service = TaskService::new(Arc::new(task_repository));

        let command = UpdateTaskCommand {
            status: Some(TaskStatus::Completed),
            ..Default::default()
        };

        let task = service.update_task(owner, TaskId(5), command).await.unwrap();
        assert_eq!(task.status, TaskStatus::Completed);
        assert_eq!(task.title.as_str(), "buy milk");
    }

    #[tokio::test]
    async fn test_update_foreign_task_is_not_found() {
        let mut task_repository = MockTestTaskRepository::new();

        task_repository
            .expect_update()
            .times(1)
            .returning(|id, _, _| Err(TaskError::NotFound(id)));

        let service = TaskService::new(Arc::new(task_repository));

        let result = service
            .update_task(UserId(4), TaskId(5), UpdateTaskCommand::default())
            .await;
        assert!(matches!(result, Err(TaskError::NotFound(TaskId(5)))));
    }

    #[tokio::test]
    async fn test_delete_task_success() {
        let mut task_repository = MockTestTaskRepository::new();

        task_repository
            .expect_delete()
            .with(eq(TaskId(5)), eq(UserId(3)))
            .times(1)
            .returning(|_, _| Ok(()));

        let service = TaskService::new(Arc::new(task_repository));

        assert!(service.delete_task(UserId(3), TaskId(5)).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_task_not_found() {
        let mut task_repository = MockTestTaskRepository::new();

        task_repository
            .expect_delete()
            .times(1)
            .returning(|id, _| Err(TaskError::NotFound(id)));

        let service = TaskService::new(Arc::new(task_repository));

        let result = service.delete_task(UserId(3), TaskId(5)).await;
        assert!(matches!(result, Err(TaskError::NotFound(_))));
    }
}

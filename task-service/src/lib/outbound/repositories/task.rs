use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;

use crate::domain::task::errors::TaskError;
use crate::domain::task::models::NewTask;
use crate::domain::task::models::Task;
use crate::domain::task::models::TaskId;
use crate::domain::task::models::TaskStatus;
use crate::domain::task::models::TaskTitle;
use crate::domain::task::models::UpdateTaskCommand;
use crate::domain::task::ports::TaskRepository;
use crate::domain::user::models::UserId;

const TASK_COLUMNS: &str = "id, user_id, title, description, status, created_at, updated_at";

pub struct PostgresTaskRepository {
    pool: PgPool,
}

impl PostgresTaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn create(&self, task: NewTask) -> Result<Task, TaskError> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO tasks (user_id, title, description, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(task.owner_id.0)
        .bind(task.title.as_str())
        .bind(&task.description)
        .bind(task.status.as_str())
        .bind(task.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| TaskError::DatabaseError(e.to_string()))?;

        task_from_row(&row)
    }

    async fn find_by_owner(&self, owner: UserId) -> Result<Vec<Task>, TaskError> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {TASK_COLUMNS}
            FROM tasks
            WHERE user_id = $1 AND deleted_at IS NULL
            ORDER BY id ASC
            "#
        ))
        .bind(owner.0)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| TaskError::DatabaseError(e.to_string()))?;

        rows.iter().map(task_from_row).collect()
    }

    async fn update(
        &self,
        id: TaskId,
        owner: UserId,
        command: UpdateTaskCommand,
    ) -> Result<Task, TaskError> {
        // NULL parameters keep the stored value.
        let row = sqlx::query(&format!(
            r#"
            UPDATE tasks
            SET title = COALESCE($3, title),
                description = COALESCE($4, description),
                status = COALESCE($5, status),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(id.0)
        .bind(owner.0)
        .bind(command.title.as_ref().map(TaskTitle::as_str))
        .bind(command.description.as_deref())
        .bind(command.status.map(|s| s.as_str()))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| TaskError::DatabaseError(e.to_string()))?;

        match row {
            Some(r) => task_from_row(&r),
            None => Err(TaskError::NotFound(id)),
        }
    }

    async fn delete(&self, id: TaskId, owner: UserId) -> Result<(), TaskError> {
        let result = sqlx::query(
            r#"
            UPDATE tasks
            SET deleted_at = NOW()
            WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(id.0)
        .bind(owner.0)
        .execute(&self.pool)
        .await
        .map_err(|e| TaskError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(TaskError::NotFound(id));
        }

        Ok(())
    }
}

/// Stored rows are trusted to satisfy the table constraints; anything else is
/// reported as a database fault rather than a caller error.
fn task_from_row(row: &PgRow) -> Result<Task, TaskError> {
    let column_error = |e: sqlx::Error| TaskError::DatabaseError(e.to_string());

    let title: String = row.try_get("title").map_err(column_error)?;
    let status: String = row.try_get("status").map_err(column_error)?;

    Ok(Task {
        id: TaskId(row.try_get("id").map_err(column_error)?),
        owner_id: UserId(row.try_get("user_id").map_err(column_error)?),
        title: TaskTitle::new(title).map_err(|e| TaskError::DatabaseError(e.to_string()))?,
        description: row.try_get("description").map_err(column_error)?,
        status: status
            .parse::<TaskStatus>()
            .map_err(|e| TaskError::DatabaseError(e.to_string()))?,
        created_at: row.try_get("created_at").map_err(column_error)?,
        updated_at: row.try_get("updated_at").map_err(column_error)?,
    })
}

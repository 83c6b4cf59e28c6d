use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Deserialize;

use super::ApiError;
use super::ApiJson;
use super::ApiSuccess;
use super::TaskResponseData;
use crate::domain::task::errors::TaskError;
use crate::domain::task::models::TaskId;
use crate::domain::task::models::TaskStatus;
use crate::domain::task::models::TaskTitle;
use crate::domain::task::models::UpdateTaskCommand;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

/// HTTP request body for updating a task (raw JSON)
///
/// Absent and empty-string fields are both left untouched.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTaskRequestBody {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
}

impl UpdateTaskRequestBody {
    fn try_into_command(self) -> Result<UpdateTaskCommand, TaskError> {
        let title = non_empty(self.title).map(TaskTitle::new).transpose()?;
        let status = non_empty(self.status)
            .map(|s| s.parse::<TaskStatus>())
            .transpose()?;

        Ok(UpdateTaskCommand {
            title,
            description: non_empty(self.description),
            status,
        })
    }
}

fn non_empty(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.is_empty())
}

pub async fn update_task(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<UpdateTaskRequestBody>,
) -> Result<ApiSuccess<TaskResponseData>, ApiError> {
    let task_id = TaskId::from_string(&id).map_err(TaskError::from)?;
    let command = body.try_into_command()?;

    state
        .task_service
        .update_task(caller.user_id(), task_id, command)
        .await
        .map_err(ApiError::from)
        .map(|ref task| ApiSuccess::new(StatusCode::OK, task.into()))
}

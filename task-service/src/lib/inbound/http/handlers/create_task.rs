use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Deserialize;

use super::ApiError;
use super::ApiJson;
use super::ApiSuccess;
use super::TaskResponseData;
use crate::domain::task::errors::TaskError;
use crate::domain::task::models::CreateTaskCommand;
use crate::domain::task::models::TaskTitle;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn create_task(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    ApiJson(body): ApiJson<CreateTaskRequestBody>,
) -> Result<ApiSuccess<TaskResponseData>, ApiError> {
    state
        .task_service
        .create_task(caller.user_id(), body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref task| ApiSuccess::new(StatusCode::CREATED, task.into()))
}

/// HTTP request body for creating a task (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateTaskRequestBody {
    title: String,
    #[serde(default)]
    description: String,
}

impl CreateTaskRequestBody {
    fn try_into_command(self) -> Result<CreateTaskCommand, TaskError> {
        let title = TaskTitle::new(self.title)?;
        Ok(CreateTaskCommand::new(title, self.description))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::task::errors::TaskTitleError;

    #[test]
    fn test_description_is_optional() {
        let body: CreateTaskRequestBody =
            serde_json::from_str(r#"{"title": "buy milk"}"#).unwrap();

        let command = body.try_into_command().unwrap();
        assert_eq!(command.title.as_str(), "buy milk");
        assert_eq!(command.description, "");
    }

    #[test]
    fn test_blank_title_is_rejected() {
        let body: CreateTaskRequestBody =
            serde_json::from_str(r#"{"title": "  ", "description": "x"}"#).unwrap();

        assert!(matches!(
            body.try_into_command(),
            Err(TaskError::InvalidTitle(TaskTitleError::Empty))
        ));
    }
}

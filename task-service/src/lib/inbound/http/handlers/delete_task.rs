use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::ApiError;
use crate::domain::task::errors::TaskError;
use crate::domain::task::models::TaskId;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

/// Soft-delete a task. Responds 204 with an empty body.
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let task_id = TaskId::from_string(&id).map_err(TaskError::from)?;

    state
        .task_service
        .delete_task(caller.user_id(), task_id)
        .await
        .map_err(ApiError::from)
        .map(|_| StatusCode::NO_CONTENT)
}

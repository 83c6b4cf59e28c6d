use axum::http::StatusCode;
use serde::Serialize;

use super::ApiSuccess;

/// Liveness check; touches neither the database nor the token service.
pub async fn ping() -> ApiSuccess<PingResponseData> {
    ApiSuccess::new(
        StatusCode::OK,
        PingResponseData {
            message: "pong".to_string(),
        },
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PingResponseData {
    pub message: String,
}

use std::sync::Arc;

use auth::Authenticator;
use auth::JwtError;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use thiserror::Error;

use crate::domain::user::models::UserId;
use crate::inbound::http::handlers::ApiResponseBody;

const BEARER_SCHEME: &str = "Bearer";

/// Identity verified for the current request.
///
/// Only `authorize` can construct one; handlers read it from the request
/// extensions with `Extension<AuthenticatedUser>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    user_id: UserId,
}

impl AuthenticatedUser {
    pub fn user_id(&self) -> UserId {
        self.user_id
    }
}

/// Why a request was turned away by the gate.
///
/// Logged, never shown to the caller.
#[derive(Debug, Error)]
pub enum AuthorizationRejection {
    #[error("missing Authorization header")]
    MissingCredential,

    #[error("Authorization header is not of the form 'Bearer <token>'")]
    MalformedCredential,

    #[error("token rejected: {0}")]
    InvalidCredential(#[from] JwtError),

    #[error("token subject is not a user identifier: {0}")]
    InvalidSubject(String),
}

impl IntoResponse for AuthorizationRejection {
    fn into_response(self) -> Response {
        tracing::warn!(reason = %self, "Request rejected by authorization gate");

        let status = StatusCode::UNAUTHORIZED;
        (
            status,
            Json(ApiResponseBody::new_error(
                status,
                "Unauthorized".to_string(),
            )),
        )
            .into_response()
    }
}

/// Middleware that validates the bearer token and records the caller's identity.
///
/// Any failure short-circuits with 401; the wrapped handler never runs.
pub async fn authorize(
    State(authenticator): State<Arc<Authenticator>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthorizationRejection> {
    let token = bearer_token(req.headers())?;

    let claims = authenticator.validate_token(token)?;

    let user_id = UserId::from_string(&claims.sub)
        .map_err(|e| AuthorizationRejection::InvalidSubject(e.to_string()))?;

    req.extensions_mut().insert(AuthenticatedUser { user_id });

    Ok(next.run(req).await)
}

/// Extract the token from an `Authorization: Bearer <token>` header.
fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthorizationRejection> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthorizationRejection::MissingCredential)?;

    let value = header
        .to_str()
        .map_err(|_| AuthorizationRejection::MalformedCredential)?;

    match value.split(' ').collect::<Vec<_>>().as_slice() {
        [BEARER_SCHEME, token] if !token.is_empty() => Ok(token),
        _ => Err(AuthorizationRejection::MalformedCredential),
    }
}

#[cfg(test)]
mod tests {
    use axum::body;
    use axum::body::Body;
    use axum::http::HeaderValue;
    use axum::middleware;
    use axum::routing::get;
    use axum::Extension;
    use axum::Router;
    use chrono::Duration;
    use tower::ServiceExt;

    use super::*;

    const SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

    fn authenticator() -> Arc<Authenticator> {
        Arc::new(Authenticator::new(SECRET).unwrap())
    }

    fn app(authenticator: Arc<Authenticator>) -> Router {
        async fn whoami(Extension(user): Extension<AuthenticatedUser>) -> String {
            user.user_id().to_string()
        }

        Router::new()
            .route("/whoami", get(whoami))
            .route_layer(middleware::from_fn_with_state(authenticator, authorize))
    }

    async fn send(app: Router, authorization: Option<&str>) -> (StatusCode, String) {
        let mut request = axum::http::Request::builder().uri("/whoami");
        if let Some(value) = authorization {
            request = request.header(AUTHORIZATION, value);
        }

        let response = app
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_valid_token_binds_identity() {
        let authenticator = authenticator();
        let token = authenticator.issue_token(42).unwrap().access_token;

        let (status, body) = send(
            app(authenticator),
            Some(&format!("Bearer {}", token)),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "42");
    }

    #[tokio::test]
    async fn test_missing_header_is_unauthorized() {
        let (status, body) = send(app(authenticator()), None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("Unauthorized"));
    }

    #[tokio::test]
    async fn test_malformed_header_is_unauthorized() {
        let authenticator = authenticator();
        let token = authenticator.issue_token(42).unwrap().access_token;

        for value in [
            token.clone(),
            format!("Basic {}", token),
            format!("bearer {}", token),
            format!("Bearer  {}", token),
            format!("Bearer {} extra", token),
            "Bearer ".to_string(),
        ] {
            let (status, _) = send(app(Arc::clone(&authenticator)), Some(&value)).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "accepted {:?}", value);
        }
    }

    #[tokio::test]
    async fn test_rejections_are_indistinguishable() {
        let authenticator = authenticator();

        let (_, missing) = send(app(Arc::clone(&authenticator)), None).await;
        let (_, malformed) = send(app(Arc::clone(&authenticator)), Some("Token abc")).await;
        let (_, invalid) = send(app(authenticator), Some("Bearer abc.def.ghi")).await;

        assert_eq!(missing, malformed);
        assert_eq!(malformed, invalid);
    }

    #[tokio::test]
    async fn test_expired_token_is_unauthorized() {
        let authenticator = Arc::new(
            Authenticator::new(SECRET)
                .unwrap()
                .with_token_lifetime(Duration::seconds(-10)),
        );
        let token = authenticator.issue_token(42).unwrap().access_token;

        let (status, _) = send(app(authenticator), Some(&format!("Bearer {}", token))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_token_from_other_secret_is_unauthorized() {
        let forger = Authenticator::new(b"some-other-secret-key-that-is-long-enough").unwrap();
        let token = forger.issue_token(42).unwrap().access_token;

        let (status, _) = send(app(authenticator()), Some(&format!("Bearer {}", token))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_non_numeric_subject_is_unauthorized() {
        let authenticator = authenticator();
        let token = authenticator.issue_token("alice").unwrap().access_token;

        let (status, _) = send(app(authenticator), Some(&format!("Bearer {}", token))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_non_ascii_header_is_malformed() {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_bytes(b"Bearer \xfftoken").unwrap(),
        );

        assert!(matches!(
            bearer_token(&headers),
            Err(AuthorizationRejection::MalformedCredential)
        ));
    }
}

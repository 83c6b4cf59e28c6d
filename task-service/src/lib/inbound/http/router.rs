use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::create_task::create_task;
use super::handlers::delete_task::delete_task;
use super::handlers::list_tasks::list_tasks;
use super::handlers::login::login;
use super::handlers::ping::ping;
use super::handlers::register::register;
use super::handlers::update_task::update_task;
use super::middleware::authorize;
use crate::domain::task::ports::TaskServicePort;
use crate::domain::user::ports::UserServicePort;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServicePort>,
    pub task_service: Arc<dyn TaskServicePort>,
}

pub fn create_router(
    user_service: Arc<dyn UserServicePort>,
    task_service: Arc<dyn TaskServicePort>,
    authenticator: Arc<Authenticator>,
) -> Router {
    let state = AppState {
        user_service,
        task_service,
    };

    let public_routes = Router::new()
        .route("/ping", get(ping))
        .route("/register", post(register))
        .route("/login", post(login));

    let protected_routes = Router::new()
        .route("/tasks", post(create_task).get(list_tasks))
        .route("/tasks/:id", put(update_task).delete(delete_task))
        .route_layer(middleware::from_fn_with_state(authenticator, authorize));

    // Headers are left out of the span: they carry bearer tokens.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

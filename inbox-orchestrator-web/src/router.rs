//! API router setup.

use std::time::Duration;

use axum::error_handling::HandleErrorLayer;
use axum::http::{StatusCode, Uri};
use axum::response::IntoResponse;
use axum::{BoxError, Json, Router};
use tower::timeout::TimeoutLayer;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::error::{ApiError, ApiErrorDetail, ApiErrorResponse};
use crate::routes;
use crate::state::ApiState;

/// Creates the API router with tracing and a whole-request timeout.
pub fn api_router(state: ApiState, request_timeout: Duration) -> Router {
    Router::new()
        .merge(routes::domains::routes())
        .merge(routes::webhooks::routes())
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_timeout_error))
                .layer(TimeoutLayer::new(request_timeout)),
        )
        .with_state(state)
}

async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound {
        message: format!("not found: {}", uri.path()),
    }
}

async fn handle_timeout_error(err: BoxError) -> impl IntoResponse {
    if err.is::<tower::timeout::error::Elapsed>() {
        (
            StatusCode::REQUEST_TIMEOUT,
            Json(ApiErrorResponse {
                error: ApiErrorDetail {
                    code: "REQUEST_TIMEOUT".to_string(),
                    message: "request timed out".to_string(),
                },
            }),
        )
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiErrorResponse {
                error: ApiErrorDetail {
                    code: "INTERNAL".to_string(),
                    message: "unhandled middleware error".to_string(),
                },
            }),
        )
    }
}

//! API error types and error response payloads.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use inbox_orchestrator_core::error::{CoreError, ProviderError};

/// Error detail carried in every error response.
#[derive(Debug, Clone, Serialize)]
pub struct ApiErrorDetail {
    /// Stable error code identifier.
    pub code: String,
    /// Human readable message.
    pub message: String,
}

/// Error response wrapper: `{ "error": { "code", "message" } }`.
#[derive(Debug, Clone, Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

/// API-facing error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Request was invalid.
    #[error("{message}")]
    BadRequest { message: String },
    /// Signature missing or invalid.
    #[error("{message}")]
    Unauthorized { message: String },
    /// Resource not found.
    #[error("{message}")]
    NotFound { message: String },
    /// Conflict / precondition failure.
    #[error("{message}")]
    Conflict { message: String },
    /// Upstream provider failure.
    #[error("{message}")]
    BadGateway { message: String },
    /// Internal error.
    #[error("{message}")]
    Internal { message: String },
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::BadRequest { .. } => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Unauthorized { .. } => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Self::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Conflict { .. } => (StatusCode::CONFLICT, "CONFLICT"),
            Self::BadGateway { .. } => (StatusCode::BAD_GATEWAY, "PROVIDER_UNAVAILABLE"),
            Self::Internal { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let body = ApiErrorResponse {
            error: ApiErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };
        (status, Json(body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        if err.is_expected() {
            tracing::warn!("request failed: {err}");
        } else {
            tracing::error!("request failed: {err}");
        }

        match err {
            // identical body whether the domain never existed or belongs to
            // another tenant
            CoreError::DomainNotFound(_) => Self::NotFound {
                message: "domain not found".to_string(),
            },
            CoreError::DomainAlreadyExists(name) => Self::Conflict {
                message: format!("domain already exists: {name}"),
            },
            CoreError::NoJobAttached(_) => Self::Conflict {
                message: "no deployment job attached".to_string(),
            },
            CoreError::ValidationError(message) => Self::BadRequest { message },
            CoreError::Provider(e) => match e {
                ProviderError::Rejected { detail, .. } => Self::BadRequest {
                    message: format!("provider rejected the request: {detail}"),
                },
                ProviderError::ArtifactNotReady { .. } => Self::Conflict {
                    message: "result artifact is not ready".to_string(),
                },
                ProviderError::JobNotFound { .. } => Self::NotFound {
                    message: "deployment job not found".to_string(),
                },
                e if e.is_transient() => Self::BadGateway {
                    message: "deployment provider is unavailable".to_string(),
                },
                _ => Self::Internal {
                    message: "provider request failed".to_string(),
                },
            },
            CoreError::SerializationError(_) | CoreError::StorageError(_) => Self::Internal {
                message: "internal error".to_string(),
            },
        }
    }
}

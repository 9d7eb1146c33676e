//! Push ingress adapter: provider job callbacks.
//!
//! Callbacks are HMAC-SHA256 signed over the raw request body. The status
//! field in the payload is a delivery hint only; the reconciliation cycle
//! always fetches the provider's authoritative state, which is what makes
//! duplicate and out-of-order deliveries safe.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::post;
use axum::{Json, Router};
use bytes::Bytes;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use inbox_orchestrator_core::types::DeploymentStatus;

use crate::error::ApiError;
use crate::state::ApiState;

/// Signature header set by the provider.
pub const SIGNATURE_HEADER: &str = "x-webhook-signature";

/// Webhook route group.
pub fn routes() -> Router<ApiState> {
    Router::new().route("/webhooks/jobs", post(job_callback))
}

/// Callback payload: `{ jobId, status }`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JobCallback {
    job_id: String,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CallbackResponse {
    acknowledged: bool,
    /// Present when the callback resolved to a known domain.
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<DeploymentStatus>,
}

/// `POST /webhooks/jobs`
async fn job_callback(
    State(state): State<ApiState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<CallbackResponse>, ApiError> {
    let Some(secret) = state.webhook_secret.as_deref() else {
        // no shared secret configured: refuse rather than accept unsigned
        // callbacks
        return Err(ApiError::Unauthorized {
            message: "webhook signature verification is not configured".to_string(),
        });
    };

    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized {
            message: "missing webhook signature".to_string(),
        })?;

    verify_signature(secret, &body, signature)?;

    let payload: JobCallback =
        serde_json::from_slice(&body).map_err(|e| ApiError::BadRequest {
            message: format!("invalid callback payload: {e}"),
        })?;

    if let Some(hint) = &payload.status {
        tracing::debug!(job_id = %payload.job_id, hint = %hint, "job callback received");
    }

    // Unknown or superseded jobs acknowledge as no-ops: delivery is
    // at-least-once and callbacks can outlive their job linkage
    let outcome = state
        .app
        .reconcile_service
        .reconcile_by_job(&payload.job_id)
        .await?;

    Ok(Json(CallbackResponse {
        acknowledged: true,
        status: outcome.map(|o| o.status),
    }))
}

/// Verify a lowercase-hex HMAC-SHA256 signature over the raw body.
fn verify_signature(secret: &str, body: &[u8], signature_hex: &str) -> Result<(), ApiError> {
    let signature = hex::decode(signature_hex).map_err(|_| ApiError::Unauthorized {
        message: "malformed webhook signature".to_string(),
    })?;

    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret.as_bytes()).map_err(|e| ApiError::Internal {
            message: format!("failed to initialize signature verification: {e}"),
        })?;
    mac.update(body);

    mac.verify_slice(&signature).map_err(|_| ApiError::Unauthorized {
        message: "invalid webhook signature".to_string(),
    })
}

/// Compute the signature value a caller must send. Used by tests and by
/// operators debugging webhook configuration.
#[must_use]
pub fn sign_body(secret: &str, body: &[u8]) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
        .unwrap_or_else(|_| unreachable!("HMAC accepts keys of any length"));
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}

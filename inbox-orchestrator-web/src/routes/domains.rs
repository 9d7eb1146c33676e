//! Tenant-scoped domain endpoints, including the pull ingress adapter.

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;

use inbox_orchestrator_core::services::DeployOptions;
use inbox_orchestrator_core::types::{DeploymentStatus, DomainRecord, NewDomain};

use crate::error::ApiError;
use crate::state::ApiState;

/// Domain route group.
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route(
            "/api/tenants/:tenant_id/domains",
            get(list_domains).post(register_domain),
        )
        .route(
            "/api/tenants/:tenant_id/domains/:domain_id",
            axum::routing::delete(delete_domain),
        )
        .route(
            "/api/tenants/:tenant_id/domains/:domain_id/deploy",
            post(deploy_domain),
        )
        .route(
            "/api/tenants/:tenant_id/domains/:domain_id/sync",
            post(sync_domain),
        )
        .route(
            "/api/tenants/:tenant_id/domains/:domain_id/artifact",
            get(download_artifact),
        )
}

/// `GET /api/tenants/{tenant_id}/domains`
async fn list_domains(
    State(state): State<ApiState>,
    Path(tenant_id): Path<String>,
) -> Result<Json<Vec<DomainRecord>>, ApiError> {
    let domains = state.app.catalog_service.list_domains(&tenant_id).await?;
    Ok(Json(domains))
}

/// `POST /api/tenants/{tenant_id}/domains`
async fn register_domain(
    State(state): State<ApiState>,
    Path(tenant_id): Path<String>,
    Json(request): Json<NewDomain>,
) -> Result<(StatusCode, Json<DomainRecord>), ApiError> {
    let record = state
        .app
        .catalog_service
        .register_domain(&tenant_id, &request)
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// `DELETE /api/tenants/{tenant_id}/domains/{domain_id}`
async fn delete_domain(
    State(state): State<ApiState>,
    Path((tenant_id, domain_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    state
        .app
        .catalog_service
        .delete_domain(&tenant_id, &domain_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/tenants/{tenant_id}/domains/{domain_id}/deploy`
async fn deploy_domain(
    State(state): State<ApiState>,
    Path((tenant_id, domain_id)): Path<(String, String)>,
    Json(options): Json<DeployOptions>,
) -> Result<(StatusCode, Json<DomainRecord>), ApiError> {
    let record = state
        .app
        .deployment_service
        .deploy(&tenant_id, &domain_id, &options)
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Pull-triggered reconciliation response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SyncResponse {
    status: DeploymentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    raw_status: Option<String>,
    /// True when the provider was unreachable and `status` is the cached
    /// value. Raw transport errors are never echoed here.
    sync_pending: bool,
}

/// `POST /api/tenants/{tenant_id}/domains/{domain_id}/sync`
///
/// Pull ingress adapter: runs one reconciliation cycle and returns the
/// best-effort status.
async fn sync_domain(
    State(state): State<ApiState>,
    Path((tenant_id, domain_id)): Path<(String, String)>,
) -> Result<Json<SyncResponse>, ApiError> {
    let outcome = state
        .app
        .reconcile_service
        .reconcile(&tenant_id, &domain_id)
        .await?;

    Ok(Json(SyncResponse {
        status: outcome.status,
        raw_status: outcome.raw_status,
        sync_pending: outcome.warning.is_some(),
    }))
}

/// `GET /api/tenants/{tenant_id}/domains/{domain_id}/artifact`
///
/// Streams the result CSV; the body is never buffered in memory.
async fn download_artifact(
    State(state): State<ApiState>,
    Path((tenant_id, domain_id)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let artifact = state
        .app
        .deployment_service
        .fetch_artifact(&tenant_id, &domain_id)
        .await?;

    let response = Response::builder()
        .header(header::CONTENT_TYPE, artifact.content_type)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{domain_id}.csv\""),
        )
        .body(Body::from_stream(artifact.stream))
        .map_err(|e| ApiError::Internal {
            message: format!("failed to build response: {e}"),
        })?;

    Ok(response.into_response())
}

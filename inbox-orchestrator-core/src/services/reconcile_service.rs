//! Status reconciliation.
//!
//! Single orchestration entry point shared by the pull (sync endpoint) and
//! push (webhook) ingress paths. One cycle: fetch the provider's view of the
//! attached job, translate it, and apply it to the store under the
//! compare-and-set guard.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use inbox_orchestrator_provider::ProviderError;

use crate::error::CoreResult;
use crate::services::ServiceContext;
use crate::traits::{ApplyOutcome, StatusUpdate};
use crate::types::{DeploymentStatus, DomainRecord, JOB_NOT_FOUND};

/// Result of one reconciliation cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileOutcome {
    /// Best-effort internal status after the cycle.
    pub status: DeploymentStatus,
    /// Raw provider status backing it, if any was ever recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_status: Option<String>,
    /// Advisory transport warning. Present when the provider could not be
    /// reached and `status` is the cached value rather than a fresh one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl ReconcileOutcome {
    fn cached(record: &DomainRecord, warning: Option<String>) -> Self {
        Self {
            status: record.status,
            raw_status: record.raw_status.clone(),
            warning,
        }
    }
}

/// Reconciles stored domain state against the provider's job state.
pub struct ReconcileService {
    ctx: Arc<ServiceContext>,
}

impl ReconcileService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Run one reconciliation cycle for a domain.
    ///
    /// `DomainNotFound` is the only hard error: it indicates a caller-side
    /// identity mistake. Provider failures degrade to the cached status
    /// with an advisory warning instead of propagating.
    pub async fn reconcile(&self, tenant_id: &str, domain_id: &str) -> CoreResult<ReconcileOutcome> {
        let record = self.ctx.get_domain(tenant_id, domain_id).await?;

        // No job attached: nothing to reconcile, no network call
        let Some(job_id) = record.job_id.clone() else {
            return Ok(ReconcileOutcome::cached(&record, None));
        };

        // Terminal states are not re-polled; the store guard would reject
        // the write anyway
        if record.status.is_terminal() {
            return Ok(ReconcileOutcome::cached(&record, None));
        }

        let (raw_status, synced_at) = match self.ctx.provider.fetch_status(&job_id).await {
            Ok(snapshot) => (snapshot.raw_status, snapshot.fetched_at),
            Err(ProviderError::JobNotFound { .. }) => {
                // The job vanished server-side; that is a terminal failure
                log::warn!("Job {job_id} unknown to provider, marking domain {domain_id} failed");
                (JOB_NOT_FOUND.to_string(), Utc::now())
            }
            Err(e) => {
                // Degrade to cache: a single polling failure must never
                // flip a domain's displayed status
                if e.is_expected() {
                    log::warn!("Status poll for job {job_id} failed: {e}");
                } else {
                    log::error!("Status poll for job {job_id} failed: {e}");
                }
                return Ok(ReconcileOutcome::cached(&record, Some(e.to_string())));
            }
        };

        let status = if raw_status == JOB_NOT_FOUND {
            DeploymentStatus::Failed
        } else {
            DeploymentStatus::from_raw(&raw_status)
        };

        let update = StatusUpdate {
            job_id: job_id.clone(),
            raw_status: raw_status.clone(),
            status,
            synced_at,
        };

        match self
            .ctx
            .repository
            .apply_status(tenant_id, domain_id, &update)
            .await?
        {
            ApplyOutcome::Applied => Ok(ReconcileOutcome {
                status,
                raw_status: Some(raw_status),
                warning: None,
            }),
            ApplyOutcome::Stale => {
                // Benign race: a concurrent cycle won the conditional
                // write. Return what it wrote, never retry in a loop.
                log::debug!("Stale write for domain {domain_id} (job {job_id}), using stored state");
                let current = self.ctx.get_domain(tenant_id, domain_id).await?;
                Ok(ReconcileOutcome::cached(&current, None))
            }
        }
    }

    /// Run a cycle for whichever domain currently holds `job_id`.
    ///
    /// Push ingress path: callbacks carry only a job id, and their status
    /// field is a hint at best — the cycle still fetches the provider's
    /// authoritative state. Returns `Ok(None)` for unknown or superseded
    /// jobs, which under at-least-once delivery must be a safe no-op.
    pub async fn reconcile_by_job(&self, job_id: &str) -> CoreResult<Option<ReconcileOutcome>> {
        let Some(record) = self.ctx.repository.find_by_job(job_id).await? else {
            log::debug!("Callback for unknown job {job_id}, ignoring");
            return Ok(None);
        };

        self.reconcile(&record.tenant_id, &record.id)
            .await
            .map(Some)
    }
}

//! Deployment submission and artifact retrieval.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use inbox_orchestrator_provider::{
    DomainSetupParameters, JobArtifact, JobSubmission, ProviderError,
};

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::types::{DeploymentStatus, DomainRecord};

/// Deployment options supplied by the caller. The domain name itself comes
/// from the stored record, never from the request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployOptions {
    pub first_name: String,
    pub last_name: String,
    pub redirect_url: String,
    pub admin_email: String,
    pub user_count: u32,
    pub password_base_word: String,
}

/// Submits deployment jobs and streams result artifacts.
pub struct DeploymentService {
    ctx: Arc<ServiceContext>,
}

impl DeploymentService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Submit a deployment job for a domain and link it to the record.
    ///
    /// Resubmission is allowed and replaces any prior job linkage; the old
    /// job keeps running on the provider side but its callbacks become
    /// stale writes and are rejected by the store's guard.
    pub async fn deploy(
        &self,
        tenant_id: &str,
        domain_id: &str,
        options: &DeployOptions,
    ) -> CoreResult<DomainRecord> {
        let record = self.ctx.get_domain(tenant_id, domain_id).await?;

        let submission = JobSubmission::domain_setup(DomainSetupParameters {
            domain_name: record.name.clone(),
            first_name: options.first_name.clone(),
            last_name: options.last_name.clone(),
            redirect_url: options.redirect_url.clone(),
            admin_email: options.admin_email.clone(),
            user_count: options.user_count,
            password_base_word: options.password_base_word.clone(),
        });

        let job_id = self.ctx.provider.submit_job(&submission).await?;

        if let Some(old) = &record.job_id {
            log::warn!(
                "Domain {domain_id}: job {old} superseded by {job_id} (tenant {tenant_id})"
            );
        }

        self.ctx
            .repository
            .attach_job(tenant_id, domain_id, &job_id)
            .await?;

        self.ctx.get_domain(tenant_id, domain_id).await
    }

    /// Stream the result artifact of a deployed domain.
    ///
    /// Only valid once the internal status is `Deployed`; refused before
    /// terminal success without touching the provider.
    pub async fn fetch_artifact(&self, tenant_id: &str, domain_id: &str) -> CoreResult<JobArtifact> {
        let record = self.ctx.get_domain(tenant_id, domain_id).await?;

        let Some(job_id) = record.job_id else {
            return Err(CoreError::NoJobAttached(domain_id.to_string()));
        };

        if record.status != DeploymentStatus::Deployed {
            return Err(CoreError::Provider(ProviderError::ArtifactNotReady {
                job_id,
            }));
        }

        let artifact = self.ctx.provider.fetch_result_artifact(&job_id).await?;
        Ok(artifact)
    }
}

//! Provider abstraction.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{JobArtifact, JobStatusSnapshot, JobSubmission};

/// Common interface for domain deployment providers.
///
/// Implementations are plain HTTP clients: no caching, no persistence, and
/// no interpretation of raw statuses. Translating a raw status into an
/// internal one is the caller's job.
#[async_trait]
pub trait DeploymentProvider: Send + Sync {
    /// Stable provider identifier, e.g. `"inboxing"`.
    fn id(&self) -> &'static str;

    /// Submit a deployment job and return the provider-assigned job id.
    ///
    /// Transient failures are retried a bounded number of times before
    /// surfacing as an error.
    async fn submit_job(&self, submission: &JobSubmission) -> Result<String>;

    /// Fetch the current snapshot of a job.
    ///
    /// Never retries: a slow or failed poll must surface immediately so the
    /// caller can degrade to its cached state instead of blocking.
    async fn fetch_status(&self, job_id: &str) -> Result<JobStatusSnapshot>;

    /// Stream the result artifact of a completed job.
    ///
    /// Returns [`crate::ProviderError::ArtifactNotReady`] while the job is
    /// still running.
    async fn fetch_result_artifact(&self, job_id: &str) -> Result<JobArtifact>;
}

//! Test helpers.
//!
//! Mock provider plus factory functions shared by the service tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use futures::stream;

use inbox_orchestrator_provider::{
    DeploymentProvider, JobArtifact, JobStatusSnapshot, JobSubmission, ProviderError,
};

use crate::memory::InMemoryDomainRepository;
use crate::services::ServiceContext;
use crate::types::DomainRecord;

enum FetchBehavior {
    Report(String),
    Fail(ProviderError),
}

/// Scripted [`DeploymentProvider`] with call counters.
pub struct MockProvider {
    submit_job_id: String,
    fetch: FetchBehavior,
    submit_calls: AtomicUsize,
    fetch_calls: AtomicUsize,
    artifact_calls: AtomicUsize,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::reporting("QUEUED")
    }
}

impl MockProvider {
    /// Submissions succeed with the given job id.
    pub fn submitting(job_id: &str) -> Self {
        Self {
            submit_job_id: job_id.to_string(),
            fetch: FetchBehavior::Report("QUEUED".to_string()),
            submit_calls: AtomicUsize::new(0),
            fetch_calls: AtomicUsize::new(0),
            artifact_calls: AtomicUsize::new(0),
        }
    }

    /// Status polls report the given raw status.
    pub fn reporting(raw_status: &str) -> Self {
        Self {
            submit_job_id: "job-0".to_string(),
            fetch: FetchBehavior::Report(raw_status.to_string()),
            submit_calls: AtomicUsize::new(0),
            fetch_calls: AtomicUsize::new(0),
            artifact_calls: AtomicUsize::new(0),
        }
    }

    /// Status polls fail with the given error.
    pub fn failing(error: ProviderError) -> Self {
        Self {
            submit_job_id: "job-0".to_string(),
            fetch: FetchBehavior::Fail(error),
            submit_calls: AtomicUsize::new(0),
            fetch_calls: AtomicUsize::new(0),
            artifact_calls: AtomicUsize::new(0),
        }
    }

    pub fn submit_calls(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn artifact_calls(&self) -> usize {
        self.artifact_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DeploymentProvider for MockProvider {
    fn id(&self) -> &'static str {
        "mock"
    }

    async fn submit_job(&self, _submission: &JobSubmission) -> Result<String, ProviderError> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.submit_job_id.clone())
    }

    async fn fetch_status(&self, job_id: &str) -> Result<JobStatusSnapshot, ProviderError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        match &self.fetch {
            FetchBehavior::Report(raw) => Ok(JobStatusSnapshot {
                job_id: job_id.to_string(),
                raw_status: raw.clone(),
                error: None,
                fetched_at: Utc::now(),
            }),
            FetchBehavior::Fail(e) => Err(e.clone()),
        }
    }

    async fn fetch_result_artifact(&self, _job_id: &str) -> Result<JobArtifact, ProviderError> {
        self.artifact_calls.fetch_add(1, Ordering::SeqCst);
        Ok(JobArtifact {
            content_type: "text/csv".to_string(),
            stream: Box::pin(stream::iter(vec![Ok(bytes::Bytes::from_static(
                b"email,password\n",
            ))])),
        })
    }
}

/// Build a [`ServiceContext`] over an in-memory repository and the given
/// mock provider. Returns the provider handle separately so tests can read
/// its call counters.
pub fn test_context(provider: MockProvider) -> (Arc<ServiceContext>, Arc<MockProvider>) {
    let provider = Arc::new(provider);
    let repository = Arc::new(InMemoryDomainRepository::new());
    let ctx = Arc::new(ServiceContext::new(
        repository,
        Arc::clone(&provider) as Arc<dyn DeploymentProvider>,
    ));
    (ctx, provider)
}

/// Insert a fresh domain record for a tenant.
pub async fn seed_domain(ctx: &Arc<ServiceContext>, tenant_id: &str, name: &str) -> DomainRecord {
    let record = DomainRecord::new(tenant_id.to_string(), name.to_string());
    ctx.repository
        .create(&record)
        .await
        .expect("seed domain insert");
    record
}

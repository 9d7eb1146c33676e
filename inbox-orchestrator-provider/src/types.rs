//! Wire types for the deployment API.

use std::pin::Pin;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::Stream;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// Raw job status vocabulary as reported by the deployment API.
///
/// This set is closed on the provider side; anything outside it must be
/// treated as unknown by consumers. Do not guess additional codes.
pub mod raw_status {
    /// Job accepted, waiting for a worker.
    pub const QUEUED: &str = "QUEUED";
    /// Worker is provisioning inboxes.
    pub const PROCESSING: &str = "PROCESSING";
    /// Provisioning done, waiting for external DNS confirmation.
    pub const AWAITING_DNS: &str = "AWAITING_DNS";
    /// Completed with no errors.
    pub const COMPLETED_SUCCESS: &str = "COMPLETED_SUCCESS";
    /// Completed, but some inboxes failed.
    pub const COMPLETED_WITH_ERRORS: &str = "COMPLETED_WITH_ERRORS";
    /// The job failed.
    pub const FAILED: &str = "FAILED";
}

/// Parameters for a `DOMAIN_SETUP` job, as required by the deployment API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainSetupParameters {
    /// Domain the inboxes are created under.
    pub domain_name: String,
    /// First name used for the generated mailbox identities.
    pub first_name: String,
    /// Last name used for the generated mailbox identities.
    pub last_name: String,
    /// URL the domain root redirects to after setup.
    pub redirect_url: String,
    /// Tenant admin mailbox address.
    pub admin_email: String,
    /// Number of inboxes to provision.
    pub user_count: u32,
    /// Base word the provider derives mailbox passwords from.
    pub password_base_word: String,
}

/// A job submission payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSubmission {
    /// Job type discriminator understood by the provider.
    pub job_type: String,
    /// Job parameters.
    pub parameters: DomainSetupParameters,
}

impl JobSubmission {
    /// Build a domain setup submission (the only job type this system issues).
    #[must_use]
    pub fn domain_setup(parameters: DomainSetupParameters) -> Self {
        Self {
            job_type: "DOMAIN_SETUP".to_string(),
            parameters,
        }
    }
}

/// A point-in-time view of a job's provider-side state.
///
/// Ephemeral: snapshots are never persisted as such — only the raw status
/// string and its translated projection end up on the domain record. The
/// provider's `parameters` echo is intentionally never captured here, so it
/// cannot leak to untrusted callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStatusSnapshot {
    /// Job id the snapshot belongs to.
    pub job_id: String,
    /// Raw status string from the provider vocabulary.
    pub raw_status: String,
    /// Error detail reported by the provider, if any.
    pub error: Option<String>,
    /// When the snapshot was fetched.
    pub fetched_at: DateTime<Utc>,
}

/// Streamed bytes of a result artifact.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, ProviderError>> + Send>>;

/// A job's result artifact, streamed rather than buffered: exports are
/// unbounded CSV files.
pub struct JobArtifact {
    /// Content type reported by the provider (defaults to `text/csv`).
    pub content_type: String,
    /// The artifact body.
    pub stream: ByteStream,
}

impl std::fmt::Debug for JobArtifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobArtifact")
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}

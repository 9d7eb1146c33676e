//! Domain persistence abstraction trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreResult;
use crate::types::{DeploymentStatus, DomainRecord};

/// Outcome of a conditional status write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyOutcome {
    /// The conditional write took effect.
    Applied,
    /// The guard rejected the write: the stored job id no longer matches,
    /// or the record is already terminal for that job. Benign; the caller
    /// logs and discards, it never retries blindly.
    Stale,
}

/// Parameters of a conditional status write.
#[derive(Debug, Clone)]
pub struct StatusUpdate {
    /// Job id the snapshot was fetched for. The write applies only while
    /// this still equals the stored job id.
    pub job_id: String,
    /// Raw provider status, stored verbatim.
    pub raw_status: String,
    /// Translated internal status.
    pub status: DeploymentStatus,
    /// When the snapshot was taken.
    pub synced_at: DateTime<Utc>,
}

/// Domain repository trait.
///
/// Storage implementations:
/// - `SqliteStore` (`SeaORM`) in the app crate
/// - [`InMemoryDomainRepository`](crate::memory::InMemoryDomainRepository) for tests
///
/// Every operation takes the tenant id and scopes its predicate to it. A
/// domain under the wrong tenant must be indistinguishable from an absent
/// one.
#[async_trait]
pub trait DomainRepository: Send + Sync {
    /// Insert a new domain record.
    ///
    /// Fails with `DomainAlreadyExists` if the tenant already has a domain
    /// with the same name.
    async fn create(&self, record: &DomainRecord) -> CoreResult<()>;

    /// Fetch a single domain.
    async fn find(&self, tenant_id: &str, domain_id: &str) -> CoreResult<Option<DomainRecord>>;

    /// Locate a domain by its currently attached job id, across tenants.
    ///
    /// Used by the push ingress path, where the callback carries only a job
    /// id. Returns `None` for unknown or superseded jobs.
    async fn find_by_job(&self, job_id: &str) -> CoreResult<Option<DomainRecord>>;

    /// List all domains of a tenant, ordered by creation time.
    async fn list_by_tenant(&self, tenant_id: &str) -> CoreResult<Vec<DomainRecord>>;

    /// Link a deployment job to a domain.
    ///
    /// Sets status to `Pending`, clears the raw status and last-synced
    /// marker, and overwrites any prior job linkage (replacement
    /// semantics). Fails with `DomainNotFound` if the tenant/domain pair is
    /// absent.
    async fn attach_job(&self, tenant_id: &str, domain_id: &str, job_id: &str) -> CoreResult<()>;

    /// Conditionally apply a status snapshot.
    ///
    /// The write happens **only if** the stored job id still equals
    /// `update.job_id` **and** the stored status is not already terminal.
    /// Both guards are one atomic conditional write, never a read followed
    /// by a write; two concurrent reconciliation attempts for the same
    /// domain are serialized by this compare-and-set, not by locking.
    ///
    /// Returns [`ApplyOutcome::Stale`] when the guard rejects the write and
    /// `DomainNotFound` when the tenant/domain pair is absent.
    async fn apply_status(
        &self,
        tenant_id: &str,
        domain_id: &str,
        update: &StatusUpdate,
    ) -> CoreResult<ApplyOutcome>;

    /// Delete a domain. Fails with `DomainNotFound` if absent.
    async fn delete(&self, tenant_id: &str, domain_id: &str) -> CoreResult<()>;
}

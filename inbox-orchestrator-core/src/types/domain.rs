//! Domain record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::status::DeploymentStatus;

/// A tenant-scoped domain row.
///
/// Invariants maintained by the repository layer:
/// - `status == NotStarted` implies `job_id` is `None`.
/// - `job_id` is `Some` for every other status.
/// - `last_synced` is set only by a successful status apply, and cleared
///   when a new job is attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainRecord {
    /// Owning tenant. Part of every lookup predicate.
    pub tenant_id: String,
    /// Stable identifier within the tenant.
    pub id: String,
    /// Fully qualified domain name.
    pub name: String,
    /// Currently linked deployment job, if any. At most one active job per
    /// domain; attaching a new job replaces the old linkage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    /// Last raw status string reported by the provider, kept verbatim for
    /// diagnostics.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_status: Option<String>,
    /// Internal status derived from `raw_status`.
    pub status: DeploymentStatus,
    /// When the status was last confirmed against the provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_synced: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DomainRecord {
    /// Create a fresh record with no job attached.
    #[must_use]
    pub fn new(tenant_id: String, name: String) -> Self {
        let now = Utc::now();
        Self {
            tenant_id,
            id: uuid::Uuid::new_v4().to_string(),
            name,
            job_id: None,
            raw_status: None,
            status: DeploymentStatus::NotStarted,
            last_synced: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Request payload for registering a domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDomain {
    pub name: String,
}

//! Internal deployment status and the raw-to-internal translation.

use serde::{Deserialize, Serialize};

use inbox_orchestrator_provider::raw_status;

/// Raw status stored when the provider reports a job id as unknown.
///
/// Not part of the provider vocabulary; recorded so the UI can distinguish
/// "job vanished server-side" from an ordinary failure.
pub const JOB_NOT_FOUND: &str = "JOB_NOT_FOUND";

/// Internal deployment status of a domain.
///
/// This is the closed vocabulary every consumer sees; raw provider strings
/// never leave the reconciliation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentStatus {
    /// No deployment job has ever been attached.
    NotStarted,
    /// A job is attached and not yet terminal.
    Pending,
    /// The job completed. Terminal.
    Deployed,
    /// The job failed or vanished server-side. Terminal.
    Failed,
}

impl DeploymentStatus {
    /// Translate a provider-native raw status into an internal status.
    ///
    /// Total over all strings. Unrecognized codes (including empty) map to
    /// [`Pending`](Self::Pending): an unknown status must never be
    /// misreported as terminal, so unknowns fail open to the re-pollable
    /// state. Matching is case-insensitive; providers have been observed to
    /// change casing between API versions.
    ///
    /// `COMPLETED_WITH_ERRORS` counts as success: the job finished and
    /// produced an artifact, partial per-inbox errors are recorded in the
    /// raw status kept alongside.
    #[must_use]
    pub fn from_raw(raw: &str) -> Self {
        let normalized = raw.trim().to_ascii_uppercase();
        match normalized.as_str() {
            raw_status::COMPLETED_SUCCESS | raw_status::COMPLETED_WITH_ERRORS => Self::Deployed,
            raw_status::FAILED => Self::Failed,
            _ => Self::Pending,
        }
    }

    /// Whether this status is terminal (no outgoing transitions except a
    /// full job replacement).
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Deployed | Self::Failed)
    }

    /// Storage representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::Pending => "pending",
            Self::Deployed => "deployed",
            Self::Failed => "failed",
        }
    }

    /// Parse the storage representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "not_started" => Some(Self::NotStarted),
            "pending" => Some(Self::Pending),
            "deployed" => Some(Self::Deployed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

impl std::fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

use serde::{Deserialize, Serialize};

/// Unified error type for all deployment provider operations.
///
/// All variants are serializable for structured error reporting.
///
/// # Transient Errors
///
/// The following variants represent failures that may succeed on retry:
/// - [`Unavailable`](Self::Unavailable) — network connectivity issues or upstream gateway errors
/// - [`Timeout`](Self::Timeout) — request timed out
/// - [`RateLimited`](Self::RateLimited) — API rate limit exceeded
/// - [`Server`](Self::Server) — upstream 5xx
///
/// Only job submission is retried by the client itself; status polls are
/// never retried automatically so that retry policy stays with the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum ProviderError {
    /// A network-level error occurred (DNS resolution failure, connection
    /// refused, upstream gateway unavailable).
    Unavailable {
        /// Error details.
        detail: String,
    },

    /// The HTTP request timed out.
    Timeout {
        /// Error details.
        detail: String,
    },

    /// The API rate limit has been exceeded (HTTP 429).
    RateLimited {
        /// Suggested wait time in seconds before retrying, if provided by the API.
        retry_after: Option<u64>,
        /// Original error message from the provider API, if available.
        raw_message: Option<String>,
    },

    /// The provider rejected the request as invalid (HTTP 4xx).
    ///
    /// Permanent: the same payload will be rejected again. The provider's
    /// diagnostic is echoed back for the caller.
    Rejected {
        /// HTTP status code returned by the provider.
        status: u16,
        /// Diagnostic message from the provider API.
        detail: String,
    },

    /// The provider failed server-side (HTTP 5xx).
    Server {
        /// HTTP status code returned by the provider.
        status: u16,
        /// Error details.
        detail: String,
    },

    /// The provider does not know the given job id.
    JobNotFound {
        /// Job id that was not found.
        job_id: String,
    },

    /// The result artifact was requested before the job reached terminal success.
    ArtifactNotReady {
        /// Job id whose artifact is not yet available.
        job_id: String,
    },

    /// The configured API key is invalid or expired.
    InvalidCredentials {
        /// Original error message from the provider API, if available.
        raw_message: Option<String>,
    },

    /// Failed to parse the provider's API response.
    ParseError {
        /// Details about the parse failure.
        detail: String,
    },

    /// Failed to serialize a request body.
    SerializationError {
        /// Details about the serialization failure.
        detail: String,
    },
}

impl ProviderError {
    /// Whether the failure is transient and worth retrying.
    ///
    /// Business errors (rejected payload, unknown job, bad credentials) are
    /// permanent and must not be retried.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Unavailable { .. }
                | Self::Timeout { .. }
                | Self::RateLimited { .. }
                | Self::Server { .. }
        )
    }

    /// Whether this is expected behavior (bad input, resource absent) — used
    /// for log level selection.
    ///
    /// Log at `warn` when this returns `true`, at `error` when `false`.
    /// **Update this method when adding variants.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::Rejected { .. }
                | Self::JobNotFound { .. }
                | Self::ArtifactNotReady { .. }
                | Self::InvalidCredentials { .. }
        )
    }
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable { detail } => {
                write!(f, "Provider unavailable: {detail}")
            }
            Self::Timeout { detail } => {
                write!(f, "Request timeout: {detail}")
            }
            Self::RateLimited { retry_after, .. } => {
                if let Some(secs) = retry_after {
                    write!(f, "Rate limited (retry after {secs}s)")
                } else {
                    write!(f, "Rate limited")
                }
            }
            Self::Rejected { status, detail } => {
                write!(f, "Request rejected (HTTP {status}): {detail}")
            }
            Self::Server { status, detail } => {
                write!(f, "Provider error (HTTP {status}): {detail}")
            }
            Self::JobNotFound { job_id } => {
                write!(f, "Job '{job_id}' not found")
            }
            Self::ArtifactNotReady { job_id } => {
                write!(f, "Result artifact for job '{job_id}' is not ready")
            }
            Self::InvalidCredentials { raw_message } => {
                if let Some(msg) = raw_message {
                    write!(f, "Invalid credentials: {msg}")
                } else {
                    write!(f, "Invalid credentials")
                }
            }
            Self::ParseError { detail } => {
                write!(f, "Failed to parse provider response: {detail}")
            }
            Self::SerializationError { detail } => {
                write!(f, "Failed to serialize request: {detail}")
            }
        }
    }
}

impl std::error::Error for ProviderError {}

/// Provider layer Result type alias.
pub type Result<T> = std::result::Result<T, ProviderError>;

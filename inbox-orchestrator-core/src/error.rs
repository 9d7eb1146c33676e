//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

// Re-export library error type
pub use inbox_orchestrator_provider::ProviderError;

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Domain not found under the given tenant.
    ///
    /// Deliberately identical whether the domain never existed or belongs to
    /// a different tenant; the distinction must not leak across tenants.
    #[error("Domain not found: {0}")]
    DomainNotFound(String),

    /// Domain already registered for this tenant
    #[error("Domain already exists: {0}")]
    DomainAlreadyExists(String),

    /// No deployment job attached to the domain
    #[error("No job attached to domain: {0}")]
    NoJobAttached(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Storage layer error
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Provider error (converted from the provider library)
    #[error("{0}")]
    Provider(#[from] ProviderError),
}

impl CoreError {
    /// Whether this is expected behavior (user input, resource does not
    /// exist, etc.), used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error`
    /// when returning `false`.
    /// **Please update this method simultaneously when new variants are added.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::DomainNotFound(_)
            | Self::DomainAlreadyExists(_)
            | Self::NoJobAttached(_)
            | Self::ValidationError(_) => true,
            Self::Provider(e) => e.is_expected(),
            Self::SerializationError(_) | Self::StorageError(_) => false,
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;

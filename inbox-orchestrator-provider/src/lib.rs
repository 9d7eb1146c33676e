//! # inbox-orchestrator-provider
//!
//! A deployment provider abstraction library for submitting bulk domain
//! deployment jobs and polling their status.
//!
//! ## Supported Providers
//!
//! | Provider | Auth Method |
//! |----------|-------------|
//! | [Inboxing](https://app.inboxing.com/) | `X-API-Key` header |
//!
//! ## TLS Backend
//!
//! - **`native-tls`** *(default)* — Use the platform's native TLS implementation.
//! - **`rustls`** — Use rustls. Recommended for cross-compilation.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use inbox_orchestrator_provider::{
//!     create_provider, DeploymentProvider, JobSubmission, ProviderCredentials,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // 1. Create a provider from credentials
//!     let provider = create_provider(ProviderCredentials::Inboxing {
//!         api_key: "your-key".to_string(),
//!     });
//!
//!     // 2. Submit a deployment job
//!     let submission = JobSubmission::domain_setup(
//!         inbox_orchestrator_provider::DomainSetupParameters {
//!             domain_name: "example.com".to_string(),
//!             first_name: "Ada".to_string(),
//!             last_name: "Lovelace".to_string(),
//!             redirect_url: "https://example.com".to_string(),
//!             admin_email: "admin@example.com".to_string(),
//!             user_count: 5,
//!             password_base_word: "secret".to_string(),
//!         },
//!     );
//!     let job_id = provider.submit_job(&submission).await?;
//!
//!     // 3. Poll the job
//!     let snapshot = provider.fetch_status(&job_id).await?;
//!     println!("{}: {}", snapshot.job_id, snapshot.raw_status);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All provider operations return [`Result<T, ProviderError>`](ProviderError).
//! The error enum provides structured variants for common failure modes:
//!
//! - [`ProviderError::InvalidCredentials`] — authentication failed
//! - [`ProviderError::JobNotFound`] — the provider no longer knows the job
//! - [`ProviderError::RateLimited`] — API rate limit exceeded (retryable)
//! - [`ProviderError::Unavailable`] — network connectivity issue (retryable)
//!
//! Job submission retries transient errors with exponential backoff. Status
//! polls deliberately never retry: callers are expected to degrade to their
//! cached view and poll again later.

mod client;
mod error;
mod factory;
mod http;
mod traits;
mod types;

// Re-export error types
pub use error::{ProviderError, Result};

// Re-export factory functions
pub use factory::{create_provider, ProviderCredentials};

// Re-export core trait only
pub use traits::DeploymentProvider;

// Re-export types
pub use types::{
    raw_status, ByteStream, DomainSetupParameters, JobArtifact, JobStatusSnapshot, JobSubmission,
};

// Re-export concrete provider
pub use client::InboxingClient;

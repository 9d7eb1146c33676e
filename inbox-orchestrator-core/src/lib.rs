//! Inbox Orchestrator Core Library
//!
//! Provides the reconciliation logic for domain deployment status, including:
//! - Status translation (raw provider codes to the internal vocabulary)
//! - Domain catalog management (Catalog Service)
//! - Job submission and artifact retrieval (Deployment Service)
//! - Status reconciliation under compare-and-set guards (Reconcile Service)
//!
//! This library is storage-agnostic: persistence is abstracted behind the
//! [`DomainRepository`] trait, with a `SeaORM` sqlite implementation in the
//! app crate and an in-memory one in [`memory`] for tests.

pub mod error;
pub mod memory;
pub mod services;
pub mod traits;
pub mod types;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use error::{CoreError, CoreResult};
pub use services::ServiceContext;
pub use traits::{ApplyOutcome, DomainRepository, StatusUpdate};
pub use types::{DeploymentStatus, DomainRecord, NewDomain, JOB_NOT_FOUND};

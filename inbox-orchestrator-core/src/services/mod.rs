//! Business logic service layer

mod catalog_service;
mod deployment_service;
mod reconcile_service;

pub use catalog_service::CatalogService;
pub use deployment_service::{DeployOptions, DeploymentService};
pub use reconcile_service::{ReconcileOutcome, ReconcileService};

use std::sync::Arc;

use inbox_orchestrator_provider::DeploymentProvider;

use crate::error::{CoreError, CoreResult};
use crate::traits::DomainRepository;
use crate::types::DomainRecord;

/// Service context - holds all dependencies.
///
/// The platform layer creates this context and injects its storage
/// implementation and an explicitly constructed provider client. Nothing in
/// here is a process-wide singleton.
pub struct ServiceContext {
    /// Domain persistence
    pub repository: Arc<dyn DomainRepository>,
    /// Deployment provider client
    pub provider: Arc<dyn DeploymentProvider>,
}

impl ServiceContext {
    /// Create a service context
    #[must_use]
    pub fn new(repository: Arc<dyn DomainRepository>, provider: Arc<dyn DeploymentProvider>) -> Self {
        Self {
            repository,
            provider,
        }
    }

    /// Load a domain, mapping absence to `DomainNotFound`.
    ///
    /// "Absent" and "exists under another tenant" are the same error by
    /// construction: the repository predicate is tenant-scoped.
    pub async fn get_domain(&self, tenant_id: &str, domain_id: &str) -> CoreResult<DomainRecord> {
        self.repository
            .find(tenant_id, domain_id)
            .await?
            .ok_or_else(|| CoreError::DomainNotFound(domain_id.to_string()))
    }
}

//! Domain catalog service.

use std::sync::Arc;

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::types::{DomainRecord, NewDomain};

/// Tenant-scoped domain catalog: registration, listing, removal.
pub struct CatalogService {
    ctx: Arc<ServiceContext>,
}

impl CatalogService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// List all domains of a tenant with their current internal status.
    pub async fn list_domains(&self, tenant_id: &str) -> CoreResult<Vec<DomainRecord>> {
        self.ctx.repository.list_by_tenant(tenant_id).await
    }

    /// Fetch one domain.
    pub async fn get_domain(&self, tenant_id: &str, domain_id: &str) -> CoreResult<DomainRecord> {
        self.ctx.get_domain(tenant_id, domain_id).await
    }

    /// Register a new domain for a tenant. No deployment job is attached
    /// yet; the record starts as `NotStarted`.
    pub async fn register_domain(
        &self,
        tenant_id: &str,
        request: &NewDomain,
    ) -> CoreResult<DomainRecord> {
        let name = request.name.trim().to_ascii_lowercase();
        validate_domain_name(&name)?;

        let record = DomainRecord::new(tenant_id.to_string(), name);
        self.ctx.repository.create(&record).await?;

        log::info!(
            "Registered domain {} ({}) for tenant {tenant_id}",
            record.name,
            record.id
        );
        Ok(record)
    }

    /// Remove a domain from the catalog.
    ///
    /// Any still-running provider job is left to finish unobserved; the
    /// provider has no cancellation API.
    pub async fn delete_domain(&self, tenant_id: &str, domain_id: &str) -> CoreResult<()> {
        self.ctx.repository.delete(tenant_id, domain_id).await?;
        log::info!("Deleted domain {domain_id} for tenant {tenant_id}");
        Ok(())
    }
}

/// Minimal structural check; full RFC validation belongs to the provider.
fn validate_domain_name(name: &str) -> CoreResult<()> {
    if name.is_empty() {
        return Err(CoreError::ValidationError(
            "domain name must not be empty".to_string(),
        ));
    }
    if name.len() > 253 {
        return Err(CoreError::ValidationError(
            "domain name exceeds 253 characters".to_string(),
        ));
    }
    if !name.contains('.') || name.starts_with('.') || name.ends_with('.') {
        return Err(CoreError::ValidationError(format!(
            "invalid domain name: {name}"
        )));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    {
        return Err(CoreError::ValidationError(format!(
            "domain name contains invalid characters: {name}"
        )));
    }
    Ok(())
}

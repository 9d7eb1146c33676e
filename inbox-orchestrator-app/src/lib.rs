//! Application bootstrap for Inbox Orchestrator.
//!
//! Provides `AppState` (service container) and `AppStateBuilder` (adapter
//! injection), plus the SQLite storage adapter. Every frontend constructs an
//! `AppState` once at startup and shares it across request handlers.

pub mod adapters;

use std::sync::Arc;

use inbox_orchestrator_core::error::{CoreError, CoreResult};
use inbox_orchestrator_core::services::{
    CatalogService, DeploymentService, ReconcileService, ServiceContext,
};
use inbox_orchestrator_core::traits::DomainRepository;
use inbox_orchestrator_provider::{create_provider, DeploymentProvider, ProviderCredentials};

pub use adapters::SqliteStore;

/// Application state: the service context plus one instance of each service.
pub struct AppState {
    /// Service context (storage adapter + provider client)
    pub ctx: Arc<ServiceContext>,
    /// Domain catalog service
    pub catalog_service: CatalogService,
    /// Deployment submission service
    pub deployment_service: DeploymentService,
    /// Status reconciliation service
    pub reconcile_service: ReconcileService,
}

impl AppState {
    #[must_use]
    pub fn builder() -> AppStateBuilder {
        AppStateBuilder::default()
    }
}

/// Builder injecting the storage adapter and provider client into
/// [`AppState`].
#[derive(Default)]
pub struct AppStateBuilder {
    repository: Option<Arc<dyn DomainRepository>>,
    provider: Option<Arc<dyn DeploymentProvider>>,
}

impl AppStateBuilder {
    #[must_use]
    pub fn with_repository(mut self, repository: Arc<dyn DomainRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    #[must_use]
    pub fn with_provider(mut self, provider: Arc<dyn DeploymentProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Construct the provider client from credentials.
    #[must_use]
    pub fn with_credentials(mut self, credentials: ProviderCredentials) -> Self {
        self.provider = Some(create_provider(credentials));
        self
    }

    /// Build the application state.
    ///
    /// # Errors
    /// Returns `ValidationError` if the repository or provider is missing.
    pub fn build(self) -> CoreResult<AppState> {
        let repository = self
            .repository
            .ok_or_else(|| CoreError::ValidationError("repository not configured".to_string()))?;
        let provider = self
            .provider
            .ok_or_else(|| CoreError::ValidationError("provider not configured".to_string()))?;

        let ctx = Arc::new(ServiceContext::new(repository, provider));

        Ok(AppState {
            catalog_service: CatalogService::new(Arc::clone(&ctx)),
            deployment_service: DeploymentService::new(Arc::clone(&ctx)),
            reconcile_service: ReconcileService::new(Arc::clone(&ctx)),
            ctx,
        })
    }
}

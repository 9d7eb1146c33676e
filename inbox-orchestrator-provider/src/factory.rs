//! Provider factory.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::client::InboxingClient;
use crate::traits::DeploymentProvider;

/// Credentials for a deployment provider, tagged by provider kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "snake_case")]
pub enum ProviderCredentials {
    Inboxing { api_key: String },
}

/// Creates a [`DeploymentProvider`] instance from the given credentials.
///
/// The concrete provider type is determined by the [`ProviderCredentials`]
/// variant. The returned provider is wrapped in `Arc<dyn DeploymentProvider>`
/// for easy sharing across async tasks.
#[must_use]
pub fn create_provider(credentials: ProviderCredentials) -> Arc<dyn DeploymentProvider> {
    match credentials {
        ProviderCredentials::Inboxing { api_key } => Arc::new(InboxingClient::new(api_key)),
    }
}

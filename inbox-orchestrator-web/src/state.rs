//! Shared state for API handlers.

use std::sync::Arc;

use inbox_orchestrator_app::AppState;

/// Shared state cloned into every handler.
#[derive(Clone)]
pub struct ApiState {
    /// Service container.
    pub app: Arc<AppState>,
    /// Shared secret for webhook signature verification. Callbacks are
    /// rejected while unset.
    pub webhook_secret: Option<Arc<str>>,
}

impl ApiState {
    #[must_use]
    pub fn new(app: Arc<AppState>, webhook_secret: Option<String>) -> Self {
        Self {
            app,
            webhook_secret: webhook_secret.map(Arc::from),
        }
    }
}

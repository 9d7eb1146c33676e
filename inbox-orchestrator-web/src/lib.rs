//! HTTP API server for Inbox Orchestrator.
//!
//! Two ingress adapters funnel into the same reconciliation entry point:
//! the tenant-facing sync endpoint (pull) and the provider webhook (push).

pub mod config;
pub mod error;
pub mod router;
pub mod routes;
pub mod state;

pub use config::AppConfig;
pub use router::api_router;
pub use state::ApiState;

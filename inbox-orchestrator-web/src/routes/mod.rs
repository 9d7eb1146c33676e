//! Route groups.

pub mod domains;
pub mod webhooks;

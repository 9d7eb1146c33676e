//! Core type definitions

mod domain;
mod status;

pub use domain::{DomainRecord, NewDomain};
pub use status::{DeploymentStatus, JOB_NOT_FOUND};

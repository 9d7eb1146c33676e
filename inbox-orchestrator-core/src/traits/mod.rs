//! Storage abstraction traits

mod domain_repository;

pub use domain_repository::{ApplyOutcome, DomainRepository, StatusUpdate};

//! In-memory repository implementation.
//!
//! Backs unit tests and lightweight single-process deployments. The sqlite
//! implementation in the app crate is the production store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{CoreError, CoreResult};
use crate::traits::{ApplyOutcome, DomainRepository, StatusUpdate};
use crate::types::{DeploymentStatus, DomainRecord};

/// Map-backed [`DomainRepository`].
///
/// All mutations run inside a single write-lock critical section, which is
/// what makes `apply_status` an atomic compare-and-set here.
#[derive(Default)]
pub struct InMemoryDomainRepository {
    // keyed by (tenant_id, domain_id)
    records: RwLock<HashMap<(String, String), DomainRecord>>,
}

impl InMemoryDomainRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DomainRepository for InMemoryDomainRepository {
    async fn create(&self, record: &DomainRecord) -> CoreResult<()> {
        let mut records = self.records.write().await;
        let duplicate = records
            .values()
            .any(|r| r.tenant_id == record.tenant_id && r.name == record.name);
        if duplicate {
            return Err(CoreError::DomainAlreadyExists(record.name.clone()));
        }
        records.insert(
            (record.tenant_id.clone(), record.id.clone()),
            record.clone(),
        );
        Ok(())
    }

    async fn find(&self, tenant_id: &str, domain_id: &str) -> CoreResult<Option<DomainRecord>> {
        let records = self.records.read().await;
        Ok(records
            .get(&(tenant_id.to_string(), domain_id.to_string()))
            .cloned())
    }

    async fn find_by_job(&self, job_id: &str) -> CoreResult<Option<DomainRecord>> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .find(|r| r.job_id.as_deref() == Some(job_id))
            .cloned())
    }

    async fn list_by_tenant(&self, tenant_id: &str) -> CoreResult<Vec<DomainRecord>> {
        let records = self.records.read().await;
        let mut result: Vec<DomainRecord> = records
            .values()
            .filter(|r| r.tenant_id == tenant_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(result)
    }

    async fn attach_job(&self, tenant_id: &str, domain_id: &str, job_id: &str) -> CoreResult<()> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(&(tenant_id.to_string(), domain_id.to_string()))
            .ok_or_else(|| CoreError::DomainNotFound(domain_id.to_string()))?;

        record.job_id = Some(job_id.to_string());
        record.status = DeploymentStatus::Pending;
        record.raw_status = None;
        record.last_synced = None;
        record.updated_at = chrono::Utc::now();
        Ok(())
    }

    async fn apply_status(
        &self,
        tenant_id: &str,
        domain_id: &str,
        update: &StatusUpdate,
    ) -> CoreResult<ApplyOutcome> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(&(tenant_id.to_string(), domain_id.to_string()))
            .ok_or_else(|| CoreError::DomainNotFound(domain_id.to_string()))?;

        // CAS guard: job id must still match, and a terminal status for
        // that job must not be regressed by a stale snapshot
        if record.job_id.as_deref() != Some(update.job_id.as_str())
            || record.status.is_terminal()
        {
            return Ok(ApplyOutcome::Stale);
        }

        record.raw_status = Some(update.raw_status.clone());
        record.status = update.status;
        record.last_synced = Some(update.synced_at);
        record.updated_at = chrono::Utc::now();
        Ok(ApplyOutcome::Applied)
    }

    async fn delete(&self, tenant_id: &str, domain_id: &str) -> CoreResult<()> {
        let mut records = self.records.write().await;
        records
            .remove(&(tenant_id.to_string(), domain_id.to_string()))
            .map(|_| ())
            .ok_or_else(|| CoreError::DomainNotFound(domain_id.to_string()))
    }
}

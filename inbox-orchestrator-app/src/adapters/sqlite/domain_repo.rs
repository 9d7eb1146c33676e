//! `DomainRepository` implementation for `SqliteStore`.

use async_trait::async_trait;

use sea_orm::{
    ActiveValue::Set,
    ColumnTrait, EntityTrait, QueryFilter, QueryOrder,
    sea_query::Expr,
};

use inbox_orchestrator_core::error::{CoreError, CoreResult};
use inbox_orchestrator_core::traits::{ApplyOutcome, DomainRepository, StatusUpdate};
use inbox_orchestrator_core::types::{DeploymentStatus, DomainRecord};

use super::SqliteStore;
use super::entity::domain;

/// Statuses the conditional write is allowed to replace.
const NON_TERMINAL: [&str; 2] = ["not_started", "pending"];

impl domain::Model {
    /// Convert a `SeaORM` row model into a [`DomainRecord`].
    fn into_record(self) -> CoreResult<DomainRecord> {
        let status = DeploymentStatus::parse(&self.status).ok_or_else(|| {
            CoreError::SerializationError(format!("Invalid stored status: {}", self.status))
        })?;

        let last_synced = self.last_synced.map(|s| parse_rfc3339(&s)).transpose()?;
        let created_at = parse_rfc3339(&self.created_at)?;
        let updated_at = parse_rfc3339(&self.updated_at)?;

        Ok(DomainRecord {
            tenant_id: self.tenant_id,
            id: self.id,
            name: self.name,
            job_id: self.job_id,
            raw_status: self.raw_status,
            status,
            last_synced,
            created_at,
            updated_at,
        })
    }
}

fn parse_rfc3339(s: &str) -> CoreResult<chrono::DateTime<chrono::Utc>> {
    chrono::DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&chrono::Utc))
        .map_err(|e| CoreError::SerializationError(format!("Invalid timestamp: {e}")))
}

/// Convert a domain record into a `SeaORM` active model for insert.
fn record_to_active_model(record: &DomainRecord) -> domain::ActiveModel {
    domain::ActiveModel {
        tenant_id: Set(record.tenant_id.clone()),
        id: Set(record.id.clone()),
        name: Set(record.name.clone()),
        job_id: Set(record.job_id.clone()),
        raw_status: Set(record.raw_status.clone()),
        status: Set(record.status.as_str().to_string()),
        last_synced: Set(record.last_synced.map(|dt| dt.to_rfc3339())),
        created_at: Set(record.created_at.to_rfc3339()),
        updated_at: Set(record.updated_at.to_rfc3339()),
    }
}

#[async_trait]
impl DomainRepository for SqliteStore {
    async fn create(&self, record: &DomainRecord) -> CoreResult<()> {
        let existing = domain::Entity::find()
            .filter(domain::Column::TenantId.eq(&record.tenant_id))
            .filter(domain::Column::Name.eq(&record.name))
            .one(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to query domain: {e}")))?;
        if existing.is_some() {
            return Err(CoreError::DomainAlreadyExists(record.name.clone()));
        }

        domain::Entity::insert(record_to_active_model(record))
            .exec(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to insert domain: {e}")))?;
        Ok(())
    }

    async fn find(&self, tenant_id: &str, domain_id: &str) -> CoreResult<Option<DomainRecord>> {
        let row = domain::Entity::find_by_id((tenant_id.to_string(), domain_id.to_string()))
            .one(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to query domain: {e}")))?;

        row.map(domain::Model::into_record).transpose()
    }

    async fn find_by_job(&self, job_id: &str) -> CoreResult<Option<DomainRecord>> {
        let row = domain::Entity::find()
            .filter(domain::Column::JobId.eq(job_id))
            .one(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to query domain by job: {e}")))?;

        row.map(domain::Model::into_record).transpose()
    }

    async fn list_by_tenant(&self, tenant_id: &str) -> CoreResult<Vec<DomainRecord>> {
        let rows = domain::Entity::find()
            .filter(domain::Column::TenantId.eq(tenant_id))
            .order_by_asc(domain::Column::CreatedAt)
            .order_by_asc(domain::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to list domains: {e}")))?;

        rows.into_iter().map(domain::Model::into_record).collect()
    }

    async fn attach_job(&self, tenant_id: &str, domain_id: &str, job_id: &str) -> CoreResult<()> {
        let result = domain::Entity::update_many()
            .col_expr(domain::Column::JobId, Expr::value(job_id))
            .col_expr(
                domain::Column::Status,
                Expr::value(DeploymentStatus::Pending.as_str()),
            )
            .col_expr(domain::Column::RawStatus, Expr::value(Option::<String>::None))
            .col_expr(
                domain::Column::LastSynced,
                Expr::value(Option::<String>::None),
            )
            .col_expr(
                domain::Column::UpdatedAt,
                Expr::value(chrono::Utc::now().to_rfc3339()),
            )
            .filter(domain::Column::TenantId.eq(tenant_id))
            .filter(domain::Column::Id.eq(domain_id))
            .exec(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to attach job: {e}")))?;

        if result.rows_affected == 0 {
            return Err(CoreError::DomainNotFound(domain_id.to_string()));
        }
        Ok(())
    }

    async fn apply_status(
        &self,
        tenant_id: &str,
        domain_id: &str,
        update: &StatusUpdate,
    ) -> CoreResult<ApplyOutcome> {
        // Single conditional UPDATE: the job-id equality and non-terminal
        // preconditions live in the WHERE clause, so the database serializes
        // racing reconciliation attempts.
        let result = domain::Entity::update_many()
            .col_expr(
                domain::Column::RawStatus,
                Expr::value(update.raw_status.as_str()),
            )
            .col_expr(domain::Column::Status, Expr::value(update.status.as_str()))
            .col_expr(
                domain::Column::LastSynced,
                Expr::value(update.synced_at.to_rfc3339()),
            )
            .col_expr(
                domain::Column::UpdatedAt,
                Expr::value(chrono::Utc::now().to_rfc3339()),
            )
            .filter(domain::Column::TenantId.eq(tenant_id))
            .filter(domain::Column::Id.eq(domain_id))
            .filter(domain::Column::JobId.eq(update.job_id.as_str()))
            .filter(domain::Column::Status.is_in(NON_TERMINAL))
            .exec(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to apply status: {e}")))?;

        if result.rows_affected > 0 {
            return Ok(ApplyOutcome::Applied);
        }

        // Zero rows: the row is either absent or the guard rejected the
        // write. A follow-up read only classifies, it never re-applies.
        match self.find(tenant_id, domain_id).await? {
            None => Err(CoreError::DomainNotFound(domain_id.to_string())),
            Some(_) => Ok(ApplyOutcome::Stale),
        }
    }

    async fn delete(&self, tenant_id: &str, domain_id: &str) -> CoreResult<()> {
        let result = domain::Entity::delete_many()
            .filter(domain::Column::TenantId.eq(tenant_id))
            .filter(domain::Column::Id.eq(domain_id))
            .exec(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to delete domain: {e}")))?;

        if result.rows_affected == 0 {
            return Err(CoreError::DomainNotFound(domain_id.to_string()));
        }
        Ok(())
    }
}

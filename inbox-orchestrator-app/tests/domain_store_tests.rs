#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
//! Integration tests for `SqliteStore` — covers the `DomainRepository`
//! trait implementation, in particular the conditional status write.

use chrono::Utc;

use inbox_orchestrator_app::adapters::SqliteStore;
use inbox_orchestrator_core::error::CoreError;
use inbox_orchestrator_core::traits::{ApplyOutcome, DomainRepository, StatusUpdate};
use inbox_orchestrator_core::types::{DeploymentStatus, DomainRecord};

// ===== Helpers =====

async fn create_test_store() -> (SqliteStore, tempfile::TempDir) {
    let tmp = tempfile::tempdir().expect("failed to create temp dir");
    let db_path = tmp.path().join("test.db");
    let store = SqliteStore::new(&db_path)
        .await
        .expect("failed to create SqliteStore");
    (store, tmp)
}

async fn seed_domain(store: &SqliteStore, tenant_id: &str, name: &str) -> DomainRecord {
    let record = DomainRecord::new(tenant_id.to_string(), name.to_string());
    store.create(&record).await.expect("insert domain");
    record
}

fn status_update(job_id: &str, raw: &str, status: DeploymentStatus) -> StatusUpdate {
    StatusUpdate {
        job_id: job_id.to_string(),
        raw_status: raw.to_string(),
        status,
        synced_at: Utc::now(),
    }
}

// ===== Catalog =====

#[tokio::test]
async fn list_empty_tenant() {
    let (store, _tmp) = create_test_store().await;
    let domains = store.list_by_tenant("t1").await.unwrap();
    assert!(domains.is_empty());
}

#[tokio::test]
async fn create_and_find_roundtrip() {
    let (store, _tmp) = create_test_store().await;
    let record = seed_domain(&store, "t1", "example.com").await;

    let loaded = store.find("t1", &record.id).await.unwrap().expect("found");
    assert_eq!(loaded, record);
}

#[tokio::test]
async fn create_duplicate_name_rejected() {
    let (store, _tmp) = create_test_store().await;
    seed_domain(&store, "t1", "example.com").await;

    let dup = DomainRecord::new("t1".to_string(), "example.com".to_string());
    assert!(matches!(
        store.create(&dup).await,
        Err(CoreError::DomainAlreadyExists(_))
    ));

    // same name under another tenant is allowed
    seed_domain(&store, "t2", "example.com").await;
}

#[tokio::test]
async fn find_wrong_tenant_is_absent() {
    let (store, _tmp) = create_test_store().await;
    let record = seed_domain(&store, "t1", "example.com").await;

    assert!(store.find("t2", &record.id).await.unwrap().is_none());
}

#[tokio::test]
async fn list_is_tenant_scoped_and_ordered() {
    let (store, _tmp) = create_test_store().await;
    let a = seed_domain(&store, "t1", "a.com").await;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let b = seed_domain(&store, "t1", "b.com").await;
    seed_domain(&store, "t2", "c.com").await;

    let listed = store.list_by_tenant("t1").await.unwrap();
    assert_eq!(
        listed.iter().map(|d| d.id.as_str()).collect::<Vec<_>>(),
        vec![a.id.as_str(), b.id.as_str()]
    );
}

#[tokio::test]
async fn delete_removes_row() {
    let (store, _tmp) = create_test_store().await;
    let record = seed_domain(&store, "t1", "example.com").await;

    store.delete("t1", &record.id).await.unwrap();
    assert!(store.find("t1", &record.id).await.unwrap().is_none());

    assert!(matches!(
        store.delete("t1", &record.id).await,
        Err(CoreError::DomainNotFound(_))
    ));
}

// ===== Job linkage =====

#[tokio::test]
async fn attach_job_sets_pending_and_clears_sync_state() {
    let (store, _tmp) = create_test_store().await;
    let record = seed_domain(&store, "t1", "example.com").await;

    store.attach_job("t1", &record.id, "job-1").await.unwrap();
    store
        .apply_status(
            "t1",
            &record.id,
            &status_update("job-1", "PROCESSING", DeploymentStatus::Pending),
        )
        .await
        .unwrap();

    store.attach_job("t1", &record.id, "job-2").await.unwrap();
    let loaded = store.find("t1", &record.id).await.unwrap().unwrap();
    assert_eq!(loaded.job_id.as_deref(), Some("job-2"));
    assert_eq!(loaded.status, DeploymentStatus::Pending);
    assert!(loaded.raw_status.is_none());
    assert!(loaded.last_synced.is_none());
}

#[tokio::test]
async fn attach_job_missing_domain_is_not_found() {
    let (store, _tmp) = create_test_store().await;
    assert!(matches!(
        store.attach_job("t1", "ghost", "job-1").await,
        Err(CoreError::DomainNotFound(_))
    ));
}

#[tokio::test]
async fn find_by_job_resolves_active_linkage() {
    let (store, _tmp) = create_test_store().await;
    let record = seed_domain(&store, "t1", "example.com").await;
    store.attach_job("t1", &record.id, "job-1").await.unwrap();

    let found = store.find_by_job("job-1").await.unwrap().expect("found");
    assert_eq!(found.id, record.id);
    assert!(store.find_by_job("job-9").await.unwrap().is_none());
}

// ===== Conditional status write =====

#[tokio::test]
async fn apply_status_happy_path() {
    let (store, _tmp) = create_test_store().await;
    let record = seed_domain(&store, "t1", "example.com").await;
    store.attach_job("t1", &record.id, "job-1").await.unwrap();

    let outcome = store
        .apply_status(
            "t1",
            &record.id,
            &status_update("job-1", "COMPLETED_SUCCESS", DeploymentStatus::Deployed),
        )
        .await
        .unwrap();
    assert_eq!(outcome, ApplyOutcome::Applied);

    let loaded = store.find("t1", &record.id).await.unwrap().unwrap();
    assert_eq!(loaded.status, DeploymentStatus::Deployed);
    assert_eq!(loaded.raw_status.as_deref(), Some("COMPLETED_SUCCESS"));
    assert!(loaded.last_synced.is_some());
}

#[tokio::test]
async fn apply_status_superseded_job_is_stale() {
    let (store, _tmp) = create_test_store().await;
    let record = seed_domain(&store, "t1", "example.com").await;
    store.attach_job("t1", &record.id, "job-2").await.unwrap();

    let outcome = store
        .apply_status(
            "t1",
            &record.id,
            &status_update("job-1", "COMPLETED_SUCCESS", DeploymentStatus::Deployed),
        )
        .await
        .unwrap();
    assert_eq!(outcome, ApplyOutcome::Stale);

    let loaded = store.find("t1", &record.id).await.unwrap().unwrap();
    assert_eq!(loaded.status, DeploymentStatus::Pending);
}

#[tokio::test]
async fn apply_status_never_regresses_terminal() {
    let (store, _tmp) = create_test_store().await;
    let record = seed_domain(&store, "t1", "example.com").await;
    store.attach_job("t1", &record.id, "job-1").await.unwrap();

    store
        .apply_status(
            "t1",
            &record.id,
            &status_update("job-1", "FAILED", DeploymentStatus::Failed),
        )
        .await
        .unwrap();

    // a late duplicate callback must not resurrect the job
    let outcome = store
        .apply_status(
            "t1",
            &record.id,
            &status_update("job-1", "PROCESSING", DeploymentStatus::Pending),
        )
        .await
        .unwrap();
    assert_eq!(outcome, ApplyOutcome::Stale);

    let loaded = store.find("t1", &record.id).await.unwrap().unwrap();
    assert_eq!(loaded.status, DeploymentStatus::Failed);
    assert_eq!(loaded.raw_status.as_deref(), Some("FAILED"));
}

#[tokio::test]
async fn apply_status_missing_domain_is_not_found() {
    let (store, _tmp) = create_test_store().await;
    let result = store
        .apply_status(
            "t1",
            "ghost",
            &status_update("job-1", "PROCESSING", DeploymentStatus::Pending),
        )
        .await;
    assert!(matches!(result, Err(CoreError::DomainNotFound(_))));
}

#[tokio::test]
async fn apply_status_wrong_tenant_is_not_found() {
    let (store, _tmp) = create_test_store().await;
    let record = seed_domain(&store, "t1", "example.com").await;
    store.attach_job("t1", &record.id, "job-1").await.unwrap();

    let result = store
        .apply_status(
            "t2",
            &record.id,
            &status_update("job-1", "PROCESSING", DeploymentStatus::Pending),
        )
        .await;
    assert!(matches!(result, Err(CoreError::DomainNotFound(_))));
}

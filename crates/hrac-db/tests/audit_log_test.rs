//! Integration tests for the append-only audit log using in-memory
//! SurrealDB.

use chrono::Utc;
use hrac_core::models::audit::{AuditOutcome, CreateAuditEntry};
use hrac_core::repository::{AuditFilter, AuditLogRepository, Pagination};
use hrac_db::repository::SurrealAuditLogRepository;
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

async fn setup() -> Surreal<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    hrac_db::run_migrations(&db).await.unwrap();
    db
}

fn entry(user_id: Option<Uuid>, code: &str, outcome: AuditOutcome) -> CreateAuditEntry {
    CreateAuditEntry {
        user_id,
        permission_code: code.into(),
        resource: None,
        operation: "POST /api/v1/users".into(),
        outcome,
    }
}

#[tokio::test]
async fn append_and_list() {
    let db = setup().await;
    let repo = SurrealAuditLogRepository::new(db);

    let user_id = Uuid::new_v4();
    let created = repo
        .append(entry(Some(user_id), "USER_CREATE", AuditOutcome::Granted))
        .await
        .unwrap();

    assert_eq!(created.permission_code, "USER_CREATE");
    assert_eq!(created.user_id, Some(user_id));
    assert!(matches!(created.outcome, AuditOutcome::Granted));

    let page = repo
        .list(AuditFilter::default(), Pagination::default())
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].id, created.id);
}

#[tokio::test]
async fn anonymous_denial_is_recorded_without_user() {
    let db = setup().await;
    let repo = SurrealAuditLogRepository::new(db);

    let created = repo
        .append(entry(None, "USER_CREATE", AuditOutcome::Denied))
        .await
        .unwrap();

    assert!(created.user_id.is_none());
    assert!(matches!(created.outcome, AuditOutcome::Denied));
}

#[tokio::test]
async fn filter_by_user_and_code() {
    let db = setup().await;
    let repo = SurrealAuditLogRepository::new(db);

    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    repo.append(entry(Some(alice), "USER_CREATE", AuditOutcome::Granted))
        .await
        .unwrap();
    repo.append(entry(Some(alice), "USER_DELETE", AuditOutcome::Denied))
        .await
        .unwrap();
    repo.append(entry(Some(bob), "USER_CREATE", AuditOutcome::Denied))
        .await
        .unwrap();

    let page = repo
        .list(
            AuditFilter {
                user_id: Some(alice),
                ..Default::default()
            },
            Pagination::default(),
        )
        .await
        .unwrap();
    assert_eq!(page.total, 2);

    let page = repo
        .list(
            AuditFilter {
                user_id: Some(alice),
                permission_code: Some("USER_DELETE".into()),
                ..Default::default()
            },
            Pagination::default(),
        )
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert!(matches!(page.items[0].outcome, AuditOutcome::Denied));
}

#[tokio::test]
async fn filter_by_time_window() {
    let db = setup().await;
    let repo = SurrealAuditLogRepository::new(db);

    let before = Utc::now();
    repo.append(entry(None, "USER_CREATE", AuditOutcome::Granted))
        .await
        .unwrap();
    let after = Utc::now();

    let page = repo
        .list(
            AuditFilter {
                from: Some(before),
                to: Some(after),
                ..Default::default()
            },
            Pagination::default(),
        )
        .await
        .unwrap();
    assert_eq!(page.total, 1);

    let page = repo
        .list(
            AuditFilter {
                from: Some(after),
                ..Default::default()
            },
            Pagination::default(),
        )
        .await
        .unwrap();
    assert_eq!(page.total, 0);
}

#[tokio::test]
async fn newest_entries_first() {
    let db = setup().await;
    let repo = SurrealAuditLogRepository::new(db);

    let first = repo
        .append(entry(None, "FIRST", AuditOutcome::Granted))
        .await
        .unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = repo
        .append(entry(None, "SECOND", AuditOutcome::Granted))
        .await
        .unwrap();

    let page = repo
        .list(AuditFilter::default(), Pagination::default())
        .await
        .unwrap();

    assert_eq!(page.items[0].id, second.id);
    assert_eq!(page.items[1].id, first.id);
}

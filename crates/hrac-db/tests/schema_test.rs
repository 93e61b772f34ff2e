//! Migration runner tests using in-memory SurrealDB.

use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

#[tokio::test]
async fn migrations_apply_on_fresh_database() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    hrac_db::run_migrations(&db).await.unwrap();
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    hrac_db::run_migrations(&db).await.unwrap();
    // Re-running must be a no-op, not an error.
    hrac_db::run_migrations(&db).await.unwrap();
}

#[tokio::test]
async fn schema_v1_is_exposed() {
    assert!(hrac_db::schema_v1().contains("DEFINE TABLE permission"));
}

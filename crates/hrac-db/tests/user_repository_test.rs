//! Integration tests for the user and role repositories using
//! in-memory SurrealDB.

use hrac_core::error::HracError;
use hrac_core::models::role::{CreateRole, UpdateRole};
use hrac_core::models::user::{CreateUser, UpdateUser};
use hrac_core::repository::{Pagination, RoleRepository, UserRepository};
use hrac_db::repository::{SurrealRoleRepository, SurrealUserRepository};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

async fn setup() -> Surreal<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    hrac_db::run_migrations(&db).await.unwrap();
    db
}

fn alice() -> CreateUser {
    CreateUser {
        username: "alice".into(),
        email: "alice@example.com".into(),
        display_name: "Alice".into(),
    }
}

#[tokio::test]
async fn create_and_get_user() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo.create(alice()).await.unwrap();
    assert_eq!(user.username, "alice");
    assert!(user.is_active, "new users default to active");

    let fetched = repo.get_by_id(user.id).await.unwrap();
    assert_eq!(fetched.id, user.id);

    let by_name = repo.get_by_username("alice").await.unwrap();
    assert_eq!(by_name.id, user.id);
}

#[tokio::test]
async fn unknown_user_is_not_found() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let result = repo.get_by_username("nobody").await;
    assert!(matches!(result, Err(HracError::NotFound { .. })));
}

#[tokio::test]
async fn duplicate_username_rejected() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    repo.create(alice()).await.unwrap();

    let mut dup = alice();
    dup.email = "other@example.com".into();
    assert!(repo.create(dup).await.is_err());
}

#[tokio::test]
async fn duplicate_email_rejected() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    repo.create(alice()).await.unwrap();

    let mut dup = alice();
    dup.username = "alice2".into();
    assert!(repo.create(dup).await.is_err());
}

#[tokio::test]
async fn update_user_fields() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo.create(alice()).await.unwrap();

    let updated = repo
        .update(
            user.id,
            UpdateUser {
                display_name: Some("Alice A.".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.display_name, "Alice A.");
    assert_eq!(updated.username, "alice"); // unchanged
}

#[tokio::test]
async fn delete_deactivates_user() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo.create(alice()).await.unwrap();
    repo.delete(user.id).await.unwrap();

    // Soft delete: the row survives but is inactive.
    let fetched = repo.get_by_id(user.id).await.unwrap();
    assert!(!fetched.is_active);
}

#[tokio::test]
async fn list_users_with_pagination() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    for i in 0..4 {
        repo.create(CreateUser {
            username: format!("user{i}"),
            email: format!("user{i}@example.com"),
            display_name: format!("User {i}"),
        })
        .await
        .unwrap();
    }

    let page = repo
        .list(Pagination {
            offset: 0,
            limit: 3,
        })
        .await
        .unwrap();

    assert_eq!(page.items.len(), 3);
    assert_eq!(page.total, 4);
}

#[tokio::test]
async fn role_crud() {
    let db = setup().await;
    let repo = SurrealRoleRepository::new(db);

    let role = repo
        .create(CreateRole {
            name: "hr-admin".into(),
            description: "HR administrators".into(),
        })
        .await
        .unwrap();

    let by_name = repo.get_by_name("hr-admin").await.unwrap();
    assert_eq!(by_name.id, role.id);

    let updated = repo
        .update(
            role.id,
            UpdateRole {
                description: Some("HR platform administrators".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.description, "HR platform administrators");

    repo.delete(role.id).await.unwrap();
    assert!(matches!(
        repo.get_by_id(role.id).await,
        Err(HracError::NotFound { .. })
    ));
}

#[tokio::test]
async fn duplicate_role_name_rejected() {
    let db = setup().await;
    let repo = SurrealRoleRepository::new(db);

    repo.create(CreateRole {
        name: "hr-admin".into(),
        description: "HR administrators".into(),
    })
    .await
    .unwrap();

    let result = repo
        .create(CreateRole {
            name: "hr-admin".into(),
            description: "Duplicate".into(),
        })
        .await;
    assert!(result.is_err());
}

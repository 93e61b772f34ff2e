//! Integration tests for the three association repositories (role
//! grants, user overrides, role assignments) using in-memory SurrealDB.

use chrono::{Duration, Utc};
use hrac_core::models::permission::CreatePermission;
use hrac_core::models::role::CreateRole;
use hrac_core::models::role_permission::GrantRolePermission;
use hrac_core::models::user::CreateUser;
use hrac_core::models::user_permission::GrantUserPermission;
use hrac_core::models::user_role::AssignUserRole;
use hrac_core::repository::{
    PermissionRepository, RolePermissionRepository, RoleRepository, UserPermissionRepository,
    UserRepository, UserRoleRepository,
};
use hrac_db::repository::{
    SurrealPermissionRepository, SurrealRolePermissionRepository, SurrealRoleRepository,
    SurrealUserPermissionRepository, SurrealUserRepository, SurrealUserRoleRepository,
};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

/// Helper: spin up in-memory DB, run migrations, create a user, a role
/// and a permission.
async fn setup() -> (
    Surreal<surrealdb::engine::local::Db>,
    uuid::Uuid, // user_id
    uuid::Uuid, // role_id
    uuid::Uuid, // permission_id
) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    hrac_db::run_migrations(&db).await.unwrap();

    let user_repo = SurrealUserRepository::new(db.clone());
    let user = user_repo
        .create(CreateUser {
            username: "alice".into(),
            email: "alice@example.com".into(),
            display_name: "Alice".into(),
        })
        .await
        .unwrap();

    let role_repo = SurrealRoleRepository::new(db.clone());
    let role = role_repo
        .create(CreateRole {
            name: "hr-admin".into(),
            description: "HR administrators".into(),
        })
        .await
        .unwrap();

    let perm_repo = SurrealPermissionRepository::new(db.clone());
    let perm = perm_repo
        .create(CreatePermission {
            name: "Create users".into(),
            code: "USER_CREATE".into(),
            description: None,
            module: "User".into(),
            action: "Create".into(),
            resource: None,
            created_by: None,
        })
        .await
        .unwrap();

    (db, user.id, role.id, perm.id)
}

// ---------------------------------------------------------------------------
// Role-permission grants
// ---------------------------------------------------------------------------

#[tokio::test]
async fn grant_and_find_role_permission() {
    let (db, _, role_id, perm_id) = setup().await;
    let repo = SurrealRolePermissionRepository::new(db);

    let grant = repo
        .grant(GrantRolePermission {
            role_id,
            permission_id: perm_id,
            is_granted: true,
            assigned_by: None,
            expires_at: None,
        })
        .await
        .unwrap();

    assert_eq!(grant.role_id, role_id);
    assert_eq!(grant.permission_id, perm_id);
    assert!(grant.is_granted);
    assert!(grant.expires_at.is_none());

    let rows = repo.find(role_id, perm_id).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, grant.id);
}

#[tokio::test]
async fn duplicate_rows_per_pair_are_kept() {
    let (db, _, role_id, perm_id) = setup().await;
    let repo = SurrealRolePermissionRepository::new(db);

    repo.grant(GrantRolePermission {
        role_id,
        permission_id: perm_id,
        is_granted: true,
        assigned_by: None,
        expires_at: None,
    })
    .await
    .unwrap();

    // A later deny row does not replace the grant row — resolution
    // applies last-writer-wins over both.
    repo.grant(GrantRolePermission {
        role_id,
        permission_id: perm_id,
        is_granted: false,
        assigned_by: None,
        expires_at: None,
    })
    .await
    .unwrap();

    let rows = repo.find(role_id, perm_id).await.unwrap();
    assert_eq!(rows.len(), 2);
}

#[tokio::test]
async fn grant_with_expiry_roundtrips() {
    let (db, _, role_id, perm_id) = setup().await;
    let repo = SurrealRolePermissionRepository::new(db);

    let expires_at = Utc::now() + Duration::days(7);
    let grant = repo
        .grant(GrantRolePermission {
            role_id,
            permission_id: perm_id,
            is_granted: true,
            assigned_by: None,
            expires_at: Some(expires_at),
        })
        .await
        .unwrap();

    let stored = grant.expires_at.expect("expiry should be stored");
    assert!((stored - expires_at).num_seconds().abs() < 1);
}

#[tokio::test]
async fn remove_deletes_all_rows_for_pair() {
    let (db, _, role_id, perm_id) = setup().await;
    let repo = SurrealRolePermissionRepository::new(db);

    for granted in [true, false] {
        repo.grant(GrantRolePermission {
            role_id,
            permission_id: perm_id,
            is_granted: granted,
            assigned_by: None,
            expires_at: None,
        })
        .await
        .unwrap();
    }

    repo.remove(role_id, perm_id).await.unwrap();

    let rows = repo.find(role_id, perm_id).await.unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn grant_many_bulk_assigns() {
    let (db, _, role_id, perm_id) = setup().await;
    let perm_repo = SurrealPermissionRepository::new(db.clone());
    let repo = SurrealRolePermissionRepository::new(db);

    let second = perm_repo
        .create(CreatePermission {
            name: "Delete users".into(),
            code: "USER_DELETE".into(),
            description: None,
            module: "User".into(),
            action: "Delete".into(),
            resource: None,
            created_by: None,
        })
        .await
        .unwrap();

    let grants = repo
        .grant_many(vec![
            GrantRolePermission {
                role_id,
                permission_id: perm_id,
                is_granted: true,
                assigned_by: None,
                expires_at: None,
            },
            GrantRolePermission {
                role_id,
                permission_id: second.id,
                is_granted: true,
                assigned_by: None,
                expires_at: None,
            },
        ])
        .await
        .unwrap();

    assert_eq!(grants.len(), 2);

    let listed = repo.list_for_role(role_id).await.unwrap();
    assert_eq!(listed.len(), 2);
}

// ---------------------------------------------------------------------------
// User-permission overrides
// ---------------------------------------------------------------------------

#[tokio::test]
async fn override_with_reason_roundtrips() {
    let (db, user_id, _, perm_id) = setup().await;
    let repo = SurrealUserPermissionRepository::new(db);

    let grant = repo
        .grant(GrantUserPermission {
            user_id,
            permission_id: perm_id,
            is_granted: false,
            reason: Some("Under investigation".into()),
            assigned_by: None,
            expires_at: None,
        })
        .await
        .unwrap();

    assert!(!grant.is_granted);
    assert_eq!(grant.reason.as_deref(), Some("Under investigation"));

    let rows = repo.find(user_id, perm_id).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].reason.as_deref(), Some("Under investigation"));
}

#[tokio::test]
async fn remove_override() {
    let (db, user_id, _, perm_id) = setup().await;
    let repo = SurrealUserPermissionRepository::new(db);

    repo.grant(GrantUserPermission {
        user_id,
        permission_id: perm_id,
        is_granted: true,
        reason: None,
        assigned_by: None,
        expires_at: None,
    })
    .await
    .unwrap();

    repo.remove(user_id, perm_id).await.unwrap();

    let rows = repo.list_for_user(user_id).await.unwrap();
    assert!(rows.is_empty());
}

// ---------------------------------------------------------------------------
// User-role assignments
// ---------------------------------------------------------------------------

#[tokio::test]
async fn assign_and_list_user_roles() {
    let (db, user_id, role_id, _) = setup().await;
    let repo = SurrealUserRoleRepository::new(db);

    let assignment = repo
        .assign(AssignUserRole {
            user_id,
            role_id,
            assigned_by: None,
            expires_at: None,
        })
        .await
        .unwrap();

    assert!(assignment.is_active, "new assignments default to active");

    let rows = repo.list_for_user(user_id).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].role_id, role_id);

    repo.unassign(user_id, role_id).await.unwrap();

    let rows = repo.list_for_user(user_id).await.unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn set_active_flips_flag() {
    let (db, user_id, role_id, _) = setup().await;
    let repo = SurrealUserRoleRepository::new(db);

    repo.assign(AssignUserRole {
        user_id,
        role_id,
        assigned_by: None,
        expires_at: None,
    })
    .await
    .unwrap();

    repo.set_active(user_id, role_id, false).await.unwrap();

    let rows = repo.list_for_user(user_id).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert!(!rows[0].is_active);

    repo.set_active(user_id, role_id, true).await.unwrap();
    let rows = repo.list_for_user(user_id).await.unwrap();
    assert!(rows[0].is_active);
}

#[tokio::test]
async fn assigned_by_is_recorded() {
    let (db, user_id, role_id, _) = setup().await;
    let user_repo = SurrealUserRepository::new(db.clone());
    let repo = SurrealUserRoleRepository::new(db);

    let admin = user_repo
        .create(CreateUser {
            username: "root".into(),
            email: "root@example.com".into(),
            display_name: "Root".into(),
        })
        .await
        .unwrap();

    let assignment = repo
        .assign(AssignUserRole {
            user_id,
            role_id,
            assigned_by: Some(admin.id),
            expires_at: None,
        })
        .await
        .unwrap();

    assert_eq!(assignment.assigned_by, Some(admin.id));
}

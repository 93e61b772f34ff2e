//! Enforcement gate tests over in-memory SurrealDB repositories.

use hrac_authz::{EnforcementGate, GateDecision, Identity, PermissionResolver, RequirementRegistry};
use hrac_core::models::permission::CreatePermission;
use hrac_core::models::role::CreateRole;
use hrac_core::models::role_permission::GrantRolePermission;
use hrac_core::models::user::CreateUser;
use hrac_core::repository::{
    PermissionRepository, RolePermissionRepository, RoleRepository, UserRepository,
    UserRoleRepository,
};
use hrac_core::models::user_role::AssignUserRole;
use hrac_db::repository::{
    SurrealPermissionRepository, SurrealRolePermissionRepository, SurrealRoleRepository,
    SurrealUserPermissionRepository, SurrealUserRepository, SurrealUserRoleRepository,
};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

type MemGate = EnforcementGate<
    SurrealUserRepository<Db>,
    SurrealPermissionRepository<Db>,
    SurrealUserPermissionRepository<Db>,
    SurrealUserRoleRepository<Db>,
    SurrealRolePermissionRepository<Db>,
>;

/// Gate guarding `DELETE /v1/users/{id}` with USER_DELETE. `admin_id`
/// holds it through the admin role; `intern_id` holds nothing.
async fn setup() -> (MemGate, Uuid, Uuid) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    hrac_db::run_migrations(&db).await.unwrap();

    let users = SurrealUserRepository::new(db.clone());
    let admin = users
        .create(CreateUser {
            username: "alice".into(),
            email: "alice@example.com".into(),
            display_name: "Alice".into(),
        })
        .await
        .unwrap();
    let intern = users
        .create(CreateUser {
            username: "bob".into(),
            email: "bob@example.com".into(),
            display_name: "Bob".into(),
        })
        .await
        .unwrap();

    let role = SurrealRoleRepository::new(db.clone())
        .create(CreateRole {
            name: "admin".into(),
            description: "Administrators".into(),
        })
        .await
        .unwrap();

    let permission = SurrealPermissionRepository::new(db.clone())
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

    SurrealRolePermissionRepository::new(db.clone())
        .grant(GrantRolePermission {
            role_id: role.id,
            permission_id: permission.id,
            is_granted: true,
            assigned_by: None,
            expires_at: None,
        })
        .await
        .unwrap();
    SurrealUserRoleRepository::new(db.clone())
        .assign(AssignUserRole {
            user_id: admin.id,
            role_id: role.id,
            assigned_by: None,
            expires_at: None,
        })
        .await
        .unwrap();

    let mut registry = RequirementRegistry::new();
    registry.require("DELETE /v1/users/{id}", "USER_DELETE");

    let resolver = PermissionResolver::new(
        SurrealUserRepository::new(db.clone()),
        SurrealPermissionRepository::new(db.clone()),
        SurrealUserPermissionRepository::new(db.clone()),
        SurrealUserRoleRepository::new(db.clone()),
        SurrealRolePermissionRepository::new(db.clone()),
    );

    (
        EnforcementGate::new(registry, resolver),
        admin.id,
        intern.id,
    )
}

#[tokio::test]
async fn unguarded_operation_passes_through() {
    // No requirements means allowed, identity or not.
    let (gate, admin_id, _) = setup().await;

    let anonymous = gate.check("GET /healthz", None).await.unwrap();
    assert_eq!(anonymous, GateDecision::Allowed);

    let identity = Identity { user_id: admin_id };
    let authed = gate.check("GET /healthz", Some(&identity)).await.unwrap();
    assert_eq!(authed, GateDecision::Allowed);
}

#[tokio::test]
async fn missing_identity_is_unauthenticated() {
    // Guarded operation, no token.
    let (gate, _, _) = setup().await;

    let decision = gate.check("DELETE /v1/users/{id}", None).await.unwrap();
    assert_eq!(decision, GateDecision::Unauthenticated);
    assert_eq!(decision.status(), 401);
    assert_eq!(
        decision.message().unwrap(),
        "Unauthorized: User not authenticated"
    );
}

#[tokio::test]
async fn lacking_permission_is_forbidden() {
    // Authenticated but unprivileged.
    let (gate, _, intern_id) = setup().await;

    let identity = Identity { user_id: intern_id };
    let decision = gate
        .check("DELETE /v1/users/{id}", Some(&identity))
        .await
        .unwrap();

    assert_eq!(
        decision,
        GateDecision::Forbidden {
            code: "USER_DELETE".into()
        }
    );
    assert_eq!(decision.status(), 403);
    assert!(decision.message().unwrap().contains("USER_DELETE"));
}

#[tokio::test]
async fn holding_the_permission_is_allowed() {
    let (gate, admin_id, _) = setup().await;

    let identity = Identity { user_id: admin_id };
    let decision = gate
        .check("DELETE /v1/users/{id}", Some(&identity))
        .await
        .unwrap();
    assert_eq!(decision, GateDecision::Allowed);
}

#[tokio::test]
async fn multiple_requirements_are_anded() {
    // Two requirements on one operation; the caller holds only one.
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    hrac_db::run_migrations(&db).await.unwrap();

    let user = SurrealUserRepository::new(db.clone())
        .create(CreateUser {
            username: "carol".into(),
            email: "carol@example.com".into(),
            display_name: "Carol".into(),
        })
        .await
        .unwrap();
    let role = SurrealRoleRepository::new(db.clone())
        .create(CreateRole {
            name: "exporter".into(),
            description: "Report exporters".into(),
        })
        .await
        .unwrap();
    let perms = SurrealPermissionRepository::new(db.clone());
    let read = perms
        .create(CreatePermission {
            name: "Read audit".into(),
            code: "AUDIT_READ".into(),
            description: None,
            module: "Audit".into(),
            action: "Read".into(),
            resource: None,
            created_by: None,
        })
        .await
        .unwrap();
    perms
        .create(CreatePermission {
            name: "Export audit".into(),
            code: "AUDIT_EXPORT".into(),
            description: None,
            module: "Audit".into(),
            action: "Export".into(),
            resource: None,
            created_by: None,
        })
        .await
        .unwrap();

    SurrealRolePermissionRepository::new(db.clone())
        .grant(GrantRolePermission {
            role_id: role.id,
            permission_id: read.id,
            is_granted: true,
            assigned_by: None,
            expires_at: None,
        })
        .await
        .unwrap();
    SurrealUserRoleRepository::new(db.clone())
        .assign(AssignUserRole {
            user_id: user.id,
            role_id: role.id,
            assigned_by: None,
            expires_at: None,
        })
        .await
        .unwrap();

    let mut registry = RequirementRegistry::new();
    registry.require("GET /v1/audit/export", "AUDIT_READ");
    registry.require("GET /v1/audit/export", "AUDIT_EXPORT");

    let gate = EnforcementGate::new(
        registry,
        PermissionResolver::new(
            SurrealUserRepository::new(db.clone()),
            SurrealPermissionRepository::new(db.clone()),
            SurrealUserPermissionRepository::new(db.clone()),
            SurrealUserRoleRepository::new(db.clone()),
            SurrealRolePermissionRepository::new(db.clone()),
        ),
    );

    let identity = Identity { user_id: user.id };
    let decision = gate
        .check("GET /v1/audit/export", Some(&identity))
        .await
        .unwrap();
    assert_eq!(
        decision,
        GateDecision::Forbidden {
            code: "AUDIT_EXPORT".into()
        }
    );
}

#[tokio::test]
async fn unknown_code_in_registry_is_forbidden() {
    // A registry entry pointing at a code absent from the catalog
    // denies instead of erroring.
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    hrac_db::run_migrations(&db).await.unwrap();

    let user = SurrealUserRepository::new(db.clone())
        .create(CreateUser {
            username: "dave".into(),
            email: "dave@example.com".into(),
            display_name: "Dave".into(),
        })
        .await
        .unwrap();

    let mut registry = RequirementRegistry::new();
    registry.require("POST /v1/widgets", "WIDGET_CREATE");

    let gate = EnforcementGate::new(
        registry,
        PermissionResolver::new(
            SurrealUserRepository::new(db.clone()),
            SurrealPermissionRepository::new(db.clone()),
            SurrealUserPermissionRepository::new(db.clone()),
            SurrealUserRoleRepository::new(db.clone()),
            SurrealRolePermissionRepository::new(db.clone()),
        ),
    );

    let identity = Identity { user_id: user.id };
    let decision = gate
        .check("POST /v1/widgets", Some(&identity))
        .await
        .unwrap();
    assert_eq!(
        decision,
        GateDecision::Forbidden {
            code: "WIDGET_CREATE".into()
        }
    );
}

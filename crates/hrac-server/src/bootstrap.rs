//! Startup provisioning: built-in catalog entries, the `admin` role,
//! and registry validation.

use hrac_authz::RequirementRegistry;
use hrac_core::error::{HracError, HracResult};
use hrac_core::models::permission::CreatePermission;
use hrac_core::models::role::CreateRole;
use hrac_core::models::role_permission::GrantRolePermission;
use hrac_core::models::user_role::AssignUserRole;
use hrac_core::repository::{
    PermissionRepository, RolePermissionRepository, RoleRepository, UserRoleRepository,
};
use surrealdb::Connection;
use tracing::{info, warn};
use uuid::Uuid;

use crate::state::AppState;

/// The management API's own permission codes: (code, name, module, action).
const BUILTIN_PERMISSIONS: &[(&str, &str, &str, &str)] = &[
    ("PERMISSION_READ", "Read permissions", "Permission", "Read"),
    ("PERMISSION_CREATE", "Create permissions", "Permission", "Create"),
    ("PERMISSION_UPDATE", "Update permissions", "Permission", "Update"),
    ("PERMISSION_DELETE", "Delete permissions", "Permission", "Delete"),
    ("ROLE_READ", "Read roles", "Role", "Read"),
    ("ROLE_CREATE", "Create roles", "Role", "Create"),
    ("ROLE_UPDATE", "Update roles", "Role", "Update"),
    ("ROLE_DELETE", "Delete roles", "Role", "Delete"),
    ("ROLE_GRANT", "Manage role grants", "Role", "Grant"),
    ("USER_READ", "Read users", "User", "Read"),
    ("USER_CREATE", "Create users", "User", "Create"),
    ("USER_UPDATE", "Update users", "User", "Update"),
    ("USER_DELETE", "Delete users", "User", "Delete"),
    ("USER_ASSIGN", "Manage role assignments", "User", "Assign"),
    ("USER_OVERRIDE", "Manage permission overrides", "User", "Override"),
    ("AUDIT_READ", "Read the audit log", "Audit", "Read"),
];

/// Idempotently ensure every built-in permission exists, ensure an
/// `admin` role granted all of them, and optionally assign that role
/// to a configured user.
pub async fn bootstrap<C: Connection>(
    state: &AppState<C>,
    admin_user_id: Option<Uuid>,
) -> HracResult<()> {
    let mut permission_ids = Vec::with_capacity(BUILTIN_PERMISSIONS.len());

    for (code, name, module, action) in BUILTIN_PERMISSIONS {
        let permission = match state.permissions.get_by_code(code).await {
            Ok(p) => p,
            Err(HracError::NotFound { .. }) => {
                info!(code, "creating built-in permission");
                state
                    .permissions
                    .create(CreatePermission {
                        name: (*name).into(),
                        code: (*code).into(),
                        description: None,
                        module: (*module).into(),
                        action: (*action).into(),
                        resource: None,
                        created_by: None,
                    })
                    .await?
            }
            Err(e) => return Err(e),
        };
        permission_ids.push(permission.id);
    }

    let admin_role = match state.roles.get_by_name("admin").await {
        Ok(r) => r,
        Err(HracError::NotFound { .. }) => {
            info!("creating admin role");
            state
                .roles
                .create(CreateRole {
                    name: "admin".into(),
                    description: "Full access to the management API".into(),
                })
                .await?
        }
        Err(e) => return Err(e),
    };

    for permission_id in permission_ids {
        let existing = state.role_grants.find(admin_role.id, permission_id).await?;
        if existing.is_empty() {
            state
                .role_grants
                .grant(GrantRolePermission {
                    role_id: admin_role.id,
                    permission_id,
                    is_granted: true,
                    assigned_by: None,
                    expires_at: None,
                })
                .await?;
        }
    }

    if let Some(user_id) = admin_user_id {
        let assignments = state.assignments.list_for_user(user_id).await?;
        let already = assignments.iter().any(|a| a.role_id == admin_role.id);
        if !already {
            info!(%user_id, "assigning admin role to configured user");
            state
                .assignments
                .assign(AssignUserRole {
                    user_id,
                    role_id: admin_role.id,
                    assigned_by: None,
                    expires_at: None,
                })
                .await?;
        }
    }

    Ok(())
}

/// Warn for registry codes with no catalog entry. A guarded operation
/// whose code cannot resolve denies every request — almost certainly a
/// deployment mistake worth flagging at startup.
pub async fn validate_registry<C: Connection>(
    state: &AppState<C>,
    registry: &RequirementRegistry,
) -> HracResult<()> {
    for code in registry.codes() {
        match state.permissions.get_by_code(code).await {
            Ok(_) => {}
            Err(HracError::NotFound { .. }) => {
                warn!(code, "registry references a code absent from the catalog");
            }
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

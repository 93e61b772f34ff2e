//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. The resolution algorithm needs
//! only indexed-equality point lookups: by permission code, by
//! (user, permission), by (role, permission), and by user for role
//! assignments. Association repositories return *all* rows for a pair —
//! expiry filtering and last-writer-wins are applied by the caller so
//! temporal semantics live in one place.

use serde::Serialize;
use uuid::Uuid;

use crate::error::HracResult;
use crate::models::{
    audit::{AuditEntry, CreateAuditEntry},
    permission::{CreatePermission, Permission, UpdatePermission},
    role::{CreateRole, Role, UpdateRole},
    role_permission::{GrantRolePermission, RolePermission},
    user::{CreateUser, UpdateUser, User},
    user_permission::{GrantUserPermission, UserPermission},
    user_role::{AssignUserRole, UserRole},
};

/// Pagination parameters for list queries.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone, Serialize)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

// ---------------------------------------------------------------------------
// Identity records
// ---------------------------------------------------------------------------

pub trait UserRepository: Send + Sync {
    fn create(&self, input: CreateUser) -> impl Future<Output = HracResult<User>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = HracResult<User>> + Send;
    fn get_by_username(&self, username: &str) -> impl Future<Output = HracResult<User>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateUser,
    ) -> impl Future<Output = HracResult<User>> + Send;
    /// Soft-delete: sets `is_active` to false.
    fn delete(&self, id: Uuid) -> impl Future<Output = HracResult<()>> + Send;
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = HracResult<PaginatedResult<User>>> + Send;
}

pub trait RoleRepository: Send + Sync {
    fn create(&self, input: CreateRole) -> impl Future<Output = HracResult<Role>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = HracResult<Role>> + Send;
    fn get_by_name(&self, name: &str) -> impl Future<Output = HracResult<Role>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateRole,
    ) -> impl Future<Output = HracResult<Role>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = HracResult<()>> + Send;
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = HracResult<PaginatedResult<Role>>> + Send;
}

// ---------------------------------------------------------------------------
// Permission catalog
// ---------------------------------------------------------------------------

pub trait PermissionRepository: Send + Sync {
    fn create(
        &self,
        input: CreatePermission,
    ) -> impl Future<Output = HracResult<Permission>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = HracResult<Permission>> + Send;
    /// Point lookup by unique code — the resolution service's entry query.
    fn get_by_code(&self, code: &str) -> impl Future<Output = HracResult<Permission>> + Send;
    /// `code` is immutable: [`UpdatePermission`] carries no code field.
    fn update(
        &self,
        id: Uuid,
        input: UpdatePermission,
    ) -> impl Future<Output = HracResult<Permission>> + Send;
    /// Hard delete. Rejected with a validation error while any grant or
    /// override row references the permission — soft-disable via
    /// `is_active` instead.
    fn delete(&self, id: Uuid) -> impl Future<Output = HracResult<()>> + Send;
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = HracResult<PaginatedResult<Permission>>> + Send;
}

// ---------------------------------------------------------------------------
// Association entities (temporal grants)
// ---------------------------------------------------------------------------

pub trait RolePermissionRepository: Send + Sync {
    /// Record a new grant/deny row. Existing rows for the pair are kept;
    /// the most recent non-expired row wins at resolution time.
    fn grant(
        &self,
        input: GrantRolePermission,
    ) -> impl Future<Output = HracResult<RolePermission>> + Send;
    /// Bulk-assign several grants in one call.
    fn grant_many(
        &self,
        inputs: Vec<GrantRolePermission>,
    ) -> impl Future<Output = HracResult<Vec<RolePermission>>> + Send;
    /// Remove all rows for a (role, permission) pair.
    fn remove(
        &self,
        role_id: Uuid,
        permission_id: Uuid,
    ) -> impl Future<Output = HracResult<()>> + Send;
    /// All rows for one (role, permission) pair, expired included.
    fn find(
        &self,
        role_id: Uuid,
        permission_id: Uuid,
    ) -> impl Future<Output = HracResult<Vec<RolePermission>>> + Send;
    fn list_for_role(
        &self,
        role_id: Uuid,
    ) -> impl Future<Output = HracResult<Vec<RolePermission>>> + Send;
}

pub trait UserPermissionRepository: Send + Sync {
    fn grant(
        &self,
        input: GrantUserPermission,
    ) -> impl Future<Output = HracResult<UserPermission>> + Send;
    /// Remove all rows for a (user, permission) pair.
    fn remove(
        &self,
        user_id: Uuid,
        permission_id: Uuid,
    ) -> impl Future<Output = HracResult<()>> + Send;
    /// All rows for one (user, permission) pair, expired included.
    fn find(
        &self,
        user_id: Uuid,
        permission_id: Uuid,
    ) -> impl Future<Output = HracResult<Vec<UserPermission>>> + Send;
    fn list_for_user(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = HracResult<Vec<UserPermission>>> + Send;
}

pub trait UserRoleRepository: Send + Sync {
    fn assign(
        &self,
        input: AssignUserRole,
    ) -> impl Future<Output = HracResult<UserRole>> + Send;
    /// Remove all assignment rows for a (user, role) pair.
    fn unassign(
        &self,
        user_id: Uuid,
        role_id: Uuid,
    ) -> impl Future<Output = HracResult<()>> + Send;
    /// Flip the active flag on every row for a (user, role) pair.
    fn set_active(
        &self,
        user_id: Uuid,
        role_id: Uuid,
        is_active: bool,
    ) -> impl Future<Output = HracResult<()>> + Send;
    /// All assignment rows for a user, inactive and expired included.
    fn list_for_user(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = HracResult<Vec<UserRole>>> + Send;
}

// ---------------------------------------------------------------------------
// Audit (append-only)
// ---------------------------------------------------------------------------

/// Query filters for audit entries.
#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    pub user_id: Option<Uuid>,
    pub permission_code: Option<String>,
    pub from: Option<chrono::DateTime<chrono::Utc>>,
    pub to: Option<chrono::DateTime<chrono::Utc>>,
}

pub trait AuditLogRepository: Send + Sync {
    /// Append a new audit entry. No update or delete operations exist.
    fn append(
        &self,
        input: CreateAuditEntry,
    ) -> impl Future<Output = HracResult<AuditEntry>> + Send;
    fn list(
        &self,
        filter: AuditFilter,
        pagination: Pagination,
    ) -> impl Future<Output = HracResult<PaginatedResult<AuditEntry>>> + Send;
}

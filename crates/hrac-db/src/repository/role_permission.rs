//! SurrealDB implementation of [`RolePermissionRepository`].

use chrono::{DateTime, Utc};
use hrac_core::error::HracResult;
use hrac_core::models::role_permission::{GrantRolePermission, RolePermission};
use hrac_core::repository::RolePermissionRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct GrantRow {
    role_id: String,
    permission_id: String,
    is_granted: bool,
    assigned_at: DateTime<Utc>,
    assigned_by: Option<String>,
    expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, SurrealValue)]
struct GrantRowWithId {
    record_id: String,
    role_id: String,
    permission_id: String,
    is_granted: bool,
    assigned_at: DateTime<Utc>,
    assigned_by: Option<String>,
    expires_at: Option<DateTime<Utc>>,
}

fn parse_uuid(value: &str, field: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(value).map_err(|e| DbError::Constraint(format!("invalid {field} UUID: {e}")))
}

impl GrantRowWithId {
    fn try_into_grant(self) -> Result<RolePermission, DbError> {
        Ok(RolePermission {
            id: parse_uuid(&self.record_id, "record")?,
            role_id: parse_uuid(&self.role_id, "role")?,
            permission_id: parse_uuid(&self.permission_id, "permission")?,
            is_granted: self.is_granted,
            assigned_at: self.assigned_at,
            assigned_by: self
                .assigned_by
                .map(|v| parse_uuid(&v, "assigned_by"))
                .transpose()?,
            expires_at: self.expires_at,
        })
    }
}

impl GrantRow {
    fn try_into_grant(self, id: Uuid) -> Result<RolePermission, DbError> {
        Ok(RolePermission {
            id,
            role_id: parse_uuid(&self.role_id, "role")?,
            permission_id: parse_uuid(&self.permission_id, "permission")?,
            is_granted: self.is_granted,
            assigned_at: self.assigned_at,
            assigned_by: self
                .assigned_by
                .map(|v| parse_uuid(&v, "assigned_by"))
                .transpose()?,
            expires_at: self.expires_at,
        })
    }
}

/// SurrealDB implementation of the RolePermission grant repository.
pub struct SurrealRolePermissionRepository<C: Connection> {
    db: Surreal<C>,
}

// Manual Clone: a derive would demand C: Clone.
impl<C: Connection> Clone for SurrealRolePermissionRepository<C> {
    fn clone(&self) -> Self {
        Self { db: self.db.clone() }
    }
}

impl<C: Connection> SurrealRolePermissionRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> RolePermissionRepository for SurrealRolePermissionRepository<C> {
    async fn grant(&self, input: GrantRolePermission) -> HracResult<RolePermission> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('role_permission', $id) SET \
                 role_id = $role_id, permission_id = $permission_id, \
                 is_granted = $is_granted, assigned_by = $assigned_by, \
                 expires_at = $expires_at",
            )
            .bind(("id", id_str.clone()))
            .bind(("role_id", input.role_id.to_string()))
            .bind(("permission_id", input.permission_id.to_string()))
            .bind(("is_granted", input.is_granted))
            .bind(("assigned_by", input.assigned_by.map(|u| u.to_string())))
            .bind(("expires_at", input.expires_at))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Constraint(e.to_string()))?;

        let rows: Vec<GrantRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "role_permission".into(),
            id: id_str,
        })?;

        Ok(row.try_into_grant(id)?)
    }

    async fn grant_many(
        &self,
        inputs: Vec<GrantRolePermission>,
    ) -> HracResult<Vec<RolePermission>> {
        let mut grants = Vec::with_capacity(inputs.len());
        for input in inputs {
            grants.push(self.grant(input).await?);
        }
        Ok(grants)
    }

    async fn remove(&self, role_id: Uuid, permission_id: Uuid) -> HracResult<()> {
        self.db
            .query(
                "DELETE role_permission WHERE \
                 role_id = $role_id AND permission_id = $permission_id",
            )
            .bind(("role_id", role_id.to_string()))
            .bind(("permission_id", permission_id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn find(&self, role_id: Uuid, permission_id: Uuid) -> HracResult<Vec<RolePermission>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM role_permission \
                 WHERE role_id = $role_id AND permission_id = $permission_id",
            )
            .bind(("role_id", role_id.to_string()))
            .bind(("permission_id", permission_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<GrantRowWithId> = result.take(0).map_err(DbError::from)?;

        let grants = rows
            .into_iter()
            .map(|row| row.try_into_grant())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(grants)
    }

    async fn list_for_role(&self, role_id: Uuid) -> HracResult<Vec<RolePermission>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM role_permission \
                 WHERE role_id = $role_id ORDER BY assigned_at ASC",
            )
            .bind(("role_id", role_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<GrantRowWithId> = result.take(0).map_err(DbError::from)?;

        let grants = rows
            .into_iter()
            .map(|row| row.try_into_grant())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(grants)
    }
}

//! SurrealDB implementation of [`UserPermissionRepository`].

use chrono::{DateTime, Utc};
use hrac_core::error::HracResult;
use hrac_core::models::user_permission::{GrantUserPermission, UserPermission};
use hrac_core::repository::UserPermissionRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct OverrideRow {
    user_id: String,
    permission_id: String,
    is_granted: bool,
    reason: Option<String>,
    assigned_at: DateTime<Utc>,
    assigned_by: Option<String>,
    expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, SurrealValue)]
struct OverrideRowWithId {
    record_id: String,
    user_id: String,
    permission_id: String,
    is_granted: bool,
    reason: Option<String>,
    assigned_at: DateTime<Utc>,
    assigned_by: Option<String>,
    expires_at: Option<DateTime<Utc>>,
}

fn parse_uuid(value: &str, field: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(value).map_err(|e| DbError::Constraint(format!("invalid {field} UUID: {e}")))
}

impl OverrideRowWithId {
    fn try_into_override(self) -> Result<UserPermission, DbError> {
        Ok(UserPermission {
            id: parse_uuid(&self.record_id, "record")?,
            user_id: parse_uuid(&self.user_id, "user")?,
            permission_id: parse_uuid(&self.permission_id, "permission")?,
            is_granted: self.is_granted,
            reason: self.reason,
            assigned_at: self.assigned_at,
            assigned_by: self
                .assigned_by
                .map(|v| parse_uuid(&v, "assigned_by"))
                .transpose()?,
            expires_at: self.expires_at,
        })
    }
}

impl OverrideRow {
    fn try_into_override(self, id: Uuid) -> Result<UserPermission, DbError> {
        Ok(UserPermission {
            id,
            user_id: parse_uuid(&self.user_id, "user")?,
            permission_id: parse_uuid(&self.permission_id, "permission")?,
            is_granted: self.is_granted,
            reason: self.reason,
            assigned_at: self.assigned_at,
            assigned_by: self
                .assigned_by
                .map(|v| parse_uuid(&v, "assigned_by"))
                .transpose()?,
            expires_at: self.expires_at,
        })
    }
}

/// SurrealDB implementation of the UserPermission override repository.
pub struct SurrealUserPermissionRepository<C: Connection> {
    db: Surreal<C>,
}

// Manual Clone: a derive would demand C: Clone.
impl<C: Connection> Clone for SurrealUserPermissionRepository<C> {
    fn clone(&self) -> Self {
        Self { db: self.db.clone() }
    }
}

impl<C: Connection> SurrealUserPermissionRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> UserPermissionRepository for SurrealUserPermissionRepository<C> {
    async fn grant(&self, input: GrantUserPermission) -> HracResult<UserPermission> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('user_permission', $id) SET \
                 user_id = $user_id, permission_id = $permission_id, \
                 is_granted = $is_granted, reason = $reason, \
                 assigned_by = $assigned_by, expires_at = $expires_at",
            )
            .bind(("id", id_str.clone()))
            .bind(("user_id", input.user_id.to_string()))
            .bind(("permission_id", input.permission_id.to_string()))
            .bind(("is_granted", input.is_granted))
            .bind(("reason", input.reason))
            .bind(("assigned_by", input.assigned_by.map(|u| u.to_string())))
            .bind(("expires_at", input.expires_at))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Constraint(e.to_string()))?;

        let rows: Vec<OverrideRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user_permission".into(),
            id: id_str,
        })?;

        Ok(row.try_into_override(id)?)
    }

    async fn remove(&self, user_id: Uuid, permission_id: Uuid) -> HracResult<()> {
        self.db
            .query(
                "DELETE user_permission WHERE \
                 user_id = $user_id AND permission_id = $permission_id",
            )
            .bind(("user_id", user_id.to_string()))
            .bind(("permission_id", permission_id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn find(&self, user_id: Uuid, permission_id: Uuid) -> HracResult<Vec<UserPermission>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM user_permission \
                 WHERE user_id = $user_id AND permission_id = $permission_id",
            )
            .bind(("user_id", user_id.to_string()))
            .bind(("permission_id", permission_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<OverrideRowWithId> = result.take(0).map_err(DbError::from)?;

        let overrides = rows
            .into_iter()
            .map(|row| row.try_into_override())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(overrides)
    }

    async fn list_for_user(&self, user_id: Uuid) -> HracResult<Vec<UserPermission>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM user_permission \
                 WHERE user_id = $user_id ORDER BY assigned_at ASC",
            )
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<OverrideRowWithId> = result.take(0).map_err(DbError::from)?;

        let overrides = rows
            .into_iter()
            .map(|row| row.try_into_override())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(overrides)
    }
}

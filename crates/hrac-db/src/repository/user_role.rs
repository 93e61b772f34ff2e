//! SurrealDB implementation of [`UserRoleRepository`].

use chrono::{DateTime, Utc};
use hrac_core::error::HracResult;
use hrac_core::models::user_role::{AssignUserRole, UserRole};
use hrac_core::repository::UserRoleRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct AssignmentRow {
    user_id: String,
    role_id: String,
    is_active: bool,
    assigned_at: DateTime<Utc>,
    assigned_by: Option<String>,
    expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, SurrealValue)]
struct AssignmentRowWithId {
    record_id: String,
    user_id: String,
    role_id: String,
    is_active: bool,
    assigned_at: DateTime<Utc>,
    assigned_by: Option<String>,
    expires_at: Option<DateTime<Utc>>,
}

fn parse_uuid(value: &str, field: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(value).map_err(|e| DbError::Constraint(format!("invalid {field} UUID: {e}")))
}

impl AssignmentRowWithId {
    fn try_into_assignment(self) -> Result<UserRole, DbError> {
        Ok(UserRole {
            id: parse_uuid(&self.record_id, "record")?,
            user_id: parse_uuid(&self.user_id, "user")?,
            role_id: parse_uuid(&self.role_id, "role")?,
            is_active: self.is_active,
            assigned_at: self.assigned_at,
            assigned_by: self
                .assigned_by
                .map(|v| parse_uuid(&v, "assigned_by"))
                .transpose()?,
            expires_at: self.expires_at,
        })
    }
}

impl AssignmentRow {
    fn try_into_assignment(self, id: Uuid) -> Result<UserRole, DbError> {
        Ok(UserRole {
            id,
            user_id: parse_uuid(&self.user_id, "user")?,
            role_id: parse_uuid(&self.role_id, "role")?,
            is_active: self.is_active,
            assigned_at: self.assigned_at,
            assigned_by: self
                .assigned_by
                .map(|v| parse_uuid(&v, "assigned_by"))
                .transpose()?,
            expires_at: self.expires_at,
        })
    }
}

/// SurrealDB implementation of the UserRole assignment repository.
pub struct SurrealUserRoleRepository<C: Connection> {
    db: Surreal<C>,
}

// Manual Clone: a derive would demand C: Clone.
impl<C: Connection> Clone for SurrealUserRoleRepository<C> {
    fn clone(&self) -> Self {
        Self { db: self.db.clone() }
    }
}

impl<C: Connection> SurrealUserRoleRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> UserRoleRepository for SurrealUserRoleRepository<C> {
    async fn assign(&self, input: AssignUserRole) -> HracResult<UserRole> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('user_role', $id) SET \
                 user_id = $user_id, role_id = $role_id, \
                 assigned_by = $assigned_by, expires_at = $expires_at",
            )
            .bind(("id", id_str.clone()))
            .bind(("user_id", input.user_id.to_string()))
            .bind(("role_id", input.role_id.to_string()))
            .bind(("assigned_by", input.assigned_by.map(|u| u.to_string())))
            .bind(("expires_at", input.expires_at))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Constraint(e.to_string()))?;

        let rows: Vec<AssignmentRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user_role".into(),
            id: id_str,
        })?;

        Ok(row.try_into_assignment(id)?)
    }

    async fn unassign(&self, user_id: Uuid, role_id: Uuid) -> HracResult<()> {
        self.db
            .query(
                "DELETE user_role WHERE \
                 user_id = $user_id AND role_id = $role_id",
            )
            .bind(("user_id", user_id.to_string()))
            .bind(("role_id", role_id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn set_active(&self, user_id: Uuid, role_id: Uuid, is_active: bool) -> HracResult<()> {
        self.db
            .query(
                "UPDATE user_role SET is_active = $is_active WHERE \
                 user_id = $user_id AND role_id = $role_id",
            )
            .bind(("user_id", user_id.to_string()))
            .bind(("role_id", role_id.to_string()))
            .bind(("is_active", is_active))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list_for_user(&self, user_id: Uuid) -> HracResult<Vec<UserRole>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM user_role \
                 WHERE user_id = $user_id ORDER BY assigned_at ASC",
            )
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AssignmentRowWithId> = result.take(0).map_err(DbError::from)?;

        let assignments = rows
            .into_iter()
            .map(|row| row.try_into_assignment())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(assignments)
    }
}

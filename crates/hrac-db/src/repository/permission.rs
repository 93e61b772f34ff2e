//! SurrealDB implementation of [`PermissionRepository`].

use chrono::{DateTime, Utc};
use hrac_core::error::HracResult;
use hrac_core::models::permission::{CreatePermission, Permission, UpdatePermission};
use hrac_core::repository::{PaginatedResult, Pagination, PermissionRepository};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct PermissionRow {
    name: String,
    code: String,
    description: Option<String>,
    module: String,
    action: String,
    resource: Option<String>,
    is_active: bool,
    created_by: Option<String>,
    updated_by: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct PermissionRowWithId {
    record_id: String,
    name: String,
    code: String,
    description: Option<String>,
    module: String,
    action: String,
    resource: Option<String>,
    is_active: bool,
    created_by: Option<String>,
    updated_by: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn parse_optional_uuid(value: Option<String>, field: &str) -> Result<Option<Uuid>, DbError> {
    value
        .map(|v| {
            Uuid::parse_str(&v)
                .map_err(|e| DbError::Constraint(format!("invalid {field} UUID: {e}")))
        })
        .transpose()
}

impl PermissionRowWithId {
    fn try_into_permission(self) -> Result<Permission, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Constraint(format!("invalid UUID: {e}")))?;
        Ok(Permission {
            id,
            name: self.name,
            code: self.code,
            description: self.description,
            module: self.module,
            action: self.action,
            resource: self.resource,
            is_active: self.is_active,
            created_by: parse_optional_uuid(self.created_by, "created_by")?,
            updated_by: parse_optional_uuid(self.updated_by, "updated_by")?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl PermissionRow {
    fn try_into_permission(self, id: Uuid) -> Result<Permission, DbError> {
        Ok(Permission {
            id,
            name: self.name,
            code: self.code,
            description: self.description,
            module: self.module,
            action: self.action,
            resource: self.resource,
            is_active: self.is_active,
            created_by: parse_optional_uuid(self.created_by, "created_by")?,
            updated_by: parse_optional_uuid(self.updated_by, "updated_by")?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Permission catalog repository.
pub struct SurrealPermissionRepository<C: Connection> {
    db: Surreal<C>,
}

// Manual Clone: a derive would demand C: Clone.
impl<C: Connection> Clone for SurrealPermissionRepository<C> {
    fn clone(&self) -> Self {
        Self { db: self.db.clone() }
    }
}

impl<C: Connection> SurrealPermissionRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> PermissionRepository for SurrealPermissionRepository<C> {
    async fn create(&self, input: CreatePermission) -> HracResult<Permission> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('permission', $id) SET \
                 name = $name, code = $code, description = $description, \
                 module = $module, action = $action, resource = $resource, \
                 created_by = $created_by",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .bind(("code", input.code))
            .bind(("description", input.description))
            .bind(("module", input.module))
            .bind(("action", input.action))
            .bind(("resource", input.resource))
            .bind(("created_by", input.created_by.map(|u| u.to_string())))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Constraint(e.to_string()))?;

        let rows: Vec<PermissionRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "permission".into(),
            id: id_str,
        })?;

        Ok(row.try_into_permission(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> HracResult<Permission> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('permission', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<PermissionRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "permission".into(),
            id: id_str,
        })?;

        Ok(row.try_into_permission(id)?)
    }

    async fn get_by_code(&self, code: &str) -> HracResult<Permission> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM permission \
                 WHERE code = $code",
            )
            .bind(("code", code.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<PermissionRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "permission".into(),
            id: code.to_string(),
        })?;

        Ok(row.try_into_permission()?)
    }

    async fn update(&self, id: Uuid, input: UpdatePermission) -> HracResult<Permission> {
        let id_str = id.to_string();

        // `code` is immutable and deliberately absent from the input.
        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.description.is_some() {
            sets.push("description = $description");
        }
        if input.module.is_some() {
            sets.push("module = $module");
        }
        if input.action.is_some() {
            sets.push("action = $action");
        }
        if input.resource.is_some() {
            sets.push("resource = $resource");
        }
        if input.is_active.is_some() {
            sets.push("is_active = $is_active");
        }
        if input.updated_by.is_some() {
            sets.push("updated_by = $updated_by");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('permission', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(description) = input.description {
            builder = builder.bind(("description", Some(description)));
        }
        if let Some(module) = input.module {
            builder = builder.bind(("module", module));
        }
        if let Some(action) = input.action {
            builder = builder.bind(("action", action));
        }
        if let Some(resource) = input.resource {
            builder = builder.bind(("resource", resource));
        }
        if let Some(is_active) = input.is_active {
            builder = builder.bind(("is_active", is_active));
        }
        if let Some(updated_by) = input.updated_by {
            builder = builder.bind(("updated_by", Some(updated_by.to_string())));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::Constraint(e.to_string()))?;

        let rows: Vec<PermissionRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "permission".into(),
            id: id_str,
        })?;

        Ok(row.try_into_permission(id)?)
    }

    async fn delete(&self, id: Uuid) -> HracResult<()> {
        let id_str = id.to_string();

        // A referenced permission must never be hard-deleted; callers
        // soft-disable via is_active instead.
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM role_permission \
                 WHERE permission_id = $id GROUP ALL; \
                 SELECT count() AS total FROM user_permission \
                 WHERE permission_id = $id GROUP ALL;",
            )
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let role_refs: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        let user_refs: Vec<CountRow> = result.take(1).map_err(DbError::from)?;
        let referenced = role_refs.first().map(|r| r.total).unwrap_or(0)
            + user_refs.first().map(|r| r.total).unwrap_or(0);

        if referenced > 0 {
            return Err(DbError::Constraint(format!(
                "permission {id_str} is referenced by {referenced} grant row(s); \
                 disable it instead of deleting"
            ))
            .into());
        }

        self.db
            .query("DELETE type::record('permission', $id)")
            .bind(("id", id_str))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list(&self, pagination: Pagination) -> HracResult<PaginatedResult<Permission>> {
        let mut count_result = self
            .db
            .query("SELECT count() AS total FROM permission GROUP ALL")
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM permission \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<PermissionRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_permission())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}

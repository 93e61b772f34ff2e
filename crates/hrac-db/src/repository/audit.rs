//! SurrealDB implementation of [`AuditLogRepository`].
//!
//! The `audit_log` table is append-only: schema PERMISSIONS forbid
//! update and delete.

use chrono::{DateTime, Utc};
use hrac_core::error::HracResult;
use hrac_core::models::audit::{AuditEntry, AuditOutcome, CreateAuditEntry};
use hrac_core::repository::{AuditFilter, AuditLogRepository, PaginatedResult, Pagination};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct AuditRow {
    user_id: Option<String>,
    permission_code: String,
    resource: Option<String>,
    operation: String,
    outcome: String,
    timestamp: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct AuditRowWithId {
    record_id: String,
    user_id: Option<String>,
    permission_code: String,
    resource: Option<String>,
    operation: String,
    outcome: String,
    timestamp: DateTime<Utc>,
}

fn parse_outcome(value: &str) -> Result<AuditOutcome, DbError> {
    match value {
        "Granted" => Ok(AuditOutcome::Granted),
        "Denied" => Ok(AuditOutcome::Denied),
        other => Err(DbError::Constraint(format!("invalid outcome: {other}"))),
    }
}

fn outcome_str(outcome: &AuditOutcome) -> &'static str {
    match outcome {
        AuditOutcome::Granted => "Granted",
        AuditOutcome::Denied => "Denied",
    }
}

impl AuditRowWithId {
    fn try_into_entry(self) -> Result<AuditEntry, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Constraint(format!("invalid UUID: {e}")))?;
        let user_id = self
            .user_id
            .map(|v| {
                Uuid::parse_str(&v)
                    .map_err(|e| DbError::Constraint(format!("invalid user UUID: {e}")))
            })
            .transpose()?;
        Ok(AuditEntry {
            id,
            user_id,
            permission_code: self.permission_code,
            resource: self.resource,
            operation: self.operation,
            outcome: parse_outcome(&self.outcome)?,
            timestamp: self.timestamp,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the append-only audit log.
pub struct SurrealAuditLogRepository<C: Connection> {
    db: Surreal<C>,
}

// Manual Clone: a derive would demand C: Clone.
impl<C: Connection> Clone for SurrealAuditLogRepository<C> {
    fn clone(&self) -> Self {
        Self { db: self.db.clone() }
    }
}

impl<C: Connection> SurrealAuditLogRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> AuditLogRepository for SurrealAuditLogRepository<C> {
    async fn append(&self, input: CreateAuditEntry) -> HracResult<AuditEntry> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let user_id = input.user_id;

        let result = self
            .db
            .query(
                "CREATE type::record('audit_log', $id) SET \
                 user_id = $user_id, permission_code = $permission_code, \
                 resource = $resource, operation = $operation, \
                 outcome = $outcome",
            )
            .bind(("id", id_str.clone()))
            .bind(("user_id", user_id.map(|u| u.to_string())))
            .bind(("permission_code", input.permission_code))
            .bind(("resource", input.resource))
            .bind(("operation", input.operation))
            .bind(("outcome", outcome_str(&input.outcome).to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Constraint(e.to_string()))?;

        let rows: Vec<AuditRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "audit_log".into(),
            id: id_str,
        })?;

        Ok(AuditEntry {
            id,
            user_id,
            permission_code: row.permission_code,
            resource: row.resource,
            operation: row.operation,
            outcome: parse_outcome(&row.outcome)?,
            timestamp: row.timestamp,
        })
    }

    async fn list(
        &self,
        filter: AuditFilter,
        pagination: Pagination,
    ) -> HracResult<PaginatedResult<AuditEntry>> {
        let mut conditions = Vec::new();
        if filter.user_id.is_some() {
            conditions.push("user_id = $user_id");
        }
        if filter.permission_code.is_some() {
            conditions.push("permission_code = $permission_code");
        }
        if filter.from.is_some() {
            conditions.push("timestamp >= $from");
        }
        if filter.to.is_some() {
            conditions.push("timestamp <= $to");
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {} ", conditions.join(" AND "))
        };

        let count_query =
            format!("SELECT count() AS total FROM audit_log {where_clause}GROUP ALL");
        let list_query = format!(
            "SELECT meta::id(id) AS record_id, * FROM audit_log {where_clause}\
             ORDER BY timestamp DESC LIMIT $limit START $offset"
        );

        let mut builder = self
            .db
            .query(&count_query)
            .query(&list_query)
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset));

        if let Some(user_id) = filter.user_id {
            builder = builder.bind(("user_id", Some(user_id.to_string())));
        }
        if let Some(code) = filter.permission_code {
            builder = builder.bind(("permission_code", code));
        }
        if let Some(from) = filter.from {
            builder = builder.bind(("from", from));
        }
        if let Some(to) = filter.to {
            builder = builder.bind(("to", to));
        }

        let mut result = builder.await.map_err(DbError::from)?;

        let count_rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let rows: Vec<AuditRowWithId> = result.take(1).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(|row| row.try_into_entry())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}

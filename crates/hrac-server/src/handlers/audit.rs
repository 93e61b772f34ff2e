//! Audit log read endpoint.

use axum::Json;
use axum::extract::{Query, State};
use chrono::{DateTime, Utc};
use hrac_core::models::audit::AuditEntry;
use hrac_core::repository::{AuditFilter, AuditLogRepository, PaginatedResult, Pagination};
use serde::Deserialize;
use surrealdb::Connection;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AuditQuery {
    pub user_id: Option<Uuid>,
    pub permission_code: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

pub async fn list<C: Connection>(
    State(state): State<AppState<C>>,
    Query(query): Query<AuditQuery>,
) -> ApiResult<Json<PaginatedResult<AuditEntry>>> {
    let default = Pagination::default();
    let pagination = Pagination {
        offset: query.offset.unwrap_or(default.offset),
        limit: query.limit.unwrap_or(default.limit),
    };
    let filter = AuditFilter {
        user_id: query.user_id,
        permission_code: query.permission_code,
        from: query.from,
        to: query.to,
    };
    let result = state.audit.list(filter, pagination).await?;
    Ok(Json(result))
}

//! User endpoints: CRUD, role assignments, overrides and the
//! effective-permission probe.

use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use hrac_authz::Identity;
use hrac_core::models::user::{CreateUser, UpdateUser, User};
use hrac_core::models::user_permission::{GrantUserPermission, UserPermission};
use hrac_core::models::user_role::{AssignUserRole, UserRole};
use hrac_core::repository::{
    PaginatedResult, UserPermissionRepository, UserRepository, UserRoleRepository,
};
use serde::{Deserialize, Serialize};
use surrealdb::Connection;
use uuid::Uuid;

use super::PageQuery;
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list<C: Connection>(
    State(state): State<AppState<C>>,
    Query(page): Query<PageQuery>,
) -> ApiResult<Json<PaginatedResult<User>>> {
    let result = state.users.list(page.into()).await?;
    Ok(Json(result))
}

pub async fn create<C: Connection>(
    State(state): State<AppState<C>>,
    Json(input): Json<CreateUser>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let user = state.users.create(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn get<C: Connection>(
    State(state): State<AppState<C>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<User>> {
    let user = state.users.get_by_id(id).await?;
    Ok(Json(user))
}

pub async fn update<C: Connection>(
    State(state): State<AppState<C>>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateUser>,
) -> ApiResult<Json<User>> {
    let user = state.users.update(id, input).await?;
    Ok(Json(user))
}

pub async fn delete<C: Connection>(
    State(state): State<AppState<C>>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.users.delete(id).await?;
    state.cache.invalidate_user(id);
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Role assignments
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct AssignRoleBody {
    pub role_id: Uuid,
    pub expires_at: Option<DateTime<Utc>>,
}

pub async fn list_roles<C: Connection>(
    State(state): State<AppState<C>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<UserRole>>> {
    let assignments = state.assignments.list_for_user(id).await?;
    Ok(Json(assignments))
}

pub async fn assign_role<C: Connection>(
    State(state): State<AppState<C>>,
    Path(id): Path<Uuid>,
    identity: Option<Extension<Identity>>,
    Json(body): Json<AssignRoleBody>,
) -> ApiResult<(StatusCode, Json<UserRole>)> {
    let assignment = state
        .assignments
        .assign(AssignUserRole {
            user_id: id,
            role_id: body.role_id,
            assigned_by: identity.map(|Extension(i)| i.user_id),
            expires_at: body.expires_at,
        })
        .await?;
    state.cache.invalidate_user(id);
    Ok((StatusCode::CREATED, Json(assignment)))
}

pub async fn unassign_role<C: Connection>(
    State(state): State<AppState<C>>,
    Path((id, role_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    state.assignments.unassign(id, role_id).await?;
    state.cache.invalidate_user(id);
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Per-user overrides
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct OverrideBody {
    pub permission_id: Uuid,
    pub is_granted: bool,
    pub reason: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

pub async fn list_overrides<C: Connection>(
    State(state): State<AppState<C>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<UserPermission>>> {
    let overrides = state.overrides.list_for_user(id).await?;
    Ok(Json(overrides))
}

pub async fn grant_override<C: Connection>(
    State(state): State<AppState<C>>,
    Path(id): Path<Uuid>,
    identity: Option<Extension<Identity>>,
    Json(body): Json<OverrideBody>,
) -> ApiResult<(StatusCode, Json<UserPermission>)> {
    let grant = state
        .overrides
        .grant(GrantUserPermission {
            user_id: id,
            permission_id: body.permission_id,
            is_granted: body.is_granted,
            reason: body.reason,
            assigned_by: identity.map(|Extension(i)| i.user_id),
            expires_at: body.expires_at,
        })
        .await?;
    state.cache.invalidate_user(id);
    Ok((StatusCode::CREATED, Json(grant)))
}

pub async fn remove_override<C: Connection>(
    State(state): State<AppState<C>>,
    Path((id, permission_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    state.overrides.remove(id, permission_id).await?;
    state.cache.invalidate_user(id);
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Effective permission probe
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct CheckQuery {
    pub code: String,
    pub resource: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub allowed: bool,
}

pub async fn check<C: Connection>(
    State(state): State<AppState<C>>,
    Path(id): Path<Uuid>,
    Query(query): Query<CheckQuery>,
) -> ApiResult<Json<CheckResponse>> {
    let allowed = state
        .gate
        .resolver()
        .has_permission(id, &query.code, query.resource.as_deref())
        .await?;
    Ok(Json(CheckResponse { allowed }))
}

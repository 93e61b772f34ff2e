//! Permission catalog endpoints.

use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use hrac_authz::Identity;
use hrac_core::models::permission::{CreatePermission, Permission, UpdatePermission};
use hrac_core::repository::{PaginatedResult, PermissionRepository};
use surrealdb::Connection;
use uuid::Uuid;

use super::PageQuery;
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list<C: Connection>(
    State(state): State<AppState<C>>,
    Query(page): Query<PageQuery>,
) -> ApiResult<Json<PaginatedResult<Permission>>> {
    let result = state.permissions.list(page.into()).await?;
    Ok(Json(result))
}

pub async fn create<C: Connection>(
    State(state): State<AppState<C>>,
    identity: Option<Extension<Identity>>,
    Json(mut input): Json<CreatePermission>,
) -> ApiResult<(StatusCode, Json<Permission>)> {
    input.created_by = identity.map(|Extension(i)| i.user_id);
    let permission = state.permissions.create(input).await?;
    Ok((StatusCode::CREATED, Json(permission)))
}

pub async fn get<C: Connection>(
    State(state): State<AppState<C>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Permission>> {
    let permission = state.permissions.get_by_id(id).await?;
    Ok(Json(permission))
}

pub async fn update<C: Connection>(
    State(state): State<AppState<C>>,
    Path(id): Path<Uuid>,
    identity: Option<Extension<Identity>>,
    Json(mut input): Json<UpdatePermission>,
) -> ApiResult<Json<Permission>> {
    input.updated_by = identity.map(|Extension(i)| i.user_id);
    let permission = state.permissions.update(id, input).await?;
    // Catalog edits (deactivation, rescoping) change decisions globally.
    state.cache.clear();
    Ok(Json(permission))
}

pub async fn delete<C: Connection>(
    State(state): State<AppState<C>>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.permissions.delete(id).await?;
    state.cache.clear();
    Ok(StatusCode::NO_CONTENT)
}

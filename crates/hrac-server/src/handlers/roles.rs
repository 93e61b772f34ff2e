//! Role endpoints, including role-permission grant management.

use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use hrac_authz::Identity;
use hrac_core::models::role::{CreateRole, Role, UpdateRole};
use hrac_core::models::role_permission::{GrantRolePermission, RolePermission};
use hrac_core::repository::{PaginatedResult, RolePermissionRepository, RoleRepository};
use serde::Deserialize;
use surrealdb::Connection;
use uuid::Uuid;

use super::PageQuery;
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list<C: Connection>(
    State(state): State<AppState<C>>,
    Query(page): Query<PageQuery>,
) -> ApiResult<Json<PaginatedResult<Role>>> {
    let result = state.roles.list(page.into()).await?;
    Ok(Json(result))
}

pub async fn create<C: Connection>(
    State(state): State<AppState<C>>,
    Json(input): Json<CreateRole>,
) -> ApiResult<(StatusCode, Json<Role>)> {
    let role = state.roles.create(input).await?;
    Ok((StatusCode::CREATED, Json(role)))
}

pub async fn get<C: Connection>(
    State(state): State<AppState<C>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Role>> {
    let role = state.roles.get_by_id(id).await?;
    Ok(Json(role))
}

pub async fn update<C: Connection>(
    State(state): State<AppState<C>>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateRole>,
) -> ApiResult<Json<Role>> {
    let role = state.roles.update(id, input).await?;
    Ok(Json(role))
}

pub async fn delete<C: Connection>(
    State(state): State<AppState<C>>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.roles.delete(id).await?;
    // Deleting a role removes its grants and assignments.
    state.cache.clear();
    Ok(StatusCode::NO_CONTENT)
}

/// Body for granting one permission to the role in the path.
#[derive(Debug, Deserialize)]
pub struct GrantBody {
    pub permission_id: Uuid,
    #[serde(default = "default_granted")]
    pub is_granted: bool,
    pub expires_at: Option<DateTime<Utc>>,
}

fn default_granted() -> bool {
    true
}

impl GrantBody {
    fn into_input(self, role_id: Uuid, assigned_by: Option<Uuid>) -> GrantRolePermission {
        GrantRolePermission {
            role_id,
            permission_id: self.permission_id,
            is_granted: self.is_granted,
            assigned_by,
            expires_at: self.expires_at,
        }
    }
}

pub async fn list_grants<C: Connection>(
    State(state): State<AppState<C>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<RolePermission>>> {
    let grants = state.role_grants.list_for_role(id).await?;
    Ok(Json(grants))
}

pub async fn grant<C: Connection>(
    State(state): State<AppState<C>>,
    Path(id): Path<Uuid>,
    identity: Option<Extension<Identity>>,
    Json(body): Json<GrantBody>,
) -> ApiResult<(StatusCode, Json<RolePermission>)> {
    let assigned_by = identity.map(|Extension(i)| i.user_id);
    let grant = state
        .role_grants
        .grant(body.into_input(id, assigned_by))
        .await?;
    // Role-keyed change: affects every member, evict everything.
    state.cache.clear();
    Ok((StatusCode::CREATED, Json(grant)))
}

pub async fn grant_bulk<C: Connection>(
    State(state): State<AppState<C>>,
    Path(id): Path<Uuid>,
    identity: Option<Extension<Identity>>,
    Json(bodies): Json<Vec<GrantBody>>,
) -> ApiResult<(StatusCode, Json<Vec<RolePermission>>)> {
    let assigned_by = identity.map(|Extension(i)| i.user_id);
    let inputs = bodies
        .into_iter()
        .map(|b| b.into_input(id, assigned_by))
        .collect();
    let grants = state.role_grants.grant_many(inputs).await?;
    state.cache.clear();
    Ok((StatusCode::CREATED, Json(grants)))
}

pub async fn revoke<C: Connection>(
    State(state): State<AppState<C>>,
    Path((id, permission_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    state.role_grants.remove(id, permission_id).await?;
    state.cache.clear();
    Ok(StatusCode::NO_CONTENT)
}

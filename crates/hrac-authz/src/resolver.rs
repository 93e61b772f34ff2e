//! Permission resolution — the single source of truth for
//! "can this user perform this action?".

use std::collections::HashSet;
use std::sync::Arc;

use hrac_core::error::{HracError, HracResult};
use hrac_core::models::grant::{TemporalGrant, latest_effective};
use hrac_core::repository::{
    PermissionRepository, RolePermissionRepository, UserPermissionRepository, UserRepository,
    UserRoleRepository,
};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::cache::DecisionCache;

/// Permission resolution service.
///
/// Generic over repository implementations so the authorization layer
/// has no dependency on the database crate. Resolution is a pure read:
/// it never mutates state and never coerces a store failure into a
/// denial — errors propagate so callers can fail closed with a 5xx
/// instead of a misleading 403.
pub struct PermissionResolver<U, P, UP, UR, RP>
where
    U: UserRepository,
    P: PermissionRepository,
    UP: UserPermissionRepository,
    UR: UserRoleRepository,
    RP: RolePermissionRepository,
{
    users: U,
    permissions: P,
    overrides: UP,
    assignments: UR,
    role_grants: RP,
    cache: Option<Arc<DecisionCache>>,
}

impl<U, P, UP, UR, RP> PermissionResolver<U, P, UP, UR, RP>
where
    U: UserRepository,
    P: PermissionRepository,
    UP: UserPermissionRepository,
    UR: UserRoleRepository,
    RP: RolePermissionRepository,
{
    pub fn new(users: U, permissions: P, overrides: UP, assignments: UR, role_grants: RP) -> Self {
        Self {
            users,
            permissions,
            overrides,
            assignments,
            role_grants,
            cache: None,
        }
    }

    /// Attach a decision cache. Resolution results are stored per user
    /// and served until they expire or are invalidated by a write.
    pub fn with_cache(mut self, cache: Arc<DecisionCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Does `user_id` hold the permission identified by `code`, for the
    /// given resource?
    ///
    /// `Ok(false)` is a determined denial. Store failures surface as
    /// `Err` and must not be treated as a denial.
    pub async fn has_permission(
        &self,
        user_id: Uuid,
        code: &str,
        resource: Option<&str>,
    ) -> HracResult<bool> {
        if let Some(cache) = &self.cache
            && let Some(decision) = cache.get(user_id, code, resource)
        {
            return Ok(decision);
        }

        let decision = self.resolve(user_id, code, resource).await?;

        if let Some(cache) = &self.cache {
            cache.insert(user_id, code, resource, decision);
        }

        Ok(decision)
    }

    async fn resolve(&self, user_id: Uuid, code: &str, resource: Option<&str>) -> HracResult<bool> {
        // 1. Subject. A missing or deactivated user holds nothing,
        //    whatever grant rows still reference them.
        let user = match self.users.get_by_id(user_id).await {
            Ok(user) => user,
            Err(HracError::NotFound { .. }) => {
                debug!(%user_id, "permission check for unknown user");
                return Ok(false);
            }
            Err(e) => return Err(e),
        };
        if !user.is_active {
            debug!(%user_id, "user is deactivated");
            return Ok(false);
        }

        // 2. Catalog lookup. A code nothing in the catalog matches is a
        //    configuration error on the caller's side, not ours: warn
        //    and deny rather than fail.
        let permission = match self.permissions.get_by_code(code).await {
            Ok(p) => p,
            Err(HracError::NotFound { .. }) => {
                warn!(code, "permission check against unknown code");
                return Ok(false);
            }
            Err(e) => return Err(e),
        };

        if !permission.is_active {
            debug!(code, "permission is inactive");
            return Ok(false);
        }

        // 3. Resource qualifier. A permission scoped to a resource only
        //    matches a check for that resource; an unscoped permission
        //    matches any.
        if let Some(requested) = resource
            && let Some(scope) = &permission.resource
            && scope != requested
        {
            debug!(code, requested, scope, "resource qualifier mismatch");
            return Ok(false);
        }

        let now = chrono::Utc::now();

        // 4. User override — authoritative in both directions.
        let override_rows = self.overrides.find(user_id, permission.id).await?;
        if let Some(winner) = latest_effective(&override_rows, now) {
            debug!(
                code,
                %user_id,
                granted = winner.is_granted,
                "user override decides"
            );
            return Ok(winner.is_granted);
        }

        // 5. Roles — any active, non-expired role with an effective
        //    grant allows.
        let assignments = self.assignments.list_for_user(user_id).await?;
        let role_ids: HashSet<Uuid> = assignments
            .iter()
            .filter(|a| a.is_active && !a.is_expired(now))
            .map(|a| a.role_id)
            .collect();

        for role_id in role_ids {
            let grant_rows = self.role_grants.find(role_id, permission.id).await?;
            if let Some(winner) = latest_effective(&grant_rows, now)
                && winner.is_granted
            {
                debug!(code, %user_id, %role_id, "granted via role");
                return Ok(true);
            }
        }

        // 6. Nothing grants: deny.
        Ok(false)
    }
}

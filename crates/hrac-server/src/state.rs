//! Shared application state.

use std::sync::Arc;

use hrac_authz::{AuthzConfig, DecisionCache, EnforcementGate};
use hrac_db::repository::{
    SurrealAuditLogRepository, SurrealPermissionRepository, SurrealRolePermissionRepository,
    SurrealRoleRepository, SurrealUserPermissionRepository, SurrealUserRepository,
    SurrealUserRoleRepository,
};
use surrealdb::{Connection, Surreal};

/// The enforcement gate over SurrealDB-backed repositories.
pub type Gate<C> = EnforcementGate<
    SurrealUserRepository<C>,
    SurrealPermissionRepository<C>,
    SurrealUserPermissionRepository<C>,
    SurrealUserRoleRepository<C>,
    SurrealRolePermissionRepository<C>,
>;

/// Everything the handlers and middleware share. Generic over the
/// SurrealDB connection so tests run against the in-memory engine.
pub struct AppState<C: Connection> {
    pub users: SurrealUserRepository<C>,
    pub roles: SurrealRoleRepository<C>,
    pub permissions: SurrealPermissionRepository<C>,
    pub role_grants: SurrealRolePermissionRepository<C>,
    pub overrides: SurrealUserPermissionRepository<C>,
    pub assignments: SurrealUserRoleRepository<C>,
    pub audit: SurrealAuditLogRepository<C>,
    pub gate: Arc<Gate<C>>,
    pub cache: Arc<DecisionCache>,
    pub authz_config: Arc<AuthzConfig>,
}

// Manual Clone: a derive would demand C: Clone.
impl<C: Connection> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            users: self.users.clone(),
            roles: self.roles.clone(),
            permissions: self.permissions.clone(),
            role_grants: self.role_grants.clone(),
            overrides: self.overrides.clone(),
            assignments: self.assignments.clone(),
            audit: self.audit.clone(),
            gate: Arc::clone(&self.gate),
            cache: Arc::clone(&self.cache),
            authz_config: Arc::clone(&self.authz_config),
        }
    }
}

impl<C: Connection> AppState<C> {
    /// Wire repositories, cache and gate around one database handle.
    pub fn new(
        db: Surreal<C>,
        registry: hrac_authz::RequirementRegistry,
        authz_config: AuthzConfig,
    ) -> Self {
        let cache = Arc::new(DecisionCache::new(std::time::Duration::from_secs(
            authz_config.decision_cache_ttl_secs,
        )));

        let resolver = hrac_authz::PermissionResolver::new(
            SurrealUserRepository::new(db.clone()),
            SurrealPermissionRepository::new(db.clone()),
            SurrealUserPermissionRepository::new(db.clone()),
            SurrealUserRoleRepository::new(db.clone()),
            SurrealRolePermissionRepository::new(db.clone()),
        )
        .with_cache(Arc::clone(&cache));

        Self {
            users: SurrealUserRepository::new(db.clone()),
            roles: SurrealRoleRepository::new(db.clone()),
            permissions: SurrealPermissionRepository::new(db.clone()),
            role_grants: SurrealRolePermissionRepository::new(db.clone()),
            overrides: SurrealUserPermissionRepository::new(db.clone()),
            assignments: SurrealUserRoleRepository::new(db.clone()),
            audit: SurrealAuditLogRepository::new(db),
            gate: Arc::new(EnforcementGate::new(registry, resolver)),
            cache,
            authz_config: Arc::new(authz_config),
        }
    }
}

//! Router assembly and the operation-to-permission requirement table.

use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, post};
use hrac_authz::RequirementRegistry;
use surrealdb::Connection;
use tower_http::trace::TraceLayer;

use crate::handlers::{audit, permissions, roles, users};
use crate::middleware::enforce;
use crate::state::AppState;

async fn healthz() -> &'static str {
    "ok"
}

/// The requirement table for every management operation. Operation ids
/// use the route template, matching what the middleware derives from
/// `MatchedPath`. `/healthz` has no entry and passes through.
pub fn build_registry() -> RequirementRegistry {
    let mut r = RequirementRegistry::new();

    r.require("GET /v1/permissions", "PERMISSION_READ");
    r.require("POST /v1/permissions", "PERMISSION_CREATE");
    r.require("GET /v1/permissions/{id}", "PERMISSION_READ");
    r.require("PUT /v1/permissions/{id}", "PERMISSION_UPDATE");
    r.require("DELETE /v1/permissions/{id}", "PERMISSION_DELETE");

    r.require("GET /v1/roles", "ROLE_READ");
    r.require("POST /v1/roles", "ROLE_CREATE");
    r.require("GET /v1/roles/{id}", "ROLE_READ");
    r.require("PUT /v1/roles/{id}", "ROLE_UPDATE");
    r.require("DELETE /v1/roles/{id}", "ROLE_DELETE");
    r.require("GET /v1/roles/{id}/permissions", "ROLE_READ");
    r.require("POST /v1/roles/{id}/permissions", "ROLE_GRANT");
    r.require("POST /v1/roles/{id}/permissions/bulk", "ROLE_GRANT");
    r.require("DELETE /v1/roles/{id}/permissions/{permission_id}", "ROLE_GRANT");

    r.require("GET /v1/users", "USER_READ");
    r.require("POST /v1/users", "USER_CREATE");
    r.require("GET /v1/users/{id}", "USER_READ");
    r.require("PUT /v1/users/{id}", "USER_UPDATE");
    r.require("DELETE /v1/users/{id}", "USER_DELETE");
    r.require("GET /v1/users/{id}/roles", "USER_READ");
    r.require("POST /v1/users/{id}/roles", "USER_ASSIGN");
    r.require("DELETE /v1/users/{id}/roles/{role_id}", "USER_ASSIGN");
    r.require("GET /v1/users/{id}/permissions", "USER_READ");
    r.require("POST /v1/users/{id}/permissions", "USER_OVERRIDE");
    r.require(
        "DELETE /v1/users/{id}/permissions/{permission_id}",
        "USER_OVERRIDE",
    );
    r.require("GET /v1/users/{id}/permissions/check", "PERMISSION_READ");

    r.require("GET /v1/audit", "AUDIT_READ");

    r
}

/// Assemble the application router. Every route passes the enforcement
/// middleware; what each one requires is decided by the registry.
pub fn router<C: Connection>(state: AppState<C>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route(
            "/v1/permissions",
            get(permissions::list::<C>).post(permissions::create::<C>),
        )
        .route(
            "/v1/permissions/{id}",
            get(permissions::get::<C>)
                .put(permissions::update::<C>)
                .delete(permissions::delete::<C>),
        )
        .route("/v1/roles", get(roles::list::<C>).post(roles::create::<C>))
        .route(
            "/v1/roles/{id}",
            get(roles::get::<C>)
                .put(roles::update::<C>)
                .delete(roles::delete::<C>),
        )
        .route(
            "/v1/roles/{id}/permissions",
            get(roles::list_grants::<C>).post(roles::grant::<C>),
        )
        .route("/v1/roles/{id}/permissions/bulk", post(roles::grant_bulk::<C>))
        .route(
            "/v1/roles/{id}/permissions/{permission_id}",
            delete(roles::revoke::<C>),
        )
        .route("/v1/users", get(users::list::<C>).post(users::create::<C>))
        .route(
            "/v1/users/{id}",
            get(users::get::<C>)
                .put(users::update::<C>)
                .delete(users::delete::<C>),
        )
        .route(
            "/v1/users/{id}/roles",
            get(users::list_roles::<C>).post(users::assign_role::<C>),
        )
        .route(
            "/v1/users/{id}/roles/{role_id}",
            delete(users::unassign_role::<C>),
        )
        .route(
            "/v1/users/{id}/permissions",
            get(users::list_overrides::<C>).post(users::grant_override::<C>),
        )
        .route(
            "/v1/users/{id}/permissions/{permission_id}",
            delete(users::remove_override::<C>),
        )
        .route("/v1/users/{id}/permissions/check", get(users::check::<C>))
        .route("/v1/audit", get(audit::list::<C>))
        .layer(from_fn_with_state(state.clone(), enforce::<C>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

//! Request-level enforcement middleware.
//!
//! Extracts the bearer identity, asks the gate, and either forwards the
//! request (identity attached as an extension) or answers 401/403. The
//! outcome of every guarded decision is appended to the audit log.

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use hrac_authz::{GateDecision, Identity, token};
use hrac_core::models::audit::{AuditOutcome, CreateAuditEntry};
use hrac_core::repository::AuditLogRepository;
use surrealdb::Connection;
use tracing::warn;

use crate::error::{ApiError, gate_denial};
use crate::state::AppState;

/// Operation identifier: `"METHOD /matched/path"`, using the route
/// template (`/v1/users/{id}`), not the concrete URI.
fn operation_id(req: &Request<Body>) -> String {
    let path = req
        .extensions()
        .get::<axum::extract::MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());
    format!("{} {}", req.method(), path)
}

/// Bearer identity, if a valid token is attached. An absent, malformed
/// or expired token all resolve to `None`: the gate decides whether
/// that matters for this operation.
fn extract_identity<C: Connection>(state: &AppState<C>, req: &Request<Body>) -> Option<Identity> {
    let header = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let raw = header.strip_prefix("Bearer ")?;
    let claims = match token::validate_access_token(raw, &state.authz_config) {
        Ok(claims) => claims,
        Err(e) => {
            warn!(error = %e, "rejected bearer token");
            return None;
        }
    };
    Identity::from_claims(&claims).ok()
}

async fn append_audit<C: Connection>(
    state: &AppState<C>,
    identity: Option<&Identity>,
    operation: &str,
    decision: &GateDecision,
) {
    let Some(requirements) = state.gate.registry().get(operation) else {
        return;
    };
    if requirements.is_empty() {
        return;
    }

    // One row per requirement when the gate let the request through; a
    // denial records only the requirement that failed, with its scope.
    let rows: Vec<(String, Option<String>, AuditOutcome)> = match decision {
        GateDecision::Allowed => requirements
            .iter()
            .map(|r| (r.code.clone(), r.resource.clone(), AuditOutcome::Granted))
            .collect(),
        GateDecision::Unauthenticated => requirements
            .iter()
            .map(|r| (r.code.clone(), r.resource.clone(), AuditOutcome::Denied))
            .collect(),
        GateDecision::Forbidden { code } => {
            let resource = requirements
                .iter()
                .find(|r| r.code == *code)
                .and_then(|r| r.resource.clone());
            vec![(code.clone(), resource, AuditOutcome::Denied)]
        }
    };

    for (permission_code, resource, outcome) in rows {
        let entry = CreateAuditEntry {
            user_id: identity.map(|i| i.user_id),
            permission_code,
            resource,
            operation: operation.to_string(),
            outcome,
        };

        // Auditing must not block the request path.
        if let Err(e) = state.audit.append(entry).await {
            warn!(error = %e, operation, "failed to append audit entry");
        }
    }
}

/// The enforcement middleware. Applied to the whole router; operations
/// without registry entries (e.g. `/healthz`) pass straight through.
pub async fn enforce<C: Connection>(
    State(state): State<AppState<C>>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let operation = operation_id(&req);
    let identity = extract_identity(&state, &req);

    let decision = match state.gate.check(&operation, identity.as_ref()).await {
        Ok(decision) => decision,
        // Indeterminate — fail closed with a 5xx, never a 403.
        Err(e) => return ApiError::from(e).into_response(),
    };

    append_audit(&state, identity.as_ref(), &operation, &decision).await;

    match decision {
        GateDecision::Allowed => {
            if let Some(identity) = identity {
                req.extensions_mut().insert(identity);
            }
            next.run(req).await
        }
        denial => gate_denial(&denial),
    }
}

//! Requirement registry and enforcement gate.
//!
//! The registry is an inspectable startup-built map from operation
//! identifiers to the permissions they require. The gate turns a
//! (operation, identity?) pair into exactly one of three decisions —
//! allowed, unauthenticated, forbidden — and owns the human-readable
//! messages; the resolver never touches responses.

use std::collections::HashMap;

use hrac_core::error::HracResult;
use hrac_core::repository::{
    PermissionRepository, RolePermissionRepository, UserPermissionRepository, UserRepository,
    UserRoleRepository,
};
use tracing::debug;

use crate::identity::Identity;
use crate::resolver::PermissionResolver;

/// One permission an operation requires, optionally scoped to a
/// resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionRequirement {
    pub code: String,
    pub resource: Option<String>,
}

/// Startup-built map from operation identifier (in the HTTP layer:
/// `"METHOD /matched/path"`) to required permissions.
///
/// Multiple requirements on one operation are AND-ed. An operation with
/// no entry is open — the gate passes it through without consulting the
/// resolver.
#[derive(Debug, Default)]
pub struct RequirementRegistry {
    requirements: HashMap<String, Vec<PermissionRequirement>>,
}

impl RequirementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `code` for `operation`, unscoped.
    pub fn require(&mut self, operation: impl Into<String>, code: impl Into<String>) {
        self.requirements
            .entry(operation.into())
            .or_default()
            .push(PermissionRequirement {
                code: code.into(),
                resource: None,
            });
    }

    /// Require `code` for `operation`, scoped to `resource`.
    pub fn require_scoped(
        &mut self,
        operation: impl Into<String>,
        code: impl Into<String>,
        resource: impl Into<String>,
    ) {
        self.requirements
            .entry(operation.into())
            .or_default()
            .push(PermissionRequirement {
                code: code.into(),
                resource: Some(resource.into()),
            });
    }

    pub fn get(&self, operation: &str) -> Option<&[PermissionRequirement]> {
        self.requirements.get(operation).map(Vec::as_slice)
    }

    pub fn is_guarded(&self, operation: &str) -> bool {
        self.requirements
            .get(operation)
            .is_some_and(|reqs| !reqs.is_empty())
    }

    /// Every distinct permission code the registry references. Used at
    /// startup to validate the registry against the catalog.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        let mut seen: Vec<&str> = self
            .requirements
            .values()
            .flatten()
            .map(|r| r.code.as_str())
            .collect();
        seen.sort_unstable();
        seen.dedup();
        seen.into_iter()
    }

    pub fn operations(&self) -> impl Iterator<Item = &str> {
        self.requirements.keys().map(String::as_str)
    }
}

/// The gate's verdict for one operation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Allowed,
    /// The operation is guarded and no authenticated identity was
    /// presented.
    Unauthenticated,
    /// The identity lacks a required permission. Discloses the failing
    /// code, never the denial path.
    Forbidden { code: String },
}

impl GateDecision {
    /// HTTP status this decision maps to.
    pub fn status(&self) -> u16 {
        match self {
            GateDecision::Allowed => 200,
            GateDecision::Unauthenticated => 401,
            GateDecision::Forbidden { .. } => 403,
        }
    }

    /// Response body message for denials.
    pub fn message(&self) -> Option<String> {
        match self {
            GateDecision::Allowed => None,
            GateDecision::Unauthenticated => {
                Some("Unauthorized: User not authenticated".to_string())
            }
            GateDecision::Forbidden { code } => {
                Some(format!("Forbidden: User does not have permission '{code}'"))
            }
        }
    }
}

/// Permission enforcement gate.
///
/// Composes the registry with the resolver. Resolver errors propagate
/// untouched: an indeterminate check must never collapse into a
/// determined denial.
pub struct EnforcementGate<U, P, UP, UR, RP>
where
    U: UserRepository,
    P: PermissionRepository,
    UP: UserPermissionRepository,
    UR: UserRoleRepository,
    RP: RolePermissionRepository,
{
    registry: RequirementRegistry,
    resolver: PermissionResolver<U, P, UP, UR, RP>,
}

impl<U, P, UP, UR, RP> EnforcementGate<U, P, UP, UR, RP>
where
    U: UserRepository,
    P: PermissionRepository,
    UP: UserPermissionRepository,
    UR: UserRoleRepository,
    RP: RolePermissionRepository,
{
    pub fn new(
        registry: RequirementRegistry,
        resolver: PermissionResolver<U, P, UP, UR, RP>,
    ) -> Self {
        Self { registry, resolver }
    }

    pub fn registry(&self) -> &RequirementRegistry {
        &self.registry
    }

    pub fn resolver(&self) -> &PermissionResolver<U, P, UP, UR, RP> {
        &self.resolver
    }

    /// Decide whether `identity` may perform `operation`.
    pub async fn check(
        &self,
        operation: &str,
        identity: Option<&Identity>,
    ) -> HracResult<GateDecision> {
        let Some(requirements) = self.registry.get(operation) else {
            return Ok(GateDecision::Allowed);
        };
        if requirements.is_empty() {
            return Ok(GateDecision::Allowed);
        }

        let Some(identity) = identity else {
            debug!(operation, "guarded operation without identity");
            return Ok(GateDecision::Unauthenticated);
        };

        for requirement in requirements {
            let allowed = self
                .resolver
                .has_permission(
                    identity.user_id,
                    &requirement.code,
                    requirement.resource.as_deref(),
                )
                .await?;
            if !allowed {
                debug!(
                    operation,
                    user_id = %identity.user_id,
                    code = %requirement.code,
                    "gate denied"
                );
                return Ok(GateDecision::Forbidden {
                    code: requirement.code.clone(),
                });
            }
        }

        Ok(GateDecision::Allowed)
    }
}

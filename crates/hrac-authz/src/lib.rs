//! Permission resolution and enforcement for HRAC.
//!
//! This crate answers one question — "can this user perform this
//! action?" — and exposes the pieces the HTTP layer composes around it:
//!
//! - [`resolver::PermissionResolver`] — the resolution algorithm over
//!   the repository traits (overrides beat roles, expiry excluded,
//!   fail closed).
//! - [`cache::DecisionCache`] — time-boxed per-user decision cache.
//! - [`gate::EnforcementGate`] — maps operation requirements plus an
//!   optional identity to an allow/401/403 decision.
//! - [`token`] — stateless EdDSA access-token verification.

pub mod cache;
pub mod config;
pub mod error;
pub mod gate;
pub mod identity;
pub mod resolver;
pub mod token;

pub use cache::DecisionCache;
pub use config::AuthzConfig;
pub use error::AuthzError;
pub use gate::{EnforcementGate, GateDecision, PermissionRequirement, RequirementRegistry};
pub use identity::Identity;
pub use resolver::PermissionResolver;

//! Domain models for HRAC.
//!
//! These are the core types shared across all crates: the permission
//! catalog, roles, users, and the three temporal association entities
//! that carry grants between them.

pub mod audit;
pub mod grant;
pub mod permission;
pub mod role;
pub mod role_permission;
pub mod user;
pub mod user_permission;
pub mod user_role;

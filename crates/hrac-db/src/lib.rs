//! HRAC Database — SurrealDB connection management and repository
//! implementations.
//!
//! This crate provides:
//! - Connection setup ([`connect`], [`DbConfig`])
//! - Schema initialization and migrations ([`run_migrations`])
//! - Error types ([`DbError`])
//! - SurrealDB implementations of the `hrac-core` repository traits

mod connection;
mod error;
pub mod repository;
mod schema;

pub use connection::{DbConfig, connect};
pub use error::DbError;
pub use schema::{run_migrations, schema_v1};

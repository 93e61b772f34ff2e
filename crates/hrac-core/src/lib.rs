//! HRAC Core — domain models, error types and repository traits for the
//! HR access-control system.
//!
//! This crate has no I/O: it defines the shapes shared by the database
//! layer (`hrac-db`), the authorization engine (`hrac-authz`) and the
//! management API (`hrac-server`).

pub mod error;
pub mod models;
pub mod repository;

pub use error::{HracError, HracResult};

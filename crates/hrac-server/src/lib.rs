//! HRAC server — HTTP management API with per-operation permission
//! enforcement.

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use state::AppState;

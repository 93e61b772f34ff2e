//! SurrealDB connection setup.

use std::env;

use surrealdb::Surreal;
use surrealdb::engine::remote::ws::{Client, Ws};
use surrealdb::opt::auth::Root;
use tracing::info;

use crate::error::DbError;

/// Connection settings, spelled out directly or read from the
/// `HRAC_DB_*` environment.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// WebSocket endpoint, host:port.
    pub url: String,
    pub namespace: String,
    pub database: String,
    pub username: String,
    pub password: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: "127.0.0.1:8000".into(),
            namespace: "hrac".into(),
            database: "main".into(),
            username: "root".into(),
            password: "root".into(),
        }
    }
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

impl DbConfig {
    /// Read `HRAC_DB_URL`, `HRAC_DB_NAMESPACE`, `HRAC_DB_DATABASE`,
    /// `HRAC_DB_USERNAME` and `HRAC_DB_PASSWORD`, falling back to the
    /// development defaults for anything unset.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            url: var_or("HRAC_DB_URL", &defaults.url),
            namespace: var_or("HRAC_DB_NAMESPACE", &defaults.namespace),
            database: var_or("HRAC_DB_DATABASE", &defaults.database),
            username: var_or("HRAC_DB_USERNAME", &defaults.username),
            password: var_or("HRAC_DB_PASSWORD", &defaults.password),
        }
    }
}

/// Open a WebSocket client against the configured endpoint: root
/// signin, then namespace and database selection.
pub async fn connect(config: &DbConfig) -> Result<Surreal<Client>, DbError> {
    info!(
        url = %config.url,
        namespace = %config.namespace,
        database = %config.database,
        "connecting to SurrealDB"
    );

    let db = Surreal::new::<Ws>(&config.url).await?;

    db.signin(Root {
        username: config.username.clone(),
        password: config.password.clone(),
    })
    .await?;

    db.use_ns(&config.namespace)
        .use_db(&config.database)
        .await?;

    Ok(db)
}

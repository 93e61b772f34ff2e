//! Server configuration loaded from the environment.

use std::env;

use hrac_authz::AuthzConfig;
use hrac_core::error::{HracError, HracResult};
use hrac_db::DbConfig;
use uuid::Uuid;

/// Runtime configuration for the HRAC server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address, e.g. `0.0.0.0:8080`.
    pub listen_addr: String,
    pub db: DbConfig,
    pub authz: AuthzConfig,
    /// User the bootstrap assigns the `admin` role to, if set.
    pub admin_user_id: Option<Uuid>,
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

impl ServerConfig {
    /// Load configuration from `HRAC_*` environment variables.
    ///
    /// `HRAC_JWT_PUBLIC_KEY` is required; everything else has a
    /// development default.
    pub fn from_env() -> HracResult<Self> {
        let jwt_public_key_pem = env::var("HRAC_JWT_PUBLIC_KEY").map_err(|_| {
            HracError::Validation {
                message: "HRAC_JWT_PUBLIC_KEY is not set".into(),
            }
        })?;

        let decision_cache_ttl_secs = var_or("HRAC_CACHE_TTL_SECS", "30")
            .parse::<u64>()
            .map_err(|e| HracError::Validation {
                message: format!("HRAC_CACHE_TTL_SECS: {e}"),
            })?;

        let access_token_lifetime_secs = var_or("HRAC_TOKEN_LIFETIME_SECS", "900")
            .parse::<u64>()
            .map_err(|e| HracError::Validation {
                message: format!("HRAC_TOKEN_LIFETIME_SECS: {e}"),
            })?;

        let admin_user_id = match env::var("HRAC_ADMIN_USER_ID") {
            Ok(raw) => Some(Uuid::parse_str(&raw).map_err(|e| HracError::Validation {
                message: format!("HRAC_ADMIN_USER_ID: {e}"),
            })?),
            Err(_) => None,
        };

        Ok(Self {
            listen_addr: var_or("HRAC_LISTEN_ADDR", "0.0.0.0:8080"),
            db: DbConfig::from_env(),
            authz: AuthzConfig {
                jwt_private_key_pem: var_or("HRAC_JWT_PRIVATE_KEY", ""),
                jwt_public_key_pem,
                access_token_lifetime_secs,
                jwt_issuer: var_or("HRAC_JWT_ISSUER", "hrac"),
                decision_cache_ttl_secs,
            },
            admin_user_id,
        })
    }
}

//! Authorization configuration.

/// Configuration for token verification and decision caching.
#[derive(Debug, Clone)]
pub struct AuthzConfig {
    /// PEM-encoded Ed25519 private key for JWT signing. Empty on
    /// verification-only deployments.
    pub jwt_private_key_pem: String,
    /// PEM-encoded Ed25519 public key for JWT verification.
    pub jwt_public_key_pem: String,
    /// Access token lifetime in seconds (default: 900 = 15 minutes).
    pub access_token_lifetime_secs: u64,
    /// JWT issuer (`iss` claim).
    pub jwt_issuer: String,
    /// Decision cache time-to-live in seconds. `0` disables caching.
    pub decision_cache_ttl_secs: u64,
}

impl Default for AuthzConfig {
    fn default() -> Self {
        Self {
            jwt_private_key_pem: String::new(),
            jwt_public_key_pem: String::new(),
            access_token_lifetime_secs: 900,
            jwt_issuer: "hrac".into(),
            decision_cache_ttl_secs: 30,
        }
    }
}

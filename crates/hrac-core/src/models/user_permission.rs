//! User-permission override domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::grant::TemporalGrant;

/// A direct per-user override, bypassing role inheritance.
///
/// A non-expired override is authoritative for its (user, permission)
/// pair in either direction: explicit allow or explicit deny.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPermission {
    pub id: Uuid,
    pub user_id: Uuid,
    pub permission_id: Uuid,
    /// `true` = explicit allow, `false` = explicit deny.
    pub is_granted: bool,
    /// Free-text justification recorded by the granting administrator.
    pub reason: Option<String>,
    pub assigned_at: DateTime<Utc>,
    pub assigned_by: Option<Uuid>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl TemporalGrant for UserPermission {
    fn assigned_at(&self) -> DateTime<Utc> {
        self.assigned_at
    }
    fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrantUserPermission {
    pub user_id: Uuid,
    pub permission_id: Uuid,
    pub is_granted: bool,
    pub reason: Option<String>,
    pub assigned_by: Option<Uuid>,
    pub expires_at: Option<DateTime<Utc>>,
}

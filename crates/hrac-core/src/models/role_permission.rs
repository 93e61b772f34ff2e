//! Role-permission grant domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::grant::TemporalGrant;

/// A grant (or explicit deny) of one permission to one role.
///
/// Duplicate rows per (role, permission) pair are allowed; the most
/// recently assigned non-expired row is the role's effective stance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RolePermission {
    pub id: Uuid,
    pub role_id: Uuid,
    pub permission_id: Uuid,
    /// `true` = grant, `false` = explicit deny.
    pub is_granted: bool,
    pub assigned_at: DateTime<Utc>,
    pub assigned_by: Option<Uuid>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl TemporalGrant for RolePermission {
    fn assigned_at(&self) -> DateTime<Utc> {
        self.assigned_at
    }
    fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrantRolePermission {
    pub role_id: Uuid,
    pub permission_id: Uuid,
    pub is_granted: bool,
    pub assigned_by: Option<Uuid>,
    pub expires_at: Option<DateTime<Utc>>,
}

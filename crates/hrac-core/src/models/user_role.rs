//! User-role assignment domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::grant::TemporalGrant;

/// Membership of one user in one role.
///
/// A user may hold multiple roles simultaneously. An inactive or
/// expired assignment contributes none of its role's permissions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRole {
    pub id: Uuid,
    pub user_id: Uuid,
    pub role_id: Uuid,
    pub is_active: bool,
    pub assigned_at: DateTime<Utc>,
    pub assigned_by: Option<Uuid>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl TemporalGrant for UserRole {
    fn assigned_at(&self) -> DateTime<Utc> {
        self.assigned_at
    }
    fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignUserRole {
    pub user_id: Uuid,
    pub role_id: Uuid,
    pub assigned_by: Option<Uuid>,
    pub expires_at: Option<DateTime<Utc>>,
}

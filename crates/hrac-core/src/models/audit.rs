//! Audit log domain model — append-only record of guarded decisions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum AuditOutcome {
    Granted,
    Denied,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: Uuid,
    /// `None` for unauthenticated rejections.
    pub user_id: Option<Uuid>,
    pub permission_code: String,
    pub resource: Option<String>,
    /// Operation identifier the check guarded (e.g. `DELETE /v1/users/{id}`).
    pub operation: String,
    pub outcome: AuditOutcome,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAuditEntry {
    pub user_id: Option<Uuid>,
    pub permission_code: String,
    pub resource: Option<String>,
    pub operation: String,
    pub outcome: AuditOutcome,
}

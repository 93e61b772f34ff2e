//! Permission catalog domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A catalog entry describing one permission that exists in the system.
///
/// `code` (e.g. `USER_CREATE`) is globally unique and immutable once
/// created — [`UpdatePermission`] deliberately has no code field. A
/// permission referenced by any grant row is soft-disabled via
/// `is_active`, never hard-deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Permission {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    /// Grouping for the management UI (e.g. `User`, `Role`).
    pub module: String,
    /// The action this permission represents (e.g. `Create`, `Read`).
    pub action: String,
    /// Target entity/type name. `None` means the permission applies to
    /// any resource (wildcard).
    pub resource: Option<String>,
    pub is_active: bool,
    pub created_by: Option<Uuid>,
    pub updated_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePermission {
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    pub module: String,
    pub action: String,
    pub resource: Option<String>,
    pub created_by: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdatePermission {
    pub name: Option<String>,
    pub description: Option<String>,
    pub module: Option<String>,
    pub action: Option<String>,
    /// `Some(Some(val))` = set, `Some(None)` = clear (wildcard), `None` = no change.
    pub resource: Option<Option<String>>,
    pub is_active: Option<bool>,
    pub updated_by: Option<Uuid>,
}

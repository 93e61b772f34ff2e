//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs are stored as strings. Enums are stored as strings with
//! ASSERT constraints for validation.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1 — initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Users
-- =======================================================================
DEFINE TABLE user SCHEMAFULL;
DEFINE FIELD username ON TABLE user TYPE string;
DEFINE FIELD email ON TABLE user TYPE string;
DEFINE FIELD display_name ON TABLE user TYPE string;
DEFINE FIELD is_active ON TABLE user TYPE bool DEFAULT true;
DEFINE FIELD created_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_user_username ON TABLE user COLUMNS username UNIQUE;
DEFINE INDEX idx_user_email ON TABLE user COLUMNS email UNIQUE;

-- =======================================================================
-- Roles
-- =======================================================================
DEFINE TABLE role SCHEMAFULL;
DEFINE FIELD name ON TABLE role TYPE string;
DEFINE FIELD description ON TABLE role TYPE string;
DEFINE FIELD created_at ON TABLE role TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE role TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_role_name ON TABLE role COLUMNS name UNIQUE;

-- =======================================================================
-- Permission catalog
-- =======================================================================
DEFINE TABLE permission SCHEMAFULL;
DEFINE FIELD name ON TABLE permission TYPE string;
DEFINE FIELD code ON TABLE permission TYPE string;
DEFINE FIELD description ON TABLE permission TYPE option<string>;
DEFINE FIELD module ON TABLE permission TYPE string;
DEFINE FIELD action ON TABLE permission TYPE string;
DEFINE FIELD resource ON TABLE permission TYPE option<string>;
DEFINE FIELD is_active ON TABLE permission TYPE bool DEFAULT true;
DEFINE FIELD created_by ON TABLE permission TYPE option<string>;
DEFINE FIELD updated_by ON TABLE permission TYPE option<string>;
DEFINE FIELD created_at ON TABLE permission TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE permission TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_permission_code ON TABLE permission \
    COLUMNS code UNIQUE;
DEFINE INDEX idx_permission_module ON TABLE permission COLUMNS module;

-- =======================================================================
-- Role-permission grants (temporal; duplicates per pair allowed —
-- most recent non-expired row wins)
-- =======================================================================
DEFINE TABLE role_permission SCHEMAFULL;
DEFINE FIELD role_id ON TABLE role_permission TYPE string;
DEFINE FIELD permission_id ON TABLE role_permission TYPE string;
DEFINE FIELD is_granted ON TABLE role_permission TYPE bool;
DEFINE FIELD assigned_at ON TABLE role_permission TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD assigned_by ON TABLE role_permission TYPE option<string>;
DEFINE FIELD expires_at ON TABLE role_permission TYPE option<datetime>;
DEFINE INDEX idx_role_permission_pair ON TABLE role_permission \
    COLUMNS role_id, permission_id;

-- =======================================================================
-- User-permission overrides (temporal, bypass role inheritance)
-- =======================================================================
DEFINE TABLE user_permission SCHEMAFULL;
DEFINE FIELD user_id ON TABLE user_permission TYPE string;
DEFINE FIELD permission_id ON TABLE user_permission TYPE string;
DEFINE FIELD is_granted ON TABLE user_permission TYPE bool;
DEFINE FIELD reason ON TABLE user_permission TYPE option<string>;
DEFINE FIELD assigned_at ON TABLE user_permission TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD assigned_by ON TABLE user_permission TYPE option<string>;
DEFINE FIELD expires_at ON TABLE user_permission TYPE option<datetime>;
DEFINE INDEX idx_user_permission_pair ON TABLE user_permission \
    COLUMNS user_id, permission_id;

-- =======================================================================
-- User-role assignments (temporal, with active flag)
-- =======================================================================
DEFINE TABLE user_role SCHEMAFULL;
DEFINE FIELD user_id ON TABLE user_role TYPE string;
DEFINE FIELD role_id ON TABLE user_role TYPE string;
DEFINE FIELD is_active ON TABLE user_role TYPE bool DEFAULT true;
DEFINE FIELD assigned_at ON TABLE user_role TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD assigned_by ON TABLE user_role TYPE option<string>;
DEFINE FIELD expires_at ON TABLE user_role TYPE option<datetime>;
DEFINE INDEX idx_user_role_user ON TABLE user_role COLUMNS user_id;
DEFINE INDEX idx_user_role_pair ON TABLE user_role \
    COLUMNS user_id, role_id;

-- =======================================================================
-- Audit Log (append-only)
-- =======================================================================
DEFINE TABLE audit_log SCHEMAFULL
    PERMISSIONS
        FOR create FULL
        FOR select FULL
        FOR update NONE
        FOR delete NONE;
DEFINE FIELD user_id ON TABLE audit_log TYPE option<string>;
DEFINE FIELD permission_code ON TABLE audit_log TYPE string;
DEFINE FIELD resource ON TABLE audit_log TYPE option<string>;
DEFINE FIELD operation ON TABLE audit_log TYPE string;
DEFINE FIELD outcome ON TABLE audit_log TYPE string \
    ASSERT $value IN ['Granted', 'Denied'];
DEFINE FIELD timestamp ON TABLE audit_log TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_audit_user_time ON TABLE audit_log \
    COLUMNS user_id, timestamp;
DEFINE INDEX idx_audit_code ON TABLE audit_log COLUMNS permission_code;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
/// All DEFINE statements are idempotent so re-running is safe.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    // Ensure migration tracking table exists (idempotent).
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    // Determine current schema version.
    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            // Record the applied migration.
            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

            info!(
                version = migration.version,
                "Migration applied successfully"
            );
        }
    }

    Ok(())
}

/// Returns the raw schema DDL for version 1.
///
/// Exposed for testing with in-memory SurrealDB instances that
/// bypass the migration runner.
pub fn schema_v1() -> &'static str {
    SCHEMA_V1
}

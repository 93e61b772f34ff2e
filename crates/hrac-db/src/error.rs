//! Database-specific error types and conversions.

use hrac_core::error::HracError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Constraint violated: {0}")]
    Constraint(String),
}

impl From<DbError> for HracError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => HracError::NotFound { entity, id },
            DbError::Constraint(message) => HracError::Validation { message },
            other => HracError::Database(other.to_string()),
        }
    }
}

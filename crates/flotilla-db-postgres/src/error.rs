//! Backend error type and Postgres error-code helpers.

use flotilla_storage::StorageError;
use sqlx_core::error::Error as SqlxError;

const PG_UNIQUE_VIOLATION: &str = "23505";
const PG_FOREIGN_KEY_VIOLATION: &str = "23503";

fn pg_code_is(err: &SqlxError, code: &str) -> bool {
    matches!(err, SqlxError::Database(db) if db.code().as_deref() == Some(code))
}

/// True for unique-constraint violations (SQLSTATE 23505).
pub fn is_unique_violation(err: &SqlxError) -> bool {
    pg_code_is(err, PG_UNIQUE_VIOLATION)
}

/// True for foreign-key violations (SQLSTATE 23503).
pub fn is_foreign_key_violation(err: &SqlxError) -> bool {
    pg_code_is(err, PG_FOREIGN_KEY_VIOLATION)
}

/// Errors raised below the repository traits: pool setup, migrations,
/// raw driver failures.
#[derive(Debug, thiserror::Error)]
pub enum PostgresError {
    #[error("database error: {0}")]
    Driver(#[from] SqlxError),

    #[error("migration failed: {0}")]
    Migration(String),

    #[error("bad postgres configuration: {0}")]
    Config(String),
}

impl From<PostgresError> for StorageError {
    fn from(err: PostgresError) -> Self {
        match err {
            PostgresError::Driver(e) => StorageError::connection_error(e.to_string()),
            PostgresError::Migration(m) => StorageError::internal(format!("migration failed: {m}")),
            PostgresError::Config(m) => StorageError::internal(format!("bad configuration: {m}")),
        }
    }
}

pub type Result<T> = std::result::Result<T, PostgresError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_database_errors_match_no_code() {
        assert!(!is_unique_violation(&SqlxError::RowNotFound));
        assert!(!is_foreign_key_violation(&SqlxError::RowNotFound));
    }

    #[test]
    fn migration_failures_become_internal_storage_errors() {
        let err: StorageError = PostgresError::Migration("0003 broke".into()).into();
        assert!(matches!(err, StorageError::Internal { .. }));
        assert!(err.to_string().contains("0003 broke"));
    }
}

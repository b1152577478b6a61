//! SQL query implementations, one module per domain area.

pub mod catalog;
pub mod fleet;
pub mod fuel;
pub mod inspections;
pub mod payables;
pub mod trips;

use flotilla_storage::StorageError;
use sqlx_core::error::Error as SqlxError;

use crate::error::{is_foreign_key_violation, is_unique_violation};

/// Maps a sqlx error from a write into the storage error space.
///
/// `entity` and `key` feed the AlreadyExists message when the write hit a
/// unique constraint; foreign key violations become InvalidRow since the
/// caller supplied a reference that does not exist.
pub(crate) fn map_write_error(err: SqlxError, entity: &str, key: &str) -> StorageError {
    if is_unique_violation(&err) {
        StorageError::already_exists(entity, key)
    } else if is_foreign_key_violation(&err) {
        StorageError::invalid_row(format!("{entity} references a row that does not exist"))
    } else {
        StorageError::internal(format!("Failed to write {entity}: {err}"))
    }
}

/// Maps a sqlx read error.
pub(crate) fn map_read_error(err: SqlxError, entity: &str) -> StorageError {
    StorageError::internal(format!("Failed to read {entity}: {err}"))
}

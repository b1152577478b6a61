//! Error type shared by every repository trait.

use std::fmt;

/// Failure modes of the storage layer.
///
/// `entity` is the row kind as the API names it ("vehicle", "material",
/// ...). Backends map driver errors onto these variants so handlers can
/// pick response codes without knowing the backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique-constraint violation on create. `key` is the conflicting
    /// value (plate, code, document number, ...).
    #[error("{entity} already exists: {key}")]
    AlreadyExists { entity: String, key: String },

    /// Delete blocked by rows that still reference the target.
    #[error("{entity} {id} is still referenced by {referenced_by}")]
    InUse {
        entity: String,
        id: String,
        referenced_by: String,
    },

    /// Malformed row data, bad foreign key or field that fails to decode.
    #[error("invalid row: {message}")]
    InvalidRow { message: String },

    #[error("transaction failed: {message}")]
    TransactionError { message: String },

    #[error("storage unreachable: {message}")]
    ConnectionError { message: String },

    #[error("internal storage error: {message}")]
    Internal { message: String },
}

impl StorageError {
    #[must_use]
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    #[must_use]
    pub fn already_exists(entity: impl Into<String>, key: impl Into<String>) -> Self {
        Self::AlreadyExists {
            entity: entity.into(),
            key: key.into(),
        }
    }

    #[must_use]
    pub fn in_use(
        entity: impl Into<String>,
        id: impl Into<String>,
        referenced_by: impl Into<String>,
    ) -> Self {
        Self::InUse {
            entity: entity.into(),
            id: id.into(),
            referenced_by: referenced_by.into(),
        }
    }

    #[must_use]
    pub fn invalid_row(message: impl Into<String>) -> Self {
        Self::InvalidRow {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn transaction_error(message: impl Into<String>) -> Self {
        Self::TransactionError {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn connection_error(message: impl Into<String>) -> Self {
        Self::ConnectionError {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    #[must_use]
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. })
    }

    #[must_use]
    pub fn is_in_use(&self) -> bool {
        matches!(self, Self::InUse { .. })
    }

    /// Coarse bucket for log fields and metrics labels.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::AlreadyExists { .. } | Self::InUse { .. } => ErrorCategory::Conflict,
            Self::InvalidRow { .. } => ErrorCategory::Validation,
            Self::TransactionError { .. } => ErrorCategory::Transaction,
            Self::ConnectionError { .. } => ErrorCategory::Infrastructure,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    NotFound,
    Conflict,
    Validation,
    Transaction,
    Infrastructure,
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::Validation => "validation",
            Self::Transaction => "transaction",
            Self::Infrastructure => "infrastructure",
            Self::Internal => "internal",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_entity() {
        assert_eq!(
            StorageError::not_found("vehicle", "123").to_string(),
            "vehicle not found: 123"
        );
        assert_eq!(
            StorageError::already_exists("vehicle", "ABC123").to_string(),
            "vehicle already exists: ABC123"
        );
        assert_eq!(
            StorageError::in_use("material", "m-7", "3 active prices").to_string(),
            "material m-7 is still referenced by 3 active prices"
        );
    }

    #[test]
    fn predicates_and_categories_agree() {
        let gone = StorageError::not_found("vehicle", "123");
        assert!(gone.is_not_found());
        assert_eq!(gone.category(), ErrorCategory::NotFound);

        let dup = StorageError::already_exists("driver", "79111");
        assert!(dup.is_already_exists());
        assert_eq!(dup.category(), ErrorCategory::Conflict);

        let held = StorageError::in_use("material", "m", "prices");
        assert!(held.is_in_use());
        assert_eq!(held.category(), ErrorCategory::Conflict);

        assert_eq!(
            StorageError::invalid_row("bad fk").category(),
            ErrorCategory::Validation
        );
    }
}

use thiserror::Error;

/// Domain-level failures: validation, lookups, conversions.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid entity id: {0}")]
    InvalidId(String),

    #[error("Invalid vehicle plate: {0}")]
    InvalidPlate(String),

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    #[error("Invalid checklist: {0}")]
    InvalidChecklist(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    #[error("{entity} already exists: {key}")]
    Conflict { entity: String, key: String },

    #[error("{entity} {id} is still referenced by {referenced_by}")]
    InUse {
        entity: String,
        id: String,
        referenced_by: String,
    },

    #[error("Validation failed: {message}")]
    Validation { message: String },

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("UUID error: {0}")]
    UuidError(#[from] uuid::Error),

    #[error("Date parsing error: {0}")]
    DateError(#[from] chrono::ParseError),
}

impl CoreError {
    pub fn invalid_id(id: impl Into<String>) -> Self {
        Self::InvalidId(id.into())
    }

    pub fn invalid_plate(plate: impl Into<String>) -> Self {
        Self::InvalidPlate(plate.into())
    }

    pub fn invalid_quantity(message: impl Into<String>) -> Self {
        Self::InvalidQuantity(message.into())
    }

    pub fn invalid_checklist(message: impl Into<String>) -> Self {
        Self::InvalidChecklist(message.into())
    }

    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub fn conflict(entity: impl Into<String>, key: impl Into<String>) -> Self {
        Self::Conflict {
            entity: entity.into(),
            key: key.into(),
        }
    }

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

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// True when the caller is at fault (maps to a 4xx response).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidId(_)
                | Self::InvalidPlate(_)
                | Self::InvalidQuantity(_)
                | Self::InvalidChecklist(_)
                | Self::NotFound { .. }
                | Self::Conflict { .. }
                | Self::InUse { .. }
                | Self::Validation { .. }
                | Self::JsonError(_)
                | Self::DateError(_)
        )
    }

    /// True when the failure is ours (maps to a 5xx response).
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::UuidError(_))
    }

    /// Coarse bucket for log fields.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidId(_)
            | Self::InvalidPlate(_)
            | Self::InvalidQuantity(_)
            | Self::InvalidChecklist(_)
            | Self::Validation { .. }
            | Self::DateError(_) => ErrorCategory::Validation,
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::Conflict { .. } | Self::InUse { .. } => ErrorCategory::Conflict,
            Self::JsonError(_) => ErrorCategory::Serialization,
            Self::UuidError(_) => ErrorCategory::System,
        }
    }
}

/// Log-field classification of [`CoreError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Conflict,
    Serialization,
    System,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::NotFound => write!(f, "not_found"),
            Self::Conflict => write!(f, "conflict"),
            Self::Serialization => write!(f, "serialization"),
            Self::System => write!(f, "system"),
        }
    }
}

/// Result alias used throughout the domain layer.
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let err = CoreError::not_found("Vehicle", "abc-123");
        assert_eq!(err.to_string(), "Vehicle not found: abc-123");
        assert!(err.is_client_error());
        assert!(!err.is_server_error());
        assert_eq!(err.category(), ErrorCategory::NotFound);
    }

    #[test]
    fn test_conflict_error() {
        let err = CoreError::conflict("Vehicle", "ABC-123");
        assert_eq!(err.to_string(), "Vehicle already exists: ABC-123");
        assert!(err.is_client_error());
        assert_eq!(err.category(), ErrorCategory::Conflict);
    }

    #[test]
    fn test_in_use_error() {
        let err = CoreError::in_use("Material", "m-1", "2 active prices");
        assert_eq!(
            err.to_string(),
            "Material m-1 is still referenced by 2 active prices"
        );
        assert_eq!(err.category(), ErrorCategory::Conflict);
    }

    #[test]
    fn test_validation_error() {
        let err = CoreError::validation("Missing required fields: plate, make");
        assert!(err.to_string().contains("plate, make"));
        assert_eq!(err.category(), ErrorCategory::Validation);
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err: serde_json::Error =
            serde_json::from_str::<serde_json::Value>("{ invalid }").unwrap_err();
        let core_err: CoreError = json_err.into();

        assert!(matches!(core_err, CoreError::JsonError(_)));
        assert!(core_err.is_client_error());
        assert_eq!(core_err.category(), ErrorCategory::Serialization);
    }

    #[test]
    fn test_uuid_error_conversion() {
        let uuid_err = uuid::Uuid::parse_str("not-a-uuid").unwrap_err();
        let core_err: CoreError = uuid_err.into();

        assert!(matches!(core_err, CoreError::UuidError(_)));
        assert!(core_err.is_server_error());
        assert_eq!(core_err.category(), ErrorCategory::System);
    }

    #[test]
    fn test_client_vs_server_classification() {
        assert!(CoreError::invalid_plate("??").is_client_error());
        assert!(CoreError::invalid_quantity("must be > 0").is_client_error());
        assert!(CoreError::invalid_checklist("empty").is_client_error());

        let client_err = CoreError::invalid_id("x");
        assert!(client_err.is_client_error());
        assert!(!client_err.is_server_error());
    }

    #[test]
    fn test_error_categories_display() {
        assert_eq!(ErrorCategory::Validation.to_string(), "validation");
        assert_eq!(ErrorCategory::NotFound.to_string(), "not_found");
        assert_eq!(ErrorCategory::Conflict.to_string(), "conflict");
        assert_eq!(ErrorCategory::Serialization.to_string(), "serialization");
        assert_eq!(ErrorCategory::System.to_string(), "system");
    }
}

//! API error type and status-code mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};

use flotilla_core::CoreError;
use flotilla_storage::StorageError;

/// Error returned by every handler.
///
/// Serializes as `{ "error": { "code", "message", "details"? } }`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
    pub details: Option<Value>,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "validation", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "not_found", message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, "conflict", message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, "unavailable", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal", message)
    }

    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(code = self.code, message = %self.message, "request failed");
        }
        let mut error = json!({
            "code": self.code,
            "message": self.message,
        });
        if let Some(details) = self.details {
            error["details"] = details;
        }
        (self.status, Json(json!({ "error": error }))).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match &err {
            CoreError::NotFound { .. } => Self::not_found(err.to_string()),
            CoreError::Conflict { .. } | CoreError::InUse { .. } => Self::conflict(err.to_string()),
            CoreError::JsonError { .. } => Self::internal(err.to_string()),
            _ => Self::bad_request(err.to_string()),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match &err {
            StorageError::NotFound { .. } => Self::not_found(err.to_string()),
            StorageError::AlreadyExists { .. } => Self::conflict(err.to_string()),
            StorageError::InUse {
                entity,
                referenced_by,
                ..
            } => Self::conflict(err.to_string()).with_details(json!({
                "entity": entity,
                "referenced_by": referenced_by,
            })),
            StorageError::InvalidRow { .. } => Self::bad_request(err.to_string()),
            _ => Self::internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_errors_map_to_statuses() {
        let not_found: ApiError = StorageError::not_found("vehicle", "abc").into();
        assert_eq!(not_found.status, StatusCode::NOT_FOUND);

        let exists: ApiError = StorageError::already_exists("vehicle", "ABC123").into();
        assert_eq!(exists.status, StatusCode::CONFLICT);

        let in_use: ApiError = StorageError::in_use("material", "abc", "2 active price(s)").into();
        assert_eq!(in_use.status, StatusCode::CONFLICT);
        assert!(in_use.details.is_some());

        let invalid: ApiError = StorageError::invalid_row("bad vehicle reference").into();
        assert_eq!(invalid.status, StatusCode::BAD_REQUEST);

        let internal: ApiError = StorageError::internal("boom").into();
        assert_eq!(internal.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn validation_errors_keep_their_message() {
        let err: ApiError =
            CoreError::validation("Missing required fields: make, model").into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.message.contains("make, model"));
    }
}

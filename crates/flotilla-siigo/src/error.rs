//! Error types for the Siigo integration.

use flotilla_storage::StorageError;

/// Errors raised by the Siigo client and importer.
#[derive(Debug, thiserror::Error)]
pub enum SiigoError {
    /// Authentication against `/auth` was rejected.
    #[error("Siigo authentication failed: {0}")]
    AuthFailed(String),

    /// A network error occurred while talking to the API.
    #[error("Network error: {0}")]
    Network(String),

    /// The API returned an unexpected status code.
    #[error("Unexpected status {status} from Siigo: {body}")]
    UnexpectedStatus {
        /// HTTP status code.
        status: u16,
        /// Response body, truncated for logging.
        body: String,
    },

    /// A response body could not be decoded.
    #[error("Failed to decode Siigo response: {0}")]
    Decode(String),

    /// A purchase document could not be converted to a payable.
    #[error("Invalid purchase document {document}: {message}")]
    InvalidDocument {
        /// Identifier of the offending document.
        document: String,
        /// What was wrong with it.
        message: String,
    },

    /// The client configuration is incomplete.
    #[error("Invalid Siigo configuration: {0}")]
    Config(String),

    /// A storage operation during the import failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl SiigoError {
    pub fn network(err: &reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }

    pub fn invalid_document(document: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidDocument {
            document: document.into(),
            message: message.into(),
        }
    }

    /// True for errors worth retrying on a later run (network and server
    /// side), false for configuration and credential problems.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::UnexpectedStatus { status, .. } => *status >= 500,
            Self::Storage(err) => matches!(
                err,
                StorageError::ConnectionError { .. } | StorageError::TransactionError { .. }
            ),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_classification() {
        assert!(SiigoError::Network("timed out".into()).is_transient());
        assert!(
            SiigoError::UnexpectedStatus {
                status: 503,
                body: String::new()
            }
            .is_transient()
        );
        assert!(
            !SiigoError::UnexpectedStatus {
                status: 401,
                body: String::new()
            }
            .is_transient()
        );
        assert!(!SiigoError::AuthFailed("bad key".into()).is_transient());
        assert!(!SiigoError::Config("missing username".into()).is_transient());
    }

    #[test]
    fn display_includes_status_and_body() {
        let err = SiigoError::UnexpectedStatus {
            status: 429,
            body: "too many requests".into(),
        };
        let text = err.to_string();
        assert!(text.contains("429"));
        assert!(text.contains("too many requests"));
    }
}

//! Configuration for the Siigo API client.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default number of documents requested per page.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Default pause between page fetches, in milliseconds.
pub const DEFAULT_PAGE_DELAY_MS: u64 = 500;

/// Configuration for [`crate::SiigoClient`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiigoConfig {
    /// Base URL of the Siigo API, e.g. `https://api.siigo.com`.
    pub base_url: String,

    /// Account username used for `/auth`.
    pub username: String,

    /// API access key used for `/auth`.
    pub access_key: String,

    /// Value sent in the `Partner-Id` header on every request.
    pub partner_id: String,

    /// Documents requested per page (default: 100).
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Pause between page fetches in milliseconds (default: 500).
    #[serde(default = "default_page_delay_ms")]
    pub page_delay_ms: u64,

    /// HTTP request timeout in seconds (default: 30).
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_page_delay_ms() -> u64 {
    DEFAULT_PAGE_DELAY_MS
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl SiigoConfig {
    /// Creates a configuration with default paging parameters.
    #[must_use]
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        access_key: impl Into<String>,
        partner_id: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            username: username.into(),
            access_key: access_key.into(),
            partner_id: partner_id.into(),
            page_size: DEFAULT_PAGE_SIZE,
            page_delay_ms: DEFAULT_PAGE_DELAY_MS,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }

    /// Sets the page size.
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Sets the inter-page delay.
    #[must_use]
    pub fn with_page_delay_ms(mut self, delay_ms: u64) -> Self {
        self.page_delay_ms = delay_ms;
        self
    }

    /// The pause inserted between page fetches.
    #[must_use]
    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }

    /// The HTTP request timeout.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Checks that the credentials and base URL are present.
    ///
    /// # Errors
    ///
    /// Returns a message naming the missing fields.
    pub fn validate(&self) -> Result<(), String> {
        let mut missing = Vec::new();
        if self.base_url.trim().is_empty() {
            missing.push("base_url");
        }
        if self.username.trim().is_empty() {
            missing.push("username");
        }
        if self.access_key.trim().is_empty() {
            missing.push("access_key");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(format!("missing Siigo settings: {}", missing.join(", ")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_trims_trailing_slash() {
        let config = SiigoConfig::new("https://api.siigo.com/", "u", "k", "partner");
        assert_eq!(config.base_url, "https://api.siigo.com");
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.page_delay(), Duration::from_millis(500));
    }

    #[test]
    fn validate_names_missing_fields() {
        let config = SiigoConfig::new("https://api.siigo.com", "", "", "partner");
        let err = config.validate().unwrap_err();
        assert!(err.contains("username"));
        assert!(err.contains("access_key"));
    }
}

//! Authenticated HTTP client for the Siigo API.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use crate::config::SiigoConfig;
use crate::error::SiigoError;
use crate::model::PurchasesPage;

/// Refresh the token this long before it actually expires.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Longest error body kept when reporting an unexpected status.
const MAX_ERROR_BODY: usize = 2048;

#[derive(Debug, Serialize)]
struct AuthRequest<'a> {
    username: &'a str,
    access_key: &'a str,
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    access_token: String,
    /// Token lifetime in seconds.
    expires_in: u64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

impl CachedToken {
    fn is_usable(&self, now: Instant) -> bool {
        now + EXPIRY_MARGIN < self.expires_at
    }
}

/// Client for the Siigo REST API.
///
/// The bearer token obtained from `/auth` is cached and reused until it
/// is within sixty seconds of expiring, then refreshed. The client is
/// safe to share behind an `Arc`.
pub struct SiigoClient {
    http: reqwest::Client,
    config: SiigoConfig,
    token: RwLock<Option<CachedToken>>,
}

impl SiigoClient {
    /// Creates a client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SiigoError::Config`] when credentials or the base URL
    /// are missing, or when the HTTP client cannot be built.
    pub fn new(config: SiigoConfig) -> Result<Self, SiigoError> {
        config.validate().map_err(SiigoError::Config)?;

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| SiigoError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            config,
            token: RwLock::new(None),
        })
    }

    /// The configuration this client was built with.
    #[must_use]
    pub fn config(&self) -> &SiigoConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// Returns a valid bearer token, authenticating when the cached one
    /// is absent or about to expire.
    ///
    /// # Errors
    ///
    /// Returns [`SiigoError::AuthFailed`] when Siigo rejects the
    /// credentials and [`SiigoError::Network`] on transport failures.
    pub async fn token(&self) -> Result<String, SiigoError> {
        let now = Instant::now();

        {
            let guard = self.token.read().await;
            if let Some(cached) = guard.as_ref()
                && cached.is_usable(now)
            {
                return Ok(cached.access_token.clone());
            }
        }

        let mut guard = self.token.write().await;
        // Another task may have refreshed while we waited for the lock.
        if let Some(cached) = guard.as_ref()
            && cached.is_usable(now)
        {
            return Ok(cached.access_token.clone());
        }

        let fresh = self.authenticate().await?;
        let token = fresh.access_token.clone();
        *guard = Some(fresh);
        Ok(token)
    }

    /// Drops the cached token so the next call re-authenticates.
    pub async fn invalidate_token(&self) {
        let mut guard = self.token.write().await;
        *guard = None;
    }

    #[instrument(skip(self))]
    async fn authenticate(&self) -> Result<CachedToken, SiigoError> {
        debug!(username = %self.config.username, "authenticating against Siigo");

        let response = self
            .http
            .post(self.url("/auth"))
            .header("Partner-Id", &self.config.partner_id)
            .json(&AuthRequest {
                username: &self.config.username,
                access_key: &self.config.access_key,
            })
            .send()
            .await
            .map_err(|e| SiigoError::network(&e))?;

        let status = response.status();
        if !status.is_success() {
            let body = truncated_body(response).await;
            warn!(status = status.as_u16(), "Siigo authentication rejected");
            return Err(SiigoError::AuthFailed(format!("HTTP {status}: {body}")));
        }

        let auth: AuthResponse = response
            .json()
            .await
            .map_err(|e| SiigoError::Decode(e.to_string()))?;

        Ok(CachedToken {
            access_token: auth.access_token,
            expires_at: Instant::now() + Duration::from_secs(auth.expires_in),
        })
    }

    /// Fetches one page of the purchases listing.
    ///
    /// Pages are numbered from 1. A 401 drops the cached token before
    /// the error is returned, so the next call re-authenticates.
    ///
    /// # Errors
    ///
    /// Returns [`SiigoError::UnexpectedStatus`] for non-success codes and
    /// [`SiigoError::Decode`] when the envelope cannot be parsed.
    #[instrument(skip(self), fields(page_size = self.config.page_size))]
    pub async fn list_purchases(&self, page: u32) -> Result<PurchasesPage, SiigoError> {
        let token = self.token().await?;

        let response = self
            .http
            .get(self.url("/v1/purchases"))
            .bearer_auth(&token)
            .header("Partner-Id", &self.config.partner_id)
            .query(&[("page", page), ("page_size", self.config.page_size)])
            .send()
            .await
            .map_err(|e| SiigoError::network(&e))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            self.invalidate_token().await;
        }
        if !status.is_success() {
            let body = truncated_body(response).await;
            return Err(SiigoError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        let page: PurchasesPage = response
            .json()
            .await
            .map_err(|e| SiigoError::Decode(e.to_string()))?;

        debug!(
            results = page.results.len(),
            total = page.pagination.total_results,
            "fetched purchases page"
        );
        Ok(page)
    }
}

async fn truncated_body(response: reqwest::Response) -> String {
    let mut body = response.text().await.unwrap_or_default();
    if body.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
    }
    body
}

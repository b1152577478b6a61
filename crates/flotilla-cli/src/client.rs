use anyhow::{Context, Result};
use serde_json::Value;

/// Thin HTTP client for the Flotilla server API.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn start_import(&self) -> Result<Value> {
        let url = format!("{}/api/siigo/import", self.base_url);
        let resp = self.http.post(&url).send().await.context("server unreachable")?;
        json_or_error(resp).await
    }

    pub async fn import_status(&self, id: &str) -> Result<Value> {
        let url = format!("{}/api/siigo/import/{id}", self.base_url);
        let resp = self.http.get(&url).send().await.context("server unreachable")?;
        json_or_error(resp).await
    }

    pub async fn health(&self) -> Result<(u16, String)> {
        self.probe("healthz").await
    }

    pub async fn ready(&self) -> Result<(u16, String)> {
        self.probe("readyz").await
    }

    async fn probe(&self, endpoint: &str) -> Result<(u16, String)> {
        let url = format!("{}/{endpoint}", self.base_url);
        let resp = self.http.get(&url).send().await.context("server unreachable")?;
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        Ok((status, body))
    }
}

/// Parses a JSON body, surfacing the API's `error.message` on failures.
async fn json_or_error(resp: reqwest::Response) -> Result<Value> {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();

    if !status.is_success() {
        if let Ok(json) = serde_json::from_str::<Value>(&body)
            && let Some(message) = json
                .get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
        {
            anyhow::bail!("HTTP {status}: {message}");
        }
        anyhow::bail!("HTTP {status}: {body}");
    }

    if body.is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&body).context("response was not valid JSON")
}

use std::{net::SocketAddr, time::Duration};

use serde::{Deserialize, Serialize};

use flotilla_db_postgres::PostgresConfig;
use flotilla_notifications::{SendGridConfig, SmtpConfig};
use flotilla_siigo::SiigoConfig;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Siigo credentials; the import endpoints answer 503 when absent.
    #[serde(default)]
    pub siigo: Option<SiigoConfig>,
    #[serde(default)]
    pub email: Option<EmailConfig>,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("server.port must be > 0".into());
        }
        if self.server.body_limit_bytes == 0 {
            return Err("server.body_limit_bytes must be > 0".into());
        }
        let lvl = self.logging.level.to_ascii_lowercase();
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&lvl.as_str()) {
            return Err(format!("logging.level must be one of {valid_levels:?}"));
        }
        if self.storage.postgres.url.trim().is_empty() {
            return Err("storage.postgres.url must not be empty".into());
        }
        if self.storage.postgres.pool_size == 0 {
            return Err("storage.postgres.pool_size must be > 0".into());
        }
        if let Some(ref siigo) = self.siigo {
            siigo.validate().map_err(|e| format!("siigo config error: {e}"))?;
        }
        if let Some(ref email) = self.email {
            email.validate()?;
        }
        Ok(())
    }

    pub fn addr(&self) -> SocketAddr {
        use std::net::{IpAddr, Ipv4Addr};
        let host: IpAddr = self
            .server
            .host
            .parse()
            .unwrap_or(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));
        SocketAddr::from((host, self.server.port))
    }

    /// Advertised base URL, computed from host:port unless overridden.
    pub fn base_url(&self) -> String {
        self.server
            .base_url
            .clone()
            .unwrap_or_else(|| format!("http://{}:{}", self.server.host, self.server.port))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.server.request_timeout_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Advertised base URL, when it differs from host:port.
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default = "default_body_limit_bytes")]
    pub body_limit_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

fn default_body_limit_bytes() -> usize {
    1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            base_url: None,
            request_timeout_ms: default_request_timeout_ms(),
            body_limit_bytes: default_body_limit_bytes(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    #[serde(default)]
    pub postgres: PostgresConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Outbound email. Exactly one transport must be configured.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    #[serde(default)]
    pub smtp: Option<SmtpConfig>,
    #[serde(default)]
    pub sendgrid: Option<SendGridConfig>,
    /// Address that receives the Siigo import summary, if any.
    #[serde(default)]
    pub import_summary_recipient: Option<String>,
}

impl EmailConfig {
    pub fn validate(&self) -> Result<(), String> {
        match (&self.smtp, &self.sendgrid) {
            (None, None) => Err("email requires either [email.smtp] or [email.sendgrid]".into()),
            (Some(_), Some(_)) => {
                Err("email.smtp and email.sendgrid are mutually exclusive".into())
            }
            _ => Ok(()),
        }
    }
}

pub mod loader {
    use std::path::PathBuf;

    use super::AppConfig;

    /// Loads the configuration from a TOML file.
    ///
    /// A missing file yields the defaults so a bare `flotilla-server`
    /// still starts against a local database.
    pub fn load_config(path: Option<&str>) -> Result<AppConfig, String> {
        let pathbuf = PathBuf::from(path.unwrap_or("flotilla.toml"));

        let cfg: AppConfig = if pathbuf.exists() {
            let raw = std::fs::read_to_string(&pathbuf)
                .map_err(|e| format!("failed to read {}: {e}", pathbuf.display()))?;
            toml::from_str(&raw)
                .map_err(|e| format!("failed to parse {}: {e}", pathbuf.display()))?
        } else {
            AppConfig::default()
        };

        cfg.validate()?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn bad_log_level_is_rejected() {
        let mut cfg = AppConfig::default();
        cfg.logging.level = "loud".into();
        assert!(cfg.validate().unwrap_err().contains("logging.level"));
    }

    #[test]
    fn email_requires_exactly_one_transport() {
        let none = EmailConfig {
            smtp: None,
            sendgrid: None,
            import_summary_recipient: None,
        };
        assert!(none.validate().is_err());
    }

    #[test]
    fn parses_full_toml() {
        let raw = r#"
            [server]
            host = "127.0.0.1"
            port = 9090

            [storage.postgres]
            url = "postgres://localhost/flotilla"
            pool_size = 8

            [logging]
            level = "debug"

            [siigo]
            base_url = "https://api.siigo.com"
            username = "ops@flotilla.co"
            access_key = "secret"
            partner_id = "flotilla"

            [email.sendgrid]
            api_key = "sg-key"
            from = "bot@flotilla.co"

            [email]
            import_summary_recipient = "ops@flotilla.co"
        "#;
        let cfg: AppConfig = toml::from_str(raw).unwrap();
        cfg.validate().unwrap();
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.base_url(), "http://127.0.0.1:9090");
        assert!(cfg.siigo.is_some());
        assert_eq!(
            cfg.email.unwrap().import_summary_recipient.as_deref(),
            Some("ops@flotilla.co")
        );
    }
}

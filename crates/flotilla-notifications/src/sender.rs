//! Email delivery over SMTP or SendGrid.

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::header::ContentType, transport::smtp::authentication::Credentials,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::error::NotificationError;
use crate::types::EmailMessage;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    pub from: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

fn default_smtp_port() -> u16 {
    587
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendGridConfig {
    pub api_key: String,
    pub from: String,
    /// Override for tests; defaults to the public SendGrid endpoint.
    #[serde(default = "default_sendgrid_url")]
    pub api_url: String,
}

fn default_sendgrid_url() -> String {
    "https://api.sendgrid.com".to_string()
}

/// The configured outbound transport.
pub enum EmailSender {
    Smtp(SmtpConfig),
    SendGrid {
        config: SendGridConfig,
        http: reqwest::Client,
    },
}

impl EmailSender {
    #[must_use]
    pub fn smtp(config: SmtpConfig) -> Self {
        Self::Smtp(config)
    }

    #[must_use]
    pub fn sendgrid(config: SendGridConfig) -> Self {
        Self::SendGrid {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Delivers one message.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError::InvalidAddress`] for unparseable
    /// addresses and [`NotificationError::SendFailed`] on transport
    /// failures.
    pub async fn send(&self, message: &EmailMessage) -> Result<(), NotificationError> {
        match self {
            Self::Smtp(config) => send_smtp(config, message).await,
            Self::SendGrid { config, http } => send_sendgrid(config, http, message).await,
        }
    }
}

async fn send_smtp(config: &SmtpConfig, message: &EmailMessage) -> Result<(), NotificationError> {
    let email = Message::builder()
        .from(
            config
                .from
                .parse()
                .map_err(|e| NotificationError::InvalidAddress(format!("from: {e}")))?,
        )
        .to(message
            .to
            .address
            .parse()
            .map_err(|e| NotificationError::InvalidAddress(format!("to: {e}")))?)
        .subject(&message.subject)
        .header(ContentType::TEXT_PLAIN)
        .body(message.body.clone())
        .map_err(|e| NotificationError::SendFailed(e.to_string()))?;

    let mut builder = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
        .map_err(|e| NotificationError::InvalidConfig(e.to_string()))?
        .port(config.port);

    if let (Some(username), Some(password)) = (&config.username, &config.password) {
        builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
    }

    let mailer = builder.build();
    mailer
        .send(email)
        .await
        .map_err(|e| NotificationError::SendFailed(e.to_string()))?;

    debug!(to = %message.to.address, "sent email over SMTP");
    Ok(())
}

async fn send_sendgrid(
    config: &SendGridConfig,
    http: &reqwest::Client,
    message: &EmailMessage,
) -> Result<(), NotificationError> {
    let body = json!({
        "personalizations": [{
            "to": [{"email": message.to.address}]
        }],
        "from": {"email": config.from},
        "subject": message.subject,
        "content": [{
            "type": "text/plain",
            "value": message.body
        }]
    });

    let response = http
        .post(format!("{}/v3/mail/send", config.api_url.trim_end_matches('/')))
        .bearer_auth(&config.api_key)
        .json(&body)
        .send()
        .await
        .map_err(|e| NotificationError::SendFailed(e.to_string()))?;

    if !response.status().is_success() {
        let status = response.status();
        let error = response.text().await.unwrap_or_default();
        return Err(NotificationError::SendFailed(format!(
            "SendGrid returned {status}: {error}"
        )));
    }

    debug!(to = %message.to.address, "sent email through SendGrid");
    Ok(())
}

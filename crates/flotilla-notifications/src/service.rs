//! High-level notification entry points.

use std::collections::HashMap;

use tracing::info;

use crate::error::NotificationError;
use crate::sender::EmailSender;
use crate::templates::{IMPORT_SUMMARY_TEMPLATE, TemplateRenderer};
use crate::types::{EmailMessage, EmailRecipient};

/// Variables of the import summary email.
#[derive(Debug, Clone)]
pub struct ImportSummaryContext {
    pub request_id: String,
    pub status: String,
    pub pages_processed: i32,
    pub rows_imported: i64,
    pub rows_failed: i64,
}

/// Renders templates and hands the result to the configured transport.
pub struct NotificationService {
    renderer: TemplateRenderer,
    sender: EmailSender,
}

impl NotificationService {
    #[must_use]
    pub fn new(sender: EmailSender) -> Self {
        Self {
            renderer: TemplateRenderer::new(),
            sender,
        }
    }

    /// Sends the outcome of a payables import run.
    ///
    /// # Errors
    ///
    /// Propagates template and transport failures.
    pub async fn send_import_summary(
        &self,
        to: &EmailRecipient,
        context: &ImportSummaryContext,
    ) -> Result<(), NotificationError> {
        let mut data = HashMap::new();
        data.insert(
            "request_id".to_string(),
            serde_json::json!(context.request_id),
        );
        data.insert("status".to_string(), serde_json::json!(context.status));
        data.insert(
            "pages_processed".to_string(),
            serde_json::json!(context.pages_processed),
        );
        data.insert(
            "rows_imported".to_string(),
            serde_json::json!(context.rows_imported),
        );
        data.insert(
            "rows_failed".to_string(),
            serde_json::json!(context.rows_failed),
        );

        let (subject, body) = self.renderer.render(IMPORT_SUMMARY_TEMPLATE, &data)?;
        self.sender
            .send(&EmailMessage {
                to: to.clone(),
                subject,
                body,
            })
            .await?;

        info!(to = %to.address, request_id = %context.request_id, "import summary sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::sender::SendGridConfig;

    #[tokio::test]
    async fn import_summary_goes_through_sendgrid() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v3/mail/send"))
            .and(header("authorization", "Bearer sg-key"))
            .and(body_string_contains("Rows imported: 12"))
            .respond_with(ResponseTemplate::new(202))
            .expect(1)
            .mount(&server)
            .await;

        let sender = EmailSender::sendgrid(SendGridConfig {
            api_key: "sg-key".into(),
            from: "bot@flotilla.co".into(),
            api_url: server.uri(),
        });
        let service = NotificationService::new(sender);

        service
            .send_import_summary(
                &EmailRecipient::new("ops@flotilla.co"),
                &ImportSummaryContext {
                    request_id: "req-1".into(),
                    status: "success".into(),
                    pages_processed: 1,
                    rows_imported: 12,
                    rows_failed: 0,
                },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn sendgrid_rejection_is_a_send_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v3/mail/send"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .mount(&server)
            .await;

        let sender = EmailSender::sendgrid(SendGridConfig {
            api_key: "wrong".into(),
            from: "bot@flotilla.co".into(),
            api_url: server.uri(),
        });
        let service = NotificationService::new(sender);

        let err = service
            .send_import_summary(
                &EmailRecipient::new("ops@flotilla.co"),
                &ImportSummaryContext {
                    request_id: "req-2".into(),
                    status: "error".into(),
                    pages_processed: 0,
                    rows_imported: 0,
                    rows_failed: 100,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, NotificationError::SendFailed(_)));
    }
}

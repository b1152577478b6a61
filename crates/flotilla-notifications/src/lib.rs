//! Email notifications.
//!
//! Renders `{{variable}}` templates and delivers them over SMTP or
//! SendGrid. The import-summary template used after a Siigo payables
//! run ships built in.

pub mod error;
pub mod sender;
pub mod service;
pub mod templates;
pub mod types;

pub use error::NotificationError;
pub use sender::{EmailSender, SendGridConfig, SmtpConfig};
pub use service::{ImportSummaryContext, NotificationService};
pub use templates::{Template, TemplateRenderer};
pub use types::{EmailMessage, EmailRecipient};

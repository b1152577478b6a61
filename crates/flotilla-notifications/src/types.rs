use serde::{Deserialize, Serialize};

/// Destination of one email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailRecipient {
    pub address: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl EmailRecipient {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            name: None,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// A rendered email ready for delivery.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: EmailRecipient,
    pub subject: String,
    pub body: String,
}

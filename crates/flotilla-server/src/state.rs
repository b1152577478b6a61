use std::sync::Arc;

use flotilla_db_postgres::PostgresStorage;
use flotilla_notifications::{EmailRecipient, NotificationService};
use flotilla_siigo::SiigoClient;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub storage: PostgresStorage,
    /// Present when `[siigo]` is configured.
    pub siigo: Option<Arc<SiigoClient>>,
    /// Present when `[email]` is configured with a summary recipient.
    pub notifier: Option<(Arc<NotificationService>, EmailRecipient)>,
}

impl AppState {
    #[must_use]
    pub fn new(storage: PostgresStorage) -> Self {
        Self {
            storage,
            siigo: None,
            notifier: None,
        }
    }

    #[must_use]
    pub fn with_siigo(mut self, client: Arc<SiigoClient>) -> Self {
        self.siigo = Some(client);
        self
    }

    #[must_use]
    pub fn with_notifier(
        mut self,
        service: Arc<NotificationService>,
        recipient: EmailRecipient,
    ) -> Self {
        self.notifier = Some((service, recipient));
        self
    }
}

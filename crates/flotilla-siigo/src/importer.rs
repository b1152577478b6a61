//! Paginated import of Siigo purchases into accounts payable.

use std::sync::Arc;

use tracing::{info, instrument, warn};
use uuid::Uuid;

use flotilla_core::ImportStatus;
use flotilla_notifications::{EmailRecipient, ImportSummaryContext, NotificationService};
use flotilla_storage::PayableStore;

use crate::client::SiigoClient;
use crate::error::SiigoError;

/// Outcome of one import run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    /// Id of the `ImportRequest` row recording this run.
    pub request_id: Uuid,
    /// Pages fetched, including failed ones.
    pub pages_processed: i32,
    /// Rows written to the accounts-payable table.
    pub rows_imported: i64,
    /// Rows lost to fetch, conversion or persistence failures.
    pub rows_failed: i64,
    /// Final status derived from the counters.
    pub status: ImportStatus,
}

/// Migrates open purchase invoices from Siigo into local storage.
///
/// Each page is persisted in its own transaction. A page that fails to
/// fetch or persist adds its size to the failure counter and the run
/// moves on to the next page; there are no retries. The parent
/// `ImportRequest` row ends up `success`, `partial` or `error` based on
/// the final counters.
pub struct PayablesImporter<S> {
    client: Arc<SiigoClient>,
    store: S,
    notifier: Option<(Arc<NotificationService>, EmailRecipient)>,
}

impl<S: PayableStore> PayablesImporter<S> {
    pub fn new(client: Arc<SiigoClient>, store: S) -> Self {
        Self {
            client,
            store,
            notifier: None,
        }
    }

    /// Sends an email summary to `recipient` after every run.
    #[must_use]
    pub fn with_notifier(
        mut self,
        service: Arc<NotificationService>,
        recipient: EmailRecipient,
    ) -> Self {
        self.notifier = Some((service, recipient));
        self
    }

    /// Runs a full import and returns its summary.
    ///
    /// # Errors
    ///
    /// Returns an error only when the bookkeeping itself fails, i.e. the
    /// `ImportRequest` row cannot be created or finished. Page-level
    /// failures are absorbed into the counters instead.
    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<ImportSummary, SiigoError> {
        let request = self.store.create_import_request().await?;
        self.run_for(request).await
    }

    /// Runs an import against an already-created `ImportRequest` row.
    ///
    /// Used by the HTTP layer, which creates the row first so it can
    /// answer with the request id while the import proceeds.
    ///
    /// # Errors
    ///
    /// Same as [`Self::run`].
    pub async fn run_for(
        &self,
        request: flotilla_core::ImportRequest,
    ) -> Result<ImportSummary, SiigoError> {
        info!(request_id = %request.id, "starting payables import");

        let page_size = i64::from(self.client.config().page_size.max(1));
        let delay = self.client.config().page_delay();

        let mut pages_processed: i32 = 0;
        let mut rows_imported: i64 = 0;
        let mut rows_failed: i64 = 0;
        let mut first_error: Option<String> = None;

        let first_page = match self.client.list_purchases(1).await {
            Ok(page) => Some(page),
            Err(err) => {
                warn!(
                    request_id = %request.id,
                    error = %err,
                    transient = err.is_transient(),
                    "first page fetch failed"
                );
                first_error = Some(err.to_string());
                rows_failed += page_size;
                None
            }
        };

        if let Some(first_page) = first_page {
            let total_pages = first_page.total_pages(self.client.config().page_size);
            info!(
                request_id = %request.id,
                total_results = first_page.pagination.total_results,
                total_pages,
                "paging through purchases"
            );

            let mut current = Some(first_page);
            for page_number in 1..=total_pages {
                let page = match current.take() {
                    Some(page) => Ok(page),
                    None => self.client.list_purchases(page_number).await,
                };
                pages_processed += 1;

                match page {
                    Ok(page) => {
                        let (converted, conversion_failures) = self.convert_page(&page.results);
                        rows_failed += conversion_failures;

                        match self.store.insert_payables_page(request.id, &converted).await {
                            Ok(written) => rows_imported += i64::try_from(written).unwrap_or(0),
                            Err(err) => {
                                warn!(
                                    request_id = %request.id,
                                    page = page_number,
                                    error = %err,
                                    "page persist failed"
                                );
                                first_error.get_or_insert_with(|| err.to_string());
                                rows_failed += i64::try_from(converted.len()).unwrap_or(0);
                            }
                        }
                    }
                    Err(err) => {
                        warn!(
                            request_id = %request.id,
                            page = page_number,
                            error = %err,
                            transient = err.is_transient(),
                            "page fetch failed"
                        );
                        first_error.get_or_insert_with(|| err.to_string());
                        rows_failed += page_size;
                    }
                }

                if page_number < total_pages {
                    tokio::time::sleep(delay).await;
                }
            }
        }

        let status = ImportStatus::from_counts(
            u64::try_from(rows_imported).unwrap_or(0),
            u64::try_from(rows_failed).unwrap_or(0),
        );
        self.store
            .finish_import_request(
                request.id,
                status,
                pages_processed,
                rows_imported,
                rows_failed,
                first_error.as_deref(),
            )
            .await?;

        let summary = ImportSummary {
            request_id: request.id,
            pages_processed,
            rows_imported,
            rows_failed,
            status,
        };
        info!(
            request_id = %summary.request_id,
            pages = summary.pages_processed,
            imported = summary.rows_imported,
            failed = summary.rows_failed,
            status = %summary.status,
            "payables import finished"
        );

        self.notify(&summary).await;
        Ok(summary)
    }

    fn convert_page(
        &self,
        documents: &[crate::model::PurchaseDocument],
    ) -> (Vec<flotilla_core::NewAccountPayable>, i64) {
        let mut converted = Vec::with_capacity(documents.len());
        let mut failures: i64 = 0;
        for document in documents {
            match document.to_new_payable() {
                Ok(Some(payable)) => converted.push(payable),
                Ok(None) => {}
                Err(err) => {
                    warn!(document = %document.id, error = %err, "skipping invalid document");
                    failures += 1;
                }
            }
        }
        (converted, failures)
    }

    async fn notify(&self, summary: &ImportSummary) {
        let Some((service, recipient)) = &self.notifier else {
            return;
        };
        let context = ImportSummaryContext {
            request_id: summary.request_id.to_string(),
            status: summary.status.to_string(),
            pages_processed: summary.pages_processed,
            rows_imported: summary.rows_imported,
            rows_failed: summary.rows_failed,
        };
        if let Err(err) = service.send_import_summary(recipient, &context).await {
            warn!(error = %err, "failed to send import summary email");
        }
    }
}

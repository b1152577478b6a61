//! Importer and token-cache behavior against a mocked Siigo API.

use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use flotilla_core::{AccountPayable, ImportRequest, ImportStatus, NewAccountPayable};
use flotilla_siigo::{PayablesImporter, SiigoClient, SiigoConfig, SiigoError};
use flotilla_storage::{Page, PageRequest, PayableFilter, PayableStore, StorageError};

fn test_config(server: &MockServer) -> SiigoConfig {
    SiigoConfig::new(server.uri(), "ops@flotilla.co", "secret-key", "flotilla")
        .with_page_size(2)
        .with_page_delay_ms(0)
}

fn auth_body(expires_in: u64) -> serde_json::Value {
    serde_json::json!({ "access_token": "tok-1", "expires_in": expires_in })
}

fn purchase(id: &str, number: i64, balance: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "prefix": "FC",
        "number": number,
        "date": "2026-03-01",
        "due_date": "2026-03-31",
        "balance": balance,
        "currency": { "code": "COP" },
        "supplier": { "identification": "900123456", "name": "ACME" }
    })
}

fn purchases_page(total: u64, results: Vec<serde_json::Value>) -> serde_json::Value {
    serde_json::json!({
        "pagination": { "total_results": total },
        "results": results
    })
}

/// In-memory stand-in for the payables store.
#[derive(Default)]
struct RecordingStore {
    rows: Mutex<Vec<NewAccountPayable>>,
    finished: Mutex<Option<ImportRequest>>,
    fail_pages_from: Option<usize>,
    pages_seen: Mutex<usize>,
}

impl RecordingStore {
    fn failing_from_page(page: usize) -> Self {
        Self {
            fail_pages_from: Some(page),
            ..Self::default()
        }
    }

    fn request() -> ImportRequest {
        ImportRequest {
            id: Uuid::new_v4(),
            requested_at: Utc::now(),
            status: ImportStatus::Running,
            pages_processed: 0,
            rows_imported: 0,
            rows_failed: 0,
            error_message: None,
            finished_at: None,
        }
    }
}

/// Newtype so the foreign `PayableStore` trait can be implemented for a
/// shared `RecordingStore` without tripping the orphan rule.
struct StoreHandle(Arc<RecordingStore>);

#[async_trait]
impl PayableStore for StoreHandle {
    async fn upsert_payable(
        &self,
        _payable: &NewAccountPayable,
        _import_request_id: Option<Uuid>,
    ) -> Result<AccountPayable, StorageError> {
        unimplemented!("not used by the importer")
    }

    async fn get_payable(&self, _id: Uuid) -> Result<Option<AccountPayable>, StorageError> {
        Ok(None)
    }

    async fn list_payables(
        &self,
        _filter: &PayableFilter,
        _page: PageRequest,
    ) -> Result<Page<AccountPayable>, StorageError> {
        Ok(Page::new(Vec::new(), PageRequest::default(), 0))
    }

    async fn create_import_request(&self) -> Result<ImportRequest, StorageError> {
        Ok(RecordingStore::request())
    }

    async fn get_import_request(&self, _id: Uuid) -> Result<Option<ImportRequest>, StorageError> {
        Ok(None)
    }

    async fn insert_payables_page(
        &self,
        _import_request_id: Uuid,
        rows: &[NewAccountPayable],
    ) -> Result<u64, StorageError> {
        let mut seen = self.0.pages_seen.lock().unwrap();
        *seen += 1;
        if let Some(from) = self.0.fail_pages_from
            && *seen >= from
        {
            return Err(StorageError::transaction_error("synthetic page failure"));
        }
        self.0.rows.lock().unwrap().extend_from_slice(rows);
        Ok(rows.len() as u64)
    }

    async fn finish_import_request(
        &self,
        id: Uuid,
        status: ImportStatus,
        pages_processed: i32,
        rows_imported: i64,
        rows_failed: i64,
        error_message: Option<&str>,
    ) -> Result<ImportRequest, StorageError> {
        let finished = ImportRequest {
            id,
            requested_at: Utc::now(),
            status,
            pages_processed,
            rows_imported,
            rows_failed,
            error_message: error_message.map(String::from),
            finished_at: Some(Utc::now()),
        };
        *self.0.finished.lock().unwrap() = Some(finished.clone());
        Ok(finished)
    }
}

#[tokio::test]
async fn token_is_cached_across_calls() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth"))
        .and(body_string_contains("ops@flotilla.co"))
        .respond_with(ResponseTemplate::new(200).set_body_json(auth_body(3600)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/purchases"))
        .and(header("authorization", "Bearer tok-1"))
        .and(header("Partner-Id", "flotilla"))
        .respond_with(ResponseTemplate::new(200).set_body_json(purchases_page(0, vec![])))
        .expect(2)
        .mount(&server)
        .await;

    let client = SiigoClient::new(test_config(&server)).unwrap();
    client.list_purchases(1).await.unwrap();
    client.list_purchases(1).await.unwrap();
}

#[tokio::test]
async fn token_near_expiry_is_refreshed() {
    let server = MockServer::start().await;

    // 30 s lifetime is inside the refresh margin, so every call logs in again.
    Mock::given(method("POST"))
        .and(path("/auth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(auth_body(30)))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/purchases"))
        .respond_with(ResponseTemplate::new(200).set_body_json(purchases_page(0, vec![])))
        .mount(&server)
        .await;

    let client = SiigoClient::new(test_config(&server)).unwrap();
    client.list_purchases(1).await.unwrap();
    client.list_purchases(1).await.unwrap();
}

#[tokio::test]
async fn rejected_credentials_surface_as_auth_failed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid access key"))
        .mount(&server)
        .await;

    let client = SiigoClient::new(test_config(&server)).unwrap();
    let err = client.list_purchases(1).await.unwrap_err();
    assert!(matches!(err, SiigoError::AuthFailed(_)));
}

#[tokio::test]
async fn unauthorized_listing_drops_cached_token() {
    let server = MockServer::start().await;

    // Two logins expected: the initial one and the one after the 401.
    Mock::given(method("POST"))
        .and(path("/auth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(auth_body(3600)))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/purchases"))
        .respond_with(ResponseTemplate::new(401).set_body_string("token revoked"))
        .mount(&server)
        .await;

    let client = SiigoClient::new(test_config(&server)).unwrap();
    for _ in 0..2 {
        let err = client.list_purchases(1).await.unwrap_err();
        assert!(matches!(
            err,
            SiigoError::UnexpectedStatus { status: 401, .. }
        ));
    }
}

#[tokio::test]
async fn import_pages_through_the_listing() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(auth_body(3600)))
        .mount(&server)
        .await;
    // Three open invoices at page size 2: two pages.
    Mock::given(method("GET"))
        .and(path("/v1/purchases"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(purchases_page(
            3,
            vec![
                purchase("d-1", 1, "100.00"),
                purchase("d-2", 2, "200.00"),
            ],
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/purchases"))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(purchases_page(3, vec![purchase("d-3", 3, "300.00")])),
        )
        .mount(&server)
        .await;

    let client = Arc::new(SiigoClient::new(test_config(&server)).unwrap());
    let store = Arc::new(RecordingStore::default());
    let importer = PayablesImporter::new(client, StoreHandle(Arc::clone(&store)));

    let summary = importer.run().await.unwrap();
    assert_eq!(summary.status, ImportStatus::Success);
    assert_eq!(summary.pages_processed, 2);
    assert_eq!(summary.rows_imported, 3);
    assert_eq!(summary.rows_failed, 0);

    let rows = store.rows.lock().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[2].document_number, "3");

    let finished = store.finished.lock().unwrap().clone().unwrap();
    assert_eq!(finished.status, ImportStatus::Success);
    assert_eq!(finished.rows_imported, 3);
}

#[tokio::test]
async fn paid_invoices_are_skipped_without_counting_as_failures() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(auth_body(3600)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/purchases"))
        .respond_with(ResponseTemplate::new(200).set_body_json(purchases_page(
            2,
            vec![
                purchase("d-1", 1, "100.00"),
                purchase("d-2", 2, "0.00"),
            ],
        )))
        .mount(&server)
        .await;

    let client = Arc::new(SiigoClient::new(test_config(&server)).unwrap());
    let store = Arc::new(RecordingStore::default());
    let importer = PayablesImporter::new(client, StoreHandle(Arc::clone(&store)));

    let summary = importer.run().await.unwrap();
    assert_eq!(summary.status, ImportStatus::Success);
    assert_eq!(summary.rows_imported, 1);
    assert_eq!(summary.rows_failed, 0);
}

#[tokio::test]
async fn failed_page_persist_counts_toward_failures() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(auth_body(3600)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/purchases"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(purchases_page(
            3,
            vec![
                purchase("d-1", 1, "100.00"),
                purchase("d-2", 2, "200.00"),
            ],
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/purchases"))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(purchases_page(3, vec![purchase("d-3", 3, "300.00")])),
        )
        .mount(&server)
        .await;

    let client = Arc::new(SiigoClient::new(test_config(&server)).unwrap());
    let store = Arc::new(RecordingStore::failing_from_page(2));
    let importer = PayablesImporter::new(client, StoreHandle(Arc::clone(&store)));

    let summary = importer.run().await.unwrap();
    assert_eq!(summary.status, ImportStatus::Partial);
    assert_eq!(summary.rows_imported, 2);
    assert_eq!(summary.rows_failed, 1);

    let finished = store.finished.lock().unwrap().clone().unwrap();
    assert_eq!(finished.status, ImportStatus::Partial);
    assert!(finished.error_message.unwrap().contains("synthetic"));
}

#[tokio::test]
async fn failed_page_fetch_counts_a_full_page_and_continues() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(auth_body(3600)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/purchases"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(purchases_page(
            4,
            vec![
                purchase("d-1", 1, "100.00"),
                purchase("d-2", 2, "200.00"),
            ],
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/purchases"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = Arc::new(SiigoClient::new(test_config(&server)).unwrap());
    let store = Arc::new(RecordingStore::default());
    let importer = PayablesImporter::new(client, StoreHandle(Arc::clone(&store)));

    let summary = importer.run().await.unwrap();
    assert_eq!(summary.status, ImportStatus::Partial);
    assert_eq!(summary.pages_processed, 2);
    assert_eq!(summary.rows_imported, 2);
    assert_eq!(summary.rows_failed, 2);
}

#[tokio::test]
async fn first_page_failure_ends_the_run_as_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(auth_body(3600)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/purchases"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let client = Arc::new(SiigoClient::new(test_config(&server)).unwrap());
    let store = Arc::new(RecordingStore::default());
    let importer = PayablesImporter::new(client, StoreHandle(Arc::clone(&store)));

    let summary = importer.run().await.unwrap();
    assert_eq!(summary.status, ImportStatus::Error);
    assert_eq!(summary.rows_imported, 0);
    assert!(summary.rows_failed > 0);

    let finished = store.finished.lock().unwrap().clone().unwrap();
    assert!(finished.error_message.unwrap().contains("503"));
}

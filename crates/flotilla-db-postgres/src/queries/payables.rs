//! Accounts payable and import request queries.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx_core::query_as::query_as;
use sqlx_core::query_scalar::query_scalar;
use sqlx_postgres::PgPool;
use uuid::Uuid;

use flotilla_core::{AccountPayable, ImportRequest, ImportStatus, NewAccountPayable, PayableSource};
use flotilla_storage::{Page, PageRequest, PayableFilter, StorageError};

use super::{map_read_error, map_write_error};

type PayableRow = (
    Uuid,
    String,
    String,
    String,
    String,
    NaiveDate,
    NaiveDate,
    Decimal,
    String,
    String,
    Option<String>,
    Option<Uuid>,
    DateTime<Utc>,
    DateTime<Utc>,
);

fn payable_from_row(row: PayableRow) -> Result<AccountPayable, StorageError> {
    let source = PayableSource::parse(&row.9)
        .map_err(|e| StorageError::internal(format!("Corrupt payable row: {e}")))?;

    Ok(AccountPayable {
        id: row.0,
        provider_identification: row.1,
        provider_name: row.2,
        document_prefix: row.3,
        document_number: row.4,
        issue_date: row.5,
        due_date: row.6,
        balance: row.7,
        currency: row.8,
        source,
        siigo_document_id: row.10,
        import_request_id: row.11,
        created_at: row.12,
        updated_at: row.13,
    })
}

const PAYABLE_COLUMNS: &str = "id, provider_identification, provider_name, document_prefix, \
                               document_number, issue_date, due_date, balance, currency, source, \
                               siigo_document_id, import_request_id, created_at, updated_at";

/// Upsert statement shared by the single-row path and the page path.
/// A re-import of the same document refreshes balance, due date and
/// provider data instead of inserting a duplicate.
fn upsert_sql() -> String {
    format!(
        "INSERT INTO accounts_payable
             (provider_identification, provider_name, document_prefix, document_number,
              issue_date, due_date, balance, currency, source, siigo_document_id,
              import_request_id)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
         ON CONFLICT (document_prefix, document_number) DO UPDATE
             SET provider_identification = EXCLUDED.provider_identification,
                 provider_name = EXCLUDED.provider_name,
                 issue_date = EXCLUDED.issue_date,
                 due_date = EXCLUDED.due_date,
                 balance = EXCLUDED.balance,
                 currency = EXCLUDED.currency,
                 siigo_document_id = EXCLUDED.siigo_document_id,
                 import_request_id = EXCLUDED.import_request_id
         RETURNING {PAYABLE_COLUMNS}"
    )
}

pub async fn upsert_payable(
    pool: &PgPool,
    payable: &NewAccountPayable,
    import_request_id: Option<Uuid>,
) -> Result<AccountPayable, StorageError> {
    let key = format!("{}-{}", payable.document_prefix, payable.document_number);

    let row: PayableRow = query_as(&upsert_sql())
        .bind(&payable.provider_identification)
        .bind(&payable.provider_name)
        .bind(&payable.document_prefix)
        .bind(&payable.document_number)
        .bind(payable.issue_date)
        .bind(payable.due_date)
        .bind(payable.balance)
        .bind(&payable.currency)
        .bind(payable.source.as_str())
        .bind(&payable.siigo_document_id)
        .bind(import_request_id)
        .fetch_one(pool)
        .await
        .map_err(|e| map_write_error(e, "AccountPayable", &key))?;

    payable_from_row(row)
}

pub async fn get_payable(pool: &PgPool, id: Uuid) -> Result<Option<AccountPayable>, StorageError> {
    let sql = format!("SELECT {PAYABLE_COLUMNS} FROM accounts_payable WHERE id = $1");

    let row: Option<PayableRow> = query_as(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| map_read_error(e, "AccountPayable"))?;

    row.map(payable_from_row).transpose()
}

pub async fn list_payables(
    pool: &PgPool,
    filter: &PayableFilter,
    page: PageRequest,
) -> Result<Page<AccountPayable>, StorageError> {
    const WHERE_CLAUSE: &str = "($1::text IS NULL OR source = $1)
           AND ($2::date IS NULL OR (due_date < $2 AND balance > 0))
           AND ($3::text IS NULL OR provider_identification = $3)";

    let source = filter.source.map(|s| s.as_str().to_string());

    let count_sql = format!("SELECT count(*) FROM accounts_payable WHERE {WHERE_CLAUSE}");
    let total: i64 = query_scalar(&count_sql)
        .bind(&source)
        .bind(filter.overdue_as_of)
        .bind(&filter.provider_identification)
        .fetch_one(pool)
        .await
        .map_err(|e| map_read_error(e, "AccountPayable"))?;

    let list_sql = format!(
        "SELECT {PAYABLE_COLUMNS} FROM accounts_payable
         WHERE {WHERE_CLAUSE}
         ORDER BY due_date, document_prefix, document_number
         LIMIT $4 OFFSET $5"
    );

    let rows: Vec<PayableRow> = query_as(&list_sql)
        .bind(&source)
        .bind(filter.overdue_as_of)
        .bind(&filter.provider_identification)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(pool)
        .await
        .map_err(|e| map_read_error(e, "AccountPayable"))?;

    let items = rows
        .into_iter()
        .map(payable_from_row)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Page::new(items, page, total))
}

/// Persists one fetched page of payables atomically. Either every row of
/// the page is upserted or the whole page is rolled back.
pub async fn insert_payables_page(
    pool: &PgPool,
    import_request_id: Uuid,
    rows: &[NewAccountPayable],
) -> Result<u64, StorageError> {
    if rows.is_empty() {
        return Ok(0);
    }

    let mut tx = pool
        .begin()
        .await
        .map_err(|e| StorageError::transaction_error(format!("Failed to begin: {e}")))?;

    let sql = upsert_sql();
    let mut written = 0u64;

    for payable in rows {
        let key = format!("{}-{}", payable.document_prefix, payable.document_number);

        let _row: PayableRow = query_as(&sql)
            .bind(&payable.provider_identification)
            .bind(&payable.provider_name)
            .bind(&payable.document_prefix)
            .bind(&payable.document_number)
            .bind(payable.issue_date)
            .bind(payable.due_date)
            .bind(payable.balance)
            .bind(&payable.currency)
            .bind(payable.source.as_str())
            .bind(&payable.siigo_document_id)
            .bind(import_request_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| map_write_error(e, "AccountPayable", &key))?;

        written += 1;
    }

    tx.commit()
        .await
        .map_err(|e| StorageError::transaction_error(format!("Failed to commit: {e}")))?;

    Ok(written)
}

type ImportRow = (
    Uuid,
    DateTime<Utc>,
    String,
    i32,
    i64,
    i64,
    Option<String>,
    Option<DateTime<Utc>>,
);

fn import_from_row(row: ImportRow) -> Result<ImportRequest, StorageError> {
    let status = ImportStatus::parse(&row.2)
        .map_err(|e| StorageError::internal(format!("Corrupt import request row: {e}")))?;

    Ok(ImportRequest {
        id: row.0,
        requested_at: row.1,
        status,
        pages_processed: row.3,
        rows_imported: row.4,
        rows_failed: row.5,
        error_message: row.6,
        finished_at: row.7,
    })
}

const IMPORT_COLUMNS: &str = "id, requested_at, status, pages_processed, rows_imported, \
                              rows_failed, error_message, finished_at";

pub async fn create_import_request(pool: &PgPool) -> Result<ImportRequest, StorageError> {
    let sql = format!(
        "INSERT INTO import_requests (status) VALUES ('running')
         RETURNING {IMPORT_COLUMNS}"
    );

    let row: ImportRow = query_as(&sql)
        .fetch_one(pool)
        .await
        .map_err(|e| StorageError::internal(format!("Failed to create import request: {e}")))?;

    import_from_row(row)
}

pub async fn get_import_request(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<ImportRequest>, StorageError> {
    let sql = format!("SELECT {IMPORT_COLUMNS} FROM import_requests WHERE id = $1");

    let row: Option<ImportRow> = query_as(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| map_read_error(e, "ImportRequest"))?;

    row.map(import_from_row).transpose()
}

pub async fn finish_import_request(
    pool: &PgPool,
    id: Uuid,
    status: ImportStatus,
    pages_processed: i32,
    rows_imported: i64,
    rows_failed: i64,
    error_message: Option<&str>,
) -> Result<ImportRequest, StorageError> {
    let sql = format!(
        "UPDATE import_requests
         SET status = $1, pages_processed = $2, rows_imported = $3, rows_failed = $4,
             error_message = $5, finished_at = now()
         WHERE id = $6
         RETURNING {IMPORT_COLUMNS}"
    );

    let row: Option<ImportRow> = query_as(&sql)
        .bind(status.as_str())
        .bind(pages_processed)
        .bind(rows_imported)
        .bind(rows_failed)
        .bind(error_message)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| StorageError::internal(format!("Failed to finish import request: {e}")))?;

    row.map(import_from_row)
        .transpose()?
        .ok_or_else(|| StorageError::not_found("ImportRequest", id.to_string()))
}

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, Result};

/// Where a payable row came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayableSource {
    Siigo,
    Manual,
}

impl PayableSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Siigo => "siigo",
            Self::Manual => "manual",
        }
    }

    pub fn parse(raw: &str) -> Result<Self> {
        match raw {
            "siigo" => Ok(Self::Siigo),
            "manual" => Ok(Self::Manual),
            other => Err(CoreError::validation(format!(
                "unknown payable source '{other}'"
            ))),
        }
    }
}

/// An open (or settled) supplier invoice.
///
/// Unique on `(document_prefix, document_number)`; a re-import of the same
/// document updates the balance instead of inserting a duplicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountPayable {
    pub id: Uuid,
    pub provider_identification: String,
    pub provider_name: String,
    pub document_prefix: String,
    pub document_number: String,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub balance: Decimal,
    pub currency: String,
    pub source: PayableSource,
    pub siigo_document_id: Option<String>,
    pub import_request_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AccountPayable {
    /// Overdue means past due date with an outstanding balance.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.due_date < today && self.balance > Decimal::ZERO
    }
}

/// Payload for inserting or upserting one payable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAccountPayable {
    pub provider_identification: String,
    pub provider_name: String,
    pub document_prefix: String,
    pub document_number: String,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub balance: Decimal,
    pub currency: String,
    pub source: PayableSource,
    #[serde(default)]
    pub siigo_document_id: Option<String>,
}

impl NewAccountPayable {
    pub fn validate(self) -> Result<Self> {
        let mut missing = Vec::new();
        if self.provider_identification.trim().is_empty() {
            missing.push("provider_identification");
        }
        if self.provider_name.trim().is_empty() {
            missing.push("provider_name");
        }
        if self.document_number.trim().is_empty() {
            missing.push("document_number");
        }
        if !missing.is_empty() {
            return Err(CoreError::validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }
        if self.balance < Decimal::ZERO {
            return Err(CoreError::invalid_quantity("balance must be >= 0"));
        }
        Ok(self)
    }
}

/// Terminal and in-flight states of a bulk import run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportStatus {
    Running,
    Success,
    Partial,
    Error,
}

impl ImportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Success => "success",
            Self::Partial => "partial",
            Self::Error => "error",
        }
    }

    pub fn parse(raw: &str) -> Result<Self> {
        match raw {
            "running" => Ok(Self::Running),
            "success" => Ok(Self::Success),
            "partial" => Ok(Self::Partial),
            "error" => Ok(Self::Error),
            other => Err(CoreError::validation(format!(
                "unknown import status '{other}'"
            ))),
        }
    }

    /// Summarize an import run from its counters.
    pub fn from_counts(imported: u64, failed: u64) -> Self {
        match (imported, failed) {
            (0, f) if f > 0 => Self::Error,
            (i, f) if i > 0 && f > 0 => Self::Partial,
            _ => Self::Success,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Running)
    }
}

impl std::fmt::Display for ImportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parent record of one bulk-import run against the ERP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportRequest {
    pub id: Uuid,
    pub requested_at: DateTime<Utc>,
    pub status: ImportStatus,
    pub pages_processed: i32,
    pub rows_imported: i64,
    pub rows_failed: i64,
    pub error_message: Option<String>,
    pub finished_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payable() -> AccountPayable {
        AccountPayable {
            id: Uuid::new_v4(),
            provider_identification: "900123456".into(),
            provider_name: "Ferreteria El Tornillo".into(),
            document_prefix: "FC".into(),
            document_number: "10045".into(),
            issue_date: NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
            balance: Decimal::from(1_250_000),
            currency: "COP".into(),
            source: PayableSource::Siigo,
            siigo_document_id: Some("doc-991".into()),
            import_request_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_overdue_requires_balance() {
        let mut p = payable();
        let today = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
        assert!(p.is_overdue(today));

        p.balance = Decimal::ZERO;
        assert!(!p.is_overdue(today));
    }

    #[test]
    fn test_not_overdue_before_due_date() {
        let p = payable();
        assert!(!p.is_overdue(NaiveDate::from_ymd_opt(2026, 4, 15).unwrap()));
    }

    #[test]
    fn test_new_payable_rejects_negative_balance() {
        let row = NewAccountPayable {
            provider_identification: "900123456".into(),
            provider_name: "Proveedor".into(),
            document_prefix: "FC".into(),
            document_number: "1".into(),
            issue_date: NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
            balance: Decimal::from(-5),
            currency: "COP".into(),
            source: PayableSource::Manual,
            siigo_document_id: None,
        };
        assert!(row.validate().is_err());
    }

    #[test]
    fn test_import_status_from_counts() {
        assert_eq!(ImportStatus::from_counts(100, 0), ImportStatus::Success);
        assert_eq!(ImportStatus::from_counts(90, 10), ImportStatus::Partial);
        assert_eq!(ImportStatus::from_counts(0, 10), ImportStatus::Error);
        // nothing fetched at all still counts as a clean run
        assert_eq!(ImportStatus::from_counts(0, 0), ImportStatus::Success);
    }

    #[test]
    fn test_import_status_round_trip() {
        for status in [
            ImportStatus::Running,
            ImportStatus::Success,
            ImportStatus::Partial,
            ImportStatus::Error,
        ] {
            assert_eq!(ImportStatus::parse(status.as_str()).unwrap(), status);
        }
        assert!(ImportStatus::parse("done").is_err());
        assert!(ImportStatus::Running.is_terminal() == false);
        assert!(ImportStatus::Partial.is_terminal());
    }
}

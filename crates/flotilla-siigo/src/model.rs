//! Wire types for the Siigo purchases API.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use flotilla_core::{NewAccountPayable, PayableSource};

use crate::error::SiigoError;

/// One page of the paginated purchases listing.
#[derive(Debug, Clone, Deserialize)]
pub struct PurchasesPage {
    pub pagination: Pagination,
    #[serde(default)]
    pub results: Vec<PurchaseDocument>,
}

/// Pagination envelope returned alongside every page.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Pagination {
    pub total_results: u64,
}

impl PurchasesPage {
    /// The total number of pages this listing spans at the given page
    /// size. A listing with no results still has one (empty) page.
    #[must_use]
    pub fn total_pages(&self, page_size: u32) -> u32 {
        let page_size = u64::from(page_size.max(1));
        let pages = self.pagination.total_results.div_ceil(page_size);
        u32::try_from(pages.max(1)).unwrap_or(u32::MAX)
    }
}

/// A purchase invoice as Siigo returns it.
///
/// Only the fields the importer needs are decoded; the rest of the
/// document is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct PurchaseDocument {
    /// Siigo document identifier.
    pub id: String,
    /// Document prefix, e.g. `FC`. Absent on some document types.
    #[serde(default)]
    pub prefix: Option<String>,
    /// Consecutive document number.
    pub number: i64,
    /// Issue date.
    pub date: NaiveDate,
    /// Payment due date. Falls back to the issue date when absent.
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    /// Open balance on the invoice.
    #[serde(default)]
    pub balance: Decimal,
    /// Currency code, defaults to COP.
    #[serde(default)]
    pub currency: Option<PurchaseCurrency>,
    pub supplier: PurchaseSupplier,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PurchaseCurrency {
    pub code: String,
}

/// The supplier block embedded in a purchase document.
#[derive(Debug, Clone, Deserialize)]
pub struct PurchaseSupplier {
    pub identification: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl PurchaseDocument {
    /// Converts the document into a payable payload.
    ///
    /// Returns `Ok(None)` for fully paid documents (zero balance), which
    /// the importer skips without counting them as failures.
    ///
    /// # Errors
    ///
    /// Returns [`SiigoError::InvalidDocument`] when the converted payload
    /// fails domain validation, e.g. a blank supplier identification.
    pub fn to_new_payable(&self) -> Result<Option<NewAccountPayable>, SiigoError> {
        if self.balance <= Decimal::ZERO {
            return Ok(None);
        }

        let payable = NewAccountPayable {
            provider_identification: self.supplier.identification.clone(),
            provider_name: self
                .supplier
                .name
                .clone()
                .unwrap_or_else(|| self.supplier.identification.clone()),
            document_prefix: self.prefix.clone().unwrap_or_default(),
            document_number: self.number.to_string(),
            issue_date: self.date,
            due_date: self.due_date.unwrap_or(self.date),
            balance: self.balance,
            currency: self
                .currency
                .as_ref()
                .map_or_else(|| "COP".to_string(), |c| c.code.clone()),
            source: PayableSource::Siigo,
            siigo_document_id: Some(self.id.clone()),
        };

        payable
            .validate()
            .map(Some)
            .map_err(|e| SiigoError::invalid_document(&self.id, e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(balance: i64) -> PurchaseDocument {
        PurchaseDocument {
            id: "a1b2".into(),
            prefix: Some("FC".into()),
            number: 1042,
            date: NaiveDate::from_ymd_opt(2026, 3, 5).unwrap(),
            due_date: Some(NaiveDate::from_ymd_opt(2026, 4, 5).unwrap()),
            balance: Decimal::new(balance, 0),
            currency: None,
            supplier: PurchaseSupplier {
                identification: "900123456".into(),
                name: Some("Agregados del Norte".into()),
            },
        }
    }

    #[test]
    fn converts_open_invoice() {
        let payable = document(750_000).to_new_payable().unwrap().unwrap();
        assert_eq!(payable.document_prefix, "FC");
        assert_eq!(payable.document_number, "1042");
        assert_eq!(payable.currency, "COP");
        assert_eq!(payable.source, PayableSource::Siigo);
        assert_eq!(payable.siigo_document_id.as_deref(), Some("a1b2"));
    }

    #[test]
    fn skips_paid_invoice() {
        assert!(document(0).to_new_payable().unwrap().is_none());
    }

    #[test]
    fn missing_supplier_name_falls_back_to_identification() {
        let mut doc = document(100);
        doc.supplier.name = None;
        let payable = doc.to_new_payable().unwrap().unwrap();
        assert_eq!(payable.provider_name, "900123456");
    }

    #[test]
    fn blank_identification_is_an_invalid_document() {
        let mut doc = document(100);
        doc.supplier.identification = "  ".into();
        doc.supplier.name = Some("Proveedor".into());
        let err = doc.to_new_payable().unwrap_err();
        assert!(matches!(err, SiigoError::InvalidDocument { .. }));
    }

    #[test]
    fn due_date_defaults_to_issue_date() {
        let mut doc = document(100);
        doc.due_date = None;
        let payable = doc.to_new_payable().unwrap().unwrap();
        assert_eq!(payable.due_date, payable.issue_date);
    }

    #[test]
    fn total_pages_rounds_up() {
        let page = PurchasesPage {
            pagination: Pagination { total_results: 250 },
            results: Vec::new(),
        };
        assert_eq!(page.total_pages(100), 3);
        assert_eq!(page.total_pages(250), 1);

        let empty = PurchasesPage {
            pagination: Pagination { total_results: 0 },
            results: Vec::new(),
        };
        assert_eq!(empty.total_pages(100), 1);
    }

    #[test]
    fn decodes_api_envelope() {
        let body = serde_json::json!({
            "pagination": { "total_results": 1 },
            "results": [{
                "id": "d-1",
                "prefix": "FC",
                "number": 7,
                "date": "2026-03-05",
                "due_date": "2026-04-05",
                "balance": "125000.50",
                "currency": { "code": "COP" },
                "supplier": { "identification": "900123456", "name": "ACME" }
            }]
        });
        let page: PurchasesPage = serde_json::from_value(body).unwrap();
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.results[0].balance.to_string(), "125000.50");
    }
}

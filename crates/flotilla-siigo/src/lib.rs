//! Siigo ERP integration.
//!
//! This crate talks to the Siigo REST API and migrates open purchase
//! invoices into the local accounts-payable table:
//!
//! - [`SiigoClient`] authenticates against `/auth` and caches the bearer
//!   token until shortly before it expires.
//! - [`PayablesImporter`] pages through `/v1/purchases`, persists each
//!   page in one transaction and records the outcome on an
//!   `ImportRequest` row.

pub mod client;
pub mod config;
pub mod error;
pub mod importer;
pub mod model;

pub use client::SiigoClient;
pub use config::SiigoConfig;
pub use error::SiigoError;
pub use importer::{ImportSummary, PayablesImporter};
pub use model::{Pagination, PurchaseDocument, PurchaseSupplier, PurchasesPage};

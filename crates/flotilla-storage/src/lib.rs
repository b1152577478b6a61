//! # flotilla-storage
//!
//! Storage abstraction layer for the Flotilla back-office.
//!
//! This crate defines the repository traits and shared types that storage
//! backends implement. It contains no implementation - that lives in
//! `flotilla-db-postgres`.
//!
//! The traits are split by domain area rather than one monolithic store:
//! [`FleetStore`] (vehicles, drivers), [`CatalogStore`] (materials, prices,
//! projects), [`TripStore`], [`FuelStore`], [`InspectionStore`] and
//! [`PayableStore`] (accounts payable plus import bookkeeping). A backend
//! normally implements all of them on one type.

mod error;
mod traits;
mod types;

pub use error::{ErrorCategory, StorageError};
pub use traits::{CatalogStore, FleetStore, FuelStore, InspectionStore, PayableStore, TripStore};
pub use types::{Page, PageRequest, PayableFilter, TripFilter};

/// Type alias for a storage result.
pub type StorageResult<T> = Result<T, StorageError>;

/// All repository traits in one bound, for code that needs the full backend.
pub trait BackOfficeStore:
    FleetStore + CatalogStore + TripStore + FuelStore + InspectionStore + PayableStore
{
}

impl<T> BackOfficeStore for T where
    T: FleetStore + CatalogStore + TripStore + FuelStore + InspectionStore + PayableStore
{
}

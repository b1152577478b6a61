//! Repository traits all storage backends must implement.
//!
//! Implementations must be thread-safe (`Send + Sync`). All writes are
//! validated at the domain level before they reach a store; the store is
//! still responsible for the constraints only it can see (uniqueness,
//! foreign keys, reference counts).

use async_trait::async_trait;
use uuid::Uuid;

use flotilla_core::{
    AccountPayable, Driver, FuelPurchase, ImportRequest, ImportStatus, Inspection, Material,
    MaterialPrice, NewAccountPayable, NewDriver, NewFuelPurchase, NewInspection, NewMaterial,
    NewMaterialPrice, NewProject, NewTrip, NewVehicle, Project, Trip, Vehicle,
};

use crate::StorageResult;
use crate::types::{Page, PageRequest, PayableFilter, TripFilter};

/// Vehicles and drivers.
#[async_trait]
pub trait FleetStore: Send + Sync {
    /// Creates a vehicle.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::AlreadyExists` when the plate is taken.
    async fn create_vehicle(&self, vehicle: &NewVehicle) -> StorageResult<Vehicle>;

    /// Reads a vehicle by id. Returns `None` when it does not exist.
    async fn get_vehicle(&self, id: Uuid) -> StorageResult<Option<Vehicle>>;

    /// Lists vehicles, optionally restricted to active ones.
    async fn list_vehicles(&self, active_only: bool) -> StorageResult<Vec<Vehicle>>;

    /// Replaces a vehicle's fields (PUT semantics).
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` when the vehicle does not exist.
    async fn update_vehicle(
        &self,
        id: Uuid,
        vehicle: &NewVehicle,
        active: bool,
    ) -> StorageResult<Vehicle>;

    /// Deletes a vehicle.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InUse` when trips, fuel purchases or
    /// inspections still reference it.
    async fn delete_vehicle(&self, id: Uuid) -> StorageResult<()>;

    async fn create_driver(&self, driver: &NewDriver) -> StorageResult<Driver>;

    async fn get_driver(&self, id: Uuid) -> StorageResult<Option<Driver>>;

    async fn list_drivers(&self, active_only: bool) -> StorageResult<Vec<Driver>>;

    async fn update_driver(
        &self,
        id: Uuid,
        driver: &NewDriver,
        active: bool,
    ) -> StorageResult<Driver>;

    /// Deletes a driver.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InUse` when trips or inspections still
    /// reference the driver.
    async fn delete_driver(&self, id: Uuid) -> StorageResult<()>;
}

/// Materials, material prices and projects.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn create_material(&self, material: &NewMaterial) -> StorageResult<Material>;

    async fn get_material(&self, id: Uuid) -> StorageResult<Option<Material>>;

    async fn list_materials(&self, active_only: bool) -> StorageResult<Vec<Material>>;

    async fn update_material(
        &self,
        id: Uuid,
        material: &NewMaterial,
        active: bool,
    ) -> StorageResult<Material>;

    /// Deletes a material.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InUse` when the material still has active
    /// prices or is referenced by trips.
    async fn delete_material(&self, id: Uuid) -> StorageResult<()>;

    /// Adds a price for a material on a project.
    async fn add_material_price(
        &self,
        material_id: Uuid,
        price: &NewMaterialPrice,
    ) -> StorageResult<MaterialPrice>;

    /// Lists prices for one material, newest effective date first.
    async fn list_material_prices(
        &self,
        material_id: Uuid,
    ) -> StorageResult<Vec<MaterialPrice>>;

    /// Marks a price inactive. Idempotent.
    async fn deactivate_material_price(&self, price_id: Uuid) -> StorageResult<()>;

    async fn create_project(&self, project: &NewProject) -> StorageResult<Project>;

    async fn get_project(&self, id: Uuid) -> StorageResult<Option<Project>>;

    async fn list_projects(&self, active_only: bool) -> StorageResult<Vec<Project>>;

    async fn update_project(
        &self,
        id: Uuid,
        project: &NewProject,
        active: bool,
    ) -> StorageResult<Project>;

    /// Deletes a project.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InUse` when trips or prices reference it.
    async fn delete_project(&self, id: Uuid) -> StorageResult<()>;
}

/// Trip records.
#[async_trait]
pub trait TripStore: Send + Sync {
    /// Creates a trip.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidRow` when a referenced vehicle,
    /// driver, material or project does not exist.
    async fn create_trip(&self, trip: &NewTrip) -> StorageResult<Trip>;

    async fn get_trip(&self, id: Uuid) -> StorageResult<Option<Trip>>;

    /// Lists trips matching the filter, newest first, paginated.
    async fn list_trips(
        &self,
        filter: &TripFilter,
        page: PageRequest,
    ) -> StorageResult<Page<Trip>>;

    async fn update_trip(&self, id: Uuid, trip: &NewTrip) -> StorageResult<Trip>;

    async fn delete_trip(&self, id: Uuid) -> StorageResult<()>;
}

/// Fuel purchases.
#[async_trait]
pub trait FuelStore: Send + Sync {
    async fn create_fuel_purchase(
        &self,
        purchase: &NewFuelPurchase,
    ) -> StorageResult<FuelPurchase>;

    async fn get_fuel_purchase(&self, id: Uuid) -> StorageResult<Option<FuelPurchase>>;

    /// Lists purchases, optionally for one vehicle and/or a date range,
    /// newest first.
    async fn list_fuel_purchases(
        &self,
        vehicle_id: Option<Uuid>,
        from: Option<chrono::NaiveDate>,
        to: Option<chrono::NaiveDate>,
    ) -> StorageResult<Vec<FuelPurchase>>;

    async fn delete_fuel_purchase(&self, id: Uuid) -> StorageResult<()>;
}

/// Preoperational inspections. Inspections are append-only.
#[async_trait]
pub trait InspectionStore: Send + Sync {
    async fn create_inspection(
        &self,
        inspection: &NewInspection,
    ) -> StorageResult<Inspection>;

    async fn get_inspection(&self, id: Uuid) -> StorageResult<Option<Inspection>>;

    async fn list_inspections(
        &self,
        vehicle_id: Option<Uuid>,
        from: Option<chrono::NaiveDate>,
        to: Option<chrono::NaiveDate>,
    ) -> StorageResult<Vec<Inspection>>;
}

/// Accounts payable and the bulk-import bookkeeping.
#[async_trait]
pub trait PayableStore: Send + Sync {
    /// Inserts or updates one payable keyed on
    /// `(document_prefix, document_number)`.
    async fn upsert_payable(
        &self,
        payable: &NewAccountPayable,
        import_request_id: Option<Uuid>,
    ) -> StorageResult<AccountPayable>;

    async fn get_payable(&self, id: Uuid) -> StorageResult<Option<AccountPayable>>;

    async fn list_payables(
        &self,
        filter: &PayableFilter,
        page: PageRequest,
    ) -> StorageResult<Page<AccountPayable>>;

    /// Creates the parent record of an import run in `running` state.
    async fn create_import_request(&self) -> StorageResult<ImportRequest>;

    async fn get_import_request(&self, id: Uuid) -> StorageResult<Option<ImportRequest>>;

    /// Persists one fetched page of payables atomically. Returns the number
    /// of rows written. Either the whole page lands or none of it does.
    async fn insert_payables_page(
        &self,
        import_request_id: Uuid,
        rows: &[NewAccountPayable],
    ) -> StorageResult<u64>;

    /// Marks an import run finished with its final counters.
    async fn finish_import_request(
        &self,
        id: Uuid,
        status: ImportStatus,
        pages_processed: i32,
        rows_imported: i64,
        rows_failed: i64,
        error_message: Option<&str>,
    ) -> StorageResult<ImportRequest>;
}

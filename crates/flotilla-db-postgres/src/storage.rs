//! PostgreSQL implementation of the repository traits.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx_postgres::PgPool;
use uuid::Uuid;

use flotilla_core::{
    AccountPayable, Driver, FuelPurchase, ImportRequest, ImportStatus, Inspection, Material,
    MaterialPrice, NewAccountPayable, NewDriver, NewFuelPurchase, NewInspection, NewMaterial,
    NewMaterialPrice, NewProject, NewTrip, NewVehicle, Project, Trip, Vehicle,
};
use flotilla_storage::{
    CatalogStore, FleetStore, FuelStore, InspectionStore, Page, PageRequest, PayableFilter,
    PayableStore, StorageError, TripFilter, TripStore,
};

use crate::config::PostgresConfig;
use crate::migrations;
use crate::pool;
use crate::queries;

/// PostgreSQL storage backend for the Flotilla back-office.
///
/// One pool serves every repository trait. The type is cheap to clone;
/// clones share the pool.
#[derive(Debug, Clone)]
pub struct PostgresStorage {
    pool: PgPool,
}

impl PostgresStorage {
    /// Creates a new `PostgresStorage` with the given configuration.
    ///
    /// This will:
    /// 1. Create a connection pool
    /// 2. Run migrations (if configured)
    ///
    /// # Errors
    ///
    /// Returns an error if the connection pool cannot be created
    /// or if migrations fail.
    pub async fn new(config: PostgresConfig) -> Result<Self, StorageError> {
        let pool = pool::create_pool(&config).await?;

        if config.run_migrations {
            migrations::run(&pool).await?;
        }

        Ok(Self { pool })
    }

    /// Creates a new `PostgresStorage` from an existing connection pool.
    ///
    /// This allows sharing a connection pool between multiple components.
    /// Migrations are not run automatically when using this constructor.
    #[must_use]
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Pings the database. Used by the readiness endpoint.
    pub async fn ping(&self) -> Result<(), StorageError> {
        pool::test_connection(&self.pool).await.map_err(Into::into)
    }
}

#[async_trait]
impl FleetStore for PostgresStorage {
    async fn create_vehicle(&self, vehicle: &NewVehicle) -> Result<Vehicle, StorageError> {
        queries::fleet::create_vehicle(&self.pool, vehicle).await
    }

    async fn get_vehicle(&self, id: Uuid) -> Result<Option<Vehicle>, StorageError> {
        queries::fleet::get_vehicle(&self.pool, id).await
    }

    async fn list_vehicles(&self, active_only: bool) -> Result<Vec<Vehicle>, StorageError> {
        queries::fleet::list_vehicles(&self.pool, active_only).await
    }

    async fn update_vehicle(
        &self,
        id: Uuid,
        vehicle: &NewVehicle,
        active: bool,
    ) -> Result<Vehicle, StorageError> {
        queries::fleet::update_vehicle(&self.pool, id, vehicle, active).await
    }

    async fn delete_vehicle(&self, id: Uuid) -> Result<(), StorageError> {
        queries::fleet::delete_vehicle(&self.pool, id).await
    }

    async fn create_driver(&self, driver: &NewDriver) -> Result<Driver, StorageError> {
        queries::fleet::create_driver(&self.pool, driver).await
    }

    async fn get_driver(&self, id: Uuid) -> Result<Option<Driver>, StorageError> {
        queries::fleet::get_driver(&self.pool, id).await
    }

    async fn list_drivers(&self, active_only: bool) -> Result<Vec<Driver>, StorageError> {
        queries::fleet::list_drivers(&self.pool, active_only).await
    }

    async fn update_driver(
        &self,
        id: Uuid,
        driver: &NewDriver,
        active: bool,
    ) -> Result<Driver, StorageError> {
        queries::fleet::update_driver(&self.pool, id, driver, active).await
    }

    async fn delete_driver(&self, id: Uuid) -> Result<(), StorageError> {
        queries::fleet::delete_driver(&self.pool, id).await
    }
}

#[async_trait]
impl CatalogStore for PostgresStorage {
    async fn create_material(&self, material: &NewMaterial) -> Result<Material, StorageError> {
        queries::catalog::create_material(&self.pool, material).await
    }

    async fn get_material(&self, id: Uuid) -> Result<Option<Material>, StorageError> {
        queries::catalog::get_material(&self.pool, id).await
    }

    async fn list_materials(&self, active_only: bool) -> Result<Vec<Material>, StorageError> {
        queries::catalog::list_materials(&self.pool, active_only).await
    }

    async fn update_material(
        &self,
        id: Uuid,
        material: &NewMaterial,
        active: bool,
    ) -> Result<Material, StorageError> {
        queries::catalog::update_material(&self.pool, id, material, active).await
    }

    async fn delete_material(&self, id: Uuid) -> Result<(), StorageError> {
        queries::catalog::delete_material(&self.pool, id).await
    }

    async fn add_material_price(
        &self,
        material_id: Uuid,
        price: &NewMaterialPrice,
    ) -> Result<MaterialPrice, StorageError> {
        queries::catalog::add_material_price(&self.pool, material_id, price).await
    }

    async fn list_material_prices(
        &self,
        material_id: Uuid,
    ) -> Result<Vec<MaterialPrice>, StorageError> {
        queries::catalog::list_material_prices(&self.pool, material_id).await
    }

    async fn deactivate_material_price(&self, price_id: Uuid) -> Result<(), StorageError> {
        queries::catalog::deactivate_material_price(&self.pool, price_id).await
    }

    async fn create_project(&self, project: &NewProject) -> Result<Project, StorageError> {
        queries::catalog::create_project(&self.pool, project).await
    }

    async fn get_project(&self, id: Uuid) -> Result<Option<Project>, StorageError> {
        queries::catalog::get_project(&self.pool, id).await
    }

    async fn list_projects(&self, active_only: bool) -> Result<Vec<Project>, StorageError> {
        queries::catalog::list_projects(&self.pool, active_only).await
    }

    async fn update_project(
        &self,
        id: Uuid,
        project: &NewProject,
        active: bool,
    ) -> Result<Project, StorageError> {
        queries::catalog::update_project(&self.pool, id, project, active).await
    }

    async fn delete_project(&self, id: Uuid) -> Result<(), StorageError> {
        queries::catalog::delete_project(&self.pool, id).await
    }
}

#[async_trait]
impl TripStore for PostgresStorage {
    async fn create_trip(&self, trip: &NewTrip) -> Result<Trip, StorageError> {
        queries::trips::create_trip(&self.pool, trip).await
    }

    async fn get_trip(&self, id: Uuid) -> Result<Option<Trip>, StorageError> {
        queries::trips::get_trip(&self.pool, id).await
    }

    async fn list_trips(
        &self,
        filter: &TripFilter,
        page: PageRequest,
    ) -> Result<Page<Trip>, StorageError> {
        queries::trips::list_trips(&self.pool, filter, page).await
    }

    async fn update_trip(&self, id: Uuid, trip: &NewTrip) -> Result<Trip, StorageError> {
        queries::trips::update_trip(&self.pool, id, trip).await
    }

    async fn delete_trip(&self, id: Uuid) -> Result<(), StorageError> {
        queries::trips::delete_trip(&self.pool, id).await
    }
}

#[async_trait]
impl FuelStore for PostgresStorage {
    async fn create_fuel_purchase(
        &self,
        purchase: &NewFuelPurchase,
    ) -> Result<FuelPurchase, StorageError> {
        queries::fuel::create_fuel_purchase(&self.pool, purchase).await
    }

    async fn get_fuel_purchase(&self, id: Uuid) -> Result<Option<FuelPurchase>, StorageError> {
        queries::fuel::get_fuel_purchase(&self.pool, id).await
    }

    async fn list_fuel_purchases(
        &self,
        vehicle_id: Option<Uuid>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<FuelPurchase>, StorageError> {
        queries::fuel::list_fuel_purchases(&self.pool, vehicle_id, from, to).await
    }

    async fn delete_fuel_purchase(&self, id: Uuid) -> Result<(), StorageError> {
        queries::fuel::delete_fuel_purchase(&self.pool, id).await
    }
}

#[async_trait]
impl InspectionStore for PostgresStorage {
    async fn create_inspection(
        &self,
        inspection: &NewInspection,
    ) -> Result<Inspection, StorageError> {
        queries::inspections::create_inspection(&self.pool, inspection).await
    }

    async fn get_inspection(&self, id: Uuid) -> Result<Option<Inspection>, StorageError> {
        queries::inspections::get_inspection(&self.pool, id).await
    }

    async fn list_inspections(
        &self,
        vehicle_id: Option<Uuid>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<Inspection>, StorageError> {
        queries::inspections::list_inspections(&self.pool, vehicle_id, from, to).await
    }
}

#[async_trait]
impl PayableStore for PostgresStorage {
    async fn upsert_payable(
        &self,
        payable: &NewAccountPayable,
        import_request_id: Option<Uuid>,
    ) -> Result<AccountPayable, StorageError> {
        queries::payables::upsert_payable(&self.pool, payable, import_request_id).await
    }

    async fn get_payable(&self, id: Uuid) -> Result<Option<AccountPayable>, StorageError> {
        queries::payables::get_payable(&self.pool, id).await
    }

    async fn list_payables(
        &self,
        filter: &PayableFilter,
        page: PageRequest,
    ) -> Result<Page<AccountPayable>, StorageError> {
        queries::payables::list_payables(&self.pool, filter, page).await
    }

    async fn create_import_request(&self) -> Result<ImportRequest, StorageError> {
        queries::payables::create_import_request(&self.pool).await
    }

    async fn get_import_request(&self, id: Uuid) -> Result<Option<ImportRequest>, StorageError> {
        queries::payables::get_import_request(&self.pool, id).await
    }

    async fn insert_payables_page(
        &self,
        import_request_id: Uuid,
        rows: &[NewAccountPayable],
    ) -> Result<u64, StorageError> {
        queries::payables::insert_payables_page(&self.pool, import_request_id, rows).await
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
        queries::payables::finish_import_request(
            &self.pool,
            id,
            status,
            pages_processed,
            rows_imported,
            rows_failed,
            error_message,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use flotilla_storage::BackOfficeStore;

    use super::PostgresStorage;

    #[test]
    fn satisfies_the_full_backend_bound() {
        fn assert_backend<S: BackOfficeStore>() {}
        assert_backend::<PostgresStorage>();
    }
}

//! Vehicle and driver queries.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx_core::query::query;
use sqlx_core::query_as::query_as;
use sqlx_core::query_scalar::query_scalar;
use sqlx_postgres::PgPool;
use uuid::Uuid;

use flotilla_core::{Driver, NewDriver, NewVehicle, Vehicle};
use flotilla_storage::StorageError;

use super::{map_read_error, map_write_error};
use crate::error::is_foreign_key_violation;

type VehicleRow = (
    Uuid,
    String,
    String,
    String,
    i32,
    Decimal,
    bool,
    DateTime<Utc>,
    DateTime<Utc>,
);

fn vehicle_from_row(row: VehicleRow) -> Vehicle {
    Vehicle {
        id: row.0,
        plate: row.1,
        make: row.2,
        model: row.3,
        year: row.4,
        capacity_m3: row.5,
        active: row.6,
        created_at: row.7,
        updated_at: row.8,
    }
}

const VEHICLE_COLUMNS: &str =
    "id, plate, make, model, year, capacity_m3, active, created_at, updated_at";

pub async fn create_vehicle(pool: &PgPool, vehicle: &NewVehicle) -> Result<Vehicle, StorageError> {
    let sql = format!(
        "INSERT INTO vehicles (plate, make, model, year, capacity_m3)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING {VEHICLE_COLUMNS}"
    );

    let row: VehicleRow = query_as(&sql)
        .bind(&vehicle.plate)
        .bind(&vehicle.make)
        .bind(&vehicle.model)
        .bind(vehicle.year)
        .bind(vehicle.capacity_m3)
        .fetch_one(pool)
        .await
        .map_err(|e| map_write_error(e, "Vehicle", &vehicle.plate))?;

    Ok(vehicle_from_row(row))
}

pub async fn get_vehicle(pool: &PgPool, id: Uuid) -> Result<Option<Vehicle>, StorageError> {
    let sql = format!("SELECT {VEHICLE_COLUMNS} FROM vehicles WHERE id = $1");

    let row: Option<VehicleRow> = query_as(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| map_read_error(e, "Vehicle"))?;

    Ok(row.map(vehicle_from_row))
}

pub async fn list_vehicles(pool: &PgPool, active_only: bool) -> Result<Vec<Vehicle>, StorageError> {
    let sql = format!(
        "SELECT {VEHICLE_COLUMNS} FROM vehicles
         WHERE ($1 = FALSE OR active)
         ORDER BY plate"
    );

    let rows: Vec<VehicleRow> = query_as(&sql)
        .bind(active_only)
        .fetch_all(pool)
        .await
        .map_err(|e| map_read_error(e, "Vehicle"))?;

    Ok(rows.into_iter().map(vehicle_from_row).collect())
}

pub async fn update_vehicle(
    pool: &PgPool,
    id: Uuid,
    vehicle: &NewVehicle,
    active: bool,
) -> Result<Vehicle, StorageError> {
    let sql = format!(
        "UPDATE vehicles
         SET plate = $1, make = $2, model = $3, year = $4, capacity_m3 = $5, active = $6
         WHERE id = $7
         RETURNING {VEHICLE_COLUMNS}"
    );

    let row: Option<VehicleRow> = query_as(&sql)
        .bind(&vehicle.plate)
        .bind(&vehicle.make)
        .bind(&vehicle.model)
        .bind(vehicle.year)
        .bind(vehicle.capacity_m3)
        .bind(active)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| map_write_error(e, "Vehicle", &vehicle.plate))?;

    row.map(vehicle_from_row)
        .ok_or_else(|| StorageError::not_found("Vehicle", id.to_string()))
}

pub async fn delete_vehicle(pool: &PgPool, id: Uuid) -> Result<(), StorageError> {
    let result = query("DELETE FROM vehicles WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                StorageError::in_use(
                    "Vehicle",
                    id.to_string(),
                    "existing trips, fuel purchases or inspections",
                )
            } else {
                StorageError::internal(format!("Failed to delete vehicle: {e}"))
            }
        })?;

    if result.rows_affected() == 0 {
        return Err(StorageError::not_found("Vehicle", id.to_string()));
    }

    Ok(())
}

type DriverRow = (
    Uuid,
    String,
    String,
    String,
    NaiveDate,
    Option<String>,
    bool,
    DateTime<Utc>,
    DateTime<Utc>,
);

fn driver_from_row(row: DriverRow) -> Driver {
    Driver {
        id: row.0,
        document_id: row.1,
        full_name: row.2,
        license_number: row.3,
        license_expires: row.4,
        phone: row.5,
        active: row.6,
        created_at: row.7,
        updated_at: row.8,
    }
}

const DRIVER_COLUMNS: &str =
    "id, document_id, full_name, license_number, license_expires, phone, active, created_at, updated_at";

pub async fn create_driver(pool: &PgPool, driver: &NewDriver) -> Result<Driver, StorageError> {
    let sql = format!(
        "INSERT INTO drivers (document_id, full_name, license_number, license_expires, phone)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING {DRIVER_COLUMNS}"
    );

    let row: DriverRow = query_as(&sql)
        .bind(&driver.document_id)
        .bind(&driver.full_name)
        .bind(&driver.license_number)
        .bind(driver.license_expires)
        .bind(&driver.phone)
        .fetch_one(pool)
        .await
        .map_err(|e| map_write_error(e, "Driver", &driver.document_id))?;

    Ok(driver_from_row(row))
}

pub async fn get_driver(pool: &PgPool, id: Uuid) -> Result<Option<Driver>, StorageError> {
    let sql = format!("SELECT {DRIVER_COLUMNS} FROM drivers WHERE id = $1");

    let row: Option<DriverRow> = query_as(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| map_read_error(e, "Driver"))?;

    Ok(row.map(driver_from_row))
}

pub async fn list_drivers(pool: &PgPool, active_only: bool) -> Result<Vec<Driver>, StorageError> {
    let sql = format!(
        "SELECT {DRIVER_COLUMNS} FROM drivers
         WHERE ($1 = FALSE OR active)
         ORDER BY full_name"
    );

    let rows: Vec<DriverRow> = query_as(&sql)
        .bind(active_only)
        .fetch_all(pool)
        .await
        .map_err(|e| map_read_error(e, "Driver"))?;

    Ok(rows.into_iter().map(driver_from_row).collect())
}

pub async fn update_driver(
    pool: &PgPool,
    id: Uuid,
    driver: &NewDriver,
    active: bool,
) -> Result<Driver, StorageError> {
    let sql = format!(
        "UPDATE drivers
         SET document_id = $1, full_name = $2, license_number = $3,
             license_expires = $4, phone = $5, active = $6
         WHERE id = $7
         RETURNING {DRIVER_COLUMNS}"
    );

    let row: Option<DriverRow> = query_as(&sql)
        .bind(&driver.document_id)
        .bind(&driver.full_name)
        .bind(&driver.license_number)
        .bind(driver.license_expires)
        .bind(&driver.phone)
        .bind(active)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| map_write_error(e, "Driver", &driver.document_id))?;

    row.map(driver_from_row)
        .ok_or_else(|| StorageError::not_found("Driver", id.to_string()))
}

pub async fn delete_driver(pool: &PgPool, id: Uuid) -> Result<(), StorageError> {
    // Cheap existence probe first so a missing driver reports NotFound
    // rather than a zero-row delete being silently accepted.
    let exists: Option<i64> = query_scalar("SELECT 1 FROM drivers WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| map_read_error(e, "Driver"))?;

    if exists.is_none() {
        return Err(StorageError::not_found("Driver", id.to_string()));
    }

    query("DELETE FROM drivers WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                StorageError::in_use("Driver", id.to_string(), "existing trips or inspections")
            } else {
                StorageError::internal(format!("Failed to delete driver: {e}"))
            }
        })?;

    Ok(())
}

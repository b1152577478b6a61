//! Fuel purchase queries.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx_core::query::query;
use sqlx_core::query_as::query_as;
use sqlx_postgres::PgPool;
use uuid::Uuid;

use flotilla_core::{FuelPurchase, NewFuelPurchase};
use flotilla_storage::StorageError;

use super::{map_read_error, map_write_error};

type FuelRow = (
    Uuid,
    NaiveDate,
    Uuid,
    Decimal,
    Decimal,
    String,
    Option<String>,
    DateTime<Utc>,
);

fn fuel_from_row(row: FuelRow) -> FuelPurchase {
    FuelPurchase {
        id: row.0,
        purchase_date: row.1,
        vehicle_id: row.2,
        gallons: row.3,
        total_cost: row.4,
        station: row.5,
        invoice_number: row.6,
        created_at: row.7,
    }
}

const FUEL_COLUMNS: &str =
    "id, purchase_date, vehicle_id, gallons, total_cost, station, invoice_number, created_at";

pub async fn create_fuel_purchase(
    pool: &PgPool,
    purchase: &NewFuelPurchase,
) -> Result<FuelPurchase, StorageError> {
    let sql = format!(
        "INSERT INTO fuel_purchases (purchase_date, vehicle_id, gallons, total_cost,
                                     station, invoice_number)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING {FUEL_COLUMNS}"
    );

    let row: FuelRow = query_as(&sql)
        .bind(purchase.purchase_date)
        .bind(purchase.vehicle_id)
        .bind(purchase.gallons)
        .bind(purchase.total_cost)
        .bind(&purchase.station)
        .bind(&purchase.invoice_number)
        .fetch_one(pool)
        .await
        .map_err(|e| map_write_error(e, "FuelPurchase", &purchase.station))?;

    Ok(fuel_from_row(row))
}

pub async fn get_fuel_purchase(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<FuelPurchase>, StorageError> {
    let sql = format!("SELECT {FUEL_COLUMNS} FROM fuel_purchases WHERE id = $1");

    let row: Option<FuelRow> = query_as(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| map_read_error(e, "FuelPurchase"))?;

    Ok(row.map(fuel_from_row))
}

pub async fn list_fuel_purchases(
    pool: &PgPool,
    vehicle_id: Option<Uuid>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<Vec<FuelPurchase>, StorageError> {
    let sql = format!(
        "SELECT {FUEL_COLUMNS} FROM fuel_purchases
         WHERE ($1::uuid IS NULL OR vehicle_id = $1)
           AND ($2::date IS NULL OR purchase_date >= $2)
           AND ($3::date IS NULL OR purchase_date <= $3)
         ORDER BY purchase_date DESC, created_at DESC"
    );

    let rows: Vec<FuelRow> = query_as(&sql)
        .bind(vehicle_id)
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await
        .map_err(|e| map_read_error(e, "FuelPurchase"))?;

    Ok(rows.into_iter().map(fuel_from_row).collect())
}

pub async fn delete_fuel_purchase(pool: &PgPool, id: Uuid) -> Result<(), StorageError> {
    let result = query("DELETE FROM fuel_purchases WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| StorageError::internal(format!("Failed to delete fuel purchase: {e}")))?;

    if result.rows_affected() == 0 {
        return Err(StorageError::not_found("FuelPurchase", id.to_string()));
    }

    Ok(())
}

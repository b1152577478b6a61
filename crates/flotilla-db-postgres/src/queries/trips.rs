//! Trip queries.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx_core::query::query;
use sqlx_core::query_as::query_as;
use sqlx_core::query_scalar::query_scalar;
use sqlx_postgres::PgPool;
use uuid::Uuid;

use flotilla_core::{NewTrip, Trip};
use flotilla_storage::{Page, PageRequest, StorageError, TripFilter};

use super::{map_read_error, map_write_error};

type TripRow = (
    Uuid,
    NaiveDate,
    Uuid,
    Uuid,
    Uuid,
    Uuid,
    Decimal,
    Decimal,
    Option<String>,
    DateTime<Utc>,
    DateTime<Utc>,
);

fn trip_from_row(row: TripRow) -> Trip {
    Trip {
        id: row.0,
        trip_date: row.1,
        vehicle_id: row.2,
        driver_id: row.3,
        material_id: row.4,
        project_id: row.5,
        quantity: row.6,
        unit_price: row.7,
        remarks: row.8,
        created_at: row.9,
        updated_at: row.10,
    }
}

const TRIP_COLUMNS: &str = "id, trip_date, vehicle_id, driver_id, material_id, project_id, \
                            quantity, unit_price, remarks, created_at, updated_at";

pub async fn create_trip(pool: &PgPool, trip: &NewTrip) -> Result<Trip, StorageError> {
    let sql = format!(
        "INSERT INTO trips (trip_date, vehicle_id, driver_id, material_id, project_id,
                            quantity, unit_price, remarks)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
         RETURNING {TRIP_COLUMNS}"
    );

    let row: TripRow = query_as(&sql)
        .bind(trip.trip_date)
        .bind(trip.vehicle_id)
        .bind(trip.driver_id)
        .bind(trip.material_id)
        .bind(trip.project_id)
        .bind(trip.quantity)
        .bind(trip.unit_price)
        .bind(&trip.remarks)
        .fetch_one(pool)
        .await
        .map_err(|e| map_write_error(e, "Trip", &trip.trip_date.to_string()))?;

    Ok(trip_from_row(row))
}

pub async fn get_trip(pool: &PgPool, id: Uuid) -> Result<Option<Trip>, StorageError> {
    let sql = format!("SELECT {TRIP_COLUMNS} FROM trips WHERE id = $1");

    let row: Option<TripRow> = query_as(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| map_read_error(e, "Trip"))?;

    Ok(row.map(trip_from_row))
}

/// Lists trips matching the filter, newest first.
///
/// Every filter field is optional; a NULL bind disables that predicate so
/// one statement covers all combinations.
pub async fn list_trips(
    pool: &PgPool,
    filter: &TripFilter,
    page: PageRequest,
) -> Result<Page<Trip>, StorageError> {
    const WHERE_CLAUSE: &str = "($1::date IS NULL OR trip_date >= $1)
           AND ($2::date IS NULL OR trip_date <= $2)
           AND ($3::uuid IS NULL OR project_id = $3)
           AND ($4::uuid IS NULL OR vehicle_id = $4)";

    let count_sql = format!("SELECT count(*) FROM trips WHERE {WHERE_CLAUSE}");
    let total: i64 = query_scalar(&count_sql)
        .bind(filter.from)
        .bind(filter.to)
        .bind(filter.project_id)
        .bind(filter.vehicle_id)
        .fetch_one(pool)
        .await
        .map_err(|e| map_read_error(e, "Trip"))?;

    let list_sql = format!(
        "SELECT {TRIP_COLUMNS} FROM trips
         WHERE {WHERE_CLAUSE}
         ORDER BY trip_date DESC, created_at DESC
         LIMIT $5 OFFSET $6"
    );

    let rows: Vec<TripRow> = query_as(&list_sql)
        .bind(filter.from)
        .bind(filter.to)
        .bind(filter.project_id)
        .bind(filter.vehicle_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(pool)
        .await
        .map_err(|e| map_read_error(e, "Trip"))?;

    Ok(Page::new(
        rows.into_iter().map(trip_from_row).collect(),
        page,
        total,
    ))
}

pub async fn update_trip(pool: &PgPool, id: Uuid, trip: &NewTrip) -> Result<Trip, StorageError> {
    let sql = format!(
        "UPDATE trips
         SET trip_date = $1, vehicle_id = $2, driver_id = $3, material_id = $4,
             project_id = $5, quantity = $6, unit_price = $7, remarks = $8
         WHERE id = $9
         RETURNING {TRIP_COLUMNS}"
    );

    let row: Option<TripRow> = query_as(&sql)
        .bind(trip.trip_date)
        .bind(trip.vehicle_id)
        .bind(trip.driver_id)
        .bind(trip.material_id)
        .bind(trip.project_id)
        .bind(trip.quantity)
        .bind(trip.unit_price)
        .bind(&trip.remarks)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| map_write_error(e, "Trip", &id.to_string()))?;

    row.map(trip_from_row)
        .ok_or_else(|| StorageError::not_found("Trip", id.to_string()))
}

pub async fn delete_trip(pool: &PgPool, id: Uuid) -> Result<(), StorageError> {
    let result = query("DELETE FROM trips WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| StorageError::internal(format!("Failed to delete trip: {e}")))?;

    if result.rows_affected() == 0 {
        return Err(StorageError::not_found("Trip", id.to_string()));
    }

    Ok(())
}

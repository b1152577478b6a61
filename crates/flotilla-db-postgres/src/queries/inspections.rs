//! Preoperational inspection queries.
//!
//! The checklist is stored as JSONB; the derived result is materialized in
//! its own column so list filters never have to unpack the JSON.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use sqlx_core::query_as::query_as;
use sqlx_postgres::PgPool;
use uuid::Uuid;

use flotilla_core::{Inspection, InspectionResult, NewInspection};
use flotilla_storage::StorageError;

use super::{map_read_error, map_write_error};

type InspectionRow = (
    Uuid,
    NaiveDate,
    Uuid,
    Uuid,
    Value,
    String,
    Option<String>,
    DateTime<Utc>,
);

fn inspection_from_row(row: InspectionRow) -> Result<Inspection, StorageError> {
    let checklist = serde_json::from_value(row.4)
        .map_err(|e| StorageError::internal(format!("Corrupt checklist JSON: {e}")))?;
    let result = InspectionResult::parse(&row.5)
        .map_err(|e| StorageError::internal(format!("Corrupt inspection row: {e}")))?;

    Ok(Inspection {
        id: row.0,
        inspection_date: row.1,
        vehicle_id: row.2,
        driver_id: row.3,
        checklist,
        result,
        notes: row.6,
        created_at: row.7,
    })
}

const INSPECTION_COLUMNS: &str =
    "id, inspection_date, vehicle_id, driver_id, checklist, result, notes, created_at";

pub async fn create_inspection(
    pool: &PgPool,
    inspection: &NewInspection,
) -> Result<Inspection, StorageError> {
    let checklist_json = serde_json::to_value(&inspection.checklist)
        .map_err(|e| StorageError::invalid_row(format!("Unserializable checklist: {e}")))?;
    let result = inspection.result();

    let sql = format!(
        "INSERT INTO inspections (inspection_date, vehicle_id, driver_id, checklist, result, notes)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING {INSPECTION_COLUMNS}"
    );

    let row: InspectionRow = query_as(&sql)
        .bind(inspection.inspection_date)
        .bind(inspection.vehicle_id)
        .bind(inspection.driver_id)
        .bind(&checklist_json)
        .bind(result.as_str())
        .bind(&inspection.notes)
        .fetch_one(pool)
        .await
        .map_err(|e| map_write_error(e, "Inspection", &inspection.inspection_date.to_string()))?;

    inspection_from_row(row)
}

pub async fn get_inspection(pool: &PgPool, id: Uuid) -> Result<Option<Inspection>, StorageError> {
    let sql = format!("SELECT {INSPECTION_COLUMNS} FROM inspections WHERE id = $1");

    let row: Option<InspectionRow> = query_as(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| map_read_error(e, "Inspection"))?;

    row.map(inspection_from_row).transpose()
}

pub async fn list_inspections(
    pool: &PgPool,
    vehicle_id: Option<Uuid>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<Vec<Inspection>, StorageError> {
    let sql = format!(
        "SELECT {INSPECTION_COLUMNS} FROM inspections
         WHERE ($1::uuid IS NULL OR vehicle_id = $1)
           AND ($2::date IS NULL OR inspection_date >= $2)
           AND ($3::date IS NULL OR inspection_date <= $3)
         ORDER BY inspection_date DESC, created_at DESC"
    );

    let rows: Vec<InspectionRow> = query_as(&sql)
        .bind(vehicle_id)
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await
        .map_err(|e| map_read_error(e, "Inspection"))?;

    rows.into_iter().map(inspection_from_row).collect()
}

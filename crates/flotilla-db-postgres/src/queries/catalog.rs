//! Material, material price and project queries.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx_core::query::query;
use sqlx_core::query_as::query_as;
use sqlx_core::query_scalar::query_scalar;
use sqlx_postgres::PgPool;
use uuid::Uuid;

use flotilla_core::{
    Material, MaterialPrice, MaterialUnit, NewMaterial, NewMaterialPrice, NewProject, Project,
};
use flotilla_storage::StorageError;

use super::{map_read_error, map_write_error};
use crate::error::is_foreign_key_violation;

type MaterialRow = (Uuid, String, String, String, bool, DateTime<Utc>, DateTime<Utc>);

fn material_from_row(row: MaterialRow) -> Result<Material, StorageError> {
    let unit = MaterialUnit::parse(&row.3)
        .map_err(|e| StorageError::internal(format!("Corrupt material row: {e}")))?;
    Ok(Material {
        id: row.0,
        code: row.1,
        name: row.2,
        unit,
        active: row.4,
        created_at: row.5,
        updated_at: row.6,
    })
}

const MATERIAL_COLUMNS: &str = "id, code, name, unit, active, created_at, updated_at";

pub async fn create_material(
    pool: &PgPool,
    material: &NewMaterial,
) -> Result<Material, StorageError> {
    let sql = format!(
        "INSERT INTO materials (code, name, unit)
         VALUES ($1, $2, $3)
         RETURNING {MATERIAL_COLUMNS}"
    );

    let row: MaterialRow = query_as(&sql)
        .bind(&material.code)
        .bind(&material.name)
        .bind(material.unit.as_str())
        .fetch_one(pool)
        .await
        .map_err(|e| map_write_error(e, "Material", &material.code))?;

    material_from_row(row)
}

pub async fn get_material(pool: &PgPool, id: Uuid) -> Result<Option<Material>, StorageError> {
    let sql = format!("SELECT {MATERIAL_COLUMNS} FROM materials WHERE id = $1");

    let row: Option<MaterialRow> = query_as(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| map_read_error(e, "Material"))?;

    row.map(material_from_row).transpose()
}

pub async fn list_materials(
    pool: &PgPool,
    active_only: bool,
) -> Result<Vec<Material>, StorageError> {
    let sql = format!(
        "SELECT {MATERIAL_COLUMNS} FROM materials
         WHERE ($1 = FALSE OR active)
         ORDER BY code"
    );

    let rows: Vec<MaterialRow> = query_as(&sql)
        .bind(active_only)
        .fetch_all(pool)
        .await
        .map_err(|e| map_read_error(e, "Material"))?;

    rows.into_iter().map(material_from_row).collect()
}

pub async fn update_material(
    pool: &PgPool,
    id: Uuid,
    material: &NewMaterial,
    active: bool,
) -> Result<Material, StorageError> {
    let sql = format!(
        "UPDATE materials
         SET code = $1, name = $2, unit = $3, active = $4
         WHERE id = $5
         RETURNING {MATERIAL_COLUMNS}"
    );

    let row: Option<MaterialRow> = query_as(&sql)
        .bind(&material.code)
        .bind(&material.name)
        .bind(material.unit.as_str())
        .bind(active)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| map_write_error(e, "Material", &material.code))?;

    row.map(material_from_row)
        .transpose()?
        .ok_or_else(|| StorageError::not_found("Material", id.to_string()))
}

/// Deletes a material. A material with active prices cannot be removed;
/// the price rows have to be deactivated first.
pub async fn delete_material(pool: &PgPool, id: Uuid) -> Result<(), StorageError> {
    let active_prices: i64 =
        query_scalar("SELECT count(*) FROM material_prices WHERE material_id = $1 AND active")
            .bind(id)
            .fetch_one(pool)
            .await
            .map_err(|e| map_read_error(e, "MaterialPrice"))?;

    if active_prices > 0 {
        return Err(StorageError::in_use(
            "Material",
            id.to_string(),
            format!("{active_prices} active price(s)"),
        ));
    }

    // Inactive price rows are swept with the material.
    query("DELETE FROM material_prices WHERE material_id = $1")
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| StorageError::internal(format!("Failed to delete material prices: {e}")))?;

    let result = query("DELETE FROM materials WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                StorageError::in_use("Material", id.to_string(), "existing trips")
            } else {
                StorageError::internal(format!("Failed to delete material: {e}"))
            }
        })?;

    if result.rows_affected() == 0 {
        return Err(StorageError::not_found("Material", id.to_string()));
    }

    Ok(())
}

type PriceRow = (Uuid, Uuid, Uuid, Decimal, NaiveDate, bool, DateTime<Utc>);

fn price_from_row(row: PriceRow) -> MaterialPrice {
    MaterialPrice {
        id: row.0,
        material_id: row.1,
        project_id: row.2,
        unit_price: row.3,
        effective_from: row.4,
        active: row.5,
        created_at: row.6,
    }
}

const PRICE_COLUMNS: &str =
    "id, material_id, project_id, unit_price, effective_from, active, created_at";

pub async fn add_material_price(
    pool: &PgPool,
    material_id: Uuid,
    price: &NewMaterialPrice,
) -> Result<MaterialPrice, StorageError> {
    let sql = format!(
        "INSERT INTO material_prices (material_id, project_id, unit_price, effective_from)
         VALUES ($1, $2, $3, $4)
         RETURNING {PRICE_COLUMNS}"
    );

    let row: PriceRow = query_as(&sql)
        .bind(material_id)
        .bind(price.project_id)
        .bind(price.unit_price)
        .bind(price.effective_from)
        .fetch_one(pool)
        .await
        .map_err(|e| map_write_error(e, "MaterialPrice", &material_id.to_string()))?;

    Ok(price_from_row(row))
}

pub async fn list_material_prices(
    pool: &PgPool,
    material_id: Uuid,
) -> Result<Vec<MaterialPrice>, StorageError> {
    let sql = format!(
        "SELECT {PRICE_COLUMNS} FROM material_prices
         WHERE material_id = $1
         ORDER BY effective_from DESC"
    );

    let rows: Vec<PriceRow> = query_as(&sql)
        .bind(material_id)
        .fetch_all(pool)
        .await
        .map_err(|e| map_read_error(e, "MaterialPrice"))?;

    Ok(rows.into_iter().map(price_from_row).collect())
}

pub async fn deactivate_material_price(pool: &PgPool, price_id: Uuid) -> Result<(), StorageError> {
    // Idempotent: deactivating an inactive or missing price is a no-op.
    query("UPDATE material_prices SET active = FALSE WHERE id = $1")
        .bind(price_id)
        .execute(pool)
        .await
        .map_err(|e| StorageError::internal(format!("Failed to deactivate price: {e}")))?;

    Ok(())
}

type ProjectRow = (
    Uuid,
    String,
    String,
    String,
    NaiveDate,
    Option<NaiveDate>,
    bool,
    DateTime<Utc>,
    DateTime<Utc>,
);

fn project_from_row(row: ProjectRow) -> Project {
    Project {
        id: row.0,
        code: row.1,
        name: row.2,
        client_name: row.3,
        start_date: row.4,
        end_date: row.5,
        active: row.6,
        created_at: row.7,
        updated_at: row.8,
    }
}

const PROJECT_COLUMNS: &str =
    "id, code, name, client_name, start_date, end_date, active, created_at, updated_at";

pub async fn create_project(pool: &PgPool, project: &NewProject) -> Result<Project, StorageError> {
    let sql = format!(
        "INSERT INTO projects (code, name, client_name, start_date, end_date)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING {PROJECT_COLUMNS}"
    );

    let row: ProjectRow = query_as(&sql)
        .bind(&project.code)
        .bind(&project.name)
        .bind(&project.client_name)
        .bind(project.start_date)
        .bind(project.end_date)
        .fetch_one(pool)
        .await
        .map_err(|e| map_write_error(e, "Project", &project.code))?;

    Ok(project_from_row(row))
}

pub async fn get_project(pool: &PgPool, id: Uuid) -> Result<Option<Project>, StorageError> {
    let sql = format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1");

    let row: Option<ProjectRow> = query_as(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| map_read_error(e, "Project"))?;

    Ok(row.map(project_from_row))
}

pub async fn list_projects(pool: &PgPool, active_only: bool) -> Result<Vec<Project>, StorageError> {
    let sql = format!(
        "SELECT {PROJECT_COLUMNS} FROM projects
         WHERE ($1 = FALSE OR active)
         ORDER BY code"
    );

    let rows: Vec<ProjectRow> = query_as(&sql)
        .bind(active_only)
        .fetch_all(pool)
        .await
        .map_err(|e| map_read_error(e, "Project"))?;

    Ok(rows.into_iter().map(project_from_row).collect())
}

pub async fn update_project(
    pool: &PgPool,
    id: Uuid,
    project: &NewProject,
    active: bool,
) -> Result<Project, StorageError> {
    let sql = format!(
        "UPDATE projects
         SET code = $1, name = $2, client_name = $3, start_date = $4, end_date = $5, active = $6
         WHERE id = $7
         RETURNING {PROJECT_COLUMNS}"
    );

    let row: Option<ProjectRow> = query_as(&sql)
        .bind(&project.code)
        .bind(&project.name)
        .bind(&project.client_name)
        .bind(project.start_date)
        .bind(project.end_date)
        .bind(active)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| map_write_error(e, "Project", &project.code))?;

    row.map(project_from_row)
        .ok_or_else(|| StorageError::not_found("Project", id.to_string()))
}

pub async fn delete_project(pool: &PgPool, id: Uuid) -> Result<(), StorageError> {
    let result = query("DELETE FROM projects WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                StorageError::in_use("Project", id.to_string(), "existing trips or prices")
            } else {
                StorageError::internal(format!("Failed to delete project: {e}"))
            }
        })?;

    if result.rows_affected() == 0 {
        return Err(StorageError::not_found("Project", id.to_string()));
    }

    Ok(())
}

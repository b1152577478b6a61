use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;

use flotilla_core::{Material, MaterialPrice, NewMaterial, NewMaterialPrice, parse_id};
use flotilla_storage::CatalogStore;

use super::ListQuery;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateMaterial {
    #[serde(flatten)]
    material: NewMaterial,
    #[serde(default = "super::default_true")]
    active: bool,
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Material>>, ApiError> {
    Ok(Json(state.storage.list_materials(query.active_only).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<NewMaterial>,
) -> Result<(StatusCode, Json<Material>), ApiError> {
    let material = payload.validate()?;
    let created = state.storage.create_material(&material).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Material>, ApiError> {
    let id = parse_id(&id)?;
    state
        .storage
        .get_material(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("material not found: {id}")))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateMaterial>,
) -> Result<Json<Material>, ApiError> {
    let id = parse_id(&id)?;
    let material = payload.material.validate()?;
    let updated = state
        .storage
        .update_material(id, &material, payload.active)
        .await?;
    Ok(Json(updated))
}

/// Deleting a material still carrying active prices answers 409.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    state.storage.delete_material(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_price(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<NewMaterialPrice>,
) -> Result<(StatusCode, Json<MaterialPrice>), ApiError> {
    let material_id = parse_id(&id)?;
    let price = payload.validate()?;
    let created = state.storage.add_material_price(material_id, &price).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_prices(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<MaterialPrice>>, ApiError> {
    let material_id = parse_id(&id)?;
    Ok(Json(state.storage.list_material_prices(material_id).await?))
}

/// Prices are never removed, only deactivated.
pub async fn deactivate_price(
    State(state): State<AppState>,
    Path((_id, price_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let price_id = parse_id(&price_id)?;
    state.storage.deactivate_material_price(price_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

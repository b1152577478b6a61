use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;

use flotilla_core::{NewVehicle, Vehicle, parse_id};
use flotilla_storage::FleetStore;

use super::ListQuery;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateVehicle {
    #[serde(flatten)]
    vehicle: NewVehicle,
    #[serde(default = "super::default_true")]
    active: bool,
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Vehicle>>, ApiError> {
    Ok(Json(state.storage.list_vehicles(query.active_only).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<NewVehicle>,
) -> Result<(StatusCode, Json<Vehicle>), ApiError> {
    let vehicle = payload.validate()?;
    let created = state.storage.create_vehicle(&vehicle).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vehicle>, ApiError> {
    let id = parse_id(&id)?;
    state
        .storage
        .get_vehicle(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("vehicle not found: {id}")))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateVehicle>,
) -> Result<Json<Vehicle>, ApiError> {
    let id = parse_id(&id)?;
    let vehicle = payload.vehicle.validate()?;
    let updated = state
        .storage
        .update_vehicle(id, &vehicle, payload.active)
        .await?;
    Ok(Json(updated))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    state.storage.delete_vehicle(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

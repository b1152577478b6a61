use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;

use flotilla_core::{Driver, NewDriver, parse_id};
use flotilla_storage::FleetStore;

use super::ListQuery;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateDriver {
    #[serde(flatten)]
    driver: NewDriver,
    #[serde(default = "super::default_true")]
    active: bool,
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Driver>>, ApiError> {
    Ok(Json(state.storage.list_drivers(query.active_only).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<NewDriver>,
) -> Result<(StatusCode, Json<Driver>), ApiError> {
    let driver = payload.validate()?;
    let created = state.storage.create_driver(&driver).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Driver>, ApiError> {
    let id = parse_id(&id)?;
    state
        .storage
        .get_driver(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("driver not found: {id}")))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateDriver>,
) -> Result<Json<Driver>, ApiError> {
    let id = parse_id(&id)?;
    let driver = payload.driver.validate()?;
    let updated = state
        .storage
        .update_driver(id, &driver, payload.active)
        .await?;
    Ok(Json(updated))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    state.storage.delete_driver(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

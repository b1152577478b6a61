use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use flotilla_core::{FuelPurchase, NewFuelPurchase, parse_id};
use flotilla_storage::FuelStore;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct FuelQuery {
    #[serde(default)]
    pub vehicle_id: Option<Uuid>,
    #[serde(default)]
    pub from: Option<NaiveDate>,
    #[serde(default)]
    pub to: Option<NaiveDate>,
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<FuelQuery>,
) -> Result<Json<Vec<FuelPurchase>>, ApiError> {
    let purchases = state
        .storage
        .list_fuel_purchases(query.vehicle_id, query.from, query.to)
        .await?;
    Ok(Json(purchases))
}

pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<NewFuelPurchase>,
) -> Result<(StatusCode, Json<FuelPurchase>), ApiError> {
    let purchase = payload.validate()?;
    let created = state.storage.create_fuel_purchase(&purchase).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<FuelPurchase>, ApiError> {
    let id = parse_id(&id)?;
    state
        .storage
        .get_fuel_purchase(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("fuel purchase not found: {id}")))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    state.storage.delete_fuel_purchase(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

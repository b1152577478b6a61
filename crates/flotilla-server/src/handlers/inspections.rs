use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use flotilla_core::{Inspection, NewInspection, parse_id};
use flotilla_storage::InspectionStore;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct InspectionQuery {
    #[serde(default)]
    pub vehicle_id: Option<Uuid>,
    #[serde(default)]
    pub from: Option<NaiveDate>,
    #[serde(default)]
    pub to: Option<NaiveDate>,
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<InspectionQuery>,
) -> Result<Json<Vec<Inspection>>, ApiError> {
    let inspections = state
        .storage
        .list_inspections(query.vehicle_id, query.from, query.to)
        .await?;
    Ok(Json(inspections))
}

pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<NewInspection>,
) -> Result<(StatusCode, Json<Inspection>), ApiError> {
    let inspection = payload.validate()?;
    let created = state.storage.create_inspection(&inspection).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Inspection>, ApiError> {
    let id = parse_id(&id)?;
    state
        .storage
        .get_inspection(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("inspection not found: {id}")))
}

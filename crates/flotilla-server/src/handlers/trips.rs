use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use flotilla_core::{NewTrip, Trip, parse_id};
use flotilla_storage::{Page, TripFilter, TripStore};

use super::Pagination;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TripQuery {
    #[serde(default)]
    pub from: Option<NaiveDate>,
    #[serde(default)]
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub project_id: Option<Uuid>,
    #[serde(default)]
    pub vehicle_id: Option<Uuid>,
    #[serde(flatten)]
    pub pagination: Pagination,
}

impl TripQuery {
    fn filter(&self) -> TripFilter {
        TripFilter {
            from: self.from,
            to: self.to,
            project_id: self.project_id,
            vehicle_id: self.vehicle_id,
        }
    }
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<TripQuery>,
) -> Result<Json<Page<Trip>>, ApiError> {
    let page = state
        .storage
        .list_trips(&query.filter(), query.pagination.request())
        .await?;
    Ok(Json(page))
}

pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<NewTrip>,
) -> Result<(StatusCode, Json<Trip>), ApiError> {
    let trip = payload.validate()?;
    let created = state.storage.create_trip(&trip).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Trip>, ApiError> {
    let id = parse_id(&id)?;
    state
        .storage
        .get_trip(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("trip not found: {id}")))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<NewTrip>,
) -> Result<Json<Trip>, ApiError> {
    let id = parse_id(&id)?;
    let trip = payload.validate()?;
    Ok(Json(state.storage.update_trip(id, &trip).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    state.storage.delete_trip(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

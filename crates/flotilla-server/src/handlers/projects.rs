use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;

use flotilla_core::{NewProject, Project, parse_id};
use flotilla_storage::CatalogStore;

use super::ListQuery;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateProject {
    #[serde(flatten)]
    project: NewProject,
    #[serde(default = "super::default_true")]
    active: bool,
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Project>>, ApiError> {
    Ok(Json(state.storage.list_projects(query.active_only).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<NewProject>,
) -> Result<(StatusCode, Json<Project>), ApiError> {
    let project = payload.validate()?;
    let created = state.storage.create_project(&project).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Project>, ApiError> {
    let id = parse_id(&id)?;
    state
        .storage
        .get_project(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("project not found: {id}")))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateProject>,
) -> Result<Json<Project>, ApiError> {
    let id = parse_id(&id)?;
    let project = payload.project.validate()?;
    let updated = state
        .storage
        .update_project(id, &project, payload.active)
        .await?;
    Ok(Json(updated))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    state.storage.delete_project(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::NaiveDate;
use serde::Deserialize;

use flotilla_core::{AccountPayable, NewAccountPayable, PayableSource, parse_id};
use flotilla_storage::{Page, PayableFilter, PayableStore};

use super::Pagination;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PayableQuery {
    #[serde(default)]
    pub source: Option<PayableSource>,
    #[serde(default)]
    pub overdue_as_of: Option<NaiveDate>,
    #[serde(default)]
    pub provider_identification: Option<String>,
    #[serde(flatten)]
    pub pagination: Pagination,
}

impl PayableQuery {
    fn filter(&self) -> PayableFilter {
        PayableFilter {
            source: self.source,
            overdue_as_of: self.overdue_as_of,
            provider_identification: self.provider_identification.clone(),
        }
    }
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<PayableQuery>,
) -> Result<Json<Page<AccountPayable>>, ApiError> {
    let page = state
        .storage
        .list_payables(&query.filter(), query.pagination.request())
        .await?;
    Ok(Json(page))
}

/// Manual payables are upserted on `(document_prefix, document_number)`.
pub async fn upsert(
    State(state): State<AppState>,
    Json(payload): Json<NewAccountPayable>,
) -> Result<(StatusCode, Json<AccountPayable>), ApiError> {
    let payable = payload.validate()?;
    let saved = state.storage.upsert_payable(&payable, None).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AccountPayable>, ApiError> {
    let id = parse_id(&id)?;
    state
        .storage
        .get_payable(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("payable not found: {id}")))
}

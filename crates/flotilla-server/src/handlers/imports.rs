//! Siigo payables import endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde_json::json;

use flotilla_core::{ImportRequest, parse_id};
use flotilla_siigo::PayablesImporter;
use flotilla_storage::PayableStore;

use crate::error::ApiError;
use crate::state::AppState;

/// Kicks off an import on a background task and answers 202 with the
/// request id. Progress is polled through [`get`].
pub async fn start(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let Some(client) = state.siigo.clone() else {
        return Err(ApiError::unavailable("Siigo integration is not configured"));
    };

    let request = state.storage.create_import_request().await?;
    let request_id = request.id;

    let mut importer = PayablesImporter::new(client, state.storage.clone());
    if let Some((service, recipient)) = state.notifier.clone() {
        importer = importer.with_notifier(service, recipient);
    }

    tokio::spawn(async move {
        if let Err(err) = importer.run_for(request).await {
            tracing::error!(request_id = %request_id, error = %err, "payables import failed");
        }
    });

    Ok((
        StatusCode::ACCEPTED,
        Json(json!({ "id": request_id, "status": "running" })),
    ))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ImportRequest>, ApiError> {
    let id = parse_id(&id)?;
    state
        .storage
        .get_import_request(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("import request not found: {id}")))
}

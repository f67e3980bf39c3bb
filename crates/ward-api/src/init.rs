//! Handler for `POST /initialize`.

use std::sync::Arc;

use axum::{Json, extract::State};
use serde_json::{Value, json};
use ward_core::store::IncidentStore;

use crate::error::ApiError;

/// `POST /initialize` — create tables and seed statuses. Safe to repeat.
pub async fn handler<S>(State(store): State<Arc<S>>) -> Result<Json<Value>, ApiError>
where
  S: IncidentStore,
{
  store.initialize().await.map_err(ApiError::store)?;
  tracing::info!("database initialized");
  Ok(Json(json!({ "success": true, "message": "database initialized" })))
}

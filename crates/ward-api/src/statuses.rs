//! Handlers for `/statuses` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/statuses` | All statuses, by id |
//! | `POST`   | `/statuses` | Body: `{"name":"..."}`; 201 |
//! | `GET`    | `/statuses/:id` | 404 if not found |
//! | `PUT`    | `/statuses/:id` | Body: `{"name":"..."}`; 404 if not found |
//! | `DELETE` | `/statuses/:id` | 404 if not found; 500 while still referenced |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use serde_json::{Value, json};
use ward_core::{status::Status, store::IncidentStore};

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct StatusBody {
  pub name: String,
}

fn not_found(id: i64) -> ApiError { ApiError::NotFound(format!("status {id} not found")) }

/// `GET /statuses`
pub async fn list<S>(State(store): State<Arc<S>>) -> Result<Json<Vec<Status>>, ApiError>
where
  S: IncidentStore,
{
  let statuses = store.list_statuses().await.map_err(ApiError::store)?;
  Ok(Json(statuses))
}

/// `GET /statuses/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Status>, ApiError>
where
  S: IncidentStore,
{
  let status = store
    .get_status(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| not_found(id))?;
  Ok(Json(status))
}

/// `POST /statuses` — returns 201 + `{"success":true,"status":{...}}`.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<StatusBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: IncidentStore,
{
  let status = store.create_status(body.name).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(json!({ "success": true, "status": status }))))
}

/// `PUT /statuses/:id`
pub async fn rename<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  Json(body): Json<StatusBody>,
) -> Result<Json<Value>, ApiError>
where
  S: IncidentStore,
{
  let status = store
    .rename_status(id, body.name)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| not_found(id))?;
  Ok(Json(json!({ "success": true, "status": status })))
}

/// `DELETE /statuses/:id`
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError>
where
  S: IncidentStore,
{
  if !store.delete_status(id).await.map_err(ApiError::store)? {
    return Err(not_found(id));
  }
  Ok(Json(json!({ "success": true })))
}

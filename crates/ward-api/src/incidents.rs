//! Handlers for `/incidents` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/incidents` | Optional `?subject=` substring filter, case-insensitive |
//! | `POST`   | `/incidents` | Body: [`NewIncident`]; 201 |
//! | `GET`    | `/incidents/:id` | Incident plus `updates`; 404 if not found |
//! | `DELETE` | `/incidents/:id` | Cascades to updates; 404 if not found |
//! | `GET`    | `/incidents/:id/updates` | Updates in creation order |
//! | `POST`   | `/incidents/:id/updates` | Body: `{"updateContent":"..."}`; 201 |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use serde_json::{Value, json};
use ward_core::{
  incident::{Incident, IncidentDetail, IncidentUpdate, NewIncident},
  store::IncidentStore,
};

use crate::error::ApiError;

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub subject: Option<String>,
}

/// `GET /incidents[?subject=<text>]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Incident>>, ApiError>
where
  S: IncidentStore,
{
  // An empty filter matches everything, same as no filter.
  let subject = params.subject.filter(|s| !s.is_empty());
  let incidents = store.list_incidents(subject).await.map_err(ApiError::store)?;
  Ok(Json(incidents))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /incidents` — returns 201 + `{"success":true,"incident":{...}}`.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewIncident>,
) -> Result<impl IntoResponse, ApiError>
where
  S: IncidentStore,
{
  let incident = store.create_incident(body).await.map_err(ApiError::store)?;
  tracing::info!(id = incident.id, user_id = %incident.user_id, "incident created");
  Ok((StatusCode::CREATED, Json(json!({ "success": true, "incident": incident }))))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /incidents/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<IncidentDetail>, ApiError>
where
  S: IncidentStore,
{
  let detail = store
    .get_incident(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("incident {id} not found")))?;
  Ok(Json(detail))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /incidents/:id`
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError>
where
  S: IncidentStore,
{
  if !store.delete_incident(id).await.map_err(ApiError::store)? {
    return Err(ApiError::NotFound(format!("incident {id} not found")));
  }
  tracing::info!(id, "incident deleted");
  Ok(Json(json!({ "success": true })))
}

// ─── Updates ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBody {
  pub update_content: String,
}

/// `POST /incidents/:id/updates` — returns 201 + `{"success":true,"update":{...}}`.
///
/// The incident is not looked up first; a missing one fails in the store.
pub async fn add_update<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  Json(body): Json<UpdateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: IncidentStore,
{
  let update = store
    .add_update(id, body.update_content)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(json!({ "success": true, "update": update }))))
}

/// `GET /incidents/:id/updates`
pub async fn list_updates<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Vec<IncidentUpdate>>, ApiError>
where
  S: IncidentStore,
{
  let updates = store.list_updates(id).await.map_err(ApiError::store)?;
  Ok(Json(updates))
}

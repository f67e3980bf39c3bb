//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every error renders as `{"success": false, "message": "..."}`.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  NotFound(String),

  #[error("invalid credentials")]
  Unauthorized,

  #[error("{0}")]
  Conflict(String),

  #[error("password hashing failed: {0}")]
  Hash(String),

  /// Backend failure; the message is passed through verbatim.
  #[error("{0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    ApiError::Store(Box::new(e))
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = match &self {
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
      ApiError::Conflict(_) => StatusCode::CONFLICT,
      ApiError::Hash(_) | ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
      tracing::error!(error = %self, "request failed");
    }
    let body = json!({ "success": false, "message": self.to_string() });
    (status, Json(body)).into_response()
  }
}

//! Registration and login, plus the argon2 helpers behind them.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/register` | Body: [`RegisterBody`]; 201, 409 on duplicate `userId` |
//! | `POST` | `/login` | Body: [`LoginBody`]; 401 on bad credentials |
//!
//! Neither endpoint issues a session; the caller gets the public user record.

use std::sync::Arc;

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use rand_core::OsRng;
use serde::Deserialize;
use serde_json::json;
use ward_core::{
  store::IncidentStore,
  user::{NewUser, PublicUser},
};

use crate::error::ApiError;

// ─── Hashing ──────────────────────────────────────────────────────────────────

/// Hash `password` into an argon2 PHC string with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|h| h.to_string())
    .map_err(|e| ApiError::Hash(e.to_string()))
}

/// Check `password` against a stored PHC string. A malformed hash never
/// verifies.
pub fn verify_password(password: &str, phc: &str) -> bool {
  let Ok(parsed) = PasswordHash::new(phc) else {
    return false;
  };
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed)
    .is_ok()
}

/// Run a hashing closure off the async runtime.
async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
  F: FnOnce() -> Result<T, ApiError> + Send + 'static,
  T: Send + 'static,
{
  tokio::task::spawn_blocking(f)
    .await
    .map_err(|e| ApiError::Hash(e.to_string()))?
}

// ─── Register ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterBody {
  pub user_id:  String,
  pub username: String,
  pub password: String,
}

/// `POST /register` — returns 201 + `{"success":true,"user":{...}}`.
pub async fn register<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<RegisterBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: IncidentStore,
{
  let password = body.password;
  let password_hash = blocking(move || hash_password(&password)).await?;

  let user = store
    .create_user(NewUser {
      user_id: body.user_id.clone(),
      username: body.username,
      password_hash,
    })
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| {
      tracing::warn!(user_id = %body.user_id, "registration for existing user");
      ApiError::Conflict(format!("user {} already exists", body.user_id))
    })?;

  tracing::info!(user_id = %user.user_id, "user registered");
  Ok((
    StatusCode::CREATED,
    Json(json!({ "success": true, "user": PublicUser::from(user) })),
  ))
}

// ─── Login ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginBody {
  pub user_id:  String,
  pub password: String,
}

/// `POST /login` — returns `{"success":true,"user":{...}}` or 401.
pub async fn login<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<LoginBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: IncidentStore,
{
  let Some(user) = store
    .get_user(&body.user_id)
    .await
    .map_err(ApiError::store)?
  else {
    tracing::warn!(user_id = %body.user_id, "login for unknown user");
    return Err(ApiError::Unauthorized);
  };

  let password = body.password;
  let phc = user.password_hash.clone();
  let verified = blocking(move || Ok(verify_password(&password, &phc))).await?;
  if !verified {
    tracing::warn!(user_id = %user.user_id, "login with wrong password");
    return Err(ApiError::Unauthorized);
  }

  Ok(Json(json!({ "success": true, "user": PublicUser::from(user) })))
}

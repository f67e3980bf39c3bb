//! HTTP server assembly for Ward: configuration plus the middleware stack
//! wrapped around [`ward_api::api_router`].

use std::{path::PathBuf, sync::Arc};

use axum::Router;
use serde::Deserialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use ward_core::store::IncidentStore;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `WARD_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                String,
  #[serde(default = "default_port")]
  pub port:                u16,
  /// SQLite database file; `:memory:` keeps everything in process.
  #[serde(default = "default_database_path")]
  pub database_path:       PathBuf,
  /// Run the schema initializer before accepting requests.
  #[serde(default = "default_true")]
  pub initialize_on_start: bool,
  /// Allow cross-origin requests from any origin.
  #[serde(default = "default_true")]
  pub cors_permissive:     bool,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 3000 }

fn default_database_path() -> PathBuf { PathBuf::from("ward.db") }

fn default_true() -> bool { true }

impl Default for ServerConfig {
  fn default() -> Self {
    ServerConfig {
      host:                default_host(),
      port:                default_port(),
      database_path:       default_database_path(),
      initialize_on_start: true,
      cors_permissive:     true,
    }
  }
}

impl ServerConfig {
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application: API routes, request tracing and, if
/// configured, a permissive CORS layer.
pub fn app<S>(store: Arc<S>, config: &ServerConfig) -> Router
where
  S: IncidentStore + 'static,
{
  let router = ward_api::api_router(store).layer(TraceLayer::new_for_http());
  if config.cors_permissive {
    router.layer(CorsLayer::permissive())
  } else {
    router
  }
}

//! ward-server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) plus `WARD_*`
//! environment variables, opens the SQLite store and serves the JSON API.
//!
//! ```
//! WARD_PORT=8080 cargo run -p ward-server -- --config ward.toml
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use ward_core::store::IncidentStore as _;
use ward_server::ServerConfig;
use ward_store_sqlite::SqliteStore;

#[derive(Parser)]
#[command(author, version, about = "Ward incident-tracking server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("WARD"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let db_path = expand_tilde(&server_cfg.database_path);

  let store = SqliteStore::open(&db_path)
    .await
    .with_context(|| format!("failed to open database at {db_path:?}"))?;

  if server_cfg.initialize_on_start {
    store
      .initialize()
      .await
      .context("failed to initialize database")?;
    tracing::info!(path = ?db_path, "database initialized");
  }

  let app = ward_server::app(Arc::new(store), &server_cfg);
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

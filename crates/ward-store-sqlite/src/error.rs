//! Error type for `ward-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Driver failures, including unique and foreign-key violations. The
  /// message is the driver's own.
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

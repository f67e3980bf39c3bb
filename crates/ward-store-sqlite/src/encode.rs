//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings (microsecond
//! precision, `Z` suffix) so that text ordering matches time ordering.
//! Calendar dates are stored as `YYYY-MM-DD`.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use ward_core::{
  incident::{Incident, IncidentUpdate},
  user::User,
};

use crate::{Error, Result};

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ────────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Text matching ────────────────────────────────────────────────────────────

/// Name of the SQL function backed by [`contains_ignore_case`].
pub const CONTAINS_FN: &str = "ward_contains";

/// Whether `haystack` contains `needle`, ignoring case across all of
/// Unicode. Wildcard characters have no special meaning.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
  haystack.to_lowercase().contains(&needle.to_lowercase())
}

// ─── Raw rows ─────────────────────────────────────────────────────────────────

/// Column list matching [`RawUser::from_row`].
pub const USER_COLUMNS: &str = "id, user_id, username, password_hash, created_at";

pub struct RawUser {
  pub id:            i64,
  pub user_id:       String,
  pub username:      String,
  pub password_hash: String,
  pub created_at:    String,
}

impl RawUser {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(RawUser {
      id:            row.get(0)?,
      user_id:       row.get(1)?,
      username:      row.get(2)?,
      password_hash: row.get(3)?,
      created_at:    row.get(4)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      id:            self.id,
      user_id:       self.user_id,
      username:      self.username,
      password_hash: self.password_hash,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

/// `SELECT` prefix matching [`RawIncident::from_row`]; the status name is
/// joined in.
pub const INCIDENT_SELECT: &str = "
  SELECT i.id, i.user_id, i.subject, i.occurrence_date, i.content,
         i.threat_type, i.status_id, s.name, i.created_at, i.updated_at
  FROM incidents i
  LEFT JOIN statuses s ON s.id = i.status_id";

pub struct RawIncident {
  pub id:              i64,
  pub user_id:         String,
  pub subject:         String,
  pub occurrence_date: String,
  pub content:         String,
  pub threat_type:     String,
  pub status_id:       i64,
  pub status_name:     Option<String>,
  pub created_at:      String,
  pub updated_at:      String,
}

impl RawIncident {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(RawIncident {
      id:              row.get(0)?,
      user_id:         row.get(1)?,
      subject:         row.get(2)?,
      occurrence_date: row.get(3)?,
      content:         row.get(4)?,
      threat_type:     row.get(5)?,
      status_id:       row.get(6)?,
      status_name:     row.get(7)?,
      created_at:      row.get(8)?,
      updated_at:      row.get(9)?,
    })
  }

  pub fn into_incident(self) -> Result<Incident> {
    Ok(Incident {
      id:              self.id,
      user_id:         self.user_id,
      subject:         self.subject,
      occurrence_date: decode_date(&self.occurrence_date)?,
      content:         self.content,
      threat_type:     self.threat_type,
      status_id:       self.status_id,
      status_name:     self.status_name,
      created_at:      decode_dt(&self.created_at)?,
      updated_at:      decode_dt(&self.updated_at)?,
    })
  }
}

/// Column list matching [`RawUpdate::from_row`].
pub const UPDATE_COLUMNS: &str = "id, incident_id, update_content, created_at";

pub struct RawUpdate {
  pub id:             i64,
  pub incident_id:    i64,
  pub update_content: String,
  pub created_at:     String,
}

impl RawUpdate {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(RawUpdate {
      id:             row.get(0)?,
      incident_id:    row.get(1)?,
      update_content: row.get(2)?,
      created_at:     row.get(3)?,
    })
  }

  pub fn into_update(self) -> Result<IncidentUpdate> {
    Ok(IncidentUpdate {
      id:             self.id,
      incident_id:    self.incident_id,
      update_content: self.update_content,
      created_at:     decode_dt(&self.created_at)?,
    })
  }
}

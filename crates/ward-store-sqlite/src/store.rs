//! [`SqliteStore`] — the SQLite implementation of [`IncidentStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::{OptionalExtension as _, functions::FunctionFlags};
use ward_core::{
  incident::{Incident, IncidentDetail, IncidentUpdate, NewIncident},
  status::{DEFAULT_STATUSES, Status},
  store::IncidentStore,
  user::{NewUser, User},
};

use crate::{
  Result,
  encode::{
    INCIDENT_SELECT, RawIncident, RawUpdate, RawUser, UPDATE_COLUMNS, USER_COLUMNS,
    CONTAINS_FN, contains_ignore_case, encode_date, encode_dt,
  },
  schema::{CONNECTION_PRAGMAS, SCHEMA, SEED_STATUS},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Ward incident store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. Opening a
/// store does not create any tables; call [`IncidentStore::initialize`].
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a database file at `path`.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.prepare_connection().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.prepare_connection().await?;
    Ok(store)
  }

  /// Apply pragmas and register the SQL functions queries rely on.
  async fn prepare_connection(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(CONNECTION_PRAGMAS)?;
        conn.create_scalar_function(
          CONTAINS_FN,
          2,
          FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
          |ctx| {
            let haystack: String = ctx.get(0)?;
            let needle: String = ctx.get(1)?;
            Ok(contains_ignore_case(&haystack, &needle))
          },
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── IncidentStore impl ──────────────────────────────────────────────────────

impl IncidentStore for SqliteStore {
  type Error = crate::Error;

  async fn initialize(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        let mut stmt = conn.prepare(SEED_STATUS)?;
        for name in DEFAULT_STATUSES {
          stmt.execute(rusqlite::params![name])?;
        }
        Ok(())
      })
      .await?;
    tracing::debug!("schema created and statuses seeded");
    Ok(())
  }

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn create_user(&self, input: NewUser) -> Result<Option<User>> {
    let at_str = encode_dt(Utc::now());

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        let inserted = conn.execute(
          "INSERT INTO users (user_id, username, password_hash, created_at)
           VALUES (?1, ?2, ?3, ?4)
           ON CONFLICT(user_id) DO NOTHING",
          rusqlite::params![input.user_id, input.username, input.password_hash, at_str],
        )?;
        if inserted == 0 {
          return Ok(None);
        }
        let raw = conn.query_row(
          &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
          rusqlite::params![conn.last_insert_rowid()],
          RawUser::from_row,
        )?;
        Ok(Some(raw))
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn get_user<'a>(&'a self, user_id: &'a str) -> Result<Option<User>> {
    let user_id = user_id.to_owned();

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = ?1"),
            rusqlite::params![user_id],
            RawUser::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  // ── Statuses ──────────────────────────────────────────────────────────────

  async fn list_statuses(&self) -> Result<Vec<Status>> {
    let statuses = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare("SELECT id, name FROM statuses ORDER BY id")?;
        let rows = stmt
          .query_map([], |row| Ok(Status { id: row.get(0)?, name: row.get(1)? }))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(statuses)
  }

  async fn get_status(&self, id: i64) -> Result<Option<Status>> {
    let status = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT id, name FROM statuses WHERE id = ?1",
            rusqlite::params![id],
            |row| Ok(Status { id: row.get(0)?, name: row.get(1)? }),
          )
          .optional()?)
      })
      .await?;
    Ok(status)
  }

  async fn create_status(&self, name: String) -> Result<Status> {
    let status = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "INSERT INTO statuses (name) VALUES (?1) RETURNING id, name",
          rusqlite::params![name],
          |row| Ok(Status { id: row.get(0)?, name: row.get(1)? }),
        )?)
      })
      .await?;
    Ok(status)
  }

  async fn rename_status(&self, id: i64, name: String) -> Result<Option<Status>> {
    let status = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "UPDATE statuses SET name = ?1 WHERE id = ?2 RETURNING id, name",
            rusqlite::params![name, id],
            |row| Ok(Status { id: row.get(0)?, name: row.get(1)? }),
          )
          .optional()?)
      })
      .await?;
    Ok(status)
  }

  async fn delete_status(&self, id: i64) -> Result<bool> {
    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM statuses WHERE id = ?1", rusqlite::params![id])?)
      })
      .await?;
    Ok(removed > 0)
  }

  // ── Incidents ─────────────────────────────────────────────────────────────

  async fn create_incident(&self, input: NewIncident) -> Result<Incident> {
    let date_str = encode_date(input.occurrence_date);
    let at_str   = encode_dt(Utc::now());

    let raw: RawIncident = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO incidents (
             user_id, subject, occurrence_date, content, threat_type,
             status_id, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
          rusqlite::params![
            input.user_id,
            input.subject,
            date_str,
            input.content,
            input.threat_type,
            input.status_id,
            at_str,
          ],
        )?;
        let raw = conn.query_row(
          &format!("{INCIDENT_SELECT} WHERE i.id = ?1"),
          rusqlite::params![conn.last_insert_rowid()],
          RawIncident::from_row,
        )?;
        Ok(raw)
      })
      .await?;

    raw.into_incident()
  }

  async fn list_incidents(&self, subject: Option<String>) -> Result<Vec<Incident>> {
    let raws: Vec<RawIncident> = self
      .conn
      .call(move |conn| {
        let where_clause = if subject.is_some() {
          format!("WHERE {CONTAINS_FN}(i.subject, ?1)")
        } else {
          String::new()
        };
        // Row ids follow insertion order; the wall clock may not.
        let sql = format!("{INCIDENT_SELECT} {where_clause} ORDER BY i.id DESC");

        let mut stmt = conn.prepare(&sql)?;
        let rows = match &subject {
          Some(p) => stmt.query_map(rusqlite::params![p], RawIncident::from_row)?,
          None => stmt.query_map([], RawIncident::from_row)?,
        }
        .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawIncident::into_incident).collect()
  }

  async fn get_incident(&self, id: i64) -> Result<Option<IncidentDetail>> {
    // Two reads without a transaction; a concurrent delete between them
    // yields the incident with no updates.
    let found: Option<(RawIncident, Vec<RawUpdate>)> = self
      .conn
      .call(move |conn| {
        let Some(incident) = conn
          .query_row(
            &format!("{INCIDENT_SELECT} WHERE i.id = ?1"),
            rusqlite::params![id],
            RawIncident::from_row,
          )
          .optional()?
        else {
          return Ok(None);
        };

        let mut stmt = conn.prepare(&format!(
          "SELECT {UPDATE_COLUMNS} FROM incident_updates
           WHERE incident_id = ?1
           ORDER BY id"
        ))?;
        let updates = stmt
          .query_map(rusqlite::params![id], RawUpdate::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(Some((incident, updates)))
      })
      .await?;

    let Some((incident, updates)) = found else {
      return Ok(None);
    };

    Ok(Some(IncidentDetail {
      incident: incident.into_incident()?,
      updates:  updates.into_iter().map(RawUpdate::into_update).collect::<Result<_>>()?,
    }))
  }

  async fn delete_incident(&self, id: i64) -> Result<bool> {
    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM incidents WHERE id = ?1", rusqlite::params![id])?)
      })
      .await?;
    Ok(removed > 0)
  }

  // ── Updates ───────────────────────────────────────────────────────────────

  async fn add_update(&self, incident_id: i64, update_content: String) -> Result<IncidentUpdate> {
    let at_str = encode_dt(Utc::now());

    let raw: RawUpdate = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          &format!(
            "INSERT INTO incident_updates (incident_id, update_content, created_at)
             VALUES (?1, ?2, ?3)
             RETURNING {UPDATE_COLUMNS}"
          ),
          rusqlite::params![incident_id, update_content, at_str],
          RawUpdate::from_row,
        )?)
      })
      .await?;

    raw.into_update()
  }

  async fn list_updates(&self, incident_id: i64) -> Result<Vec<IncidentUpdate>> {
    let raws: Vec<RawUpdate> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {UPDATE_COLUMNS} FROM incident_updates
           WHERE incident_id = ?1
           ORDER BY id"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![incident_id], RawUpdate::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawUpdate::into_update).collect()
  }
}

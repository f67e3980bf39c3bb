//! The `IncidentStore` trait.
//!
//! Implemented by storage backends (e.g. `ward-store-sqlite`). The JSON API
//! depends on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  incident::{Incident, IncidentDetail, IncidentUpdate, NewIncident},
  status::Status,
  user::{NewUser, User},
};

/// Abstraction over a Ward storage backend.
///
/// Every method maps onto one (occasionally two) SQL statements. Lookups that
/// can miss return `Option`; deletes report whether a row was removed.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait IncidentStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Create all tables and seed the default statuses. Idempotent.
  fn initialize(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Insert a user. Returns `Ok(None)` if `user_id` is already taken.
  fn create_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Look up a user by external identifier.
  fn get_user<'a>(
    &'a self,
    user_id: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  // ── Statuses ──────────────────────────────────────────────────────────

  fn list_statuses(&self) -> impl Future<Output = Result<Vec<Status>, Self::Error>> + Send + '_;

  fn get_status(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Status>, Self::Error>> + Send + '_;

  /// Insert a status. Duplicate names fail with the backend's constraint error.
  fn create_status(
    &self,
    name: String,
  ) -> impl Future<Output = Result<Status, Self::Error>> + Send + '_;

  /// Rename a status. Returns `None` if no status has this id.
  fn rename_status(
    &self,
    id: i64,
    name: String,
  ) -> impl Future<Output = Result<Option<Status>, Self::Error>> + Send + '_;

  /// Delete a status. Fails if any incident still references it.
  fn delete_status(&self, id: i64) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Incidents ─────────────────────────────────────────────────────────

  fn create_incident(
    &self,
    input: NewIncident,
  ) -> impl Future<Output = Result<Incident, Self::Error>> + Send + '_;

  /// List incidents, optionally restricted to those whose subject contains
  /// `subject` (case-insensitive).
  fn list_incidents(
    &self,
    subject: Option<String>,
  ) -> impl Future<Output = Result<Vec<Incident>, Self::Error>> + Send + '_;

  /// Fetch an incident and its updates in creation order.
  fn get_incident(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<IncidentDetail>, Self::Error>> + Send + '_;

  /// Delete an incident; its updates go with it.
  fn delete_incident(&self, id: i64) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Updates ───────────────────────────────────────────────────────────

  /// Append an update. A missing incident fails with the backend's
  /// foreign-key error.
  fn add_update(
    &self,
    incident_id: i64,
    update_content: String,
  ) -> impl Future<Output = Result<IncidentUpdate, Self::Error>> + Send + '_;

  fn list_updates(
    &self,
    incident_id: i64,
  ) -> impl Future<Output = Result<Vec<IncidentUpdate>, Self::Error>> + Send + '_;
}

//! Incidents and their append-only updates.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A reported incident as read back from the store.
///
/// `status_name` is joined in from the statuses table at read time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
  pub id:              i64,
  pub user_id:         String,
  pub subject:         String,
  pub occurrence_date: NaiveDate,
  pub content:         String,
  pub threat_type:     String,
  pub status_id:       i64,
  pub status_name:     Option<String>,
  pub created_at:      DateTime<Utc>,
  pub updated_at:      DateTime<Utc>,
}

/// Input to [`IncidentStore::create_incident`](crate::store::IncidentStore::create_incident).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewIncident {
  pub user_id:         String,
  pub subject:         String,
  pub occurrence_date: NaiveDate,
  pub content:         String,
  pub threat_type:     String,
  pub status_id:       i64,
}

/// An immutable note appended to an incident's timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentUpdate {
  pub id:             i64,
  pub incident_id:    i64,
  pub update_content: String,
  pub created_at:     DateTime<Utc>,
}

/// An incident together with its updates in creation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentDetail {
  #[serde(flatten)]
  pub incident: Incident,
  pub updates:  Vec<IncidentUpdate>,
}

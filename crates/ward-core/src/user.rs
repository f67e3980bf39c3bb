//! Users — the owners of incidents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored user, including the argon2 PHC hash of their password.
///
/// Never serialise this directly into a response; convert it into a
/// [`PublicUser`] first.
#[derive(Debug, Clone)]
pub struct User {
  pub id:            i64,
  pub user_id:       String,
  pub username:      String,
  pub password_hash: String,
  pub created_at:    DateTime<Utc>,
}

/// The outward-facing view of a [`User`], without credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
  pub id:         i64,
  pub user_id:    String,
  pub username:   String,
  pub created_at: DateTime<Utc>,
}

impl From<User> for PublicUser {
  fn from(u: User) -> Self {
    PublicUser {
      id:         u.id,
      user_id:    u.user_id,
      username:   u.username,
      created_at: u.created_at,
    }
  }
}

/// Input to [`IncidentStore::create_user`](crate::store::IncidentStore::create_user).
/// The password must already be hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
  pub user_id:       String,
  pub username:      String,
  pub password_hash: String,
}

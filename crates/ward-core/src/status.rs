//! Status — a named lifecycle label applied to incidents.

use serde::{Deserialize, Serialize};

/// Status names seeded by the initializer, in id order.
pub const DEFAULT_STATUSES: [&str; 3] = ["Open", "In Progress", "Closed"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
  pub id:   i64,
  pub name: String,
}

//! SQL schema for the Ward SQLite store.

/// Per-connection settings, applied when a connection is opened.
pub const CONNECTION_PRAGMAS: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;
";

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id       TEXT NOT NULL UNIQUE,
    username      TEXT NOT NULL,
    password_hash TEXT NOT NULL,   -- argon2 PHC string
    created_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS statuses (
    id   INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS incidents (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id         TEXT NOT NULL REFERENCES users(user_id),
    subject         TEXT NOT NULL,
    occurrence_date TEXT NOT NULL,   -- YYYY-MM-DD
    content         TEXT NOT NULL,
    threat_type     TEXT NOT NULL,
    status_id       INTEGER NOT NULL REFERENCES statuses(id),
    created_at      TEXT NOT NULL,
    updated_at      TEXT NOT NULL
);

-- Updates are append-only; they only disappear with their incident.
CREATE TABLE IF NOT EXISTS incident_updates (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    incident_id    INTEGER NOT NULL REFERENCES incidents(id) ON DELETE CASCADE,
    update_content TEXT NOT NULL,
    created_at     TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS incidents_status_idx        ON incidents(status_id);
CREATE INDEX IF NOT EXISTS incidents_user_idx          ON incidents(user_id);
CREATE INDEX IF NOT EXISTS incident_updates_parent_idx ON incident_updates(incident_id);
";

/// Seeds one default status; run once per name in
/// [`DEFAULT_STATUSES`](ward_core::status::DEFAULT_STATUSES).
pub const SEED_STATUS: &str =
  "INSERT INTO statuses (name) VALUES (?1) ON CONFLICT(name) DO NOTHING";

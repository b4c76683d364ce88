//! SQL schema for the case-base SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per persistence slot. The payload is the JSON-encoded case base;
-- every write replaces it whole.
CREATE TABLE IF NOT EXISTS slots (
    slot        TEXT PRIMARY KEY,
    payload     TEXT NOT NULL,
    updated_at  TEXT NOT NULL      -- RFC 3339 UTC
);

PRAGMA user_version = 1;
";

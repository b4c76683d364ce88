//! [`SqliteStore`]: the SQLite implementation of [`CaseStore`].

use std::path::Path;

use cbr_core::store::CaseStore;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension as _};
use tracing::debug;

use crate::{Error, Result, schema::SCHEMA};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A case-base store backed by a single SQLite file.
pub struct SqliteStore {
  conn: Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  /// Missing parent directories are created.
  pub fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
      std::fs::create_dir_all(parent).map_err(|source| Error::CreateDir {
        path: parent.to_path_buf(),
        source,
      })?;
    }

    debug!(path = %path.display(), "opening sqlite store");
    Self::init(Connection::open(path)?)
  }

  /// Open an in-memory store, mostly for tests.
  pub fn open_in_memory() -> Result<Self> {
    Self::init(Connection::open_in_memory()?)
  }

  fn init(conn: Connection) -> Result<Self> {
    conn.execute_batch(SCHEMA)?;
    Ok(Self { conn })
  }

  /// When `slot` was last written, if it exists.
  pub fn updated_at(&self, slot: &str) -> Result<Option<DateTime<Utc>>> {
    let raw: Option<String> = self
      .conn
      .query_row(
        "SELECT updated_at FROM slots WHERE slot = ?1",
        rusqlite::params![slot],
        |row| row.get(0),
      )
      .optional()?;

    raw.as_deref().map(decode_dt).transpose()
  }
}

fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── CaseStore impl ──────────────────────────────────────────────────────────

impl CaseStore for SqliteStore {
  type Error = Error;

  fn read_slot(&self, slot: &str) -> Result<Option<String>> {
    Ok(
      self
        .conn
        .query_row(
          "SELECT payload FROM slots WHERE slot = ?1",
          rusqlite::params![slot],
          |row| row.get(0),
        )
        .optional()?,
    )
  }

  fn write_slot(&self, slot: &str, payload: &str) -> Result<()> {
    self.conn.execute(
      "INSERT INTO slots (slot, payload, updated_at) VALUES (?1, ?2, ?3)
       ON CONFLICT (slot) DO UPDATE
         SET payload = excluded.payload, updated_at = excluded.updated_at",
      rusqlite::params![slot, payload, encode_dt(Utc::now())],
    )?;
    debug!(slot, bytes = payload.len(), "wrote slot");
    Ok(())
  }

  fn clear_slot(&self, slot: &str) -> Result<()> {
    self
      .conn
      .execute("DELETE FROM slots WHERE slot = ?1", rusqlite::params![slot])?;
    Ok(())
  }
}

//! [`SqliteStore`]: the SQLite implementation of [`ContactStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use gestor_core::{
  Contact,
  contact::{decode_collection, encode_collection},
  store::ContactStore,
};
use rusqlite::OptionalExtension as _;
use tracing::debug;

use crate::{
  Result,
  encode::{decode_dt, encode_dt},
  schema::SCHEMA,
};

/// Snapshot key used when the caller does not pick one.
pub const DEFAULT_KEY: &str = "gestor_v3_final_data";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A contact collection kept as one JSON snapshot in a SQLite file.
///
/// Several collections can share a file under different keys. Cloning is
/// cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
  key:              String,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>, key: impl Into<String>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn, key: key.into() };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store.
  pub async fn open_in_memory(key: impl Into<String>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn, key: key.into() };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// The snapshot key this store reads and writes.
  pub fn key(&self) -> &str { &self.key }

  /// When the collection was last saved; `None` if it never was.
  pub async fn saved_at(&self) -> Result<Option<DateTime<Utc>>> {
    let key = self.key.clone();

    let raw: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT saved_at FROM snapshots WHERE key = ?1",
              rusqlite::params![key],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await?;

    raw.as_deref().map(decode_dt).transpose()
  }
}

// ─── ContactStore impl ───────────────────────────────────────────────────────

impl ContactStore for SqliteStore {
  type Error = crate::Error;

  async fn load(&self) -> Result<Vec<Contact>> {
    let key = self.key.clone();

    let raw: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT value_json FROM snapshots WHERE key = ?1",
              rusqlite::params![key],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await?;

    let contacts = match raw {
      Some(json) => decode_collection(&json)?,
      None => Vec::new(),
    };
    debug!(key = %self.key, count = contacts.len(), "loaded contacts");
    Ok(contacts)
  }

  async fn save(&self, contacts: &[Contact]) -> Result<()> {
    let key = self.key.clone();
    let json = encode_collection(contacts)?;
    let saved_at = encode_dt(Utc::now());
    let count = contacts.len();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO snapshots (key, value_json, saved_at) VALUES (?1, ?2, ?3)
           ON CONFLICT(key) DO UPDATE SET
             value_json = excluded.value_json,
             saved_at   = excluded.saved_at",
          rusqlite::params![key, json, saved_at],
        )?;
        Ok(())
      })
      .await?;

    debug!(key = %self.key, count, "saved contacts");
    Ok(())
  }
}

//! SQL schema for the gestor SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per key; the whole collection is a single JSON array.
-- Saving replaces the row, so a reader never sees a half-written collection.
CREATE TABLE IF NOT EXISTS snapshots (
    key         TEXT PRIMARY KEY,
    value_json  TEXT NOT NULL,   -- JSON array of contacts, in display order
    saved_at    TEXT NOT NULL    -- RFC 3339 UTC
);

PRAGMA user_version = 1;
";

//! Encoding helpers between Rust values and the plain-text SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings; the collection itself goes
//! through [`gestor_core::contact::encode_collection`].

use chrono::{DateTime, Utc};

use crate::{Error, Result};

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

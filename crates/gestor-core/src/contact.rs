//! Contact: the reconciled record for one person across import sources.
//!
//! A contact is created by a format parser from one input row or card block,
//! overwritten field-by-field by the merge engine, and otherwise edited only by
//! the surrounding shell.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator, IntoStaticStr};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Status ──────────────────────────────────────────────────────────────────

/// Outreach progress for a contact.
///
/// There is no transition graph: any value may replace any other, either by
/// classification during import or by a direct edit.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
  Serialize,
  Deserialize,
  Display,
  IntoStaticStr,
  EnumIter,
)]
pub enum ContactStatus {
  #[default]
  #[serde(rename = "sin revisar")]
  #[strum(serialize = "sin revisar")]
  Unreviewed,
  #[serde(rename = "jugando")]
  #[strum(serialize = "jugando")]
  Playing,
  #[serde(rename = "contactado")]
  #[strum(serialize = "contactado")]
  Contacted,
  #[serde(rename = "no interesado")]
  #[strum(serialize = "no interesado")]
  NotInterested,
  #[serde(rename = "sin wsp")]
  #[strum(serialize = "sin wsp")]
  NoMessaging,
}

impl ContactStatus {
  /// Every status, in display order.
  pub fn all() -> impl Iterator<Item = Self> { Self::iter() }

  /// The display label, e.g. `no interesado`.
  pub fn label(self) -> &'static str { self.into() }

  /// The upper-snake identifier, e.g. `NOT_INTERESTED`.
  pub fn code(&self) -> &'static str {
    match self {
      Self::Unreviewed => "UNREVIEWED",
      Self::Playing => "PLAYING",
      Self::Contacted => "CONTACTED",
      Self::NotInterested => "NOT_INTERESTED",
      Self::NoMessaging => "NO_MESSAGING",
    }
  }
}

impl FromStr for ContactStatus {
  type Err = Error;

  /// Accepts either the display label (`"no interesado"`) or the code
  /// (`"NOT_INTERESTED"`), case-insensitively.
  fn from_str(s: &str) -> Result<Self> {
    let s = s.trim();
    Self::iter()
      .find(|status| {
        status.label().eq_ignore_ascii_case(s)
          || status.code().eq_ignore_ascii_case(s)
      })
      .ok_or_else(|| Error::UnknownStatus(s.to_string()))
  }
}

// ─── Origin ──────────────────────────────────────────────────────────────────

/// Which source format created the record.
///
/// Descriptive metadata only: merges keep the origin of the record that was
/// already held.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display,
)]
pub enum Origin {
  #[serde(rename = "PLANILLA")]
  #[strum(serialize = "PLANILLA")]
  Tabular,
  #[serde(rename = "PC")]
  #[strum(serialize = "PC")]
  Card,
}

// ─── Contact ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
  /// Assigned once at creation; never replaced by a merge.
  pub id:           Uuid,
  /// Display name and natural deduplication key. Never empty.
  pub name:         String,
  /// Decimal digits only; empty when unknown.
  pub phone:        String,
  pub origin:       Origin,
  pub status:       ContactStatus,
  pub seen_replied: bool,
  pub recovered:    bool,
  pub interested:   bool,
  #[serde(with = "chrono::serde::ts_milliseconds")]
  pub last_updated: DateTime<Utc>,
}

impl Contact {
  /// A fresh record with a new id, default status and every flag cleared.
  pub fn new(name: impl Into<String>, origin: Origin) -> Self {
    Self {
      id: Uuid::new_v4(),
      name: name.into(),
      phone: String::new(),
      origin,
      status: ContactStatus::default(),
      seen_replied: false,
      recovered: false,
      interested: false,
      last_updated: Utc::now(),
    }
  }

  /// The lower-cased, trimmed name used for deduplication.
  pub fn key(&self) -> String { normalize_key(&self.name) }
}

/// Lower-case and trim `name` into its deduplication key.
pub fn normalize_key(name: &str) -> String { name.trim().to_lowercase() }

/// Remove every character that is not an ASCII decimal digit.
pub fn digits_only(s: &str) -> String {
  s.chars().filter(char::is_ascii_digit).collect()
}

/// Whether `name` is the marker a source uses for a removed row.
pub fn is_discard_sentinel(name: &str) -> bool {
  let name = name.trim();
  name.eq_ignore_ascii_case("eliminado") || name.eq_ignore_ascii_case("deleted")
}

// ─── Snapshot encoding ───────────────────────────────────────────────────────

/// Serialise a whole collection as a JSON array, preserving order.
pub fn encode_collection(contacts: &[Contact]) -> Result<String> {
  Ok(serde_json::to_string(contacts)?)
}

/// Inverse of [`encode_collection`].
pub fn decode_collection(json: &str) -> Result<Vec<Contact>> {
  Ok(serde_json::from_str(json)?)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

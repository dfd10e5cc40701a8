//! Direct edits the shell applies to an owned collection.
//!
//! Each function takes the collection by value and hands back the new value,
//! so the caller stays the single owner between load and save.

use std::collections::BTreeMap;

use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::{
  Error, Result,
  contact::{Contact, ContactStatus, digits_only, is_discard_sentinel},
};

/// Set the status of the contact with `id` and bump its `last_updated`.
pub fn set_status(
  mut contacts: Vec<Contact>,
  id: Uuid,
  status: ContactStatus,
) -> Result<Vec<Contact>> {
  let contact = contacts
    .iter_mut()
    .find(|c| c.id == id)
    .ok_or(Error::ContactNotFound(id))?;
  contact.status = status;
  contact.last_updated = Utc::now();
  Ok(contacts)
}

/// Field changes for [`edit`]. `None` leaves the field as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactEdit {
  pub name:         Option<String>,
  /// Reduced to its digits before it is stored.
  pub phone:        Option<String>,
  pub status:       Option<ContactStatus>,
  pub seen_replied: Option<bool>,
  pub recovered:    Option<bool>,
  pub interested:   Option<bool>,
}

/// Apply `changes` to the contact with `id` and bump its `last_updated`.
///
/// The name is trimmed and must stay non-empty and distinct from the discard
/// sentinel; the collection is left untouched when it is not.
pub fn edit(
  mut contacts: Vec<Contact>,
  id: Uuid,
  changes: ContactEdit,
) -> Result<Vec<Contact>> {
  let name = match changes.name {
    Some(name) => {
      let name = name.trim();
      if name.is_empty() || is_discard_sentinel(name) {
        return Err(Error::InvalidName(name.to_string()));
      }
      Some(name.to_string())
    }
    None => None,
  };

  let contact = contacts
    .iter_mut()
    .find(|c| c.id == id)
    .ok_or(Error::ContactNotFound(id))?;

  if let Some(name) = name {
    contact.name = name;
  }
  if let Some(phone) = changes.phone {
    contact.phone = digits_only(&phone);
  }
  if let Some(status) = changes.status {
    contact.status = status;
  }
  if let Some(v) = changes.seen_replied {
    contact.seen_replied = v;
  }
  if let Some(v) = changes.recovered {
    contact.recovered = v;
  }
  if let Some(v) = changes.interested {
    contact.interested = v;
  }
  contact.last_updated = Utc::now();
  Ok(contacts)
}

/// Remove the contact with `id`.
pub fn remove(mut contacts: Vec<Contact>, id: Uuid) -> Result<Vec<Contact>> {
  let pos = contacts
    .iter()
    .position(|c| c.id == id)
    .ok_or(Error::ContactNotFound(id))?;
  contacts.remove(pos);
  Ok(contacts)
}

/// Contacts with `status` (any status when `None`) whose name contains
/// `term` case-insensitively or whose phone contains it verbatim. An empty
/// term matches everything. Order is preserved.
pub fn filter<'a>(
  contacts: &'a [Contact],
  status: Option<ContactStatus>,
  term: &str,
) -> Vec<&'a Contact> {
  let needle = term.to_lowercase();
  contacts
    .iter()
    .filter(|c| status.is_none_or(|s| c.status == s))
    .filter(|c| c.name.to_lowercase().contains(&needle) || c.phone.contains(term))
    .collect()
}

/// Totals per status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
  pub total:     usize,
  /// Every status is present, with zero when no contact has it.
  pub by_status: BTreeMap<String, usize>,
}

impl StatusCounts {
  pub fn get(&self, status: ContactStatus) -> usize {
    self.by_status.get(status.label()).copied().unwrap_or(0)
  }
}

pub fn status_counts(contacts: &[Contact]) -> StatusCounts {
  let mut by_status: BTreeMap<String, usize> = ContactStatus::all()
    .map(|s| (s.label().to_string(), 0))
    .collect();
  for c in contacts {
    *by_status.entry(c.status.label().to_string()).or_default() += 1;
  }
  StatusCounts {
    total: contacts.len(),
    by_status,
  }
}

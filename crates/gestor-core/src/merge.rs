//! Reconciliation of newly parsed records against the held collection.
//!
//! Held records are indexed by identity key in first-seen order. Each incoming
//! record either appends a new entry or overwrites the matching one in place,
//! with three fields exempt from the overwrite:
//!
//! - `id` always stays the held record's id;
//! - `phone` stays the held value unless that value is empty;
//! - `origin` stays the held value (it records who *created* the contact).

use std::collections::HashMap;

use tracing::debug;

use crate::{
  contact::Contact,
  identity::{ByName, IdentityStrategy},
};

/// What a merge did, for reporting back to the shell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOutcome {
  /// The reconciled collection.
  pub contacts: Vec<Contact>,
  /// Incoming records that introduced a new key.
  pub added:    usize,
  /// Incoming records folded into an entry that already existed.
  pub updated:  usize,
}

/// Merge `incoming` into `existing`, deduplicating by normalized name.
pub fn merge(existing: Vec<Contact>, incoming: Vec<Contact>) -> Vec<Contact> {
  merge_with(&ByName, existing, incoming).contacts
}

/// Merge `incoming` into `existing`, deduplicating by `strategy`.
///
/// Pre-existing entries keep their relative order; new keys are appended in
/// the order they first appear in `incoming`. A key repeated inside `incoming`
/// folds into the entry created by its first occurrence.
pub fn merge_with<S>(
  strategy: &S,
  existing: Vec<Contact>,
  incoming: Vec<Contact>,
) -> MergeOutcome
where
  S: IdentityStrategy + ?Sized,
{
  let mut contacts: Vec<Contact> = Vec::with_capacity(existing.len());
  let mut index: HashMap<String, usize> = HashMap::new();

  // A held collection should already be unique per key; if it is not, the
  // later record replaces the earlier one at the earlier position.
  for contact in existing {
    let key = strategy.resolve(&contact);
    match index.get(&key) {
      Some(&pos) => contacts[pos] = contact,
      None => {
        index.insert(key, contacts.len());
        contacts.push(contact);
      }
    }
  }

  let mut added = 0;
  let mut updated = 0;

  for record in incoming {
    let key = strategy.resolve(&record);
    match index.get(&key) {
      Some(&pos) => {
        debug!(%key, "merging into existing contact");
        overwrite(&mut contacts[pos], record);
        updated += 1;
      }
      None => {
        debug!(%key, "adding new contact");
        index.insert(key, contacts.len());
        contacts.push(record);
        added += 1;
      }
    }
  }

  MergeOutcome {
    contacts,
    added,
    updated,
  }
}

/// Apply field precedence: everything from `incoming` except identity, a known
/// phone and the origin.
fn overwrite(held: &mut Contact, incoming: Contact) {
  let phone = if held.phone.is_empty() {
    incoming.phone
  } else {
    std::mem::take(&mut held.phone)
  };

  *held = Contact {
    id: held.id,
    phone,
    origin: held.origin,
    ..incoming
  };
}

// ─── Tests ───────────────────────────────────────────────────────────────────

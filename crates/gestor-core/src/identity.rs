//! Identity resolution: which incoming record is "the same person" as a held
//! one.
//!
//! The merge engine only ever compares keys produced by an
//! [`IdentityStrategy`], so a stronger key can be substituted without touching
//! parsing or field precedence.

use crate::contact::{Contact, normalize_key};

/// Maps a contact to the key it is deduplicated under.
pub trait IdentityStrategy {
  fn resolve(&self, contact: &Contact) -> String;
}

/// Deduplicate by lower-cased, trimmed name. The legacy behaviour.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByName;

impl IdentityStrategy for ByName {
  fn resolve(&self, contact: &Contact) -> String { normalize_key(&contact.name) }
}

/// Deduplicate by phone digits, falling back to the name key for records
/// without a phone.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByPhone;

impl IdentityStrategy for ByPhone {
  fn resolve(&self, contact: &Contact) -> String {
    if contact.phone.is_empty() {
      format!("name:{}", normalize_key(&contact.name))
    } else {
      format!("tel:{}", contact.phone)
    }
  }
}

impl<T: IdentityStrategy + ?Sized> IdentityStrategy for &T {
  fn resolve(&self, contact: &Contact) -> String { (**self).resolve(contact) }
}

impl<T: IdentityStrategy + ?Sized> IdentityStrategy for Box<T> {
  fn resolve(&self, contact: &Contact) -> String { (**self).resolve(contact) }
}

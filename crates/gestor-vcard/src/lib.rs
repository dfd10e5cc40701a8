//! vCard codec for gestor.
//!
//! Reads phone-book exports (vCard 2.1 / 3.0 / 4.0) into [`gestor_core`]
//! contacts and writes the collection back as vCard 3.0. Pure synchronous; no
//! file or database dependencies.
//!
//! # Quick start
//!
//! ```no_run
//! use gestor_vcard::parse;
//!
//! let vcf = "BEGIN:VCARD\nFN:Luis Perez\nTEL;TYPE=CELL:+54 9 351-000111\nEND:VCARD";
//! let contacts = parse(vcf);
//! println!("{} -> {}", contacts[0].name, contacts[0].phone);
//! ```

mod parse;
mod serialize;

use gestor_core::Contact;

/// Name given to a card that has no usable `FN` line.
pub const UNNAMED: &str = "Sin nombre";

// ─── Public API ──────────────────────────────────────────────────────────────

/// Parse zero or more cards from `input`, one contact per card, in order.
///
/// Never fails: text without a `BEGIN:VCARD` yields an empty vec and
/// malformed lines inside a card are ignored.
pub fn parse(input: &str) -> Vec<Contact> { parse::parse_many(input) }

/// Serialize `contacts` as blank-line separated vCard 3.0 blocks.
pub fn serialize(contacts: &[Contact]) -> String {
  serialize::serialize(contacts)
}

// ─── Round-trip test ─────────────────────────────────────────────────────────

#[cfg(test)]
mod roundtrip_tests {
  use gestor_core::{ContactStatus, Origin};

  use super::*;

  #[test]
  fn names_and_phones_survive_reimport() {
    let mut a = Contact::new("Luis Perez", Origin::Tabular);
    a.phone = "549351000111".to_string();
    a.status = ContactStatus::Contacted;
    let b = Contact::new("Perez, Ana; hija", Origin::Card);

    let vcf = serialize(&[a, b]);
    let parsed = parse(&vcf);

    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed[0].name, "Luis Perez");
    assert_eq!(parsed[0].phone, "549351000111");
    assert_eq!(parsed[1].name, "Perez, Ana; hija");
    assert_eq!(parsed[1].phone, "");
    // Cards carry no workflow state back in.
    assert!(parsed.iter().all(|c| c.status == ContactStatus::Unreviewed));
    assert!(parsed.iter().all(|c| c.origin == Origin::Card));
  }
}

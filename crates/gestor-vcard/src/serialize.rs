//! vCard 3.0 writer.
//!
//! One block per contact, LF line endings, blocks separated by a blank line.
//! Every block carries a `TEL;TYPE=CELL` line, empty when the phone is
//! unknown, and a `NOTE` with the contact's origin and status.

use gestor_core::Contact;

// ─── Value escaping ───────────────────────────────────────────────────────────

/// Escape a text property value: `\`, `,`, `;`, `\n`.
fn escape_value(s: &str) -> String {
  s.replace('\\', "\\\\")
   .replace(',', "\\,")
   .replace(';', "\\;")
   .replace('\n', "\\n")
}

fn card(c: &Contact) -> String {
  [
    "BEGIN:VCARD".to_string(),
    "VERSION:3.0".to_string(),
    format!("FN:{}", escape_value(&c.name)),
    format!("TEL;TYPE=CELL:{}", c.phone),
    format!("NOTE:Origin:{} Status:{}", c.origin, c.status),
    "END:VCARD".to_string(),
  ]
  .join("\n")
}

pub fn serialize(contacts: &[Contact]) -> String {
  contacts.iter().map(card).collect::<Vec<_>>().join("\n\n")
}

// ─── Tests ───────────────────────────────────────────────────────────────────

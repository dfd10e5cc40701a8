//! vCard content-line parser.
//!
//! Pipeline:
//!   raw &str
//!     └─ unfold_lines()            → Vec<String>
//!          └─ split into blocks at each END:VCARD
//!               └─ parse_content_line() → ContentLine
//!                    └─ first FN / first non-empty TEL → Contact
//!
//! Only the formatted name and the first telephone number are read; every
//! other property is ignored.

use gestor_core::{
  Contact, Origin,
  contact::{digits_only, is_discard_sentinel},
};
use tracing::debug;

use crate::UNNAMED;

// ─── Content-line representation ─────────────────────────────────────────────

struct ContentLine {
  name:   String,
  params: Vec<Param>,
  value:  String,
}

struct Param {
  name:  String,
  value: String,
}

// ─── Low-level helpers ───────────────────────────────────────────────────────

/// Join CRLF+SP (or LF+SP / LF+HT) continuation lines (RFC 6350 §3.2).
/// Tolerates bare LF line endings for real-world robustness.
fn unfold_lines(s: &str) -> Vec<String> {
  let mut lines: Vec<String> = Vec::new();
  for raw in s.split('\n') {
    let line = raw.strip_suffix('\r').unwrap_or(raw);
    if line.starts_with(' ') || line.starts_with('\t') {
      if let Some(last) = lines.last_mut() {
        last.push_str(&line[1..]);
      }
      // leading continuation with no prior line: dropped
    } else {
      lines.push(line.to_string());
    }
  }
  lines.retain(|l| !l.trim().is_empty());
  lines
}

/// Find the first `:` that is not inside double-quoted string.
fn find_unquoted_colon(s: &str) -> Option<usize> {
  let mut in_quotes = false;
  for (i, c) in s.char_indices() {
    match c {
      '"' => in_quotes = !in_quotes,
      ':' if !in_quotes => return Some(i),
      _ => {}
    }
  }
  None
}

fn is_marker(line: &str, marker: &str) -> bool {
  line.trim().eq_ignore_ascii_case(marker)
}

/// Minimal quoted-printable decoder for vCard 2.1 `ENCODING=QUOTED-PRINTABLE`,
/// which phone exports use for non-ASCII names.
fn decode_quoted_printable(s: &str) -> String {
  let bytes = s.as_bytes();
  let mut result: Vec<u8> = Vec::with_capacity(bytes.len());
  let mut i = 0;
  while i < bytes.len() {
    if bytes[i] == b'=' && i + 2 < bytes.len() {
      let hi = (bytes[i + 1] as char).to_digit(16);
      let lo = (bytes[i + 2] as char).to_digit(16);
      if let (Some(hi), Some(lo)) = (hi, lo) {
        result.push(((hi << 4) | lo) as u8);
        i += 3;
        continue;
      }
    }
    result.push(bytes[i]);
    i += 1;
  }
  String::from_utf8_lossy(&result).into_owned()
}

fn unescape_value(s: &str) -> String {
  let mut result = String::with_capacity(s.len());
  let mut chars = s.chars().peekable();
  while let Some(c) = chars.next() {
    if c == '\\' {
      match chars.next() {
        // names are single-line
        Some('n') | Some('N') => result.push(' '),
        Some('\\') => result.push('\\'),
        Some(',') => result.push(','),
        Some(';') => result.push(';'),
        Some(other) => {
          result.push('\\');
          result.push(other);
        }
        None => result.push('\\'),
      }
    } else {
      result.push(c);
    }
  }
  result
}

// ─── Content-line parser ─────────────────────────────────────────────────────

fn parse_content_line(line: &str) -> Option<ContentLine> {
  let colon_pos = find_unquoted_colon(line)?;

  let name_part = &line[..colon_pos];
  let value = line[colon_pos + 1..].to_string();

  let mut tokens = name_part.split(';');
  let name_raw = tokens.next()?.trim();
  if name_raw.is_empty() {
    return None;
  }

  // Strip group prefix (e.g. "item1.TEL" → "TEL")
  let name = match name_raw.rfind('.') {
    Some(dot_pos) => name_raw[dot_pos + 1..].to_uppercase(),
    None => name_raw.to_uppercase(),
  };

  let params = tokens
    .filter_map(|token| {
      let (n, v) = token.split_once('=')?;
      Some(Param {
        name:  n.trim().to_uppercase(),
        value: v.trim().trim_matches('"').to_string(),
      })
    })
    .collect();

  Some(ContentLine {
    name,
    params,
    value,
  })
}

impl ContentLine {
  /// The value with any quoted-printable transfer encoding removed.
  fn decoded_value(&self) -> String {
    let is_qp = self.params.iter().any(|p| {
      p.name.eq_ignore_ascii_case("ENCODING")
        && p.value.eq_ignore_ascii_case("QUOTED-PRINTABLE")
    });
    if is_qp {
      decode_quoted_printable(&self.value)
    } else {
      self.value.clone()
    }
  }
}

// ─── Block parser ────────────────────────────────────────────────────────────

/// Build a contact from the lines of one card. `None` if the card names the
/// discard sentinel.
fn parse_block(lines: &[String]) -> Option<Contact> {
  let mut name: Option<String> = None;
  let mut phone: Option<String> = None;

  for cl in lines.iter().filter_map(|l| parse_content_line(l)) {
    match cl.name.as_str() {
      "FN" if name.is_none() => {
        name = Some(unescape_value(cl.decoded_value().trim()));
      }
      "TEL" if phone.is_none() => {
        let value = cl.decoded_value();
        if !value.trim().is_empty() {
          phone = Some(digits_only(&value));
        }
      }
      _ => {}
    }
  }

  let name = name
    .map(|n| n.trim().to_string())
    .filter(|n| !n.is_empty())
    .unwrap_or_else(|| UNNAMED.to_string());
  if is_discard_sentinel(&name) {
    debug!("skipping card for discarded contact");
    return None;
  }

  let mut contact = Contact::new(name, Origin::Card);
  contact.phone = phone.unwrap_or_default();
  Some(contact)
}

/// Parse every card in `input`.
///
/// The text is cut at each `END:VCARD`; a piece is a card only if it also
/// holds a `BEGIN:VCARD`. A trailing piece with no `END:VCARD` still counts,
/// so a truncated export loses nothing.
pub(crate) fn parse_many(input: &str) -> Vec<Contact> {
  let input = input.strip_prefix('\u{feff}').unwrap_or(input);
  let mut contacts = Vec::new();
  let mut block: Vec<String> = Vec::new();
  let mut begun = false;

  for line in unfold_lines(input) {
    if is_marker(&line, "END:VCARD") {
      if begun {
        contacts.extend(parse_block(&block));
      }
      block.clear();
      begun = false;
    } else if is_marker(&line, "BEGIN:VCARD") {
      begun = true;
    } else {
      block.push(line);
    }
  }
  if begun {
    contacts.extend(parse_block(&block));
  }

  contacts
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use gestor_core::ContactStatus;

  use super::*;

  // ── Scenario ────────────────────────────────────────────────────────────────

  #[test]
  fn name_and_digits_only_phone() {
    let input =
      "BEGIN:VCARD\nFN:Luis Perez\nTEL;TYPE=CELL:+54 9 351-000111\nEND:VCARD";
    let contacts = parse_many(input);
    assert_eq!(contacts.len(), 1);
    let c = &contacts[0];
    assert_eq!(c.name, "Luis Perez");
    assert_eq!(c.phone, "549351000111");
    assert_eq!(c.origin, Origin::Card);
    assert_eq!(c.status, ContactStatus::Unreviewed);
    assert!(!c.seen_replied && !c.recovered && !c.interested);
  }

  // ── Envelope ────────────────────────────────────────────────────────────────

  #[test]
  fn text_without_begin_yields_nothing() {
    assert!(parse_many("FN:Alice\nEND:VCARD").is_empty());
    assert!(parse_many("").is_empty());
  }

  #[test]
  fn markers_are_case_insensitive() {
    let input = "begin:vcard\r\nfn:Ana\r\nend:vcard\r\n";
    let contacts = parse_many(input);
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0].name, "Ana");
  }

  #[test]
  fn leading_byte_order_mark_keeps_first_card() {
    let input = "\u{feff}BEGIN:VCARD\r\nFN:Luis\r\nEND:VCARD\r\n\
                 BEGIN:VCARD\r\nFN:Ana\r\nEND:VCARD\r\n";
    let names: Vec<_> =
      parse_many(input).into_iter().map(|c| c.name).collect();
    assert_eq!(names, ["Luis", "Ana"]);
  }

  #[test]
  fn unterminated_trailing_card_is_kept() {
    let input = "BEGIN:VCARD\nFN:Ana\nEND:VCARD\nBEGIN:VCARD\nFN:Bruno\n";
    let names: Vec<_> =
      parse_many(input).into_iter().map(|c| c.name).collect();
    assert_eq!(names, ["Ana", "Bruno"]);
  }

  #[test]
  fn several_cards_in_order() {
    let input = concat!(
      "BEGIN:VCARD\r\nVERSION:3.0\r\nFN:Carla\r\nEND:VCARD\r\n",
      "\r\n",
      "BEGIN:VCARD\r\nVERSION:4.0\r\nFN:Ana\r\nEND:VCARD\r\n",
    );
    let names: Vec<_> =
      parse_many(input).into_iter().map(|c| c.name).collect();
    assert_eq!(names, ["Carla", "Ana"]);
  }

  // ── FN ──────────────────────────────────────────────────────────────────────

  #[test]
  fn missing_fn_uses_placeholder() {
    let input = "BEGIN:VCARD\nN:Perez;Luis;;;\nTEL:123\nEND:VCARD";
    let contacts = parse_many(input);
    assert_eq!(contacts[0].name, UNNAMED);
    assert_eq!(contacts[0].phone, "123");
  }

  #[test]
  fn blank_fn_uses_placeholder() {
    let contacts = parse_many("BEGIN:VCARD\nFN:   \nEND:VCARD");
    assert_eq!(contacts[0].name, UNNAMED);
  }

  #[test]
  fn first_fn_wins() {
    let contacts =
      parse_many("BEGIN:VCARD\nFN:Primero\nFN:Segundo\nEND:VCARD");
    assert_eq!(contacts[0].name, "Primero");
  }

  #[test]
  fn discard_sentinel_card_is_dropped() {
    let input = "BEGIN:VCARD\nFN:Eliminado\nEND:VCARD\n\
                 BEGIN:VCARD\nFN:Ana\nEND:VCARD";
    let contacts = parse_many(input);
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0].name, "Ana");
  }

  #[test]
  fn quoted_printable_name_is_decoded() {
    let input = "BEGIN:VCARD\nVERSION:2.1\n\
                 FN;CHARSET=UTF-8;ENCODING=QUOTED-PRINTABLE:Mu=C3=B1oz\n\
                 END:VCARD";
    assert_eq!(parse_many(input)[0].name, "Muñoz");
  }

  #[test]
  fn escaped_name_is_unescaped() {
    let input = "BEGIN:VCARD\nFN:Perez\\, Ana\nEND:VCARD";
    assert_eq!(parse_many(input)[0].name, "Perez, Ana");
  }

  #[test]
  fn folded_name_is_unfolded() {
    let input = "BEGIN:VCARD\r\nFN:Luis\r\n  Perez\r\nEND:VCARD\r\n";
    assert_eq!(parse_many(input)[0].name, "Luis Perez");
  }

  // ── TEL ─────────────────────────────────────────────────────────────────────

  #[test]
  fn first_non_empty_tel_wins() {
    let input = "BEGIN:VCARD\nFN:Ana\nTEL;TYPE=HOME:\n\
                 item1.TEL;TYPE=CELL:(011) 4555-1234\nTEL:999\nEND:VCARD";
    assert_eq!(parse_many(input)[0].phone, "01145551234");
  }

  #[test]
  fn no_tel_means_empty_phone() {
    let contacts = parse_many("BEGIN:VCARD\nFN:Ana\nEMAIL:a@b.c\nEND:VCARD");
    assert_eq!(contacts[0].phone, "");
  }

  #[test]
  fn malformed_lines_are_ignored() {
    let input = "BEGIN:VCARD\nthis line has no colon\nFN:Ana\nEND:VCARD";
    assert_eq!(parse_many(input)[0].name, "Ana");
  }
}

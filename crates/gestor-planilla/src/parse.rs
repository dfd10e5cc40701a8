//! Planilla row parser.
//!
//! Pipeline:
//!   raw &str
//!     └─ split_lines()          → Vec<&str>
//!          └─ split_cells()     → header + rows of cells
//!               └─ Columns::locate() → column positions by header name
//!                    └─ row_to_contact() → Option<Contact>
//!
//! Quotes are stripped from cells but do not protect embedded commas: the
//! exports this reads never carry commas inside values.

use gestor_core::{
  Contact, Origin, classify,
  classify::INTEREST_NO,
  contact::is_discard_sentinel,
};
use tracing::{debug, warn};

use crate::{
  COL_ACTUAL, COL_INTERESTED, COL_REVIEW, COL_USERS, POS_RECOVERED,
  POS_SEEN_REPLIED,
};

/// Flag value meaning "yes" in the positional boolean columns.
const YES: &str = "si";

// ─── Low-level helpers ───────────────────────────────────────────────────────

/// Split on LF, tolerating CRLF line endings.
fn split_lines(s: &str) -> Vec<&str> {
  s.split('\n')
    .map(|line| line.strip_suffix('\r').unwrap_or(line))
    .collect()
}

/// Split one line on `,`, removing every `"` and surrounding whitespace.
fn split_cells(line: &str) -> Vec<String> {
  line
    .split(',')
    .map(|cell| cell.replace('"', "").trim().to_string())
    .collect()
}

fn cell<'a>(cells: &'a [String], idx: Option<usize>) -> &'a str {
  idx.and_then(|i| cells.get(i)).map(String::as_str).unwrap_or("")
}

fn is_yes(value: &str) -> bool { value.eq_ignore_ascii_case(YES) }

// ─── Header lookup ───────────────────────────────────────────────────────────

struct Columns {
  user:       usize,
  review:     Option<usize>,
  actual:     Option<usize>,
  interested: Option<usize>,
}

impl Columns {
  /// Locate the named columns by case-insensitive exact match. `None` when
  /// the identity column is missing.
  fn locate(header_line: &str) -> Option<Self> {
    let headers: Vec<String> = split_cells(header_line)
      .into_iter()
      .map(|h| h.to_lowercase())
      .collect();
    let find = |name: &str| headers.iter().position(|h| h == name);

    Some(Self {
      user:       find(COL_USERS)?,
      review:     find(COL_REVIEW),
      actual:     find(COL_ACTUAL),
      interested: find(COL_INTERESTED),
    })
  }
}

// ─── Row mapping ─────────────────────────────────────────────────────────────

fn row_to_contact(cells: &[String], cols: &Columns) -> Option<Contact> {
  let name = cell(cells, Some(cols.user));
  if name.is_empty() || is_discard_sentinel(name) {
    return None;
  }

  let review = cell(cells, cols.review);
  let actual = cell(cells, cols.actual);
  let interest = cell(cells, cols.interested);

  let mut contact = Contact::new(name, Origin::Tabular);
  contact.status = classify(review, actual, interest);
  contact.seen_replied = is_yes(cell(cells, Some(POS_SEEN_REPLIED)));
  contact.recovered = is_yes(cell(cells, Some(POS_RECOVERED)));
  // Interested unless the answer is an explicit "no"; a blank answer counts
  // as interested, matching what the exporter writes back.
  contact.interested = !interest.eq_ignore_ascii_case(INTEREST_NO);
  Some(contact)
}

// ─── Core parser ─────────────────────────────────────────────────────────────

pub fn parse(input: &str) -> Vec<Contact> {
  // "CSV UTF-8" spreadsheet exports start with a byte-order mark
  let input = input.strip_prefix('\u{feff}').unwrap_or(input);
  let lines = split_lines(input);
  if lines.len() < 2 {
    return Vec::new();
  }

  let Some(cols) = Columns::locate(lines[0]) else {
    warn!("planilla has no {COL_USERS:?} column; nothing imported");
    return Vec::new();
  };

  let mut contacts = Vec::new();
  for (n, line) in lines[1..].iter().enumerate() {
    let cells = split_cells(line);
    match row_to_contact(&cells, &cols) {
      Some(contact) => contacts.push(contact),
      // n + 2: one for the header, one for 1-based numbering
      None => debug!(line = n + 2, "skipping planilla row without a usable user"),
    }
  }
  contacts
}

// ─── Tests ───────────────────────────────────────────────────────────────────

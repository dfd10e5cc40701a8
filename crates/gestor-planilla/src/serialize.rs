//! Planilla writer.
//!
//! Reproduces the team spreadsheet layout column for column. The three
//! summary columns (`ya contactados`, `recuperados!`, `actualmente cargando`)
//! are independent name lists laid out top to bottom: cell `i` holds the
//! `i`-th matching name of the whole collection, not the row's own contact.

use gestor_core::{Contact, ContactStatus};

use crate::{EXPORT_HEADERS, error::Result};

// ─── Cell text ───────────────────────────────────────────────────────────────

fn review_text(status: ContactStatus) -> &'static str {
  match status {
    ContactStatus::Playing     => "esta cargando",
    ContactStatus::NoMessaging => "no esta en wsp",
    _                          => "promo enviada",
  }
}

fn actual_text(status: ContactStatus) -> &'static str {
  match status {
    ContactStatus::Contacted | ContactStatus::Playing => "EN CONTACTO",
    ContactStatus::NoMessaging                        => "NO ESTA EN WSP",
    _                                                 => "MENSAJE ENVIADO",
  }
}

fn yes_no(flag: bool) -> &'static str { if flag { "SI" } else { "NO" } }

fn names_where<'a>(
  contacts: &'a [Contact],
  keep: impl Fn(&Contact) -> bool,
) -> Vec<&'a str> {
  contacts
    .iter()
    .filter(|c| keep(c))
    .map(|c| c.name.as_str())
    .collect()
}

fn nth<'a>(names: &[&'a str], i: usize) -> &'a str {
  names.get(i).copied().unwrap_or("")
}

// ─── Writer ──────────────────────────────────────────────────────────────────

pub fn serialize(contacts: &[Contact]) -> Result<String> {
  let contacted = names_where(contacts, |c| c.status == ContactStatus::Contacted);
  let recovered = names_where(contacts, |c| c.recovered);
  let playing   = names_where(contacts, |c| c.status == ContactStatus::Playing);

  let mut writer = csv::WriterBuilder::new()
    .terminator(csv::Terminator::Any(b'\n'))
    .from_writer(Vec::new());

  writer.write_record(EXPORT_HEADERS)?;

  for (i, c) in contacts.iter().enumerate() {
    let interested = if c.status == ContactStatus::NotInterested { "NO" } else { "SI" };
    writer.write_record([
      c.name.as_str(),
      review_text(c.status),
      "",
      actual_text(c.status),
      yes_no(c.seen_replied),
      yes_no(c.recovered),
      "",
      interested,
      nth(&contacted, i),
      nth(&recovered, i),
      nth(&playing, i),
      "",
      "",
      "",
      "",
    ])?;
  }

  let bytes = writer.into_inner().map_err(|e| e.into_error())?;
  Ok(String::from_utf8(bytes)?)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use gestor_core::Origin;

  use super::*;

  fn contact(name: &str, status: ContactStatus, recovered: bool) -> Contact {
    let mut c = Contact::new(name, Origin::Tabular);
    c.status    = status;
    c.recovered = recovered;
    c
  }

  fn rows(out: &str) -> Vec<Vec<String>> {
    csv::ReaderBuilder::new()
      .has_headers(false)
      .from_reader(out.as_bytes())
      .records()
      .map(|r| r.unwrap().iter().map(str::to_string).collect())
      .collect()
  }

  // ── Header ──────────────────────────────────────────────────────────────────

  #[test]
  fn header_has_fifteen_columns_in_order() {
    let out = serialize(&[]).unwrap();
    let header = &rows(&out)[0];
    assert_eq!(header.len(), 15);
    assert_eq!(header[0], "usuarios");
    assert_eq!(header[4], "VISTO, RESPONDIDO?");
    assert_eq!(header[11], "TURNO MAÑANA");
    assert_eq!(header[14], "contactos a borrar");
  }

  #[test]
  fn header_cell_with_comma_is_quoted() {
    let out = serialize(&[]).unwrap();
    assert!(out.contains(",\"VISTO, RESPONDIDO?\","), "got:\n{out}");
  }

  // ── Per-row cells ───────────────────────────────────────────────────────────

  #[test]
  fn status_columns_per_row() {
    let out = serialize(&[
      contact("Ana", ContactStatus::Playing, false),
      contact("Bruno", ContactStatus::NoMessaging, false),
      contact("Carla", ContactStatus::NotInterested, false),
      contact("Dario", ContactStatus::Contacted, true),
    ])
    .unwrap();
    let rows = rows(&out);
    assert_eq!(rows.len(), 5);
    assert_eq!(&rows[1][..8], ["Ana", "esta cargando", "", "EN CONTACTO", "NO", "NO", "", "SI"]);
    assert_eq!(rows[2][1], "no esta en wsp");
    assert_eq!(rows[2][3], "NO ESTA EN WSP");
    assert_eq!(rows[3][1], "promo enviada");
    assert_eq!(rows[3][3], "MENSAJE ENVIADO");
    assert_eq!(rows[3][7], "NO");
    assert_eq!(rows[4][3], "EN CONTACTO");
    assert_eq!(rows[4][5], "SI");
    assert!(rows.iter().all(|r| r.len() == 15));
  }

  // ── Positional summary columns ──────────────────────────────────────────────

  #[test]
  fn summary_columns_are_filled_by_position_not_by_row() {
    let out = serialize(&[
      contact("Ana", ContactStatus::Unreviewed, false),
      contact("Bruno", ContactStatus::Unreviewed, false),
      contact("Carla", ContactStatus::Contacted, true),
      contact("Dario", ContactStatus::Playing, false),
    ])
    .unwrap();
    let rows = rows(&out);
    // Ana's row carries the first contacted / recovered / playing names.
    assert_eq!(rows[1][8], "Carla");
    assert_eq!(rows[1][9], "Carla");
    assert_eq!(rows[1][10], "Dario");
    // The lists are exhausted after one entry each.
    for row in &rows[2..] {
      assert_eq!(&row[8..], ["", "", "", "", "", "", ""]);
    }
  }

  #[test]
  fn output_uses_lf_line_endings() {
    let out = serialize(&[contact("Ana", ContactStatus::Unreviewed, false)]).unwrap();
    assert!(!out.contains('\r'));
    assert_eq!(out.lines().count(), 2);
  }
}

//! Planilla (spreadsheet CSV export) codec for gestor.
//!
//! Converts between the team's tracking spreadsheet and [`gestor_core`]
//! contacts. Pure synchronous; no file or database dependencies.
//!
//! # Quick start
//!
//! ```no_run
//! use gestor_planilla::parse;
//!
//! let csv = "usuarios,estado de revision,,estado actual,interesado en jugar?\n\
//!            Ana,esta cargando,,EN CONTACTO,si\n";
//! let contacts = parse(csv);
//! println!("{} contacts, first is {:?}", contacts.len(), contacts[0].status);
//! ```

pub mod error;
mod parse;
mod serialize;

pub use error::{Error, Result};
use gestor_core::Contact;

// ─── Column names ────────────────────────────────────────────────────────────

/// Header of the identity column.
pub const COL_USERS: &str = "usuarios";
/// Header of the review-state column.
pub const COL_REVIEW: &str = "estado de revision";
/// Header of the current-state column.
pub const COL_ACTUAL: &str = "estado actual";
/// Header of the interest-answer column.
pub const COL_INTERESTED: &str = "interesado en jugar?";

/// Fixed position of the "seen / replied" flag.
pub const POS_SEEN_REPLIED: usize = 4;
/// Fixed position of the "recovered" flag.
pub const POS_RECOVERED: usize = 5;

/// The fifteen headers written by [`serialize`], in order.
pub const EXPORT_HEADERS: [&str; 15] = [
  "usuarios",
  "estado de revision",
  "",
  "estado actual",
  "VISTO, RESPONDIDO?",
  "RECUPERADO",
  "TURNO DE LAS CARGAS",
  "interesado en jugar?",
  "ya contactados",
  "recuperados!",
  "actualmente cargando",
  "TURNO MAÑANA",
  "TURNO TARDE",
  "TURNO NOCHE",
  "contactos a borrar",
];

// ─── Public API ──────────────────────────────────────────────────────────────

/// Parse a planilla export into fresh contacts, one per accepted row.
///
/// Never fails: text without a `usuarios` header yields an empty vec, and
/// rows with a blank or `eliminado` user are skipped.
pub fn parse(input: &str) -> Vec<Contact> { parse::parse(input) }

/// Render `contacts` as a fifteen-column planilla.
pub fn serialize(contacts: &[Contact]) -> Result<String> {
  serialize::serialize(contacts)
}

// ─── Round-trip test ─────────────────────────────────────────────────────────

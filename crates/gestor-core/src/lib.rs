//! Core types and reconciliation logic for the gestor contact ledger.
//!
//! This crate has no file, HTTP or database dependencies.
//! Format codecs (`gestor-planilla`, `gestor-vcard`) and storage backends
//! (`gestor-store-sqlite`) depend on it.

pub mod classify;
pub mod collection;
pub mod contact;
pub mod error;
pub mod identity;
pub mod merge;
pub mod store;

pub use classify::classify;
pub use contact::{Contact, ContactStatus, Origin, normalize_key};
pub use error::{Error, Result};
pub use identity::{ByName, ByPhone, IdentityStrategy};
pub use merge::{MergeOutcome, merge, merge_with};

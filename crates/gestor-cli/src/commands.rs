//! Command implementations. Each one loads the collection from the store,
//! runs it through the engine, and saves the result. An import that
//! recognises no records leaves the store untouched.

use std::path::Path;

use anyhow::{Context as _, Result, bail};
use clap::ValueEnum;
use gestor_core::{
  Contact, ContactStatus, IdentityStrategy, MergeOutcome,
  collection::{self, ContactEdit, StatusCounts},
  merge_with,
  store::ContactStore,
};
use tracing::{info, warn};
use uuid::Uuid;

// ─── Formats ──────────────────────────────────────────────────────────────────

/// The two exchange formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
  /// Team spreadsheet export (CSV).
  Planilla,
  /// Phone-book export (vCard).
  Vcard,
}

impl Format {
  /// Guess the format from a file extension.
  pub fn from_path(path: &Path) -> Option<Self> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
      "csv" => Some(Self::Planilla),
      "vcf" | "vcard" => Some(Self::Vcard),
      _ => None,
    }
  }

  pub fn parse(self, text: &str) -> Vec<Contact> {
    match self {
      Self::Planilla => gestor_planilla::parse(text),
      Self::Vcard => gestor_vcard::parse(text),
    }
  }

  pub fn serialize(self, contacts: &[Contact]) -> Result<String> {
    Ok(match self {
      Self::Planilla => {
        gestor_planilla::serialize(contacts).context("writing planilla")?
      }
      Self::Vcard => gestor_vcard::serialize(contacts),
    })
  }
}

fn resolve_format(path: &Path, explicit: Option<Format>) -> Result<Format> {
  match explicit.or_else(|| Format::from_path(path)) {
    Some(f) => Ok(f),
    None => bail!(
      "cannot tell the format of {}; pass --format planilla|vcard",
      path.display()
    ),
  }
}

// ─── Reading ──────────────────────────────────────────────────────────────────

/// Decode file contents as UTF-8, falling back to Windows-1252, which older
/// spreadsheet exports use.
fn decode_text(bytes: Vec<u8>) -> String {
  match String::from_utf8(bytes) {
    Ok(s) => s,
    Err(e) => {
      let bytes = e.into_bytes();
      warn!("input is not valid UTF-8; decoding as Windows-1252");
      let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
      decoded.into_owned()
    }
  }
}

async fn read_text(path: &Path) -> Result<String> {
  let bytes = tokio::fs::read(path)
    .await
    .with_context(|| format!("reading {}", path.display()))?;
  Ok(decode_text(bytes))
}

// ─── Import ───────────────────────────────────────────────────────────────────

/// Parse `text` as `format` and merge it into the stored collection.
pub async fn import_text<S: ContactStore>(
  store: &S,
  strategy: &dyn IdentityStrategy,
  format: Format,
  text: &str,
) -> Result<MergeOutcome> {
  let incoming = format.parse(text);
  let existing = store.load().await.context("loading contacts")?;
  if incoming.is_empty() {
    warn!(?format, "no contacts recognised in input");
    return Ok(MergeOutcome {
      contacts: existing,
      ..Default::default()
    });
  }
  let parsed = incoming.len();

  let outcome = merge_with(strategy, existing, incoming);
  store
    .save(&outcome.contacts)
    .await
    .context("saving contacts")?;

  info!(
    parsed,
    added = outcome.added,
    updated = outcome.updated,
    total = outcome.contacts.len(),
    "import finished"
  );
  Ok(outcome)
}

pub async fn import<S: ContactStore>(
  store: &S,
  strategy: &dyn IdentityStrategy,
  path: &Path,
  format: Option<Format>,
) -> Result<MergeOutcome> {
  let format = resolve_format(path, format)?;
  let text = read_text(path).await?;
  import_text(store, strategy, format, &text).await
}

// ─── Export ───────────────────────────────────────────────────────────────────

pub async fn export_text<S: ContactStore>(
  store: &S,
  format: Format,
) -> Result<String> {
  let contacts = store.load().await.context("loading contacts")?;
  format.serialize(&contacts)
}

/// Write the collection to `path`, or to stdout when `path` is `-`.
pub async fn export<S: ContactStore>(
  store: &S,
  path: &Path,
  format: Option<Format>,
) -> Result<()> {
  let to_stdout = path.as_os_str() == "-";
  let format = match (format, to_stdout) {
    (Some(f), _) => f,
    (None, true) => bail!("--format is required when exporting to stdout"),
    (None, false) => resolve_format(path, None)?,
  };

  let text = export_text(store, format).await?;
  if to_stdout {
    println!("{text}");
  } else {
    tokio::fs::write(path, text)
      .await
      .with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), ?format, "export finished");
  }
  Ok(())
}

// ─── Inspection ───────────────────────────────────────────────────────────────

/// Contacts matching `status` and `search`, in collection order.
pub async fn list<S: ContactStore>(
  store: &S,
  status: Option<ContactStatus>,
  search: &str,
) -> Result<Vec<Contact>> {
  let contacts = store.load().await.context("loading contacts")?;
  Ok(
    collection::filter(&contacts, status, search)
      .into_iter()
      .cloned()
      .collect(),
  )
}

pub async fn stats<S: ContactStore>(store: &S) -> Result<StatusCounts> {
  let contacts = store.load().await.context("loading contacts")?;
  Ok(collection::status_counts(&contacts))
}

// ─── Edits ────────────────────────────────────────────────────────────────────

pub async fn set_status<S: ContactStore>(
  store: &S,
  id: Uuid,
  status: ContactStatus,
) -> Result<()> {
  let contacts = store.load().await.context("loading contacts")?;
  let contacts = collection::set_status(contacts, id, status)?;
  store.save(&contacts).await.context("saving contacts")?;
  info!(%id, %status, "status updated");
  Ok(())
}

pub async fn edit<S: ContactStore>(
  store: &S,
  id: Uuid,
  changes: ContactEdit,
) -> Result<Contact> {
  let contacts = store.load().await.context("loading contacts")?;
  let contacts = collection::edit(contacts, id, changes)?;
  store.save(&contacts).await.context("saving contacts")?;
  info!(%id, "contact edited");
  contacts
    .into_iter()
    .find(|c| c.id == id)
    .ok_or_else(|| gestor_core::Error::ContactNotFound(id).into())
}

pub async fn remove<S: ContactStore>(store: &S, id: Uuid) -> Result<()> {
  let contacts = store.load().await.context("loading contacts")?;
  let contacts = collection::remove(contacts, id)?;
  store.save(&contacts).await.context("saving contacts")?;
  info!(%id, "contact removed");
  Ok(())
}

// ─── Tests ────────────────────────────────────────────────────────────────────

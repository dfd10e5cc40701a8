//! `gestor`: import, reconcile and export the outreach contact list.
//!
//! # Usage
//!
//! ```text
//! gestor import planilla.csv
//! gestor import contactos.vcf
//! gestor export - --format vcard
//! gestor --config ~/.config/gestor/gestor.toml stats
//! ```

mod commands;
mod settings;

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use commands::Format;
use gestor_core::{ContactStatus, collection::ContactEdit};
use gestor_store_sqlite::SqliteStore;
use settings::Settings;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "gestor", version, about = "Reconcile planilla and vCard contact exports")]
struct Cli {
  /// Path to a TOML config file (store_path, store_key, identity).
  #[arg(short, long, value_name = "FILE", default_value = "gestor.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Merge a planilla (.csv) or vCard (.vcf) export into the contact list.
  Import {
    file:   PathBuf,
    /// Override the format inferred from the file extension.
    #[arg(long, value_enum)]
    format: Option<Format>,
  },
  /// Write the contact list as a planilla or vCard file (`-` for stdout).
  Export {
    file:   PathBuf,
    #[arg(long, value_enum)]
    format: Option<Format>,
  },
  /// Print contacts, optionally narrowed by status and a search term.
  List {
    #[arg(long)]
    status: Option<ContactStatus>,
    /// Matches names case-insensitively, or any part of a phone number.
    #[arg(long, default_value = "")]
    search: String,
  },
  /// Print how many contacts are in each status.
  Stats,
  /// Change the status of one contact.
  SetStatus {
    id:     Uuid,
    /// e.g. `jugando`, `no interesado`, or `NOT_INTERESTED`.
    status: ContactStatus,
  },
  /// Change the name, phone or flags of one contact.
  Edit {
    id:           Uuid,
    #[arg(long)]
    name:         Option<String>,
    /// Non-digits are dropped.
    #[arg(long)]
    phone:        Option<String>,
    #[arg(long)]
    seen_replied: Option<bool>,
    #[arg(long)]
    recovered:    Option<bool>,
    #[arg(long)]
    interested:   Option<bool>,
  },
  /// Delete one contact.
  Remove { id: Uuid },
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();
  let settings = Settings::load(&cli.config)?;

  if let Some(parent) = settings.store_path.parent()
    && !parent.as_os_str().is_empty()
  {
    tokio::fs::create_dir_all(parent)
      .await
      .with_context(|| format!("creating {}", parent.display()))?;
  }
  let store = SqliteStore::open(&settings.store_path, settings.store_key.clone())
    .await
    .with_context(|| format!("failed to open store at {:?}", settings.store_path))?;

  match cli.command {
    Command::Import { file, format } => {
      let strategy = settings.identity.strategy();
      let outcome = commands::import(&store, &*strategy, &file, format).await?;
      println!(
        "{} added, {} updated, {} total",
        outcome.added,
        outcome.updated,
        outcome.contacts.len()
      );
    }
    Command::Export { file, format } => {
      commands::export(&store, &file, format).await?;
    }
    Command::List { status, search } => {
      for c in commands::list(&store, status, &search).await? {
        let phone = if c.phone.is_empty() { "-" } else { c.phone.as_str() };
        println!("{}  {:<30}  {:<15}  {:<8}  {}", c.id, c.name, phone, c.origin, c.status);
      }
    }
    Command::Stats => {
      let counts = commands::stats(&store).await?;
      println!("{:<14} {}", "total", counts.total);
      for status in ContactStatus::all() {
        println!("{:<14} {}", status.label(), counts.get(status));
      }
      if let Some(at) = store.saved_at().await? {
        println!("last saved     {}", at.format("%Y-%m-%d %H:%M:%S UTC"));
      }
    }
    Command::SetStatus { id, status } => {
      commands::set_status(&store, id, status).await?;
    }
    Command::Edit {
      id,
      name,
      phone,
      seen_replied,
      recovered,
      interested,
    } => {
      let changes = ContactEdit {
        name,
        phone,
        seen_replied,
        recovered,
        interested,
        ..Default::default()
      };
      let c = commands::edit(&store, id, changes).await?;
      println!("{}  {}  {}", c.id, c.name, c.phone);
    }
    Command::Remove { id } => {
      commands::remove(&store, id).await?;
    }
  }

  Ok(())
}

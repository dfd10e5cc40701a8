//! Runtime settings, layered from an optional TOML file and `GESTOR_*`
//! environment variables.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use gestor_core::{ByName, ByPhone, IdentityStrategy};
use gestor_store_sqlite::DEFAULT_KEY;
use serde::Deserialize;

/// Which key decides that two records are the same person.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityKind {
  #[default]
  Name,
  Phone,
}

impl IdentityKind {
  pub fn strategy(self) -> Box<dyn IdentityStrategy> {
    match self {
      Self::Name => Box::new(ByName),
      Self::Phone => Box::new(ByPhone),
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
  #[serde(default = "default_store_key")]
  pub store_key:  String,
  #[serde(default)]
  pub identity:   IdentityKind,
}

fn default_store_path() -> PathBuf {
  PathBuf::from("~/.local/share/gestor/contacts.db")
}

fn default_store_key() -> String { DEFAULT_KEY.to_string() }

impl Settings {
  /// Read `path` (if it exists) and overlay `GESTOR_*` variables.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("GESTOR"))
      .build()
      .context("failed to read config file")?;

    let mut parsed: Settings = settings
      .try_deserialize()
      .context("failed to deserialise Settings")?;
    parsed.store_path = expand_tilde(&parsed.store_path);
    Ok(parsed)
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use std::io::Write as _;

  use super::*;

  #[test]
  fn missing_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let s = Settings::load(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(s.store_key, DEFAULT_KEY);
    assert_eq!(s.identity, IdentityKind::Name);
    assert!(s.store_path.ends_with("gestor/contacts.db"));
  }

  #[test]
  fn file_values_are_read() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gestor.toml");
    let mut f = std::fs::File::create(&path).unwrap();
    writeln!(f, "store_path = \"/tmp/x.db\"").unwrap();
    writeln!(f, "store_key = \"pruebas\"").unwrap();
    writeln!(f, "identity = \"phone\"").unwrap();
    drop(f);

    let s = Settings::load(&path).unwrap();
    assert_eq!(s.store_path, PathBuf::from("/tmp/x.db"));
    assert_eq!(s.store_key, "pruebas");
    assert_eq!(s.identity, IdentityKind::Phone);
  }

  #[test]
  fn tilde_is_expanded_against_home() {
    let Ok(home) = std::env::var("HOME") else { return };
    assert_eq!(
      expand_tilde(Path::new("~/a/b.db")),
      PathBuf::from(home).join("a/b.db")
    );
    assert_eq!(expand_tilde(Path::new("/abs.db")), PathBuf::from("/abs.db"));
  }
}

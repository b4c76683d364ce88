//! Runtime configuration: defaults, then `cbr.toml`, then `CBR_*` variables.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cbr_core::store::DEFAULT_SLOT;
use serde::Deserialize;

const DEFAULT_STORE_PATH: &str = "~/.local/share/cbr/casebase.sqlite3";

#[derive(Debug, Clone, Deserialize)]
pub struct CliConfig {
  /// SQLite file holding the case base. A leading `~/` is expanded.
  pub store_path: PathBuf,
  /// Slot the case base is stored under.
  pub slot:       String,
}

impl CliConfig {
  /// Read `path` (optional) layered over defaults and under `CBR_*`
  /// environment variables.
  pub fn load(path: &Path) -> Result<Self> {
    let settings = config::Config::builder()
      .set_default("store_path", DEFAULT_STORE_PATH)?
      .set_default("slot", DEFAULT_SLOT)?
      .add_source(config::File::from(path.to_path_buf()).required(false))
      .add_source(config::Environment::with_prefix("CBR"))
      .build()
      .with_context(|| format!("failed to read config file {}", path.display()))?;

    settings
      .try_deserialize()
      .context("failed to deserialise CliConfig")
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
  use super::*;

  #[test]
  fn missing_file_uses_defaults() {
    let cfg = CliConfig::load(Path::new("does-not-exist.toml")).unwrap();
    assert_eq!(cfg.slot, DEFAULT_SLOT);
    assert!(cfg.store_path.ends_with("casebase.sqlite3"));
  }

  #[test]
  fn paths_without_tilde_are_untouched() {
    let p = Path::new("/var/lib/cbr/cases.db");
    assert_eq!(expand_tilde(p), p);
  }
}

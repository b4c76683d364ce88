//! `cbr`: command-line front end for the case-based diagnostic store.
//!
//! # Usage
//!
//! ```
//! cbr symptoms
//! cbr diagnose G05 G26 G08 G14
//! cbr retain G05,G26,G08,G14
//! cbr cases
//! cbr show CASE-003 --json
//! ```

mod commands;
mod render;
mod settings;

use std::path::PathBuf;

use anyhow::{Context, Result};
use cbr_core::{DomainTable, Workbench};
use cbr_store_sqlite::SqliteStore;
use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use settings::CliConfig;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "cbr", version, about = "Case-based diagnostic support")]
struct Args {
  /// Path to a TOML config file (store_path, slot).
  #[arg(short, long, value_name = "FILE", default_value = "cbr.toml")]
  config: PathBuf,

  /// SQLite file holding the case base; overrides the config file.
  #[arg(long, value_name = "FILE")]
  store: Option<PathBuf>,

  /// Persistence slot the case base is stored under.
  #[arg(long)]
  slot: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// List the symptom checklist with per-disease weights.
  Symptoms,

  /// Score a selection against every disease and stored case.
  Diagnose {
    /// Symptom codes, space or comma separated.
    #[arg(required = true, value_delimiter = ',')]
    symptoms: Vec<String>,

    /// Print the evaluation as JSON.
    #[arg(long)]
    json: bool,
  },

  /// Score a selection and retain it as a new case.
  Retain {
    #[arg(required = true, value_delimiter = ',')]
    symptoms: Vec<String>,
  },

  /// Summary of every stored case, newest first.
  Cases,

  /// Details of one stored case, including its stored comparisons.
  Show {
    id: String,

    /// Print the stored record as JSON.
    #[arg(long)]
    json: bool,
  },

  /// Load a stored case's symptoms as a new selection and score it.
  Reuse {
    id: String,

    /// Retain the reused selection as a new case.
    #[arg(long)]
    retain: bool,
  },

  /// Remove a stored case.
  Remove { id: String },

  /// Delete the whole case base and restore the seed cases.
  Clear {
    /// Confirm the deletion.
    #[arg(long)]
    yes: bool,
  },
}

// ─── Entry point ──────────────────────────────────────────────────────────────

fn main() -> Result<()> {
  // Logs go to stderr so command output stays clean.
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  let mut cfg = CliConfig::load(&args.config)?;
  if let Some(store) = args.store {
    cfg.store_path = store;
  }
  if let Some(slot) = args.slot {
    cfg.slot = slot;
  }

  let store_path = settings::expand_tilde(&cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let mut wb = Workbench::open(DomainTable::reference(), &store, cfg.slot.clone())
    .context("domain table is inconsistent")?;

  match args.command {
    Command::Symptoms => commands::symptoms(&wb),
    Command::Diagnose { symptoms, json } => commands::diagnose(&mut wb, &symptoms, json),
    Command::Retain { symptoms } => commands::retain(&mut wb, &symptoms),
    Command::Cases => commands::cases(&wb),
    Command::Show { id, json } => commands::show(&wb, &id, json),
    Command::Reuse { id, retain } => commands::reuse(&mut wb, &id, retain),
    Command::Remove { id } => commands::remove(&mut wb, &id),
    Command::Clear { yes } => commands::clear(&mut wb, yes),
  }
}

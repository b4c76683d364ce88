//! Case records, the unit stored in the case base.
//!
//! A record freezes a selection together with the weights, denominator,
//! scores, and comparisons computed when it was retained. Records are never
//! updated; removal is the only lifecycle event.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::similarity::ScoreSnapshot;

// ─── Identifiers ─────────────────────────────────────────────────────────────

const ID_PREFIX: &str = "CASE-";

/// Format the `n`th case id, e.g. `CASE-003`.
pub fn format_case_id(n: u32) -> String { format!("{ID_PREFIX}{n:03}") }

/// The numeric suffix of a `CASE-NNN` id, if it has one.
pub fn case_number(id: &str) -> Option<u32> {
  id.strip_prefix(ID_PREFIX)?.parse().ok()
}

// ─── Comparisons ─────────────────────────────────────────────────────────────

/// One comparison performed while retaining a case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Comparison {
  /// The selection against every disease of the domain table.
  Diseases {
    label:  String,
    values: BTreeMap<String, ScoreSnapshot>,
  },
  /// The selection against one pre-existing case.
  Case {
    label:          String,
    #[serde(rename = "srcId")]
    source_id:      String,
    matched:        u32,
    total:          u32,
    ratio:          f64,
    #[serde(rename = "dsrc")]
    source_disease: Option<String>,
    #[serde(default)]
    overlap:        Vec<String>,
  },
}

// ─── Record ──────────────────────────────────────────────────────────────────

/// An immutable retained case.
///
/// Later case-to-case comparisons read `weights` and `denom`, never the live
/// domain table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseRecord {
  pub id:          String,
  pub created_at:  DateTime<Utc>,
  /// The selection at retain time. Older records may omit it, which is
  /// not the same as an empty selection.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub symptoms:    Option<Vec<String>>,
  /// The predicted disease at retain time.
  #[serde(default)]
  pub result:      Option<String>,
  /// Weight each symptom contributed for `result`. Keys are a subset of
  /// `symptoms`.
  #[serde(default)]
  pub weights:     BTreeMap<String, u32>,
  /// The case's own denominator. Older records may omit it.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub denom:       Option<u32>,
  /// Disease-level ratios at retain time.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub scores:      Option<BTreeMap<String, f64>>,
  #[serde(default)]
  pub comparisons: Vec<Comparison>,
}

impl CaseRecord {
  /// The stored `denom`, or the sum of `weights` when absent.
  pub fn denominator(&self) -> u32 {
    self.denom.unwrap_or_else(|| self.weight_mass())
  }

  /// Sum of `weights`, saturating at `u32::MAX`.
  pub fn weight_mass(&self) -> u32 {
    self
      .weights
      .values()
      .fold(0u32, |mass, w| mass.saturating_add(*w))
  }

  /// The recorded symptoms, empty when the record has none.
  pub fn symptom_codes(&self) -> &[String] {
    self.symptoms.as_deref().unwrap_or_default()
  }

  pub fn number(&self) -> Option<u32> { case_number(&self.id) }
}

/// The label shown for a stored case, with the ratio it was assigned at.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignedLabel {
  pub label: Option<String>,
  pub ratio: f64,
}

//! The case base: an ordered, in-memory collection of retained cases.
//!
//! Persistence is not handled here; see [`crate::workbench::Workbench`],
//! which writes the collection back after every mutation.

use std::{cmp::Ordering, collections::BTreeMap};

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::{
  Error, Result,
  domain::DomainTable,
  record::{AssignedLabel, CaseRecord, format_case_id},
  similarity::disease_similarity,
};

// ─── Seeds ───────────────────────────────────────────────────────────────────

/// Retain time recorded on the seed cases (2024-01-01T00:00:00Z).
const SEEDED_AT: i64 = 1_704_067_200;

/// The two hand-verified cases every case base must contain.
pub fn seed_cases() -> Vec<CaseRecord> {
  vec![
    seed(
      "CASE-001",
      &[
        ("G05", 1),
        ("G26", 4),
        ("G08", 2),
        ("G14", 1),
        ("G20", 4),
        ("G07", 1),
        ("G17", 1),
        ("G25", 2),
        ("G04", 1),
        ("G27", 3),
      ],
      20,
      [0.357142857, 0.307692308, 0.65],
    ),
    seed(
      "CASE-002",
      &[
        ("G05", 1),
        ("G06", 1),
        ("G07", 1),
        ("G14", 1),
        ("G17", 1),
        ("G18", 2),
        ("G20", 4),
        ("G23", 3),
        ("G25", 2),
        ("G27", 3),
      ],
      19,
      [0.2142857, 0.3461538, 0.55],
    ),
  ]
}

fn seed(id: &str, weights: &[(&str, u32)], denom: u32, scores: [f64; 3]) -> CaseRecord {
  CaseRecord {
    id: id.to_owned(),
    created_at: DateTime::<Utc>::from_timestamp(SEEDED_AT, 0).unwrap_or_default(),
    symptoms: Some(weights.iter().map(|(code, _)| (*code).to_owned()).collect()),
    result: Some("P3".to_owned()),
    weights: weights
      .iter()
      .map(|(code, w)| ((*code).to_owned(), *w))
      .collect(),
    denom: Some(denom),
    scores: Some(
      ["P1", "P2", "P3"]
        .into_iter()
        .map(str::to_owned)
        .zip(scores)
        .collect(),
    ),
    comparisons: Vec::new(),
  }
}

// ─── Decoding ────────────────────────────────────────────────────────────────

/// Decode a persisted case-base payload, dropping whatever does not parse.
///
/// A payload that is not a JSON array yields no records; array elements that
/// are not valid case records are skipped individually.
pub fn decode_records(payload: &str) -> Vec<CaseRecord> {
  let values: Vec<serde_json::Value> = match serde_json::from_str(payload) {
    Ok(values) => values,
    Err(e) => {
      warn!(error = %e, "persisted case base is malformed; starting empty");
      return Vec::new();
    }
  };

  values
    .into_iter()
    .enumerate()
    .filter_map(|(index, value)| match serde_json::from_value(value) {
      Ok(record) => Some(record),
      Err(e) => {
        warn!(index, error = %e, "skipping malformed case record");
        None
      }
    })
    .collect()
}

// ─── CaseBase ────────────────────────────────────────────────────────────────

/// Retained cases in enumeration order. Ids are unique.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaseBase {
  records: Vec<CaseRecord>,
}

impl CaseBase {
  pub fn empty() -> Self { Self::default() }

  /// Build the in-memory case base from a persisted payload.
  ///
  /// Records keep their persisted order, first occurrence winning on
  /// duplicate ids. Seed cases missing by id are appended; a persisted record
  /// is never replaced by a seed.
  pub fn load(persisted: Option<&str>) -> Self {
    let mut base = Self::empty();

    for record in persisted.map(decode_records).unwrap_or_default() {
      if let Err(e) = base.append(record) {
        warn!(error = %e, "dropping duplicate case record");
      }
    }

    for seed in seed_cases() {
      if !base.contains(&seed.id) {
        debug!(id = %seed.id, "seeding required case");
        base.records.push(seed);
      }
    }

    base
  }

  pub fn records(&self) -> &[CaseRecord] { &self.records }

  pub fn iter(&self) -> impl DoubleEndedIterator<Item = &CaseRecord> { self.records.iter() }

  pub fn len(&self) -> usize { self.records.len() }

  pub fn is_empty(&self) -> bool { self.records.is_empty() }

  pub fn get(&self, id: &str) -> Option<&CaseRecord> {
    self.records.iter().find(|r| r.id == id)
  }

  pub fn contains(&self, id: &str) -> bool { self.get(id).is_some() }

  /// Add `record` at the end of the enumeration order.
  pub fn append(&mut self, record: CaseRecord) -> Result<()> {
    if self.contains(&record.id) {
      return Err(Error::DuplicateCaseId(record.id));
    }
    self.records.push(record);
    Ok(())
  }

  /// Remove the record with `id`. Absent ids are not an error.
  pub fn remove(&mut self, id: &str) -> Option<CaseRecord> {
    let pos = self.records.iter().position(|r| r.id == id)?;
    Some(self.records.remove(pos))
  }

  /// The id the next retained case gets: one past the highest `CASE-NNN`
  /// number present, so ids are never reused while their holder exists.
  pub fn next_id(&self) -> String {
    let highest = self
      .records
      .iter()
      .filter_map(CaseRecord::number)
      .max()
      .unwrap_or(0);
    let len = u32::try_from(self.records.len()).unwrap_or(u32::MAX);

    // Past `CASE-4294967295` there is nothing higher; probe from 1 instead.
    let start = highest.max(len).checked_add(1).unwrap_or(1);
    let n = (start..=u32::MAX)
      .chain(1..start)
      .find(|n| !self.contains(&format_case_id(*n)))
      .unwrap_or(start);
    format_case_id(n)
  }

  /// Serialise the whole collection as the persisted JSON array.
  pub fn to_json(&self) -> Result<String> {
    Ok(serde_json::to_string(&self.records)?)
  }
}

// ─── Assigned label ──────────────────────────────────────────────────────────

/// The label to display for a stored case.
///
/// Prefers the frozen `scores` snapshot; otherwise rescores the record's
/// symptoms against `table` (an empty list still counts); otherwise falls back to the stored result at
/// ratio 0. Older and partially populated records stay displayable this way.
pub fn assigned_label_for(table: &DomainTable, record: &CaseRecord) -> AssignedLabel {
  if let Some(scores) = record.scores.as_ref().filter(|s| !s.is_empty()) {
    return best_snapshot(scores);
  }

  if let Some(symptoms) = &record.symptoms {
    let scores = disease_similarity(table, symptoms.iter().map(String::as_str));
    if let Some(best) = scores.best() {
      return AssignedLabel {
        label: Some(best.disease.to_owned()),
        ratio: best.score.ratio(),
      };
    }
  }

  AssignedLabel { label: record.result.clone(), ratio: 0.0 }
}

/// Highest ratio in the snapshot, earliest key on ties.
fn best_snapshot(scores: &BTreeMap<String, f64>) -> AssignedLabel {
  let mut best: Option<(&String, f64)> = None;
  for (code, ratio) in scores {
    let better = match best {
      None => true,
      Some((_, b)) => ratio.partial_cmp(&b) == Some(Ordering::Greater),
    };
    if better {
      best = Some((code, *ratio));
    }
  }

  match best {
    Some((code, ratio)) => AssignedLabel { label: Some(code.clone()), ratio },
    None => AssignedLabel { label: None, ratio: 0.0 },
  }
}

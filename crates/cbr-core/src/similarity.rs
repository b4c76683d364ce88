//! The similarity engine.
//!
//! Two pure functions: [`disease_similarity`] scores a selection against the
//! live domain table, [`case_similarity`] scores it against a retained case's
//! own frozen weights. Both yield exact integer fractions; `f64` only appears
//! when a ratio is displayed or snapshotted.

use std::{cmp::Ordering, fmt};

use serde::{Deserialize, Serialize};

use crate::{domain::DomainTable, record::CaseRecord};

// ─── Score ───────────────────────────────────────────────────────────────────

/// Matched weight over total weight. A zero total means ratio 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Score {
  pub matched: u32,
  pub total:   u32,
}

impl Score {
  pub fn new(matched: u32, total: u32) -> Self { Self { matched, total } }

  pub fn ratio(&self) -> f64 {
    if self.total == 0 {
      0.0
    } else {
      f64::from(self.matched) / f64::from(self.total)
    }
  }

  pub fn is_positive(&self) -> bool { self.total > 0 && self.matched > 0 }

  /// Compare ratios exactly by cross-multiplication.
  pub fn cmp_ratio(&self, other: &Self) -> Ordering {
    let (a, b) = self.fraction();
    let (c, d) = other.fraction();
    (a * d).cmp(&(c * b))
  }

  /// The ratio as `numerator / denominator` with a non-zero denominator.
  fn fraction(&self) -> (u64, u64) {
    if self.total == 0 {
      (0, 1)
    } else {
      (u64::from(self.matched), u64::from(self.total))
    }
  }

  pub fn snapshot(&self) -> ScoreSnapshot {
    ScoreSnapshot {
      matched: self.matched,
      total:   self.total,
      ratio:   self.ratio(),
    }
  }
}

/// The persisted form of a [`Score`], ratio included.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreSnapshot {
  pub matched: u32,
  pub total:   u32,
  pub ratio:   f64,
}

/// Format a ratio as a percentage with four decimals, e.g. `65.0000%`.
pub struct Percent(pub f64);

impl fmt::Display for Percent {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.0.is_nan() {
      f.write_str("-")
    } else {
      write!(f, "{:.4}%", self.0 * 100.0)
    }
  }
}

// ─── Selection ───────────────────────────────────────────────────────────────

/// The in-progress set of symptom codes, in the order they were selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
  codes: Vec<String>,
}

impl Selection {
  pub fn new() -> Self { Self::default() }

  /// Flip membership of `code`; returns whether it is now selected.
  pub fn toggle(&mut self, code: &str) -> bool {
    if let Some(pos) = self.codes.iter().position(|c| c == code) {
      self.codes.remove(pos);
      false
    } else {
      self.codes.push(code.to_owned());
      true
    }
  }

  pub fn insert(&mut self, code: &str) -> bool {
    if self.contains(code) {
      return false;
    }
    self.codes.push(code.to_owned());
    true
  }

  pub fn contains(&self, code: &str) -> bool {
    self.codes.iter().any(|c| c == code)
  }

  pub fn clear(&mut self) { self.codes.clear(); }

  pub fn is_empty(&self) -> bool { self.codes.is_empty() }

  pub fn len(&self) -> usize { self.codes.len() }

  pub fn iter(&self) -> impl Iterator<Item = &str> + Clone {
    self.codes.iter().map(String::as_str)
  }

  pub fn to_vec(&self) -> Vec<String> { self.codes.clone() }
}

impl<S: AsRef<str>> FromIterator<S> for Selection {
  fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
    let mut selection = Self::new();
    for code in iter {
      selection.insert(code.as_ref());
    }
    selection
  }
}

// ─── Disease-level similarity ────────────────────────────────────────────────

/// One disease's score against a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiseaseScore {
  pub disease: &'static str,
  pub score:   Score,
}

/// Scores for every disease of a table, in table order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiseaseScores(Vec<DiseaseScore>);

impl DiseaseScores {
  pub fn get(&self, disease: &str) -> Option<Score> {
    self.0.iter().find(|d| d.disease == disease).map(|d| d.score)
  }

  pub fn iter(&self) -> impl Iterator<Item = &DiseaseScore> { self.0.iter() }

  /// The disease with the highest ratio; the first in table order on ties.
  pub fn best(&self) -> Option<&DiseaseScore> {
    self.0.iter().fold(None, |best, d| match best {
      Some(b) if d.score.cmp_ratio(&b.score) != Ordering::Greater => Some(b),
      _ => Some(d),
    })
  }
}

/// Score `selection` against every disease of `table`.
///
/// `matched` is the sum of the selected symptoms' weights for the disease;
/// `total` is the disease's fixed denominator.
pub fn disease_similarity<'a>(
  table: &DomainTable,
  selection: impl IntoIterator<Item = &'a str> + Clone,
) -> DiseaseScores {
  let scores = table
    .diseases()
    .iter()
    .map(|disease| {
      let matched = selection
        .clone()
        .into_iter()
        .map(|s| table.weight_of(s, disease.code))
        .sum();
      DiseaseScore {
        disease: disease.code,
        score:   Score::new(matched, disease.denominator),
      }
    })
    .collect();
  DiseaseScores(scores)
}

// ─── Case-level similarity ───────────────────────────────────────────────────

/// A selection's score against one retained case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseMatch {
  pub score:          Score,
  /// The retained case's own result.
  pub source_disease: Option<String>,
  /// Selected symptoms that the case recorded a weight for, in selection
  /// order.
  pub overlap:        Vec<String>,
}

/// Score `selection` against `case` using only the case's frozen weights.
///
/// The live domain table is not consulted, so a case stays
/// self-consistent after the table is revised.
pub fn case_similarity<'a>(
  selection: impl IntoIterator<Item = &'a str>,
  case: &CaseRecord,
) -> CaseMatch {
  let mut overlap = Vec::new();
  let mut matched: u32 = 0;
  for code in selection {
    if let Some(w) = case.weights.get(code) {
      matched = matched.saturating_add(*w);
      overlap.push(code.to_owned());
    }
  }

  CaseMatch {
    score: Score::new(matched, case.denominator()),
    source_disease: case.result.clone(),
    overlap,
  }
}

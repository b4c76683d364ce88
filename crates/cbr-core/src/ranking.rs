//! The ranking policy.
//!
//! Every disease and every retained case becomes a [`Candidate`]; candidates
//! are ordered best-first and the top one names the prediction.

use std::cmp::Ordering;

use strum::AsRefStr;
use tracing::debug;

use crate::{
  domain::DomainTable,
  record::CaseRecord,
  similarity::{
    CaseMatch, DiseaseScores, Score, Selection, case_similarity,
    disease_similarity,
  },
};

// ─── Candidate ───────────────────────────────────────────────────────────────

/// Where a candidate's evidence comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum CandidateKind {
  /// The selection against a disease of the domain table.
  Disease,
  /// The selection against a retained case.
  Case,
}

impl CandidateKind {
  /// Case-level evidence is more specific and wins otherwise-equal ties.
  fn specificity(self) -> u8 {
    match self {
      Self::Disease => 0,
      Self::Case => 1,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
  /// The disease this candidate votes for: the disease itself, or the case's
  /// own result.
  pub label:     Option<String>,
  pub score:     Score,
  pub kind:      CandidateKind,
  /// The retained case's id for case-level candidates.
  pub source_id: Option<String>,
}

/// Best-first: higher ratio, then higher matched weight, then case-level
/// before disease-level. Anything still tied keeps enumeration order.
fn best_first(a: &Candidate, b: &Candidate) -> Ordering {
  b.score
    .cmp_ratio(&a.score)
    .then_with(|| b.score.matched.cmp(&a.score.matched))
    .then_with(|| b.kind.specificity().cmp(&a.kind.specificity()))
}

// ─── Ranking ─────────────────────────────────────────────────────────────────

/// Candidates in best-first order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Ranking {
  candidates: Vec<Candidate>,
}

impl Ranking {
  pub fn new(mut candidates: Vec<Candidate>) -> Self {
    // `sort_by` is stable, which is the final tie-break.
    candidates.sort_by(best_first);
    Self { candidates }
  }

  pub fn candidates(&self) -> &[Candidate] { &self.candidates }

  /// The top candidate, unless nothing scored above zero.
  pub fn top(&self) -> Option<&Candidate> {
    self.candidates.first().filter(|c| c.score.is_positive())
  }

  /// The predicted disease code.
  pub fn prediction(&self) -> Option<&str> {
    self.top().and_then(|c| c.label.as_deref())
  }
}

// ─── Evaluation ──────────────────────────────────────────────────────────────

/// A selection scored against one retained case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseComparison {
  pub source_id: String,
  pub matched:   CaseMatch,
}

/// Everything computed for a selection: the live feedback shown on every
/// selection change, and the inputs the retain protocol freezes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
  pub diseases: DiseaseScores,
  /// One entry per retained case, in case-base order.
  pub cases:    Vec<CaseComparison>,
  pub ranking:  Ranking,
}

impl Evaluation {
  pub fn prediction(&self) -> Option<&str> { self.ranking.prediction() }
}

/// Score `selection` against the table and every case, and rank the results.
pub fn evaluate(
  table: &DomainTable,
  selection: &Selection,
  cases: &[CaseRecord],
) -> Evaluation {
  let diseases = disease_similarity(table, selection.iter());

  let cases: Vec<CaseComparison> = cases
    .iter()
    .map(|case| CaseComparison {
      source_id: case.id.clone(),
      matched:   case_similarity(selection.iter(), case),
    })
    .collect();

  let disease_candidates = diseases.iter().map(|d| Candidate {
    label:     Some(d.disease.to_owned()),
    score:     d.score,
    kind:      CandidateKind::Disease,
    source_id: None,
  });
  let case_candidates = cases.iter().map(|c| Candidate {
    label:     c.matched.source_disease.clone(),
    score:     c.matched.score,
    kind:      CandidateKind::Case,
    source_id: Some(c.source_id.clone()),
  });

  let ranking = Ranking::new(disease_candidates.chain(case_candidates).collect());

  debug!(
    selected = selection.len(),
    candidates = ranking.candidates().len(),
    prediction = ?ranking.prediction(),
    "evaluated selection"
  );

  Evaluation { diseases, cases, ranking }
}

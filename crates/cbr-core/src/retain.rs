//! The retain protocol: freeze a selection and everything computed for it
//! into a new [`CaseRecord`].
//!
//! A retained case's weights are taken from whichever disease the ranking
//! predicts at retain time, so the same symptoms can be retained under
//! different weight snapshots depending on what the case base held then.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::{
  case_base::CaseBase,
  domain::DomainTable,
  ranking::{Evaluation, evaluate},
  record::{CaseRecord, Comparison},
  similarity::Selection,
};

/// Build the record that retaining `selection` would produce.
///
/// Returns `None` for an empty selection. Nothing is mutated; the caller
/// appends the record.
pub fn build_record(
  table: &DomainTable,
  selection: &Selection,
  cases: &CaseBase,
  id: String,
  created_at: DateTime<Utc>,
) -> Option<CaseRecord> {
  if selection.is_empty() {
    return None;
  }

  let evaluation = evaluate(table, selection, cases.records());
  let result = evaluation.prediction().map(str::to_owned);

  let weights: BTreeMap<String, u32> = selection
    .iter()
    .map(|code| {
      let w = result.as_deref().map_or(0, |d| table.weight_of(code, d));
      (code.to_owned(), w)
    })
    .collect();
  let denom = weights.values().sum();

  let scores = evaluation
    .diseases
    .iter()
    .map(|d| (d.disease.to_owned(), d.score.ratio()))
    .collect();

  Some(CaseRecord {
    id,
    created_at,
    symptoms: Some(selection.to_vec()),
    result,
    weights,
    denom: Some(denom),
    scores: Some(scores),
    comparisons: comparisons(table, &evaluation, cases),
  })
}

/// The aggregate disease comparison followed by one entry per existing case,
/// in case-base order.
fn comparisons(
  table: &DomainTable,
  evaluation: &Evaluation,
  cases: &CaseBase,
) -> Vec<Comparison> {
  let codes: Vec<&str> = table.diseases().iter().map(|d| d.code).collect();

  let aggregate = Comparison::Diseases {
    label:  format!("vs diseases ({})", codes.join(",")),
    values: evaluation
      .diseases
      .iter()
      .map(|d| (d.disease.to_owned(), d.score.snapshot()))
      .collect(),
  };

  let per_case = evaluation.cases.iter().map(|c| {
    let base = cases
      .get(&c.source_id)
      .and_then(|r| r.result.as_deref())
      .unwrap_or("-");
    Comparison::Case {
      label:          format!("vs {} (base:{base})", c.source_id),
      source_id:      c.source_id.clone(),
      matched:        c.matched.score.matched,
      total:          c.matched.score.total,
      ratio:          c.matched.score.ratio(),
      source_disease: c.matched.source_disease.clone(),
      overlap:        c.matched.overlap.clone(),
    }
  });

  std::iter::once(aggregate).chain(per_case).collect()
}

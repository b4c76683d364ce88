//! Text and JSON renderings of evaluations and stored cases.

use cbr_core::{
  CaseRecord, DomainTable,
  domain::WeightChips,
  ranking::{CandidateKind, Evaluation},
  record::{AssignedLabel, Comparison},
  similarity::{Percent, Selection},
};
use chrono::Local;
use serde::Serialize;

// ─── Checklist ────────────────────────────────────────────────────────────────

pub fn checklist(table: &DomainTable) -> String {
  let mut out = String::new();
  for symptom in table.symptoms() {
    out.push_str(&format!(
      "{:<4} {:<28} {}\n",
      symptom.code,
      symptom.name,
      WeightChips { table, symptom },
    ));
  }
  out
}

// ─── Evaluation ───────────────────────────────────────────────────────────────

pub fn evaluation(table: &DomainTable, selection: &Selection, eval: &Evaluation) -> String {
  let mut out = String::new();
  out.push_str(&format!("Selection: {}\n\n", join(selection.iter())));

  out.push_str("Similarity vs diseases\n");
  for d in eval.diseases.iter() {
    out.push_str(&format!(
      "  {:<3} {:<36} matched {:>2} / total {:>2}  {:>9}\n",
      d.disease,
      table.disease_name(d.disease),
      d.score.matched,
      d.score.total,
      Percent(d.score.ratio()).to_string(),
    ));
  }

  out.push_str("\nSimilarity vs stored cases\n");
  if eval.cases.is_empty() {
    out.push_str("  (no stored cases)\n");
  }
  for c in &eval.cases {
    let m = &c.matched;
    out.push_str(&format!(
      "  {:<9} base:{:<3} matched {:>2} / total {:>2}  {:>9}  overlap: {}\n",
      c.source_id,
      m.source_disease.as_deref().unwrap_or("-"),
      m.score.matched,
      m.score.total,
      Percent(m.score.ratio()).to_string(),
      join(m.overlap.iter().map(String::as_str)),
    ));
  }

  out.push('\n');
  match eval.ranking.top() {
    Some(top) => {
      let label = top.label.as_deref().unwrap_or("-");
      let via = match (top.kind, top.source_id.as_deref()) {
        (CandidateKind::Case, Some(id)) => format!("via {id}"),
        _ => "via disease table".to_owned(),
      };
      out.push_str(&format!(
        "Prediction: {label} - {} ({}, {via})\n",
        table.disease_name(label),
        Percent(top.score.ratio()),
      ));
    }
    None => out.push_str("Prediction: none\n"),
  }
  out
}

#[derive(Serialize)]
struct ScoreView<'a> {
  kind:      &'a str,
  label:     Option<&'a str>,
  #[serde(skip_serializing_if = "Option::is_none")]
  source_id: Option<&'a str>,
  matched:   u32,
  total:     u32,
  ratio:     f64,
}

#[derive(Serialize)]
struct EvaluationView<'a> {
  selection:  Vec<&'a str>,
  prediction: Option<&'a str>,
  /// Every candidate, best first.
  candidates: Vec<ScoreView<'a>>,
}

pub fn evaluation_json(selection: &Selection, eval: &Evaluation) -> serde_json::Result<String> {
  let view = EvaluationView {
    selection:  selection.iter().collect(),
    prediction: eval.prediction(),
    candidates: eval
      .ranking
      .candidates()
      .iter()
      .map(|c| ScoreView {
        kind:      c.kind.as_ref(),
        label:     c.label.as_deref(),
        source_id: c.source_id.as_deref(),
        matched:   c.score.matched,
        total:     c.score.total,
        ratio:     c.score.ratio(),
      })
      .collect(),
  };
  serde_json::to_string_pretty(&view)
}

// ─── Stored cases ─────────────────────────────────────────────────────────────

fn assigned_label(table: &DomainTable, assigned: &AssignedLabel) -> String {
  let code = assigned.label.as_deref().unwrap_or("-");
  format!(
    "{code} - {} ({})",
    table.disease_name(code),
    Percent(assigned.ratio)
  )
}

fn timestamp(record: &CaseRecord) -> String {
  record
    .created_at
    .with_timezone(&Local)
    .format("%Y-%m-%d %H:%M")
    .to_string()
}

/// One summary row per case.
pub fn summary_row(record: &CaseRecord, assigned: &AssignedLabel) -> String {
  format!(
    "{:<9} {:<16} {:<3} {:>9}  denom {:>2}  {}",
    record.id,
    timestamp(record),
    assigned.label.as_deref().unwrap_or("-"),
    Percent(assigned.ratio).to_string(),
    record.denominator(),
    record.symptom_codes().join(", "),
  )
}

pub fn details(table: &DomainTable, record: &CaseRecord, assigned: &AssignedLabel) -> String {
  let mut out = String::new();
  out.push_str(&format!("{} • {}\n", record.id, timestamp(record)));
  out.push_str(&format!("Assigned:    {}\n", assigned_label(table, assigned)));
  out.push_str(&format!(
    "Result:      {}\n",
    record.result.as_deref().unwrap_or("-")
  ));
  out.push_str(&format!("Symptoms:    {}\n", record.symptom_codes().join(", ")));
  out.push_str(&format!(
    "Weights:     {}\n",
    record
      .weights
      .iter()
      .map(|(g, w)| format!("{g}(w:{w})"))
      .collect::<Vec<_>>()
      .join(", ")
  ));
  out.push_str(&format!("Denominator: {}\n", record.denominator()));

  out.push_str("Stored similarity snapshot:\n");
  if record.comparisons.is_empty() {
    out.push_str("  (none)\n");
  }
  for cmp in &record.comparisons {
    match cmp {
      Comparison::Diseases { label, values } => {
        let parts: Vec<String> = values
          .iter()
          .map(|(code, v)| format!("{code}={}", Percent(v.ratio)))
          .collect();
        out.push_str(&format!("  {label}: {}\n", parts.join(", ")));
      }
      Comparison::Case { label, matched, total, ratio, .. } => {
        out.push_str(&format!(
          "  {label} -> {} (matched {matched}/{total})\n",
          Percent(*ratio)
        ));
      }
    }
  }
  out
}

fn join<'a>(codes: impl Iterator<Item = &'a str>) -> String {
  let codes: Vec<&str> = codes.collect();
  if codes.is_empty() {
    "-".to_owned()
  } else {
    codes.join(", ")
  }
}

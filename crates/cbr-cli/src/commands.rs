//! Subcommand handlers. Each one drives the [`Workbench`] and prints to
//! stdout.

use anyhow::{Context, Result, bail};
use cbr_core::{Workbench, store::CaseStore};

use crate::render;

/// Normalise user input: `g05` and ` G05 ` both mean `G05`.
fn normalise(codes: &[String]) -> Vec<String> {
  codes
    .iter()
    .map(|c| c.trim().to_ascii_uppercase())
    .filter(|c| !c.is_empty())
    .collect()
}

pub fn symptoms<S: CaseStore>(wb: &Workbench<S>) -> Result<()> {
  print!("{}", render::checklist(wb.table()));
  Ok(())
}

pub fn diagnose<S: CaseStore>(wb: &mut Workbench<S>, codes: &[String], json: bool) -> Result<()> {
  wb.select(normalise(codes))?;
  print_evaluation(wb, json)
}

fn print_evaluation<S: CaseStore>(wb: &Workbench<S>, json: bool) -> Result<()> {
  let eval = wb.evaluate();
  if json {
    println!("{}", render::evaluation_json(wb.selection(), &eval)?);
  } else {
    print!("{}", render::evaluation(wb.table(), wb.selection(), &eval));
  }
  Ok(())
}

pub fn retain<S: CaseStore>(wb: &mut Workbench<S>, codes: &[String]) -> Result<()> {
  wb.select(normalise(codes))?;
  retain_selection(wb)
}

fn retain_selection<S: CaseStore>(wb: &mut Workbench<S>) -> Result<()> {
  let table = wb.table();
  let Some(record) = wb.retain()?.cloned() else {
    bail!("nothing selected; select at least one symptom to retain a case");
  };
  let assigned = wb.assigned(&record);
  print!("{}", render::details(table, &record, &assigned));
  Ok(())
}

pub fn cases<S: CaseStore>(wb: &Workbench<S>) -> Result<()> {
  if wb.cases().is_empty() {
    println!("No stored cases.");
    return Ok(());
  }
  for record in wb.cases().iter().rev() {
    println!("{}", render::summary_row(record, &wb.assigned(record)));
  }
  Ok(())
}

pub fn show<S: CaseStore>(wb: &Workbench<S>, id: &str, json: bool) -> Result<()> {
  let record = wb
    .cases()
    .get(id)
    .with_context(|| format!("case not found: {id}"))?;
  if json {
    println!("{}", serde_json::to_string_pretty(record)?);
  } else {
    print!("{}", render::details(wb.table(), record, &wb.assigned(record)));
  }
  Ok(())
}

pub fn reuse<S: CaseStore>(wb: &mut Workbench<S>, id: &str, retain: bool) -> Result<()> {
  wb.reuse(id)?;
  if retain {
    retain_selection(wb)
  } else {
    print_evaluation(wb, false)
  }
}

pub fn remove<S: CaseStore>(wb: &mut Workbench<S>, id: &str) -> Result<()> {
  match wb.remove(id) {
    Some(record) => println!("Removed {}.", record.id),
    None => println!("No case {id}; nothing removed."),
  }
  Ok(())
}

pub fn clear<S: CaseStore>(wb: &mut Workbench<S>, yes: bool) -> Result<()> {
  if !yes {
    bail!("refusing to delete the whole case base without --yes");
  }
  wb.clear();
  println!("Case base cleared; {} seed cases restored.", wb.cases().len());
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn normalise_uppercases_and_trims() {
    let input = vec![" g05".to_owned(), "G26 ".to_owned(), String::new()];
    assert_eq!(normalise(&input), ["G05", "G26"]);
  }
}

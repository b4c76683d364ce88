//! [`Workbench`]: the application state a front end drives.
//!
//! Holds the live selection and the case base, and writes the case base to
//! its [`CaseStore`] after every mutation. Writes are best-effort: a failure
//! is logged and the in-memory case base stays authoritative.

use chrono::Utc;
use tracing::{info, warn};

use crate::{
  Error, Result,
  case_base::{CaseBase, assigned_label_for},
  domain::DomainTable,
  ranking::{Evaluation, evaluate},
  record::{AssignedLabel, CaseRecord},
  retain::build_record,
  similarity::Selection,
  store::CaseStore,
};

pub struct Workbench<S: CaseStore> {
  table:     &'static DomainTable,
  store:     S,
  slot:      String,
  selection: Selection,
  cases:     CaseBase,
}

impl<S: CaseStore> Workbench<S> {
  /// Load the case base from `slot`, merge in the seed cases, and write the
  /// merged collection straight back.
  ///
  /// Fails only if `table` is inconsistent; unreadable or malformed storage
  /// is treated as empty.
  pub fn open(
    table: &'static DomainTable,
    store: S,
    slot: impl Into<String>,
  ) -> Result<Self> {
    table.verify()?;
    let slot = slot.into();

    let persisted = match store.read_slot(&slot) {
      Ok(payload) => payload,
      Err(e) => {
        warn!(slot = %slot, error = %e, "failed to read case base; starting empty");
        None
      }
    };

    let cases = CaseBase::load(persisted.as_deref());
    info!(slot = %slot, cases = cases.len(), "case base loaded");

    let workbench = Self {
      table,
      store,
      slot,
      selection: Selection::new(),
      cases,
    };
    workbench.persist();
    Ok(workbench)
  }

  pub fn table(&self) -> &'static DomainTable { self.table }

  pub fn cases(&self) -> &CaseBase { &self.cases }

  pub fn selection(&self) -> &Selection { &self.selection }

  // ── Selection ─────────────────────────────────────────────────────────

  /// Flip a symptom in the selection; returns whether it is now selected.
  pub fn toggle(&mut self, code: &str) -> Result<bool> {
    self.known_symptom(code)?;
    Ok(self.selection.toggle(code))
  }

  /// Replace the selection with `codes`.
  pub fn select<I>(&mut self, codes: I) -> Result<()>
  where
    I: IntoIterator,
    I::Item: AsRef<str>,
  {
    let mut selection = Selection::new();
    for code in codes {
      let code = code.as_ref();
      self.known_symptom(code)?;
      selection.insert(code);
    }
    self.selection = selection;
    Ok(())
  }

  /// Clear the selection. The case base is untouched.
  pub fn reset(&mut self) { self.selection.clear(); }

  /// Load a stored case's symptoms as the new selection.
  pub fn reuse(&mut self, id: &str) -> Result<&Selection> {
    let record = self
      .cases
      .get(id)
      .ok_or_else(|| Error::CaseNotFound(id.to_owned()))?;
    self.selection = record.symptom_codes().iter().collect();
    Ok(&self.selection)
  }

  fn known_symptom(&self, code: &str) -> Result<()> {
    match self.table.symptom(code) {
      Some(_) => Ok(()),
      None => Err(Error::UnknownSymptom(code.to_owned())),
    }
  }

  // ── Scoring ───────────────────────────────────────────────────────────

  /// Score the current selection against the table and every stored case.
  pub fn evaluate(&self) -> Evaluation {
    evaluate(self.table, &self.selection, self.cases.records())
  }

  pub fn assigned(&self, record: &CaseRecord) -> AssignedLabel {
    assigned_label_for(self.table, record)
  }

  // ── Case base ─────────────────────────────────────────────────────────

  /// Freeze the current selection into a new case and persist.
  ///
  /// Does nothing and returns `None` when the selection is empty.
  pub fn retain(&mut self) -> Result<Option<&CaseRecord>> {
    let id = self.cases.next_id();
    let Some(record) =
      build_record(self.table, &self.selection, &self.cases, id, Utc::now())
    else {
      return Ok(None);
    };

    info!(
      id = %record.id,
      result = ?record.result,
      symptoms = record.symptom_codes().len(),
      denom = record.denominator(),
      "retained case"
    );

    let id = record.id.clone();
    self.cases.append(record)?;
    self.persist();
    Ok(self.cases.get(&id))
  }

  /// Remove a stored case and persist. Absent ids are not an error.
  pub fn remove(&mut self, id: &str) -> Option<CaseRecord> {
    let removed = self.cases.remove(id);
    if removed.is_some() {
      info!(id, "removed case");
    }
    self.persist();
    removed
  }

  /// Wipe the persisted case base and start over from the seed cases.
  pub fn clear(&mut self) {
    if let Err(e) = self.store.clear_slot(&self.slot) {
      warn!(slot = %self.slot, error = %e, "failed to clear case base");
    }
    self.cases = CaseBase::load(None);
    self.selection.clear();
    info!(cases = self.cases.len(), "case base reset to seed cases");
    self.persist();
  }

  fn persist(&self) {
    let payload = match self.cases.to_json() {
      Ok(payload) => payload,
      Err(e) => {
        warn!(error = %e, "failed to serialise case base");
        return;
      }
    };
    if let Err(e) = self.store.write_slot(&self.slot, &payload) {
      warn!(slot = %self.slot, error = %e, "failed to persist case base");
    }
  }
}

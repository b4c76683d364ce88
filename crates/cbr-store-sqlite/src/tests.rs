//! Integration tests for `SqliteStore` against an in-memory database.

use cbr_core::{
  DomainTable, Workbench,
  store::{CaseStore, DEFAULT_SLOT},
};

use crate::SqliteStore;

fn store() -> SqliteStore {
  SqliteStore::open_in_memory().expect("in-memory store")
}

// ─── Slots ───────────────────────────────────────────────────────────────────

#[test]
fn missing_slot_reads_none() {
  let s = store();
  assert_eq!(s.read_slot("nothing").unwrap(), None);
  assert_eq!(s.updated_at("nothing").unwrap(), None);
}

#[test]
fn write_then_read_slot() {
  let s = store();
  s.write_slot("a", "[1,2,3]").unwrap();
  assert_eq!(s.read_slot("a").unwrap().as_deref(), Some("[1,2,3]"));
  assert!(s.updated_at("a").unwrap().is_some());
}

#[test]
fn write_replaces_existing_payload() {
  let s = store();
  s.write_slot("a", "first").unwrap();
  s.write_slot("a", "second").unwrap();
  assert_eq!(s.read_slot("a").unwrap().as_deref(), Some("second"));
}

#[test]
fn slots_are_independent() {
  let s = store();
  s.write_slot("a", "one").unwrap();
  s.write_slot("b", "two").unwrap();
  s.clear_slot("a").unwrap();
  assert_eq!(s.read_slot("a").unwrap(), None);
  assert_eq!(s.read_slot("b").unwrap().as_deref(), Some("two"));
}

#[test]
fn clearing_missing_slot_is_ok() {
  let s = store();
  s.clear_slot("never-written").unwrap();
}

// ─── Workbench over SQLite ───────────────────────────────────────────────────

fn open(s: &SqliteStore) -> Workbench<&SqliteStore> {
  Workbench::open(DomainTable::reference(), s, DEFAULT_SLOT).unwrap()
}

#[test]
fn workbench_seeds_empty_database() {
  let s = store();
  let wb = open(&s);
  assert_eq!(wb.cases().len(), 2);
  assert!(s.read_slot(DEFAULT_SLOT).unwrap().is_some());
}

#[test]
fn retained_case_survives_reopen() {
  let s = store();
  let id = {
    let mut wb = open(&s);
    wb.select(["G12", "G13", "G21"]).unwrap();
    let id = wb.retain().unwrap().unwrap().id.clone();
    id
  };

  let mut wb = open(&s);
  let record = wb.cases().get(&id).unwrap();
  assert_eq!(record.result.as_deref(), Some("P2"));
  assert_eq!(record.denom, Some(8));

  let restored = wb.reuse(&id).unwrap();
  assert_eq!(restored.to_vec(), ["G12", "G13", "G21"]);
}

#[test]
fn removal_survives_reopen() {
  let s = store();
  {
    let mut wb = open(&s);
    wb.select(["G01"]).unwrap();
    wb.retain().unwrap();
    wb.remove("CASE-003");
  }

  let wb = open(&s);
  assert!(!wb.cases().contains("CASE-003"));
  assert_eq!(wb.cases().len(), 2);
}

#[test]
fn corrupt_payload_reseeds() {
  let s = store();
  s.write_slot(DEFAULT_SLOT, "{not json").unwrap();

  let wb = open(&s);
  assert_eq!(wb.cases().len(), 2);
  let payload = s.read_slot(DEFAULT_SLOT).unwrap().unwrap();
  assert!(payload.starts_with('['));
}

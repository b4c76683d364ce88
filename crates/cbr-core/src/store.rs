//! The `CaseStore` trait: a key-value persistence slot for the case base.
//!
//! The engine persists the whole case base as one JSON array under a fixed
//! slot name. Backends (e.g. `cbr-store-sqlite`) only store and return that
//! payload; they know nothing about its contents.

use std::{cell::RefCell, collections::HashMap, convert::Infallible};

/// Slot the case base is stored under unless configured otherwise.
pub const DEFAULT_SLOT: &str = "cbr_manual_casebase_v1";

/// Abstraction over a persistence backend.
///
/// Calls are synchronous and run to completion; the engine has no suspension
/// points.
pub trait CaseStore {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Return the payload stored under `slot`, or `None` if the slot is empty.
  fn read_slot(&self, slot: &str) -> Result<Option<String>, Self::Error>;

  /// Replace the payload stored under `slot`.
  fn write_slot(&self, slot: &str, payload: &str) -> Result<(), Self::Error>;

  /// Delete `slot` entirely. Clearing an empty slot is not an error.
  fn clear_slot(&self, slot: &str) -> Result<(), Self::Error>;
}

impl<S: CaseStore + ?Sized> CaseStore for &S {
  type Error = S::Error;

  fn read_slot(&self, slot: &str) -> Result<Option<String>, Self::Error> {
    (**self).read_slot(slot)
  }

  fn write_slot(&self, slot: &str, payload: &str) -> Result<(), Self::Error> {
    (**self).write_slot(slot, payload)
  }

  fn clear_slot(&self, slot: &str) -> Result<(), Self::Error> {
    (**self).clear_slot(slot)
  }
}

// ─── MemoryStore ─────────────────────────────────────────────────────────────

/// A process-local store; contents are lost when it is dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
  slots: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  /// A store with `payload` already written under `slot`.
  pub fn with_slot(slot: &str, payload: impl Into<String>) -> Self {
    let store = Self::new();
    store.slots.borrow_mut().insert(slot.to_owned(), payload.into());
    store
  }
}

impl CaseStore for MemoryStore {
  type Error = Infallible;

  fn read_slot(&self, slot: &str) -> Result<Option<String>, Self::Error> {
    Ok(self.slots.borrow().get(slot).cloned())
  }

  fn write_slot(&self, slot: &str, payload: &str) -> Result<(), Self::Error> {
    self
      .slots
      .borrow_mut()
      .insert(slot.to_owned(), payload.to_owned());
    Ok(())
  }

  fn clear_slot(&self, slot: &str) -> Result<(), Self::Error> {
    self.slots.borrow_mut().remove(slot);
    Ok(())
  }
}

//! Core types and scoring engine for the case-based diagnostic store.
//!
//! This crate has no database or CLI dependencies. Scoring
//! is pure; the only mutable state lives in [`CaseBase`] and the
//! [`Workbench`](workbench::Workbench) that wraps it.

pub mod case_base;
pub mod domain;
pub mod error;
pub mod ranking;
pub mod record;
pub mod retain;
pub mod similarity;
pub mod store;
pub mod workbench;

pub use case_base::CaseBase;
pub use domain::DomainTable;
pub use error::{Error, Result};
pub use record::CaseRecord;
pub use workbench::Workbench;

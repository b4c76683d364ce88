//! Error types for `cbr-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown symptom: {0:?}")]
  UnknownSymptom(String),

  #[error("unknown disease: {0:?}")]
  UnknownDisease(String),

  #[error("case not found: {0}")]
  CaseNotFound(String),

  #[error("case {0} already exists")]
  DuplicateCaseId(String),

  #[error(
    "denominator for {disease} is declared as {declared} but its weights sum \
     to {computed}"
  )]
  DenominatorMismatch {
    disease:  &'static str,
    declared: u32,
    computed: u32,
  },

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

//! The domain table: the fixed symptom/disease weight matrix.
//!
//! Every score in the system is derived from integer weights in this table.
//! The table is immutable static data supplied by the embedding application;
//! [`DomainTable::reference`] is the three-disease anxiety table the seed
//! cases were verified against.

use std::fmt;

use crate::{Error, Result};

// ─── Entries ─────────────────────────────────────────────────────────────────

/// A candidate diagnostic label with a fixed total weight mass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Disease {
  pub code:        &'static str,
  pub name:        &'static str,
  /// Sum of this disease's weights across every symptom in the table.
  pub denominator: u32,
}

/// An observable sign with a weight per disease. Diseases missing from
/// `weights` have weight 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symptom {
  pub code:    &'static str,
  pub name:    &'static str,
  pub weights: &'static [(&'static str, u32)],
}

impl Symptom {
  pub fn weight_for(&self, disease: &str) -> u32 {
    self
      .weights
      .iter()
      .find(|(code, _)| *code == disease)
      .map_or(0, |(_, w)| *w)
  }
}

// ─── Table ───────────────────────────────────────────────────────────────────

/// Lookup over a static set of diseases and symptoms.
///
/// Unknown symptom or disease codes are never an error here: they weigh 0.
/// Callers that need to reject unknown input do so before lookup (see
/// [`DomainTable::symptom`]).
#[derive(Debug, Clone, Copy)]
pub struct DomainTable {
  diseases: &'static [Disease],
  symptoms: &'static [Symptom],
}

impl DomainTable {
  pub const fn new(
    diseases: &'static [Disease],
    symptoms: &'static [Symptom],
  ) -> Self {
    Self { diseases, symptoms }
  }

  /// The canonical three-disease table.
  pub fn reference() -> &'static DomainTable { &REFERENCE }

  pub fn diseases(&self) -> &'static [Disease] { self.diseases }

  pub fn symptoms(&self) -> &'static [Symptom] { self.symptoms }

  pub fn disease(&self, code: &str) -> Option<&'static Disease> {
    self.diseases.iter().find(|d| d.code == code)
  }

  pub fn symptom(&self, code: &str) -> Option<&'static Symptom> {
    self.symptoms.iter().find(|s| s.code == code)
  }

  /// Display name for a disease, falling back to the code itself.
  pub fn disease_name<'a>(&self, code: &'a str) -> &'a str {
    match self.disease(code) {
      Some(d) => d.name,
      None => code,
    }
  }

  pub fn weight_of(&self, symptom: &str, disease: &str) -> u32 {
    self.symptom(symptom).map_or(0, |s| s.weight_for(disease))
  }

  pub fn denominator_of(&self, disease: &str) -> u32 {
    self.disease(disease).map_or(0, |d| d.denominator)
  }

  /// Sum of the table's weights for `disease`.
  pub fn weight_mass(&self, disease: &str) -> u32 {
    self.symptoms.iter().map(|s| s.weight_for(disease)).sum()
  }

  /// Check that every declared denominator equals the weight mass of its
  /// disease, and that symptom weights only name diseases in the table.
  pub fn verify(&self) -> Result<()> {
    for symptom in self.symptoms {
      if let Some((code, _)) = symptom
        .weights
        .iter()
        .find(|(code, _)| self.disease(code).is_none())
      {
        return Err(Error::UnknownDisease((*code).to_owned()));
      }
    }

    for disease in self.diseases {
      let computed = self.weight_mass(disease.code);
      if computed != disease.denominator {
        return Err(Error::DenominatorMismatch {
          disease: disease.code,
          declared: disease.denominator,
          computed,
        });
      }
    }
    Ok(())
  }
}

/// Renders one symptom's per-disease weights as `P1:w1 • P2:w0 • P3:w1`.
pub struct WeightChips<'a> {
  pub table:   &'a DomainTable,
  pub symptom: &'a Symptom,
}

impl fmt::Display for WeightChips<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, disease) in self.table.diseases().iter().enumerate() {
      if i > 0 {
        f.write_str(" • ")?;
      }
      write!(f, "{}:w{}", disease.code, self.symptom.weight_for(disease.code))?;
    }
    Ok(())
  }
}

// ─── Reference data ──────────────────────────────────────────────────────────

static REFERENCE: DomainTable = DomainTable::new(DISEASES, SYMPTOMS);

const DISEASES: &[Disease] = &[
  Disease {
    code:        "P1",
    name:        "Generalized Anxiety Disorder (GAD)",
    denominator: 14,
  },
  Disease { code: "P2", name: "Panic Disorder", denominator: 26 },
  Disease { code: "P3", name: "Specific Phobias", denominator: 20 },
];

macro_rules! symptom {
  ($code:literal, $name:literal, [$($d:literal => $w:literal),* $(,)?]) => {
    Symptom { code: $code, name: $name, weights: &[$(($d, $w)),*] }
  };
}

const SYMPTOMS: &[Symptom] = &[
  symptom!("G01", "Muscle pain", ["P1" => 1]),
  symptom!("G02", "Difficulty sleeping", ["P1" => 2]),
  symptom!("G03", "Easily fatigued", ["P1" => 1]),
  symptom!("G04", "Nausea", ["P1" => 1, "P2" => 1, "P3" => 1]),
  symptom!("G05", "Headache", ["P1" => 1, "P2" => 1, "P3" => 1]),
  symptom!("G06", "Excessive worry", ["P1" => 1, "P2" => 1]),
  symptom!("G07", "Restlessness", ["P1" => 1, "P3" => 1]),
  symptom!("G08", "Difficulty concentrating", ["P1" => 2]),
  symptom!("G09", "Hypervigilance", ["P1" => 1]),
  symptom!("G10", "Irritability", ["P1" => 1]),
  symptom!("G11", "Need for control", ["P1" => 2]),
  symptom!("G12", "Heart palpitations", ["P2" => 2]),
  symptom!("G13", "Excessive sweating", ["P2" => 2]),
  symptom!("G14", "Uncontrollable trembling", ["P2" => 1, "P3" => 1]),
  symptom!("G15", "Shortness of breath", ["P2" => 1, "P3" => 1]),
  symptom!("G16", "Chest pain", ["P2" => 1]),
  symptom!("G17", "Tingling", ["P2" => 1]),
  symptom!("G18", "Chills", ["P2" => 2]),
  symptom!("G19", "Feeling of losing control", ["P2" => 2]),
  symptom!("G20", "Avoiding situations", ["P2" => 4]),
  symptom!("G21", "Avoiding panic attacks", ["P2" => 4]),
  symptom!("G22", "Avoiding crowds", ["P2" => 3]),
  symptom!("G23", "Intense fear", ["P3" => 3]),
  symptom!("G24", "Choking sensation", ["P3" => 3]),
  symptom!("G25", "Loss of strength", ["P3" => 2]),
  symptom!("G26", "Avoidance steps", ["P3" => 4]),
  symptom!("G27", "Safety seeking", ["P3" => 3]),
];

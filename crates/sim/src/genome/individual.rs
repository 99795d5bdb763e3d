use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique, monotonically assigned identifier of an individual.
///
/// Founders are numbered from 1; every later individual receives the next
/// integer, so identifier order equals creation order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct IndividualId(pub u64);

impl IndividualId {
    /// Raw integer value.
    #[inline]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for IndividualId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for IndividualId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Biological sex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    Female,
    Male,
}

impl Sex {
    /// Fair coin draw.
    pub fn sample<R: rand::Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.random::<f64>() < 0.5 {
            Sex::Female
        } else {
            Sex::Male
        }
    }

    /// Single-letter code used in exported tables.
    pub fn code(self) -> &'static str {
        match self {
            Sex::Female => "F",
            Sex::Male => "M",
        }
    }

    /// Parse the single-letter code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "F" | "f" => Some(Sex::Female),
            "M" | "m" => Some(Sex::Male),
            _ => None,
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One organism of the simulated population.
///
/// An `Individual` is immutable once created. Its age is derived from the
/// birth year and the current year; death is recorded separately in the
/// [`History`](crate::simulation::History) mortality ledger.
///
/// Serialized field names (`id`, `dam`, `sire`, `birth_year`, `a`, `z`,
/// `sex`) form the pedigree/phenotype table consumed downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Individual {
    id: IndividualId,
    dam: Option<IndividualId>,
    sire: Option<IndividualId>,
    birth_year: i64,
    /// Additive breeding value
    #[serde(rename = "a")]
    breeding_value: f64,
    /// Observed phenotype (breeding value + environmental deviation)
    #[serde(rename = "z")]
    phenotype: f64,
    sex: Sex,
}

impl Individual {
    /// Create a founder (no recorded parents).
    pub fn founder(
        id: IndividualId,
        birth_year: i64,
        sex: Sex,
        breeding_value: f64,
        phenotype: f64,
    ) -> Self {
        Self {
            id,
            dam: None,
            sire: None,
            birth_year,
            breeding_value,
            phenotype,
            sex,
        }
    }

    /// Create an offspring of `dam` and `sire`.
    pub fn offspring(
        id: IndividualId,
        dam: IndividualId,
        sire: IndividualId,
        birth_year: i64,
        sex: Sex,
        breeding_value: f64,
        phenotype: f64,
    ) -> Self {
        Self {
            id,
            dam: Some(dam),
            sire: Some(sire),
            birth_year,
            breeding_value,
            phenotype,
            sex,
        }
    }

    #[inline]
    pub fn id(&self) -> IndividualId {
        self.id
    }

    #[inline]
    pub fn dam(&self) -> Option<IndividualId> {
        self.dam
    }

    #[inline]
    pub fn sire(&self) -> Option<IndividualId> {
        self.sire
    }

    #[inline]
    pub fn birth_year(&self) -> i64 {
        self.birth_year
    }

    #[inline]
    pub fn sex(&self) -> Sex {
        self.sex
    }

    /// Additive breeding value `a`.
    #[inline]
    pub fn breeding_value(&self) -> f64 {
        self.breeding_value
    }

    /// Observed phenotype `z`.
    #[inline]
    pub fn phenotype(&self) -> f64 {
        self.phenotype
    }

    /// True for individuals created at initialization.
    pub fn is_founder(&self) -> bool {
        self.dam.is_none() && self.sire.is_none()
    }

    /// Age in `year`, or `None` if the individual is not yet born.
    pub fn age(&self, year: i64) -> Option<u32> {
        let age = year.checked_sub(self.birth_year)?;
        u32::try_from(age).ok()
    }

    /// True when the individual has reached `maturity` in `year`.
    pub fn is_mature(&self, year: i64, maturity: u32) -> bool {
        self.age(year).is_some_and(|age| age >= maturity)
    }
}

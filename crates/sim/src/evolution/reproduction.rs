//! Litter sizes and sire choice.
//!
//! Reproductive success varies among individuals of both sexes:
//! - **Females**: each mature female draws a litter size from a Gamma-Poisson
//!   (negative binomial) distribution. `reprovarf` is the squared
//!   coefficient of variation of the underlying Gamma rate, so `reprovarf = 0`
//!   reduces to a Poisson litter.
//! - **Males**: each mature male draws a yearly mating weight with mean 1 and
//!   variance `reprovarm`. Every offspring picks its sire independently with
//!   probability proportional to that weight, so a few males may sire most of
//!   a cohort when `reprovarm` is large.

use crate::errors::{ConfigurationError, SimulationError};
use crate::genome::IndividualId;
use rand::Rng;
use rand_distr::{Distribution, Gamma, Poisson};
use serde::{Deserialize, Serialize};

/// Per-year reproductive output of mature individuals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReproductionModel {
    baserepro: f64,
    reprovarf: f64,
    reprovarm: f64,
}

impl ReproductionModel {
    /// Create a reproduction model.
    ///
    /// # Errors
    /// All three parameters must be finite and non-negative.
    pub fn new(baserepro: f64, reprovarf: f64, reprovarm: f64) -> Result<Self, ConfigurationError> {
        for (name, value) in [
            ("baserepro", baserepro),
            ("reprovarf", reprovarf),
            ("reprovarm", reprovarm),
        ] {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(ConfigurationError::invalid(
                    name,
                    value,
                    "must be finite and non-negative",
                ));
            }
        }
        Ok(Self {
            baserepro,
            reprovarf,
            reprovarm,
        })
    }

    /// Mean litter size of a mature female without regulation.
    pub fn baserepro(&self) -> f64 {
        self.baserepro
    }

    /// Female reproductive-success heterogeneity.
    pub fn reprovarf(&self) -> f64 {
        self.reprovarf
    }

    /// Male reproductive-success heterogeneity.
    pub fn reprovarm(&self) -> f64 {
        self.reprovarm
    }

    /// Draw a litter size with mean `baserepro * regulation`.
    ///
    /// # Errors
    /// Returns [`SimulationError::Distribution`] if a sampling distribution
    /// rejects its parameters.
    pub fn litter_size<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        regulation: f64,
    ) -> Result<u32, SimulationError> {
        let mean = self.baserepro * regulation;
        if !(mean > 0.0) {
            return Ok(0);
        }

        let lambda = if self.reprovarf > 0.0 {
            let gamma = Gamma::new(1.0 / self.reprovarf, mean * self.reprovarf)
                .map_err(|e| SimulationError::distribution("female reproductive rate", e))?;
            gamma.sample(rng)
        } else {
            mean
        };
        if !(lambda > 0.0) {
            return Ok(0);
        }

        let poisson =
            Poisson::new(lambda).map_err(|e| SimulationError::distribution("litter size", e))?;
        let count: f64 = poisson.sample(rng);
        Ok(count as u32)
    }

    /// Draw the yearly mating weight of one male (mean 1, variance `reprovarm`).
    ///
    /// # Errors
    /// Returns [`SimulationError::Distribution`] if the Gamma distribution
    /// rejects its parameters.
    pub fn mating_weight<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<f64, SimulationError> {
        if self.reprovarm <= 0.0 {
            return Ok(1.0);
        }
        let gamma = Gamma::new(1.0 / self.reprovarm, self.reprovarm)
            .map_err(|e| SimulationError::distribution("male mating weight", e))?;
        Ok(gamma.sample(rng))
    }
}

/// A mature male available as a sire this year.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sire {
    pub id: IndividualId,
    pub breeding_value: f64,
}

/// The mature males of one year together with their mating weights.
#[derive(Debug, Clone, Default)]
pub struct MatingPool {
    sires: Vec<Sire>,
    /// Running sum of weights; empty when sires are chosen uniformly
    cumulative: Vec<f64>,
    total: f64,
}

impl MatingPool {
    /// Pool where every sire is equally likely.
    pub fn uniform(sires: Vec<Sire>) -> Self {
        Self {
            sires,
            cumulative: Vec::new(),
            total: 0.0,
        }
    }

    /// Pool with one weight per sire.
    ///
    /// Falls back to uniform choice when no weight is positive.
    pub fn weighted(sires: Vec<Sire>, weights: &[f64]) -> Self {
        debug_assert_eq!(sires.len(), weights.len());
        let cumulative: Vec<f64> = weights
            .iter()
            .scan(0.0, |acc, &w| {
                *acc += w.max(0.0);
                Some(*acc)
            })
            .collect();
        let total = cumulative.last().copied().unwrap_or(0.0);
        if !(total > 0.0 && total.is_finite()) {
            return Self::uniform(sires);
        }
        Self {
            sires,
            cumulative,
            total,
        }
    }

    /// Number of available sires.
    pub fn len(&self) -> usize {
        self.sires.len()
    }

    /// True when no male can sire offspring this year.
    pub fn is_empty(&self) -> bool {
        self.sires.is_empty()
    }

    /// Pick a sire, or `None` if the pool is empty.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Sire> {
        if self.sires.is_empty() {
            return None;
        }
        if self.cumulative.is_empty() {
            return self.sires.get(rng.random_range(0..self.sires.len()));
        }
        let r = rng.random_range(0.0..self.total);
        let idx = self
            .cumulative
            .partition_point(|&c| c <= r)
            .min(self.sires.len() - 1);
        self.sires.get(idx)
    }
}

//! Density regulation of reproduction above the carrying capacity.
//!
//! The factor scales the expected litter size of every female for the year:
//!
//! `factor = exp(-strength * (N - K) / K)` for `N > K`, and 1 otherwise,
//! with `N` the population entering the year.
//!
//! Regulation is soft. It lowers expected fecundity in proportion to the
//! relative overshoot, while the realized cohort remains random, so the
//! population fluctuates around `K` instead of being capped at it. Below `K`
//! there is no compensating boost.

use crate::errors::ConfigurationError;
use serde::{Deserialize, Serialize};

/// Exponential penalty on the relative overshoot of `K`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PopulationRegulator {
    strength: f64,
}

impl Default for PopulationRegulator {
    fn default() -> Self {
        Self { strength: 4.0 }
    }
}

impl PopulationRegulator {
    /// Create a regulator with the given strength.
    pub fn new(strength: f64) -> Result<Self, ConfigurationError> {
        if !(strength >= 0.0 && strength.is_finite()) {
            return Err(ConfigurationError::invalid(
                "regulation_strength",
                strength,
                "must be finite and non-negative",
            ));
        }
        Ok(Self { strength })
    }

    pub fn strength(&self) -> f64 {
        self.strength
    }

    /// Reproduction scaling for a population of `size` under capacity `capacity`.
    pub fn factor(&self, size: usize, capacity: usize) -> f64 {
        if size <= capacity || capacity == 0 {
            return 1.0;
        }
        let overshoot = (size - capacity) as f64 / capacity as f64;
        (-self.strength * overshoot).exp().max(f64::MIN_POSITIVE)
    }
}

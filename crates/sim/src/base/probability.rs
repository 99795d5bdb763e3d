use std::fmt;
use std::ops::Mul;

use serde::{Deserialize, Serialize};

/// A probability constrained to the range [0.0, 1.0].
///
/// Survival components (senescence, selection) are expressed as
/// `Probability` values and composed by multiplication.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Probability(f64);

impl Probability {
    /// Certain event.
    pub const ONE: Probability = Probability(1.0);

    /// Impossible event.
    pub const ZERO: Probability = Probability(0.0);

    /// Creates a new Probability, clamping the input to [0.0, 1.0].
    ///
    /// NaN maps to 0.0.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self::ZERO;
        }
        Self(value.clamp(0.0, 1.0))
    }

    /// Returns the inner f64 value.
    #[inline]
    pub fn get(self) -> f64 {
        self.0
    }

    /// Bernoulli trial: `true` with this probability.
    ///
    /// Consumes exactly one uniform draw so that the number of draws taken
    /// from a stream does not depend on the probability value.
    pub fn sample<R: rand::Rng + ?Sized>(self, rng: &mut R) -> bool {
        rng.random::<f64>() < self.0
    }
}

impl From<Probability> for f64 {
    fn from(p: Probability) -> Self {
        p.0
    }
}

impl From<f64> for Probability {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl Default for Probability {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for Probability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Mul for Probability {
    type Output = Self;

    /// Joint probability of two independent events.
    fn mul(self, rhs: Self) -> Self::Output {
        Probability::new(self.0 * rhs.0)
    }
}

//! Age-dependent maximum survival.
//!
//! A senescence model maps an individual's age to the highest annual survival
//! probability it can reach, before selection on its phenotype is applied.
//! The engine only depends on the [`SenescenceModel`] trait, so alternative
//! aging curves (including plain closures) can be injected without touching
//! the year loop.

use crate::base::Probability;
use crate::errors::ConfigurationError;
use serde::{Deserialize, Serialize};

/// Maximum annual survival as a function of age.
///
/// Implementations should return a value in (0, 1] that does not increase
/// with age.
///
/// Any `Fn(u32) -> f64` closure is a senescence model:
///
/// ```
/// use pedisim_sim::evolution::SenescenceModel;
///
/// let flat = |_age: u32| 0.7;
/// assert_eq!(flat.max_survival(12).get(), 0.7);
/// ```
pub trait SenescenceModel: Send + Sync {
    /// Maximum survival probability at `age` (in years).
    fn max_survival(&self, age: u32) -> Probability;
}

impl<F> SenescenceModel for F
where
    F: Fn(u32) -> f64 + Send + Sync,
{
    fn max_survival(&self, age: u32) -> Probability {
        Probability::new(self(age))
    }
}

/// Built-in aging curves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SenescenceCurve {
    /// Logistic transform of a power-law decay in log-odds:
    ///
    /// `logit(s(age)) = logit(max_survival) - (age / scale)^shape`
    LogisticPower {
        /// Survival at age 0
        max_survival: f64,
        /// Age at which the log-odds have dropped by one unit
        scale: f64,
        /// Exponent of the decay (> 1 accelerates with age)
        shape: f64,
    },
    /// Age-independent survival.
    Constant { survival: f64 },
}

impl Default for SenescenceCurve {
    fn default() -> Self {
        Self::LogisticPower {
            max_survival: 0.8,
            scale: 10.0,
            shape: 2.0,
        }
    }
}

impl SenescenceCurve {
    /// Check the curve parameters.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        match *self {
            Self::LogisticPower {
                max_survival,
                scale,
                shape,
            } => {
                if !(max_survival > 0.0 && max_survival < 1.0) {
                    return Err(ConfigurationError::invalid(
                        "max_survival",
                        max_survival,
                        "must be strictly between 0 and 1",
                    ));
                }
                if !(scale > 0.0 && scale.is_finite()) {
                    return Err(ConfigurationError::invalid(
                        "scale",
                        scale,
                        "must be positive and finite",
                    ));
                }
                if !(shape > 0.0 && shape.is_finite()) {
                    return Err(ConfigurationError::invalid(
                        "shape",
                        shape,
                        "must be positive and finite",
                    ));
                }
            }
            Self::Constant { survival } => {
                if !(survival > 0.0 && survival <= 1.0) {
                    return Err(ConfigurationError::invalid(
                        "survival",
                        survival,
                        "must be in (0, 1]",
                    ));
                }
            }
        }
        Ok(())
    }
}

impl SenescenceModel for SenescenceCurve {
    fn max_survival(&self, age: u32) -> Probability {
        match *self {
            Self::LogisticPower {
                max_survival,
                scale,
                shape,
            } => {
                let log_odds =
                    (max_survival / (1.0 - max_survival)).ln() - (age as f64 / scale).powf(shape);
                Probability::new(logistic(log_odds).max(f64::MIN_POSITIVE))
            }
            Self::Constant { survival } => Probability::new(survival),
        }
    }
}

/// Numerically stable logistic function.
fn logistic(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

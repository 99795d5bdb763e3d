//! Viability selection on the phenotype.
//!
//! Each year the environment defines an optimum phenotype `theta`. An
//! individual whose phenotype `z` sits at the optimum keeps its full
//! age-dependent survival; the further it lies from the optimum, the more its
//! survival is scaled down. This is stabilizing selection when `theta` is
//! constant and directional selection right after the optimum moves.
//!
//! ## Selection width
//!
//! The width `omega` sets how tolerant the environment is:
//! - small `omega`: a narrow fitness peak, strong selection
//! - large `omega`: a flat landscape, weak selection
//!
//! With the Gaussian kernel, an individual one `omega` away from the optimum
//! survives with `exp(-1/2) ≈ 0.61` of its maximum survival.

use crate::base::Probability;
use crate::errors::ConfigurationError;
use serde::{Deserialize, Serialize};

/// Largest `f64` strictly below 1.
const BELOW_ONE: f64 = 1.0 - f64::EPSILON / 2.0;

/// Trait for scaling survival by the distance between phenotype and optimum.
///
/// Implementors return a factor in (0, 1] which equals 1 only when the
/// phenotype matches the optimum.
pub trait SelectionModel: Send + Sync {
    /// Survival scaling for phenotype `z` under optimum `theta`.
    fn selection_factor(&self, z: f64, theta: f64) -> Probability;
}

/// Gaussian stabilizing selection.
///
/// `factor = exp(-(z - theta)^2 / (2 omega^2))`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GaussianSelection {
    omega: f64,
}

impl GaussianSelection {
    /// Create a Gaussian selection kernel.
    ///
    /// # Errors
    /// Returns [`ConfigurationError::NonPositiveOmega`] when `omega` is not
    /// strictly positive and finite.
    pub fn new(omega: f64) -> Result<Self, ConfigurationError> {
        if !(omega > 0.0 && omega.is_finite()) {
            return Err(ConfigurationError::NonPositiveOmega(omega));
        }
        Ok(Self { omega })
    }

    /// Selection width.
    pub fn omega(&self) -> f64 {
        self.omega
    }
}

impl SelectionModel for GaussianSelection {
    fn selection_factor(&self, z: f64, theta: f64) -> Probability {
        let d = z - theta;
        if d == 0.0 {
            return Probability::ONE;
        }
        let factor = (-(d * d) / (2.0 * self.omega * self.omega)).exp();
        // Keep the factor strictly inside (0, 1) away from the optimum.
        Probability::new(factor.clamp(f64::MIN_POSITIVE, BELOW_ONE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_rejects_non_positive_omega() {
        assert_eq!(
            GaussianSelection::new(0.0),
            Err(ConfigurationError::NonPositiveOmega(0.0))
        );
        assert!(GaussianSelection::new(-1.0).is_err());
        assert!(GaussianSelection::new(f64::NAN).is_err());
        assert!(GaussianSelection::new(f64::INFINITY).is_err());
    }

    #[test]
    fn test_factor_is_one_at_optimum() {
        let sel = GaussianSelection::new(1.0).unwrap();
        assert_eq!(sel.selection_factor(0.0, 0.0).get(), 1.0);
        assert_eq!(sel.selection_factor(2.5, 2.5).get(), 1.0);
    }

    #[test]
    fn test_factor_below_one_away_from_optimum() {
        let sel = GaussianSelection::new(1.0).unwrap();
        assert!(sel.selection_factor(1e-12, 0.0).get() < 1.0);
        assert!(sel.selection_factor(0.0, 1e-300).get() < 1.0);
    }

    #[test]
    fn test_factor_known_value() {
        let sel = GaussianSelection::new(1.0).unwrap();
        assert!(approx_eq(
            sel.selection_factor(1.0, 0.0).get(),
            (-0.5f64).exp()
        ));
        let sel = GaussianSelection::new(2.0).unwrap();
        assert!(approx_eq(
            sel.selection_factor(0.0, 2.0).get(),
            (-0.5f64).exp()
        ));
    }

    #[test]
    fn test_factor_symmetric_and_decreasing() {
        let sel = GaussianSelection::new(0.7).unwrap();
        let theta = 1.3;
        let mut previous = 1.0;
        for i in 1..50 {
            let d = i as f64 * 0.1;
            let above = sel.selection_factor(theta + d, theta).get();
            let below = sel.selection_factor(theta - d, theta).get();
            assert!(approx_eq(above, below));
            assert!(above <= previous);
            previous = above;
        }
    }

    #[test]
    fn test_factor_never_zero() {
        let sel = GaussianSelection::new(0.1).unwrap();
        let f = sel.selection_factor(1e6, 0.0).get();
        assert!(f > 0.0);
    }

    #[test]
    fn test_narrower_omega_is_stronger() {
        let narrow = GaussianSelection::new(0.5).unwrap();
        let wide = GaussianSelection::new(2.0).unwrap();
        assert!(narrow.selection_factor(1.0, 0.0) < wide.selection_factor(1.0, 0.0));
    }
}

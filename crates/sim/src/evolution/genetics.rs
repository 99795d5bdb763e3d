//! Infinitesimal-model inheritance of a quantitative trait.
//!
//! The trait is controlled by very many loci of small additive effect, so an
//! individual is summarized by a single real-valued breeding value `a`.
//! Offspring breeding values scatter around the parental midpoint with the
//! segregation variance `VA / 2`; phenotypes add an independent environmental
//! deviation with variance `VP - VA`.

use crate::errors::ConfigurationError;
use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

/// Sampler for breeding values and phenotypes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeneticsModel {
    va: f64,
    vp: f64,
}

impl GeneticsModel {
    /// Create a model with additive variance `va` and phenotypic variance `vp`.
    ///
    /// # Errors
    /// `va` must be finite and non-negative, and `vp` finite and `>= va`.
    pub fn new(va: f64, vp: f64) -> Result<Self, ConfigurationError> {
        if !(va >= 0.0 && va.is_finite()) {
            return Err(ConfigurationError::NegativeAdditiveVariance(va));
        }
        if !vp.is_finite() {
            return Err(ConfigurationError::invalid("vp", vp, "must be finite"));
        }
        if vp < va {
            return Err(ConfigurationError::PhenotypicBelowAdditive { vp, va });
        }
        Ok(Self { va, vp })
    }

    /// Additive genetic variance `VA`.
    pub fn additive_variance(&self) -> f64 {
        self.va
    }

    /// Phenotypic variance `VP`.
    pub fn phenotypic_variance(&self) -> f64 {
        self.vp
    }

    /// Environmental variance `VP - VA`.
    pub fn environmental_variance(&self) -> f64 {
        self.vp - self.va
    }

    /// Narrow-sense heritability `VA / VP` (0 when `VP = 0`).
    pub fn heritability(&self) -> f64 {
        if self.vp > 0.0 {
            self.va / self.vp
        } else {
            0.0
        }
    }

    /// `(a, z)` for a founder: `a ~ N(0, VA)`.
    pub fn founder<R: Rng + ?Sized>(&self, rng: &mut R) -> (f64, f64) {
        let a = gaussian(rng, 0.0, self.va);
        (a, self.phenotype(rng, a))
    }

    /// `(a, z)` for an offspring: `a ~ N((a_dam + a_sire) / 2, VA / 2)`.
    pub fn offspring<R: Rng + ?Sized>(&self, rng: &mut R, dam_a: f64, sire_a: f64) -> (f64, f64) {
        let a = if self.va > 0.0 {
            gaussian(rng, 0.5 * (dam_a + sire_a), 0.5 * self.va)
        } else {
            0.0
        };
        (a, self.phenotype(rng, a))
    }

    /// Observed phenotype for breeding value `a`.
    pub fn phenotype<R: Rng + ?Sized>(&self, rng: &mut R, a: f64) -> f64 {
        a + gaussian(rng, 0.0, self.environmental_variance())
    }
}

/// Normal draw with the given mean and variance; no draw when the variance is 0.
fn gaussian<R: Rng + ?Sized>(rng: &mut R, mean: f64, variance: f64) -> f64 {
    if variance <= 0.0 {
        return mean;
    }
    let x: f64 = rng.sample(StandardNormal);
    mean + variance.sqrt() * x
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn mean_var(values: &[f64]) -> (f64, f64) {
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
        (mean, var)
    }

    #[test]
    fn test_validation() {
        assert!(GeneticsModel::new(0.5, 1.0).is_ok());
        assert!(GeneticsModel::new(0.0, 0.0).is_ok());
        assert_eq!(
            GeneticsModel::new(-0.1, 1.0),
            Err(ConfigurationError::NegativeAdditiveVariance(-0.1))
        );
        assert_eq!(
            GeneticsModel::new(1.0, 0.5),
            Err(ConfigurationError::PhenotypicBelowAdditive { vp: 0.5, va: 1.0 })
        );
        assert!(GeneticsModel::new(0.5, f64::INFINITY).is_err());
    }

    #[test]
    fn test_zero_va_gives_zero_breeding_values() {
        let model = GeneticsModel::new(0.0, 1.0).unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        for _ in 0..1000 {
            let (a, _) = model.founder(&mut rng);
            assert_eq!(a, 0.0);
            let (a, _) = model.offspring(&mut rng, 0.0, 0.0);
            assert_eq!(a, 0.0);
        }
    }

    #[test]
    fn test_zero_environmental_variance() {
        let model = GeneticsModel::new(1.0, 1.0).unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(2);
        for _ in 0..100 {
            let (a, z) = model.founder(&mut rng);
            assert_eq!(a, z);
        }
    }

    #[test]
    fn test_founder_moments() {
        let model = GeneticsModel::new(0.5, 1.0).unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(3);
        let draws: Vec<(f64, f64)> = (0..20_000).map(|_| model.founder(&mut rng)).collect();
        let a: Vec<f64> = draws.iter().map(|d| d.0).collect();
        let z: Vec<f64> = draws.iter().map(|d| d.1).collect();
        let (ma, va) = mean_var(&a);
        let (mz, vz) = mean_var(&z);
        assert!(ma.abs() < 0.03);
        assert!((va - 0.5).abs() < 0.05);
        assert!(mz.abs() < 0.04);
        assert!((vz - 1.0).abs() < 0.08);
    }

    #[test]
    fn test_offspring_centered_on_midparent() {
        let model = GeneticsModel::new(0.4, 1.0).unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(4);
        let a: Vec<f64> = (0..20_000)
            .map(|_| model.offspring(&mut rng, 1.0, 3.0).0)
            .collect();
        let (m, v) = mean_var(&a);
        assert!((m - 2.0).abs() < 0.03);
        assert!((v - 0.2).abs() < 0.02);
    }

    #[test]
    fn test_heritability() {
        assert_eq!(GeneticsModel::new(0.5, 1.0).unwrap().heritability(), 0.5);
        assert_eq!(GeneticsModel::new(0.0, 0.0).unwrap().heritability(), 0.0);
    }
}

//! Simulation parameters and configuration.
//!
//! This module provides the parameter structures of a run: the year range and
//! seed, demography (maturity, reproduction, carrying capacity), the genetic
//! variances, the selection regime with its environment trajectory, and the
//! senescence curve.

use crate::errors::ConfigurationError;
use crate::evolution::{
    GaussianSelection, GeneticsModel, PopulationRegulator, ReproductionModel, SenescenceCurve,
};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// The master configuration struct.
/// Can be deserialized from a file to fully reproduce a simulation setup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    pub execution: ExecutionConfig,
    pub demography: DemographyConfig,
    pub genetics: GeneticsConfig,
    pub selection: SelectionConfig,
    #[serde(default)]
    pub senescence: SenescenceCurve,
}

/// Year range and random seed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// First simulated year (founders are born in this year)
    pub start_year: i64,
    /// Last simulated year (inclusive)
    pub end_year: i64,
    /// Optional RNG seed for reproducibility
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            start_year: 1,
            end_year: 100,
            seed: None,
        }
    }
}

/// Life-history and density parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemographyConfig {
    /// Age at which individuals start to reproduce
    pub maturity: u32,
    /// Mean litter size of a mature female below capacity
    pub baserepro: f64,
    /// Female reproductive-success heterogeneity
    pub reprovarf: f64,
    /// Male reproductive-success heterogeneity
    pub reprovarm: f64,
    /// Carrying capacity `K`
    pub carrying_capacity: usize,
    /// Number of founders (defaults to `K`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub founders: Option<usize>,
    /// Severity of density regulation above `K`
    #[serde(default = "default_regulation_strength")]
    pub regulation_strength: f64,
}

fn default_regulation_strength() -> f64 {
    PopulationRegulator::default().strength()
}

impl Default for DemographyConfig {
    fn default() -> Self {
        Self {
            maturity: 1,
            baserepro: 3.0,
            reprovarf: 0.5,
            reprovarm: 0.5,
            carrying_capacity: 200,
            founders: None,
            regulation_strength: default_regulation_strength(),
        }
    }
}

/// Variance components of the trait.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneticsConfig {
    /// Phenotypic variance `VP`
    pub vp: f64,
    /// Additive genetic variance `VA` (0 disables evolution)
    pub va: f64,
}

impl Default for GeneticsConfig {
    fn default() -> Self {
        Self { vp: 1.0, va: 0.5 }
    }
}

/// Selection width and the optimum trajectory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Width of the Gaussian fitness function
    pub omega: f64,
    /// Optimum phenotype per year
    pub environment: Environment,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            omega: 1.0,
            environment: Environment::default(),
        }
    }
}

/// Optimum phenotype `theta` for every simulated year.
///
/// Serialized untagged: a single number is a constant optimum, an array holds
/// one value per year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Environment {
    Constant(f64),
    Trajectory(Vec<f64>),
}

impl Default for Environment {
    fn default() -> Self {
        Environment::Constant(0.0)
    }
}

impl Environment {
    /// Same optimum every year.
    pub fn constant(theta: f64) -> Self {
        Environment::Constant(theta)
    }

    /// Explicit optimum per year, first value for the start year.
    pub fn trajectory(values: Vec<f64>) -> Self {
        Environment::Trajectory(values)
    }

    /// Permanent shift: `before` until `shift_year - 1`, `after` from `shift_year` on.
    pub fn step_change(
        years: RangeInclusive<i64>,
        shift_year: i64,
        before: f64,
        after: f64,
    ) -> Self {
        Environment::Trajectory(
            years
                .map(|y| if y < shift_year { before } else { after })
                .collect(),
        )
    }

    /// Temporary shift to `value` for `duration` years starting at `pulse_year`.
    pub fn pulse(
        years: RangeInclusive<i64>,
        pulse_year: i64,
        duration: u32,
        baseline: f64,
        value: f64,
    ) -> Self {
        let end = pulse_year.saturating_add(i64::from(duration));
        Environment::Trajectory(
            years
                .map(|y| {
                    if y >= pulse_year && y < end {
                        value
                    } else {
                        baseline
                    }
                })
                .collect(),
        )
    }

    /// Optimum in `year` of a run starting at `start_year`.
    ///
    /// Years outside an explicit trajectory fall back to its nearest end.
    pub fn theta(&self, year: i64, start_year: i64) -> f64 {
        match self {
            Environment::Constant(theta) => *theta,
            Environment::Trajectory(values) => {
                let idx = year.saturating_sub(start_year).max(0) as usize;
                values
                    .get(idx)
                    .or_else(|| values.last())
                    .copied()
                    .unwrap_or(0.0)
            }
        }
    }

    /// Check the trajectory length against the number of simulated years.
    pub fn validate(&self, n_years: usize) -> Result<(), ConfigurationError> {
        match self {
            Environment::Constant(theta) => {
                if !theta.is_finite() {
                    return Err(ConfigurationError::invalid("theta", *theta, "must be finite"));
                }
            }
            Environment::Trajectory(values) => {
                if values.len() != n_years {
                    return Err(ConfigurationError::EnvironmentLength {
                        expected: n_years,
                        actual: values.len(),
                    });
                }
                if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
                    return Err(ConfigurationError::invalid("theta", *bad, "must be finite"));
                }
            }
        }
        Ok(())
    }
}

impl Configuration {
    /// Default parameters over `start_year..=end_year`.
    pub fn new(start_year: i64, end_year: i64) -> Self {
        Self {
            execution: ExecutionConfig {
                start_year,
                end_year,
                seed: None,
            },
            ..Self::default()
        }
    }

    /// Validate every parameter.
    ///
    /// Checks run in a fixed order: selection width, variances, capacity,
    /// year range, environment length, then the remaining parameters and
    /// finally the senescence curve.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.validate_parameters()?;
        self.senescence.validate()
    }

    /// Validate everything except the senescence curve, for runs that age
    /// individuals with a custom model instead.
    pub fn validate_parameters(&self) -> Result<(), ConfigurationError> {
        self.selection_model()?;
        self.genetics_model()?;
        if self.demography.carrying_capacity == 0 {
            return Err(ConfigurationError::NonPositiveCapacity(0));
        }
        let (start, end) = (self.execution.start_year, self.execution.end_year);
        if end < start {
            return Err(ConfigurationError::YearRange { start, end });
        }
        self.selection.environment.validate(self.n_years())?;
        if self.founder_count() == 0 {
            return Err(ConfigurationError::invalid("founders", 0.0, "must be at least 1"));
        }
        self.reproduction_model()?;
        self.regulator()?;
        Ok(())
    }

    /// Number of simulated years (0 when the range is empty).
    pub fn n_years(&self) -> usize {
        self.execution
            .end_year
            .checked_sub(self.execution.start_year)
            .and_then(|span| usize::try_from(span).ok())
            .map_or(0, |span| span.saturating_add(1))
    }

    /// The simulated years.
    pub fn years(&self) -> RangeInclusive<i64> {
        self.execution.start_year..=self.execution.end_year
    }

    /// Optimum phenotype in `year`.
    pub fn theta(&self, year: i64) -> f64 {
        self.selection
            .environment
            .theta(year, self.execution.start_year)
    }

    /// Number of founders created at the start year.
    pub fn founder_count(&self) -> usize {
        self.demography
            .founders
            .unwrap_or(self.demography.carrying_capacity)
    }

    pub fn genetics_model(&self) -> Result<GeneticsModel, ConfigurationError> {
        GeneticsModel::new(self.genetics.va, self.genetics.vp)
    }

    pub fn selection_model(&self) -> Result<GaussianSelection, ConfigurationError> {
        GaussianSelection::new(self.selection.omega)
    }

    pub fn reproduction_model(&self) -> Result<ReproductionModel, ConfigurationError> {
        ReproductionModel::new(
            self.demography.baserepro,
            self.demography.reprovarf,
            self.demography.reprovarm,
        )
    }

    pub fn regulator(&self) -> Result<PopulationRegulator, ConfigurationError> {
        PopulationRegulator::new(self.demography.regulation_strength)
    }
}

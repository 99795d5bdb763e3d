//! Builder pattern for creating simulations.
//!
//! Provides a fluent API for configuring and creating simulations with
//! sensible defaults and comprehensive validation.

pub use crate::errors::BuilderError;
use crate::evolution::{SenescenceCurve, SenescenceModel};
use crate::simulation::{
    Configuration, DemographyConfig, Environment, ExecutionConfig, GeneticsConfig,
    SelectionConfig, Simulation,
};
use std::sync::Arc;

/// Builder for constructing Simulation instances with a fluent API.
///
/// # Examples
///
/// ```
/// use pedisim_sim::simulation::{Environment, SimulationBuilder};
///
/// // Simple simulation with defaults
/// let sim = SimulationBuilder::new()
///     .years(1, 50)
///     .carrying_capacity(100)
///     .seed(42)
///     .build()
///     .unwrap();
///
/// // Permanent shift of the optimum halfway through
/// let sim = SimulationBuilder::new()
///     .years(1, 40)
///     .environment(Environment::step_change(1..=40, 21, 0.0, 1.5))
///     .variances(1.0, 0.5)
///     .omega(1.0)
///     .seed(7)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct SimulationBuilder {
    // Required parameters
    years: Option<(i64, i64)>,

    // Parameters with defaults
    demography: DemographyConfig,
    genetics: GeneticsConfig,
    selection: SelectionConfig,
    senescence: SenescenceCurve,
    custom_senescence: Option<Arc<dyn SenescenceModel>>, // Default: None (use `senescence`)
    seed: Option<u64>,                                   // Default: None (random)
}

impl Default for SimulationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationBuilder {
    /// Create a new simulation builder with default values.
    pub fn new() -> Self {
        Self {
            years: None,
            demography: DemographyConfig::default(),
            genetics: GeneticsConfig::default(),
            selection: SelectionConfig::default(),
            senescence: SenescenceCurve::default(),
            custom_senescence: None,
            seed: None,
        }
    }

    /// Start from an existing configuration.
    pub fn from_config(config: Configuration) -> Self {
        Self {
            years: Some((config.execution.start_year, config.execution.end_year)),
            demography: config.demography,
            genetics: config.genetics,
            selection: config.selection,
            senescence: config.senescence,
            custom_senescence: None,
            seed: config.execution.seed,
        }
    }

    /// Set the simulated year range, inclusive (required).
    pub fn years(mut self, start: i64, end: i64) -> Self {
        self.years = Some((start, end));
        self
    }

    /// Set the age of maturity.
    pub fn maturity(mut self, age: u32) -> Self {
        self.demography.maturity = age;
        self
    }

    /// Set the reproduction parameters.
    ///
    /// # Arguments
    /// * `baserepro` - Mean litter size of a mature female below capacity
    /// * `reprovarf` - Female reproductive-success heterogeneity
    /// * `reprovarm` - Male reproductive-success heterogeneity
    pub fn reproduction(mut self, baserepro: f64, reprovarf: f64, reprovarm: f64) -> Self {
        self.demography.baserepro = baserepro;
        self.demography.reprovarf = reprovarf;
        self.demography.reprovarm = reprovarm;
        self
    }

    /// Set the carrying capacity `K`.
    pub fn carrying_capacity(mut self, k: usize) -> Self {
        self.demography.carrying_capacity = k;
        self
    }

    /// Set the number of founders (defaults to `K`).
    pub fn founders(mut self, n: usize) -> Self {
        self.demography.founders = Some(n);
        self
    }

    /// Set the strength of density regulation.
    pub fn regulation_strength(mut self, strength: f64) -> Self {
        self.demography.regulation_strength = strength;
        self
    }

    /// Set phenotypic and additive genetic variance.
    pub fn variances(mut self, vp: f64, va: f64) -> Self {
        self.genetics = GeneticsConfig { vp, va };
        self
    }

    /// Set the selection width.
    pub fn omega(mut self, omega: f64) -> Self {
        self.selection.omega = omega;
        self
    }

    /// Set the optimum trajectory.
    pub fn environment(mut self, environment: Environment) -> Self {
        self.selection.environment = environment;
        self
    }

    /// Use a constant optimum.
    pub fn theta(self, theta: f64) -> Self {
        self.environment(Environment::constant(theta))
    }

    /// Use a built-in senescence curve.
    pub fn senescence(mut self, curve: SenescenceCurve) -> Self {
        self.senescence = curve;
        self.custom_senescence = None;
        self
    }

    /// Use a custom senescence model.
    pub fn senescence_model(mut self, model: Arc<dyn SenescenceModel>) -> Self {
        self.custom_senescence = Some(model);
        self
    }

    /// Set the random seed for reproducibility.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Assemble and validate the configuration.
    ///
    /// The senescence curve is only checked when no custom model is set.
    pub fn build_config(&self) -> Result<Configuration, BuilderError> {
        let config = self.assemble()?;
        match self.custom_senescence {
            Some(_) => config.validate_parameters()?,
            None => config.validate()?,
        }
        Ok(config)
    }

    fn assemble(&self) -> Result<Configuration, BuilderError> {
        let (start_year, end_year) = self.years.ok_or(BuilderError::MissingRequired("years"))?;
        Ok(Configuration {
            execution: ExecutionConfig {
                start_year,
                end_year,
                seed: self.seed,
            },
            demography: self.demography.clone(),
            genetics: self.genetics.clone(),
            selection: self.selection.clone(),
            senescence: self.senescence.clone(),
        })
    }

    /// Build the simulation.
    pub fn build(self) -> Result<Simulation, BuilderError> {
        let config = self.build_config()?;
        let simulation = match self.custom_senescence {
            Some(model) => Simulation::with_senescence(config, model)?,
            None => Simulation::new(config)?,
        };
        Ok(simulation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ConfigurationError;

    #[test]
    fn test_builder_requires_years() {
        let result = SimulationBuilder::new().build();
        assert!(matches!(
            result,
            Err(BuilderError::MissingRequired("years"))
        ));
    }

    #[test]
    fn test_builder_defaults() {
        let config = SimulationBuilder::new().years(0, 9).build_config().unwrap();
        assert_eq!(config.demography, DemographyConfig::default());
        assert_eq!(config.genetics, GeneticsConfig::default());
        assert_eq!(config.n_years(), 10);
        assert_eq!(config.execution.seed, None);
    }

    #[test]
    fn test_builder_setters() {
        let config = SimulationBuilder::new()
            .years(2000, 2039)
            .maturity(2)
            .reproduction(3.0, 0.0, 1.0)
            .carrying_capacity(150)
            .founders(80)
            .variances(2.0, 1.0)
            .omega(1.5)
            .theta(0.5)
            .seed(11)
            .build_config()
            .unwrap();
        assert_eq!(config.demography.maturity, 2);
        assert_eq!(config.demography.baserepro, 3.0);
        assert_eq!(config.demography.reprovarm, 1.0);
        assert_eq!(config.founder_count(), 80);
        assert_eq!(config.genetics.va, 1.0);
        assert_eq!(config.theta(2010), 0.5);
        assert_eq!(config.execution.seed, Some(11));
    }

    #[test]
    fn test_builder_validates() {
        let result = SimulationBuilder::new().years(0, 9).omega(0.0).build();
        assert!(matches!(
            result,
            Err(BuilderError::Configuration(
                ConfigurationError::NonPositiveOmega(_)
            ))
        ));
        let result = SimulationBuilder::new()
            .years(0, 9)
            .environment(Environment::trajectory(vec![0.0; 3]))
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_custom_senescence() {
        let sim = SimulationBuilder::new()
            .years(0, 2)
            .carrying_capacity(20)
            .omega(1e6)
            .senescence_model(Arc::new(|_age: u32| 1.0))
            .seed(3)
            .build()
            .unwrap();
        let mut sim = sim;
        let summary = sim.step().unwrap();
        assert_eq!(summary.deaths, 0);
    }

    #[test]
    fn test_custom_senescence_skips_curve_check() {
        let bad_curve = SenescenceCurve::Constant { survival: -1.0 };
        let builder = SimulationBuilder::new()
            .years(0, 2)
            .carrying_capacity(20)
            .senescence(bad_curve);
        assert!(builder.build_config().is_err());
        let sim = builder
            .senescence_model(Arc::new(|_age: u32| 0.9))
            .seed(3)
            .build();
        assert!(sim.is_ok());
    }

    #[test]
    fn test_from_config_roundtrip() {
        let config = SimulationBuilder::new()
            .years(1, 5)
            .seed(1)
            .build_config()
            .unwrap();
        let again = SimulationBuilder::from_config(config.clone())
            .build_config()
            .unwrap();
        assert_eq!(again, config);
    }
}

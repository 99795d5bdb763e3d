//! The yearly life-cycle loop.
//!
//! Each call to [`Simulation::step`] resolves one year through four stages,
//! each completed for every individual before the next begins:
//!
//! 1. **Age**: ages follow from birth years and the year counter.
//! 2. **Survive**: one Bernoulli draw per living individual with probability
//!    `maxSurvival(age) * selectionFactor(z, theta)`; failures move to the
//!    mortality ledger.
//! 3. **Reproduce**: mature females draw litters scaled by the density
//!    regulation factor; every offspring picks a sire among the mature males
//!    and inherits a breeding value around the parental midpoint.
//! 4. **Advance**: the cohort receives sequential identifiers, joins the living
//!    set and the History, and the year counter moves on.
//!
//! Survival draws, male mating weights, and litters run in parallel. Every
//! draw comes from a stream keyed by the individual's identifier, so results
//! do not depend on the number of threads.

use crate::base::{RngStreams, Stage};
use crate::errors::SimulationError;
use crate::evolution::{
    GaussianSelection, GeneticsModel, MatingPool, PopulationRegulator, ReproductionModel,
    SenescenceModel,
};
use crate::genome::{Individual, IndividualId, Sex};
use crate::simulation::{Configuration, History, Population};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::ControlFlow;
use std::sync::Arc;

/// Census of one simulated year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearSummary {
    pub year: i64,
    /// Optimum phenotype of the year
    pub theta: f64,
    /// Living individuals at the start of the year
    pub entering: usize,
    /// Individuals that failed their survival draw
    pub deaths: usize,
    /// Individuals alive after survival
    pub survivors: usize,
    /// Density regulation factor applied to litter sizes
    pub regulation: f64,
    /// Size of the new cohort
    pub births: usize,
    /// Living individuals at the end of the year
    pub size: usize,
    /// Mean breeding value of the living set at the end of the year
    pub mean_breeding_value: Option<f64>,
    /// Mean phenotype of the living set at the end of the year
    pub mean_phenotype: Option<f64>,
}

/// How a call to [`Simulation::run_with`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every year up to the end year was simulated.
    Completed,
    /// The observer stopped the run after `year`.
    Aborted { year: i64 },
}

/// Offspring drawn for one mother, before identifiers are assigned.
struct Birth {
    dam: IndividualId,
    sire: IndividualId,
    sex: Sex,
    breeding_value: f64,
    phenotype: f64,
}

/// Main simulation engine.
pub struct Simulation {
    config: Configuration,
    senescence: Arc<dyn SenescenceModel>,
    selection: GaussianSelection,
    genetics: GeneticsModel,
    reproduction: ReproductionModel,
    regulator: PopulationRegulator,
    streams: RngStreams,
    population: Population,
    history: History,
    census: Vec<YearSummary>,
    /// Next year to simulate
    year: i64,
    extinct: bool,
}

impl fmt::Debug for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulation")
            .field("year", &self.year)
            .field("seed", &self.streams.seed())
            .field("population", &self.population.size())
            .field("history", &self.history.len())
            .finish_non_exhaustive()
    }
}

impl Simulation {
    /// Create a simulation using the configured senescence curve.
    ///
    /// # Errors
    /// Returns [`SimulationError::Configuration`] if the configuration is
    /// invalid; no individual is created in that case.
    pub fn new(config: Configuration) -> Result<Self, SimulationError> {
        config.senescence.validate()?;
        let senescence = Arc::new(config.senescence.clone());
        Self::with_senescence(config, senescence)
    }

    /// Create a simulation with a custom senescence model.
    ///
    /// The `senescence` field of the configuration is ignored and not
    /// validated.
    pub fn with_senescence(
        mut config: Configuration,
        senescence: Arc<dyn SenescenceModel>,
    ) -> Result<Self, SimulationError> {
        config.validate_parameters()?;
        let selection = config.selection_model()?;
        let genetics = config.genetics_model()?;
        let reproduction = config.reproduction_model()?;
        let regulator = config.regulator()?;

        let seed = *config
            .execution
            .seed
            .get_or_insert_with(RngStreams::random_seed);
        let streams = RngStreams::new(seed);
        let start = config.execution.start_year;

        let founders: Vec<Individual> = (1..=config.founder_count() as u64)
            .into_par_iter()
            .map(|id| {
                let mut rng = streams.stream(Stage::Founder, start, id);
                let sex = Sex::sample(&mut rng);
                let (a, z) = genetics.founder(&mut rng);
                Individual::founder(IndividualId(id), start, sex, a, z)
            })
            .collect();

        let mut history = History::new();
        for founder in &founders {
            history.push(founder.clone());
        }

        tracing::info!(
            seed,
            start,
            end = config.execution.end_year,
            founders = founders.len(),
            "Initialized simulation"
        );

        Ok(Self {
            selection,
            genetics,
            reproduction,
            regulator,
            streams,
            population: Population::new(founders),
            history,
            census: Vec::with_capacity(config.n_years()),
            year: start,
            extinct: false,
            senescence,
            config,
        })
    }

    /// The configuration, with the resolved seed.
    pub fn configuration(&self) -> &Configuration {
        &self.config
    }

    /// The master seed of the run.
    pub fn seed(&self) -> u64 {
        self.streams.seed()
    }

    /// The living set.
    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Every individual created so far.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// One summary per simulated year.
    pub fn census(&self) -> &[YearSummary] {
        &self.census
    }

    /// Next year to be simulated.
    pub fn current_year(&self) -> i64 {
        self.year
    }

    /// True once the end year has been simulated.
    pub fn is_finished(&self) -> bool {
        self.year > self.config.execution.end_year
    }

    /// Consume the simulation and return its History.
    pub fn into_history(self) -> History {
        self.history
    }

    /// Simulate one year.
    ///
    /// # Errors
    /// Returns [`SimulationError::Finished`] when called after the end year,
    /// or [`SimulationError::Distribution`] if a sampler fails.
    pub fn step(&mut self) -> Result<YearSummary, SimulationError> {
        if self.is_finished() {
            return Err(SimulationError::Finished(self.config.execution.end_year));
        }
        let year = self.year;
        let theta = self.config.theta(year);
        let entering = self.population.size();

        // Survive
        let alive = self.population.draw_survival(
            year,
            theta,
            self.senescence.as_ref(),
            &self.selection,
            &self.streams,
        );
        let dead = self.population.retain_survivors(&alive);
        for id in &dead {
            self.history.record_death(*id, year);
        }
        let survivors = self.population.size();

        // Reproduce
        let regulation = self
            .regulator
            .factor(entering, self.config.demography.carrying_capacity);
        let births = self.reproduce(year, regulation)?;

        // Advance
        let mut next_id = self.history.next_id();
        let cohort: Vec<Individual> = births
            .into_iter()
            .map(|b| {
                let id = next_id;
                next_id = IndividualId(id.get() + 1);
                Individual::offspring(
                    id,
                    b.dam,
                    b.sire,
                    year,
                    b.sex,
                    b.breeding_value,
                    b.phenotype,
                )
            })
            .collect();
        let n_births = cohort.len();
        for ind in &cohort {
            self.history.push(ind.clone());
        }
        self.population.extend(cohort);
        self.year += 1;

        let summary = YearSummary {
            year,
            theta,
            entering,
            deaths: dead.len(),
            survivors,
            regulation,
            births: n_births,
            size: self.population.size(),
            mean_breeding_value: self.population.mean_breeding_value(),
            mean_phenotype: self.population.mean_phenotype(),
        };

        tracing::debug!(
            year,
            theta,
            entering,
            deaths = summary.deaths,
            births = n_births,
            size = summary.size,
            "Year complete"
        );
        if summary.size == 0 && !self.extinct {
            self.extinct = true;
            tracing::warn!(year, "Population went extinct");
        }

        self.census.push(summary.clone());
        Ok(summary)
    }

    /// Draw this year's cohort from the survivors.
    fn reproduce(&self, year: i64, regulation: f64) -> Result<Vec<Birth>, SimulationError> {
        let maturity = self.config.demography.maturity;
        let sires = self.population.sires(year, maturity);
        let pool = if self.reproduction.reprovarm() > 0.0 {
            let weights = sires
                .par_iter()
                .map(|s| {
                    let mut rng = self.streams.stream(Stage::Mating, year, s.id.get());
                    self.reproduction.mating_weight(&mut rng)
                })
                .collect::<Result<Vec<f64>, _>>()?;
            MatingPool::weighted(sires, &weights)
        } else {
            MatingPool::uniform(sires)
        };

        if pool.is_empty() {
            return Ok(Vec::new());
        }

        let mothers: Vec<&Individual> = self
            .population
            .mature(Sex::Female, year, maturity)
            .collect();
        tracing::trace!(year, sires = pool.len(), mothers = mothers.len(), "Mating pool");

        let litters = mothers
            .par_iter()
            .map(|dam| self.litter(dam, year, regulation, &pool))
            .collect::<Result<Vec<Vec<Birth>>, _>>()?;

        Ok(litters.into_iter().flatten().collect())
    }

    /// Offspring of one mother.
    fn litter(
        &self,
        dam: &Individual,
        year: i64,
        regulation: f64,
        pool: &MatingPool,
    ) -> Result<Vec<Birth>, SimulationError> {
        let mut rng = self
            .streams
            .stream(Stage::Reproduction, year, dam.id().get());
        let size = self.reproduction.litter_size(&mut rng, regulation)?;
        let mut litter = Vec::with_capacity(size as usize);
        for _ in 0..size {
            let Some(sire) = pool.sample(&mut rng) else {
                break;
            };
            let (a, z) = self
                .genetics
                .offspring(&mut rng, dam.breeding_value(), sire.breeding_value);
            litter.push(Birth {
                dam: dam.id(),
                sire: sire.id,
                sex: Sex::sample(&mut rng),
                breeding_value: a,
                phenotype: z,
            });
        }
        Ok(litter)
    }

    /// Run all remaining years.
    pub fn run(&mut self) -> Result<RunOutcome, SimulationError> {
        self.run_with(|_| ControlFlow::Continue(()))
    }

    /// Run all remaining years, calling `observer` after each one.
    ///
    /// Returning [`ControlFlow::Break`] stops the run at that year boundary.
    pub fn run_with<F>(&mut self, mut observer: F) -> Result<RunOutcome, SimulationError>
    where
        F: FnMut(&YearSummary) -> ControlFlow<()>,
    {
        while !self.is_finished() {
            let summary = self.step()?;
            if observer(&summary).is_break() && !self.is_finished() {
                tracing::info!(year = summary.year, "Simulation aborted");
                return Ok(RunOutcome::Aborted { year: summary.year });
            }
        }
        tracing::info!(
            individuals = self.history.len(),
            living = self.population.size(),
            "Simulation complete"
        );
        Ok(RunOutcome::Completed)
    }

    /// Run for at most `years` years.
    pub fn run_for(&mut self, years: usize) -> Result<(), SimulationError> {
        for _ in 0..years {
            if self.is_finished() {
                break;
            }
            self.step()?;
        }
        Ok(())
    }
}

/// Run a full simulation and return its History.
///
/// # Errors
/// Returns [`SimulationError::Configuration`] for invalid parameters.
pub fn simulate(config: Configuration) -> Result<History, SimulationError> {
    let mut sim = Simulation::new(config)?;
    sim.run()?;
    Ok(sim.into_history())
}

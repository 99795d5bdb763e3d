//! Simulation engine and population management.
//!
//! This module provides the yearly life-cycle loop and the containers it
//! maintains.

//! Re-exports
//!
//! The most commonly used simulation types are re-exported here for
//! convenience so consumers can import them from `pedisim_sim::simulation`.
//!
//! - `Simulation`: the engine that runs years and orchestrates survival and
//!   reproduction.
//! - `Population`: the living set.
//! - `History`: the append-only ledger of every individual ever created.
//! - `SimulationBuilder`: fluent builder for constructing `Simulation` instances
//!   with sensible defaults and validation.

pub mod builder;
pub mod configs;
pub mod engine;
pub mod history;
pub mod population;

pub use builder::SimulationBuilder;
pub use configs::{
    Configuration, DemographyConfig, Environment, ExecutionConfig, GeneticsConfig,
    SelectionConfig,
};
pub use engine::{simulate, RunOutcome, Simulation, YearSummary};
pub use history::{Death, History};
pub use population::Population;

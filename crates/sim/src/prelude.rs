//! Commonly used imports for convenience.
//!
//! This prelude module provides a convenient way to import the most commonly
//! used types and traits in the pedisim library.
//!
//! # Example
//!
//! ```
//! use pedisim_sim::prelude::*;
//!
//! let history = SimulationBuilder::new()
//!     .years(1, 10)
//!     .carrying_capacity(20)
//!     .seed(1)
//!     .build()
//!     .and_then(|mut sim| {
//!         sim.run()?;
//!         Ok(sim.into_history())
//!     })
//!     .unwrap();
//! assert!(history.len() >= 20);
//! ```

pub use crate::base::{Probability, RngStreams};
pub use crate::errors::{self, BuilderError, ConfigurationError, SimulationError};
pub use crate::evolution::{
    GaussianSelection, GeneticsModel, PopulationRegulator, ReproductionModel, SelectionModel,
    SenescenceCurve, SenescenceModel,
};
pub use crate::genome::{Individual, IndividualId, Sex};
pub use crate::simulation::{
    simulate, Configuration, Environment, History, Population, RunOutcome, Simulation,
    SimulationBuilder, YearSummary,
};

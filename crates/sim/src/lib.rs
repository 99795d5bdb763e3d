//! # Simulation Crate
//!
//! The `sim` crate provides the core logic of the individual-based
//! population simulation. It includes modules for the individual records,
//! the per-individual processes (senescence, selection, inheritance,
//! reproduction, density regulation), the yearly simulation engine, and
//! SQLite storage of a run.

pub mod base;
pub mod errors;
pub mod evolution;
pub mod genome;
pub mod prelude;
pub mod simulation;
pub mod storage;

pub use simulation::{simulate, Configuration, History, Simulation};

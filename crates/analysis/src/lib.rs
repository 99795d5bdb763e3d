//! Post-processing of simulated histories.
//!
//! Everything here is a one-shot transform of a finished
//! [`History`](pedisim_sim::simulation::History): year-indexed tables of
//! population size, births and deaths, trait trajectories, and pedigree
//! consistency checks.

pub mod analysis;

pub use analysis::*;

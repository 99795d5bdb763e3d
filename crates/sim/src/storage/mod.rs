//! Storage module for persisting simulation data.
//!
//! This module provides SQLite-based recording of a run (configuration,
//! pedigree, mortality, and yearly census), allowing for reproducibility and
//! post-simulation analysis.

mod database;
mod query;
mod recorder;

pub use database::{Database, DatabaseStats};
pub use query::QueryBuilder;
pub use recorder::{Recorder, RecorderStats};

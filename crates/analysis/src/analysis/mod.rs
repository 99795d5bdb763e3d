//! Analysis tools for pedisim histories
//!
//! This module provides:
//! - Demography (living counts, births, deaths, age structure per year)
//! - Trait trajectories (mean breeding value, mean phenotype, distance to the optimum)
//! - Pedigree checks and summaries
//! - Summary statistics shared by the above

pub mod demography;
pub mod pedigree;
pub mod trajectories;
pub mod utils;

// Re-export commonly used functions
pub use demography::{age_structure, births_by_year, deaths_by_year, population_size_by_year};
pub use pedigree::{pedigree_summary, validate_pedigree, PedigreeIssue, PedigreeSummary};
pub use trajectories::{
    mean_breeding_value_by_year, mean_phenotype_by_year, optimum_gap_by_year,
    phenotype_stats_by_year,
};
pub use utils::TraitStats;

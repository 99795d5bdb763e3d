//! Trait trajectories
//!
//! Per-year summaries of the breeding values and phenotypes of the living
//! population. Years without living individuals map to `None`.

use crate::analysis::utils::{mean, values_by_year, TraitStats};
use pedisim_sim::genome::Individual;
use pedisim_sim::simulation::{Configuration, History};
use std::collections::BTreeMap;
use std::ops::RangeInclusive;

fn mean_by_year(
    history: &History,
    years: RangeInclusive<i64>,
    value: impl Fn(&Individual) -> f64,
) -> BTreeMap<i64, Option<f64>> {
    values_by_year(history, &years, value)
        .into_iter()
        .map(|(year, values)| (year, (!values.is_empty()).then(|| mean(&values))))
        .collect()
}

/// Mean breeding value `a` of the living population per year.
pub fn mean_breeding_value_by_year(
    history: &History,
    years: RangeInclusive<i64>,
) -> BTreeMap<i64, Option<f64>> {
    mean_by_year(history, years, Individual::breeding_value)
}

/// Mean phenotype `z` of the living population per year.
pub fn mean_phenotype_by_year(
    history: &History,
    years: RangeInclusive<i64>,
) -> BTreeMap<i64, Option<f64>> {
    mean_by_year(history, years, Individual::phenotype)
}

/// Phenotype distribution of the living population per year.
pub fn phenotype_stats_by_year(
    history: &History,
    years: RangeInclusive<i64>,
) -> BTreeMap<i64, Option<TraitStats>> {
    values_by_year(history, &years, Individual::phenotype)
        .into_iter()
        .map(|(year, values)| (year, TraitStats::from_values(&values)))
        .collect()
}

/// Mean breeding value minus the optimum, per simulated year of `config`.
///
/// Positive values mean the population sits above the optimum.
pub fn optimum_gap_by_year(
    history: &History,
    config: &Configuration,
) -> BTreeMap<i64, Option<f64>> {
    mean_breeding_value_by_year(history, config.years())
        .into_iter()
        .map(|(year, a)| (year, a.map(|a| a - config.theta(year))))
        .collect()
}

//! Utility functions for analysis module
//!
//! Shared helpers used across analysis submodules.

use pedisim_sim::genome::Individual;
use pedisim_sim::simulation::History;
use serde::Serialize;
use std::collections::BTreeMap;
use std::ops::RangeInclusive;

/// Calculate mean of a slice (0 when empty)
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Summary of a set of trait values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TraitStats {
    pub n: usize,
    pub mean: f64,
    /// Sample standard deviation (0 for a single value)
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

impl TraitStats {
    /// Statistics of `values`, or `None` when empty.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let n = values.len();
        let mean = mean(values);
        let std = if n > 1 {
            let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / (n - 1) as f64).sqrt()
        } else {
            0.0
        };
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Some(Self {
            n,
            mean,
            std,
            min,
            max,
        })
    }
}

/// Years of `years` in which `ind` is in the end-of-year census.
///
/// Returns an empty range when the two do not overlap.
pub(crate) fn living_years(
    ind: &Individual,
    death_year: Option<i64>,
    years: &RangeInclusive<i64>,
) -> RangeInclusive<i64> {
    let first = ind.birth_year().max(*years.start());
    let last = death_year
        .map_or(*years.end(), |died| died - 1)
        .min(*years.end());
    first..=last
}

/// Collect a value of every living individual per year.
pub(crate) fn values_by_year(
    history: &History,
    years: &RangeInclusive<i64>,
    value: impl Fn(&Individual) -> f64,
) -> BTreeMap<i64, Vec<f64>> {
    let mut table: BTreeMap<i64, Vec<f64>> = years.clone().map(|y| (y, Vec::new())).collect();
    for (ind, died) in history.records() {
        for year in living_years(ind, died, years) {
            if let Some(values) = table.get_mut(&year) {
                values.push(value(ind));
            }
        }
    }
    table
}

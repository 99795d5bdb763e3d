//! Demographic tables
//!
//! Year-indexed counts derived from a History. Every table has one entry per
//! year of the requested range, including years with a count of zero.
//!
//! An individual counts as living in year `y` when it was born in or before
//! `y` and did not die in or before `y` (end-of-year census).

use crate::analysis::utils::living_years;
use pedisim_sim::simulation::History;
use std::collections::BTreeMap;
use std::ops::RangeInclusive;

fn zeros(years: &RangeInclusive<i64>) -> BTreeMap<i64, usize> {
    years.clone().map(|y| (y, 0)).collect()
}

/// Number of living individuals per year.
///
/// # Example
///
/// ```
/// use pedisim_analysis::population_size_by_year;
/// use pedisim_sim::simulation::{simulate, Configuration};
///
/// let mut config = Configuration::new(1, 20);
/// config.demography.carrying_capacity = 50;
/// config.execution.seed = Some(1);
/// let history = simulate(config).unwrap();
///
/// let sizes = population_size_by_year(&history, 1..=20);
/// assert_eq!(sizes.len(), 20);
/// ```
pub fn population_size_by_year(
    history: &History,
    years: RangeInclusive<i64>,
) -> BTreeMap<i64, usize> {
    let mut table = zeros(&years);
    for (ind, died) in history.records() {
        for year in living_years(ind, died, &years) {
            if let Some(count) = table.get_mut(&year) {
                *count += 1;
            }
        }
    }
    table
}

/// Number of individuals born per year (founders count in their birth year).
pub fn births_by_year(history: &History, years: RangeInclusive<i64>) -> BTreeMap<i64, usize> {
    let mut table = zeros(&years);
    for ind in history.individuals() {
        if let Some(count) = table.get_mut(&ind.birth_year()) {
            *count += 1;
        }
    }
    table
}

/// Number of individuals that failed their survival draw per year.
pub fn deaths_by_year(history: &History, years: RangeInclusive<i64>) -> BTreeMap<i64, usize> {
    let mut table = zeros(&years);
    for death in history.deaths() {
        if let Some(count) = table.get_mut(&death.year) {
            *count += 1;
        }
    }
    table
}

/// Living individuals by age in `year`.
pub fn age_structure(history: &History, year: i64) -> BTreeMap<u32, usize> {
    let mut table = BTreeMap::new();
    for ind in history.living_in(year) {
        if let Some(age) = ind.age(year) {
            *table.entry(age).or_insert(0) += 1;
        }
    }
    table
}

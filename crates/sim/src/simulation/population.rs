//! Population management and operations.
//!
//! This module provides the living set: the individuals alive at a point of
//! the year loop, kept in ascending identifier order.

use crate::base::{Probability, RngStreams, Stage};
use crate::evolution::{SelectionModel, SenescenceModel, Sire};
use crate::genome::{Individual, IndividualId, Sex};
use rayon::prelude::*;

/// The individuals currently alive.
#[derive(Debug, Clone, Default)]
pub struct Population {
    /// Living individuals in ascending id order
    individuals: Vec<Individual>,
}

impl Population {
    /// Create a new population from individuals.
    ///
    /// Individuals are sorted by identifier.
    pub fn new(mut individuals: Vec<Individual>) -> Self {
        individuals.sort_by_key(Individual::id);
        Self { individuals }
    }

    /// Get the number of individuals in the population.
    pub fn size(&self) -> usize {
        self.individuals.len()
    }

    /// Check if population is empty.
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Get all individuals as a slice.
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    /// Look up a living individual by identifier.
    pub fn get(&self, id: IndividualId) -> Option<&Individual> {
        self.individuals
            .binary_search_by_key(&id, Individual::id)
            .ok()
            .and_then(|idx| self.individuals.get(idx))
    }

    /// Individuals of `sex` at or past `maturity` in `year`.
    pub fn mature(&self, sex: Sex, year: i64, maturity: u32) -> impl Iterator<Item = &Individual> {
        self.individuals
            .iter()
            .filter(move |i| i.sex() == sex && i.is_mature(year, maturity))
    }

    /// Mature males of `year` as potential sires.
    pub fn sires(&self, year: i64, maturity: u32) -> Vec<Sire> {
        self.mature(Sex::Male, year, maturity)
            .map(|m| Sire {
                id: m.id(),
                breeding_value: m.breeding_value(),
            })
            .collect()
    }

    /// Realized survival probability of every individual in `year`.
    pub fn survival_probabilities(
        &self,
        year: i64,
        theta: f64,
        senescence: &dyn SenescenceModel,
        selection: &dyn SelectionModel,
    ) -> Vec<Probability> {
        self.individuals
            .par_iter()
            .map(|ind| survival_probability(ind, year, theta, senescence, selection))
            .collect()
    }

    /// Independent survival draw for every individual, keyed by identifier.
    pub fn draw_survival(
        &self,
        year: i64,
        theta: f64,
        senescence: &dyn SenescenceModel,
        selection: &dyn SelectionModel,
        streams: &RngStreams,
    ) -> Vec<bool> {
        let probabilities = self.survival_probabilities(year, theta, senescence, selection);
        self.individuals
            .par_iter()
            .zip(probabilities)
            .map(|(ind, p)| {
                let mut rng = streams.stream(Stage::Survival, year, ind.id().get());
                p.sample(&mut rng)
            })
            .collect()
    }

    /// Keep the individuals flagged alive and return the ids of the others.
    pub fn retain_survivors(&mut self, alive: &[bool]) -> Vec<IndividualId> {
        debug_assert_eq!(alive.len(), self.individuals.len());
        let mut dead = Vec::new();
        let mut flags = alive.iter();
        self.individuals.retain(|ind| {
            let keep = flags.next().copied().unwrap_or(true);
            if !keep {
                dead.push(ind.id());
            }
            keep
        });
        dead
    }

    /// Append a cohort whose identifiers exceed every living identifier.
    pub fn extend(&mut self, cohort: impl IntoIterator<Item = Individual>) {
        self.individuals.extend(cohort);
        debug_assert!(self
            .individuals
            .windows(2)
            .all(|w| w[0].id() < w[1].id()));
    }

    /// Mean breeding value, or `None` when empty.
    pub fn mean_breeding_value(&self) -> Option<f64> {
        mean(self.individuals.iter().map(Individual::breeding_value))
    }

    /// Mean phenotype, or `None` when empty.
    pub fn mean_phenotype(&self) -> Option<f64> {
        mean(self.individuals.iter().map(Individual::phenotype))
    }
}

/// `maxSurvival(age) * selectionFactor(z, theta)`
fn survival_probability(
    ind: &Individual,
    year: i64,
    theta: f64,
    senescence: &dyn SenescenceModel,
    selection: &dyn SelectionModel,
) -> Probability {
    let age = ind.age(year).unwrap_or(0);
    senescence.max_survival(age) * selection.selection_factor(ind.phenotype(), theta)
}

fn mean(values: impl ExactSizeIterator<Item = f64>) -> Option<f64> {
    let n = values.len();
    if n == 0 {
        return None;
    }
    Some(values.sum::<f64>() / n as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evolution::{GaussianSelection, SenescenceCurve};

    fn founder(id: u64, sex: Sex, birth_year: i64, z: f64) -> Individual {
        Individual::founder(IndividualId(id), birth_year, sex, z, z)
    }

    #[test]
    fn test_population_new_sorts() {
        let pop = Population::new(vec![
            founder(3, Sex::Male, 0, 0.0),
            founder(1, Sex::Female, 0, 0.0),
            founder(2, Sex::Female, 0, 0.0),
        ]);
        let ids: Vec<u64> = pop.individuals().iter().map(|i| i.id().get()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(pop.size(), 3);
        assert_eq!(pop.mature(Sex::Female, 0, 0).count(), 2);
        assert!(pop.get(IndividualId(2)).is_some());
        assert!(pop.get(IndividualId(4)).is_none());
    }

    #[test]
    fn test_population_empty() {
        let pop = Population::default();
        assert!(pop.is_empty());
        assert_eq!(pop.mean_breeding_value(), None);
        assert_eq!(pop.mean_phenotype(), None);
    }

    #[test]
    fn test_mature_and_sires() {
        let pop = Population::new(vec![
            founder(1, Sex::Female, 0, 0.0),
            founder(2, Sex::Male, 0, 0.5),
            founder(3, Sex::Male, 2, 0.0),
        ]);
        assert_eq!(pop.mature(Sex::Female, 1, 1).count(), 1);
        let sires = pop.sires(2, 1);
        assert_eq!(sires.len(), 1);
        assert_eq!(sires[0].id, IndividualId(2));
        assert_eq!(sires[0].breeding_value, 0.5);
        assert_eq!(pop.sires(3, 1).len(), 2);
    }

    #[test]
    fn test_retain_survivors() {
        let mut pop = Population::new(vec![
            founder(1, Sex::Female, 0, 0.0),
            founder(2, Sex::Male, 0, 0.0),
            founder(3, Sex::Male, 0, 0.0),
        ]);
        let dead = pop.retain_survivors(&[true, false, true]);
        assert_eq!(dead, vec![IndividualId(2)]);
        assert_eq!(pop.size(), 2);
        assert!(pop.get(IndividualId(2)).is_none());
    }

    #[test]
    fn test_survival_probabilities_compose() {
        let pop = Population::new(vec![
            founder(1, Sex::Female, 0, 0.0),
            founder(2, Sex::Male, 0, 1.0),
        ]);
        let senescence = SenescenceCurve::Constant { survival: 0.5 };
        let selection = GaussianSelection::new(1.0).unwrap();
        let p = pop.survival_probabilities(0, 0.0, &senescence, &selection);
        assert!((p[0].get() - 0.5).abs() < 1e-12);
        assert!((p[1].get() - 0.5 * (-0.5f64).exp()).abs() < 1e-12);
    }

    #[test]
    fn test_draw_survival_is_keyed() {
        let pop = Population::new((1..=50).map(|i| founder(i, Sex::Female, 0, 0.3)).collect());
        let senescence = SenescenceCurve::default();
        let selection = GaussianSelection::new(1.0).unwrap();
        let streams = RngStreams::new(9);
        let a = pop.draw_survival(3, 0.0, &senescence, &selection, &streams);
        let b = pop.draw_survival(3, 0.0, &senescence, &selection, &streams);
        assert_eq!(a, b);
        assert_eq!(a.len(), 50);
    }

    #[test]
    fn test_certain_survival() {
        let pop = Population::new((1..=20).map(|i| founder(i, Sex::Male, 0, 0.0)).collect());
        let senescence = |_age: u32| 1.0;
        let selection = GaussianSelection::new(1.0).unwrap();
        let alive = pop.draw_survival(0, 0.0, &senescence, &selection, &RngStreams::new(1));
        assert!(alive.iter().all(|&a| a));
    }

    #[test]
    fn test_draw_survival_follows_probabilities() {
        let pop = Population::new(
            (1..=40)
                .map(|i| founder(i, Sex::Female, 0, if i % 2 == 0 { 0.0 } else { 40.0 }))
                .collect(),
        );
        let senescence = |_age: u32| 1.0;
        let selection = GaussianSelection::new(1.0).unwrap();
        let p = pop.survival_probabilities(2, 0.0, &senescence, &selection);
        let alive = pop.draw_survival(2, 0.0, &senescence, &selection, &RngStreams::new(4));
        for (prob, survived) in p.iter().zip(&alive) {
            assert_eq!(*survived, prob.get() > 0.5);
        }
        assert_eq!(alive.iter().filter(|&&a| a).count(), 20);
    }

    #[test]
    fn test_means() {
        let pop = Population::new(vec![
            Individual::founder(IndividualId(1), 0, Sex::Female, 1.0, 2.0),
            Individual::founder(IndividualId(2), 0, Sex::Male, 3.0, 0.0),
        ]);
        assert_eq!(pop.mean_breeding_value(), Some(2.0));
        assert_eq!(pop.mean_phenotype(), Some(1.0));
    }
}

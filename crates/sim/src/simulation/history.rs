//! Append-only record of every individual of a run.
//!
//! The ledger holds founders and every later cohort in creation order, which
//! is also ascending identifier order. A separate mortality ledger stores the
//! year each individual failed its survival draw, so the living set of any
//! past year can be reconstructed.

use crate::errors::HistoryError;
use crate::genome::{Individual, IndividualId};
use serde::{Deserialize, Serialize};

/// Death of one individual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Death {
    pub id: IndividualId,
    pub year: i64,
}

/// Every individual ever created, plus the year of death of those that died.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    individuals: Vec<Individual>,
    /// Death year per ledger index
    death_years: Vec<Option<i64>>,
    /// Deaths in the order they happened
    deaths: Vec<Death>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a history from stored individuals and deaths.
    ///
    /// # Errors
    /// Fails when identifiers are not strictly ascending, or when a death
    /// refers to an unknown individual, repeats, or precedes the birth year.
    pub fn from_parts(
        individuals: Vec<Individual>,
        deaths: impl IntoIterator<Item = Death>,
    ) -> Result<Self, HistoryError> {
        if let Some(w) = individuals.windows(2).find(|w| w[0].id() >= w[1].id()) {
            return Err(HistoryError::UnorderedId {
                previous: w[0].id().get(),
                id: w[1].id().get(),
            });
        }
        let mut history = Self {
            death_years: vec![None; individuals.len()],
            individuals,
            deaths: Vec::new(),
        };
        for death in deaths {
            let idx = history
                .index_of(death.id)
                .ok_or(HistoryError::UnknownDeath(death.id.get()))?;
            let invalid = HistoryError::InvalidDeath {
                id: death.id.get(),
                year: death.year,
            };
            if history.death_years[idx].is_some()
                || death.year < history.individuals[idx].birth_year()
            {
                return Err(invalid);
            }
            history.death_years[idx] = Some(death.year);
            history.deaths.push(death);
        }
        Ok(history)
    }

    /// Append a newly created individual.
    pub(crate) fn push(&mut self, individual: Individual) {
        debug_assert!(individual.id() >= self.next_id());
        self.individuals.push(individual);
        self.death_years.push(None);
    }

    /// Record that `id` died in `year`.
    pub(crate) fn record_death(&mut self, id: IndividualId, year: i64) {
        if let Some(idx) = self.index_of(id) {
            debug_assert!(self.death_years[idx].is_none());
            self.death_years[idx] = Some(year);
            self.deaths.push(Death { id, year });
        }
    }

    /// All individuals in creation order.
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    /// Deaths in the order they were recorded.
    pub fn deaths(&self) -> &[Death] {
        &self.deaths
    }

    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Identifier the next created individual receives.
    pub fn next_id(&self) -> IndividualId {
        IndividualId(self.individuals.last().map_or(1, |i| i.id().get() + 1))
    }

    /// Ledger position of `id`.
    pub fn index_of(&self, id: IndividualId) -> Option<usize> {
        self.individuals.binary_search_by_key(&id, Individual::id).ok()
    }

    /// Look up an individual by identifier.
    pub fn get(&self, id: IndividualId) -> Option<&Individual> {
        self.index_of(id).map(|idx| &self.individuals[idx])
    }

    /// Year in which `id` died, if it did.
    pub fn death_year(&self, id: IndividualId) -> Option<i64> {
        self.index_of(id).and_then(|idx| self.death_years[idx])
    }

    /// Individuals paired with their death year.
    pub fn records(&self) -> impl Iterator<Item = (&Individual, Option<i64>)> {
        self.individuals
            .iter()
            .zip(self.death_years.iter().copied())
    }

    /// True when `individual` is counted in the end-of-year census of `year`.
    pub fn is_alive_in(&self, individual: &Individual, year: i64) -> bool {
        individual.birth_year() <= year
            && self
                .death_year(individual.id())
                .map_or(true, |died| died > year)
    }

    /// Individuals in the end-of-year census of `year`.
    pub fn living_in(&self, year: i64) -> impl Iterator<Item = &Individual> {
        self.individuals
            .iter()
            .filter(move |ind| self.is_alive_in(ind, year))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::Sex;

    fn small_history() -> History {
        let mut history = History::new();
        history.push(Individual::founder(IndividualId(1), 0, Sex::Female, 0.0, 0.1));
        history.push(Individual::founder(IndividualId(2), 0, Sex::Male, 0.0, -0.1));
        history.push(Individual::offspring(
            IndividualId(3),
            IndividualId(1),
            IndividualId(2),
            1,
            Sex::Female,
            0.0,
            0.0,
        ));
        history.record_death(IndividualId(2), 2);
        history
    }

    #[test]
    fn test_next_id() {
        assert_eq!(History::new().next_id(), IndividualId(1));
        assert_eq!(small_history().next_id(), IndividualId(4));
    }

    #[test]
    fn test_death_lookup() {
        let history = small_history();
        assert_eq!(history.death_year(IndividualId(2)), Some(2));
        assert_eq!(history.death_year(IndividualId(1)), None);
        assert_eq!(history.death_year(IndividualId(99)), None);
        assert_eq!(
            history.deaths(),
            &[Death {
                id: IndividualId(2),
                year: 2
            }]
        );
    }

    #[test]
    fn test_living_in() {
        let history = small_history();
        let ids = |year| -> Vec<u64> { history.living_in(year).map(|i| i.id().get()).collect() };
        assert_eq!(ids(0), vec![1, 2]);
        assert_eq!(ids(1), vec![1, 2, 3]);
        assert_eq!(ids(2), vec![1, 3]);
        assert!(ids(-1).is_empty());
        let male = history.get(IndividualId(2)).unwrap();
        assert!(history.is_alive_in(male, 1));
        assert!(!history.is_alive_in(male, 2));
    }

    #[test]
    fn test_from_parts_roundtrip() {
        let history = small_history();
        let rebuilt = History::from_parts(
            history.individuals().to_vec(),
            history.deaths().iter().copied(),
        )
        .unwrap();
        assert_eq!(rebuilt, history);
    }

    #[test]
    fn test_from_parts_rejects_bad_ledgers() {
        let a = Individual::founder(IndividualId(2), 0, Sex::Female, 0.0, 0.0);
        let b = Individual::founder(IndividualId(1), 0, Sex::Male, 0.0, 0.0);
        assert_eq!(
            History::from_parts(vec![a.clone(), b.clone()], []),
            Err(HistoryError::UnorderedId { previous: 2, id: 1 })
        );

        let death = Death {
            id: IndividualId(5),
            year: 1,
        };
        assert_eq!(
            History::from_parts(vec![b.clone(), a.clone()], [death]),
            Err(HistoryError::UnknownDeath(5))
        );

        let early = Death {
            id: IndividualId(1),
            year: -1,
        };
        assert!(History::from_parts(vec![b.clone(), a.clone()], [early]).is_err());

        let twice = Death {
            id: IndividualId(1),
            year: 3,
        };
        assert!(History::from_parts(vec![b, a], [twice, twice]).is_err());
    }
}

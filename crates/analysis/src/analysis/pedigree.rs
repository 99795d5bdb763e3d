//! Pedigree checks and summaries
//!
//! A History produced by the engine satisfies a set of pedigree invariants:
//! parents exist and precede their offspring, were mature and alive in the
//! birth year, and have the expected sexes. [`validate_pedigree`] reports
//! every violation it finds, which is mostly useful for histories loaded from
//! a database.

use pedisim_sim::genome::{Individual, IndividualId, Sex};
use pedisim_sim::simulation::History;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// One violated pedigree invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum PedigreeIssue {
    /// A parent identifier is not in the History
    UnknownParent { id: u64, parent: u64 },
    /// A parent identifier is not smaller than the offspring's
    ParentNotEarlier { id: u64, parent: u64 },
    /// A parent had not reached maturity in the offspring's birth year
    ParentImmature {
        id: u64,
        parent: u64,
        parent_birth_year: i64,
        birth_year: i64,
    },
    /// A parent died in or before the offspring's birth year
    ParentDead {
        id: u64,
        parent: u64,
        death_year: i64,
        birth_year: i64,
    },
    DamNotFemale { id: u64, dam: u64 },
    SireNotMale { id: u64, sire: u64 },
}

impl fmt::Display for PedigreeIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::UnknownParent { id, parent } => {
                write!(f, "individual {id}: unknown parent {parent}")
            }
            Self::ParentNotEarlier { id, parent } => {
                write!(f, "individual {id}: parent {parent} does not precede it")
            }
            Self::ParentImmature {
                id,
                parent,
                parent_birth_year,
                birth_year,
            } => write!(
                f,
                "individual {id} (born {birth_year}): parent {parent} born {parent_birth_year} was immature"
            ),
            Self::ParentDead {
                id,
                parent,
                death_year,
                birth_year,
            } => write!(
                f,
                "individual {id} (born {birth_year}): parent {parent} died in {death_year}"
            ),
            Self::DamNotFemale { id, dam } => write!(f, "individual {id}: dam {dam} is not female"),
            Self::SireNotMale { id, sire } => write!(f, "individual {id}: sire {sire} is not male"),
        }
    }
}

/// Check every non-founder of `history` against the pedigree invariants.
///
/// `maturity` is the minimum parental age in years. Issues are returned in
/// identifier order; an empty vector means the pedigree is consistent.
pub fn validate_pedigree(history: &History, maturity: u32) -> Vec<PedigreeIssue> {
    let mut issues = Vec::new();
    for ind in history.individuals() {
        let (Some(dam), Some(sire)) = (ind.dam(), ind.sire()) else {
            continue;
        };
        for (parent_id, expected) in [(dam, Sex::Female), (sire, Sex::Male)] {
            check_parent(history, ind, parent_id, expected, maturity, &mut issues);
        }
    }
    issues
}

fn check_parent(
    history: &History,
    ind: &Individual,
    parent_id: IndividualId,
    expected: Sex,
    maturity: u32,
    issues: &mut Vec<PedigreeIssue>,
) {
    let id = ind.id().get();
    let parent = parent_id.get();
    if parent_id >= ind.id() {
        issues.push(PedigreeIssue::ParentNotEarlier { id, parent });
    }
    let Some(record) = history.get(parent_id) else {
        issues.push(PedigreeIssue::UnknownParent { id, parent });
        return;
    };

    let birth_year = ind.birth_year();
    if !record.is_mature(birth_year, maturity) {
        issues.push(PedigreeIssue::ParentImmature {
            id,
            parent,
            parent_birth_year: record.birth_year(),
            birth_year,
        });
    }
    if let Some(death_year) = history.death_year(parent_id) {
        if death_year <= birth_year {
            issues.push(PedigreeIssue::ParentDead {
                id,
                parent,
                death_year,
                birth_year,
            });
        }
    }
    if record.sex() != expected {
        issues.push(match expected {
            Sex::Female => PedigreeIssue::DamNotFemale { id, dam: parent },
            Sex::Male => PedigreeIssue::SireNotMale { id, sire: parent },
        });
    }
}

/// Shape of a pedigree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PedigreeSummary {
    pub individuals: usize,
    pub founders: usize,
    /// Distinct females with at least one recorded offspring
    pub dams: usize,
    /// Distinct males with at least one recorded offspring
    pub sires: usize,
    /// Mean number of offspring per dam (0 without offspring)
    pub mean_offspring_per_dam: f64,
    /// Longest founder-to-descendant path (founders are generation 0)
    pub max_generation: u32,
}

/// Count founders, breeders, and generations of `history`.
pub fn pedigree_summary(history: &History) -> PedigreeSummary {
    let mut dams = HashSet::new();
    let mut sires = HashSet::new();
    let mut generation: HashMap<IndividualId, u32> = HashMap::with_capacity(history.len());
    let mut founders = 0;
    let mut offspring = 0;

    for ind in history.individuals() {
        let depth = match (ind.dam(), ind.sire()) {
            (Some(dam), Some(sire)) => {
                dams.insert(dam);
                sires.insert(sire);
                offspring += 1;
                let parent_depth = |p| generation.get(&p).copied().unwrap_or(0);
                parent_depth(dam).max(parent_depth(sire)) + 1
            }
            _ => {
                founders += 1;
                0
            }
        };
        generation.insert(ind.id(), depth);
    }

    PedigreeSummary {
        individuals: history.len(),
        founders,
        dams: dams.len(),
        sires: sires.len(),
        mean_offspring_per_dam: if dams.is_empty() {
            0.0
        } else {
            offspring as f64 / dams.len() as f64
        },
        max_generation: generation.values().copied().max().unwrap_or(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pedisim_sim::simulation::{Configuration, Death, Simulation};

    fn founder(id: u64, sex: Sex) -> Individual {
        Individual::founder(IndividualId(id), 0, sex, 0.0, 0.0)
    }

    fn child(id: u64, dam: u64, sire: u64, birth_year: i64) -> Individual {
        Individual::offspring(
            IndividualId(id),
            IndividualId(dam),
            IndividualId(sire),
            birth_year,
            Sex::Female,
            0.0,
            0.0,
        )
    }

    #[test]
    fn test_engine_pedigree_is_consistent() {
        let mut config = Configuration::new(1, 30);
        config.demography.carrying_capacity = 80;
        config.demography.maturity = 2;
        config.execution.seed = Some(8);
        let mut sim = Simulation::new(config).unwrap();
        sim.run().unwrap();

        assert!(validate_pedigree(sim.history(), 2).is_empty());

        let summary = pedigree_summary(sim.history());
        assert_eq!(summary.individuals, sim.history().len());
        assert_eq!(summary.founders, 80);
        assert!(summary.dams > 0 && summary.sires > 0);
        assert!(summary.max_generation >= 1);
        // Maturity 2 allows at most one generation per two years
        assert!(summary.max_generation <= 15);
    }

    #[test]
    fn test_detects_violations() {
        let individuals = vec![
            founder(1, Sex::Female),
            founder(2, Sex::Female),
            child(3, 1, 2, 1),
            child(4, 2, 1, 3),
        ];
        let deaths = [Death {
            id: IndividualId(2),
            year: 2,
        }];
        let history = History::from_parts(individuals, deaths).unwrap();

        let issues = validate_pedigree(&history, 2);
        assert!(issues.contains(&PedigreeIssue::SireNotMale { id: 3, sire: 2 }));
        assert!(issues.contains(&PedigreeIssue::ParentImmature {
            id: 3,
            parent: 1,
            parent_birth_year: 0,
            birth_year: 1,
        }));
        assert!(issues.contains(&PedigreeIssue::ParentDead {
            id: 4,
            parent: 2,
            death_year: 2,
            birth_year: 3,
        }));
        assert!(issues.contains(&PedigreeIssue::SireNotMale { id: 4, sire: 1 }));
        assert!(!issues.contains(&PedigreeIssue::DamNotFemale { id: 4, dam: 2 }));
    }

    #[test]
    fn test_unknown_and_later_parents() {
        let individuals = vec![founder(1, Sex::Female), child(2, 1, 9, 1)];
        let history = History::from_parts(individuals, []).unwrap();
        let issues = validate_pedigree(&history, 1);
        assert_eq!(
            issues,
            vec![
                PedigreeIssue::ParentNotEarlier { id: 2, parent: 9 },
                PedigreeIssue::UnknownParent { id: 2, parent: 9 },
            ]
        );
        assert!(issues[1].to_string().contains("unknown parent 9"));
    }

    #[test]
    fn test_summary_generations() {
        let individuals = vec![
            founder(1, Sex::Female),
            founder(2, Sex::Male),
            child(3, 1, 2, 1),
            child(4, 3, 2, 2),
            child(5, 1, 2, 2),
        ];
        let summary = pedigree_summary(&History::from_parts(individuals, []).unwrap());
        assert_eq!(summary.founders, 2);
        assert_eq!(summary.dams, 2);
        assert_eq!(summary.sires, 1);
        assert_eq!(summary.max_generation, 2);
        assert!((summary.mean_offspring_per_dam - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_empty_history() {
        let summary = pedigree_summary(&History::new());
        assert_eq!(summary.individuals, 0);
        assert_eq!(summary.max_generation, 0);
        assert_eq!(summary.mean_offspring_per_dam, 0.0);
        assert!(validate_pedigree(&History::new(), 1).is_empty());
    }
}

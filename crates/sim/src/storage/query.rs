//! Query interface for analyzing recorded simulation data.

use crate::errors::DatabaseError;
use crate::genome::{Individual, IndividualId, Sex};
use crate::simulation::{Configuration, Death, History, YearSummary};
use crate::storage::Database;
use rusqlite::{params, OptionalExtension};
use std::collections::HashMap;

/// Query builder for analyzing simulation data.
pub struct QueryBuilder {
    db: Database,
}

/// Raw `individuals` row.
type IndividualRow = (i64, Option<i64>, Option<i64>, i64, String, f64, f64);

impl QueryBuilder {
    /// Open a database for querying.
    pub fn new(db_path: impl AsRef<std::path::Path>) -> Result<Self, DatabaseError> {
        let db = Database::open(db_path)?;
        Ok(Self { db })
    }

    /// Get raw metadata value by key.
    pub fn get_metadata_value(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let mut stmt = self
            .db
            .connection()
            .prepare("SELECT value FROM metadata WHERE key = ?1")
            .map_err(|e| DatabaseError::Query(e.to_string()))?;

        stmt.query_row(params![key], |row| row.get(0))
            .optional()
            .map_err(|e| DatabaseError::Query(e.to_string()))
    }

    /// Get all metadata as a map.
    pub fn get_metadata(&self) -> Result<HashMap<String, String>, DatabaseError> {
        let mut stmt = self
            .db
            .connection()
            .prepare("SELECT key, value FROM metadata")
            .map_err(|e| DatabaseError::Query(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
            .map_err(|e| DatabaseError::Query(e.to_string()))?;

        let mut meta = HashMap::new();
        for row in rows {
            let (k, v): (String, String) = row.map_err(|e| DatabaseError::Query(e.to_string()))?;
            meta.insert(k, v);
        }
        Ok(meta)
    }

    /// Get complete simulation configuration from database.
    pub fn get_full_config(&self) -> Result<Configuration, DatabaseError> {
        let json = self
            .get_metadata_value("full_config_json")?
            .ok_or_else(|| {
                DatabaseError::Query("Missing full_config_json in metadata".to_string())
            })?;

        serde_json::from_str(&json)
            .map_err(|e| DatabaseError::Malformed(format!("Failed to parse config: {e}")))
    }

    /// All recorded individuals in identifier order.
    pub fn get_individuals(&self) -> Result<Vec<Individual>, DatabaseError> {
        let mut stmt = self
            .db
            .connection()
            .prepare("SELECT id, dam, sire, birth_year, sex, a, z FROM individuals ORDER BY id")
            .map_err(|e| DatabaseError::Query(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                    row.get(5)?,
                    row.get(6)?,
                ))
            })
            .map_err(|e| DatabaseError::Query(e.to_string()))?;

        let mut individuals = Vec::new();
        for row in rows {
            let row: IndividualRow = row.map_err(|e| DatabaseError::Query(e.to_string()))?;
            individuals.push(individual_from_row(row)?);
        }
        Ok(individuals)
    }

    /// All recorded deaths in the order they happened.
    pub fn get_deaths(&self) -> Result<Vec<Death>, DatabaseError> {
        let mut stmt = self
            .db
            .connection()
            .prepare("SELECT id, year FROM deaths ORDER BY year, id")
            .map_err(|e| DatabaseError::Query(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| {
                Ok(Death {
                    id: IndividualId(row.get::<_, i64>(0)? as u64),
                    year: row.get(1)?,
                })
            })
            .map_err(|e| DatabaseError::Query(e.to_string()))?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| DatabaseError::Query(e.to_string()))
    }

    /// Rebuild the full History.
    pub fn get_history(&self) -> Result<History, DatabaseError> {
        let individuals = self.get_individuals()?;
        let deaths = self.get_deaths()?;
        History::from_parts(individuals, deaths)
            .map_err(|e| DatabaseError::Malformed(e.to_string()))
    }

    /// Per-year census in year order.
    pub fn get_census(&self) -> Result<Vec<YearSummary>, DatabaseError> {
        let mut stmt = self
            .db
            .connection()
            .prepare(
                "SELECT year, theta, entering, deaths, survivors, regulation, births, size, mean_a, mean_z
                 FROM census ORDER BY year",
            )
            .map_err(|e| DatabaseError::Query(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| {
                Ok(YearSummary {
                    year: row.get(0)?,
                    theta: row.get(1)?,
                    entering: row.get::<_, i64>(2)? as usize,
                    deaths: row.get::<_, i64>(3)? as usize,
                    survivors: row.get::<_, i64>(4)? as usize,
                    regulation: row.get(5)?,
                    births: row.get::<_, i64>(6)? as usize,
                    size: row.get::<_, i64>(7)? as usize,
                    mean_breeding_value: row.get(8)?,
                    mean_phenotype: row.get(9)?,
                })
            })
            .map_err(|e| DatabaseError::Query(e.to_string()))?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| DatabaseError::Query(e.to_string()))
    }

    /// Years present in the census table.
    pub fn get_recorded_years(&self) -> Result<Vec<i64>, DatabaseError> {
        let mut stmt = self
            .db
            .connection()
            .prepare("SELECT year FROM census ORDER BY year")
            .map_err(|e| DatabaseError::Query(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| row.get(0))
            .map_err(|e| DatabaseError::Query(e.to_string()))?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| DatabaseError::Query(e.to_string()))
    }

    /// Close the query builder.
    pub fn close(self) -> Result<(), DatabaseError> {
        self.db.close()
    }
}

fn individual_from_row(row: IndividualRow) -> Result<Individual, DatabaseError> {
    let (id, dam, sire, birth_year, sex, a, z) = row;
    let id = IndividualId(id as u64);
    let sex = Sex::from_code(&sex)
        .ok_or_else(|| DatabaseError::Malformed(format!("Individual {id} has sex code {sex:?}")))?;
    match (dam, sire) {
        (None, None) => Ok(Individual::founder(id, birth_year, sex, a, z)),
        (Some(dam), Some(sire)) => Ok(Individual::offspring(
            id,
            IndividualId(dam as u64),
            IndividualId(sire as u64),
            birth_year,
            sex,
            a,
            z,
        )),
        _ => Err(DatabaseError::Malformed(format!(
            "Individual {id} has only one recorded parent"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::{Environment, Simulation};
    use crate::storage::Recorder;
    use tempfile::tempdir;

    fn recorded_run(path: &std::path::Path) -> Simulation {
        let mut config = Configuration::new(2000, 2011);
        config.demography.carrying_capacity = 40;
        config.execution.seed = Some(17);
        config.selection.environment = Environment::step_change(config.years(), 2006, 0.0, 1.0);
        let mut sim = Simulation::new(config).unwrap();
        let mut recorder = Recorder::new(path, sim.configuration()).unwrap();
        recorder.record_simulation(&sim).unwrap();
        while !sim.is_finished() {
            sim.step().unwrap();
            recorder.record_simulation(&sim).unwrap();
        }
        recorder.close().unwrap();
        sim
    }

    #[test]
    fn test_query_flow() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("query.sqlite");
        let sim = recorded_run(&path);

        let query = QueryBuilder::new(&path).unwrap();
        assert_eq!(query.get_full_config().unwrap(), *sim.configuration());
        assert_eq!(
            query.get_metadata_value("seed").unwrap(),
            Some("17".to_string())
        );
        assert!(query.get_metadata_value("missing").unwrap().is_none());
        assert!(query.get_metadata().unwrap().contains_key("created_at"));

        let history = query.get_history().unwrap();
        assert_eq!(history.individuals(), sim.history().individuals());
        for ind in history.individuals() {
            assert_eq!(
                history.death_year(ind.id()),
                sim.history().death_year(ind.id())
            );
        }

        let census = query.get_census().unwrap();
        assert_eq!(census, sim.census());
        assert_eq!(
            query.get_recorded_years().unwrap(),
            (2000..=2011).collect::<Vec<_>>()
        );
        query.close().unwrap();
    }

    #[test]
    fn test_missing_config() {
        let dir = tempdir().unwrap();
        let query = QueryBuilder::new(dir.path().join("empty.sqlite")).unwrap();
        assert!(matches!(
            query.get_full_config(),
            Err(DatabaseError::Query(_))
        ));
        assert!(query.get_history().unwrap().is_empty());
        query.close().unwrap();
    }

    #[test]
    fn test_malformed_sex_code() {
        let row: IndividualRow = (1, None, None, 0, "X".to_string(), 0.0, 0.0);
        assert!(matches!(
            individual_from_row(row),
            Err(DatabaseError::Malformed(_))
        ));
        let row: IndividualRow = (2, Some(1), None, 0, "F".to_string(), 0.0, 0.0);
        assert!(individual_from_row(row).is_err());
    }
}

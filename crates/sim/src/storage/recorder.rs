//! Incremental recorder writing a run into SQLite.
//!
//! The recorder is the single writer of a database. It stores the
//! configuration once, then after each year appends whatever the History and
//! census gained since the previous call.

use crate::errors::DatabaseError;
use crate::simulation::{Configuration, History, Simulation, YearSummary};
use crate::storage::Database;
use rusqlite::params;
use std::path::Path;

/// Statistics about what a recorder has written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecorderStats {
    pub individuals: usize,
    pub deaths: usize,
    pub years: usize,
}

/// Appends History and census rows to a database.
#[derive(Debug)]
pub struct Recorder {
    db: Database,
    stats: RecorderStats,
}

impl Recorder {
    /// Open `db_path` and store the run configuration in its metadata.
    pub fn new(db_path: impl AsRef<Path>, config: &Configuration) -> Result<Self, DatabaseError> {
        let mut db = Database::open(db_path)?;

        let exec = &config.execution;
        let created_at = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let full_config = serde_json::to_string(config)
            .map_err(|e| DatabaseError::Insert(format!("Failed to serialize config: {e}")))?;
        let meta_pairs = vec![
            ("start_year", exec.start_year.to_string()),
            ("end_year", exec.end_year.to_string()),
            (
                "seed",
                exec.seed
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "None".to_string()),
            ),
            (
                "carrying_capacity",
                config.demography.carrying_capacity.to_string(),
            ),
            ("va", config.genetics.va.to_string()),
            ("vp", config.genetics.vp.to_string()),
            ("omega", config.selection.omega.to_string()),
            ("full_config_json", full_config),
            ("version", env!("CARGO_PKG_VERSION").to_string()),
            ("created_at", created_at.to_string()),
        ];

        let tx = db.transaction()?;
        {
            let mut stmt = tx
                .prepare("INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)")
                .map_err(|e| DatabaseError::Insert(e.to_string()))?;
            for (k, v) in meta_pairs {
                stmt.execute(params![k, v])
                    .map_err(|e| DatabaseError::Insert(e.to_string()))?;
            }
        }
        tx.commit()
            .map_err(|e| DatabaseError::Transaction(e.to_string()))?;

        Ok(Self {
            db,
            stats: RecorderStats::default(),
        })
    }

    /// Set one metadata entry.
    pub fn set_metadata(&mut self, key: &str, value: &str) -> Result<(), DatabaseError> {
        self.db
            .connection()
            .execute(
                "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
                params![key, value],
            )
            .map_err(|e| DatabaseError::Insert(e.to_string()))?;
        Ok(())
    }

    /// Append everything `sim` produced since the last call.
    pub fn record_simulation(&mut self, sim: &Simulation) -> Result<(), DatabaseError> {
        self.record(sim.history(), sim.census())
    }

    /// Append the unrecorded tail of `history` and `census`.
    pub fn record(
        &mut self,
        history: &History,
        census: &[YearSummary],
    ) -> Result<(), DatabaseError> {
        let new_individuals = history.individuals().get(self.stats.individuals..).unwrap_or(&[]);
        let new_deaths = history.deaths().get(self.stats.deaths..).unwrap_or(&[]);
        let new_years = census.get(self.stats.years..).unwrap_or(&[]);

        let tx = self.db.transaction()?;
        {
            let mut stmt = tx
                .prepare(
                    "INSERT INTO individuals (id, dam, sire, birth_year, sex, a, z)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                )
                .map_err(|e| DatabaseError::Insert(e.to_string()))?;
            for ind in new_individuals {
                stmt.execute(params![
                    ind.id().get() as i64,
                    ind.dam().map(|d| d.get() as i64),
                    ind.sire().map(|s| s.get() as i64),
                    ind.birth_year(),
                    ind.sex().code(),
                    ind.breeding_value(),
                    ind.phenotype(),
                ])
                .map_err(|e| DatabaseError::Insert(e.to_string()))?;
            }

            let mut stmt = tx
                .prepare("INSERT INTO deaths (id, year) VALUES (?1, ?2)")
                .map_err(|e| DatabaseError::Insert(e.to_string()))?;
            for death in new_deaths {
                stmt.execute(params![death.id.get() as i64, death.year])
                    .map_err(|e| DatabaseError::Insert(e.to_string()))?;
            }

            let mut stmt = tx
                .prepare(
                    "INSERT INTO census
                     (year, theta, entering, deaths, survivors, regulation, births, size, mean_a, mean_z)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                )
                .map_err(|e| DatabaseError::Insert(e.to_string()))?;
            for s in new_years {
                stmt.execute(params![
                    s.year,
                    s.theta,
                    s.entering as i64,
                    s.deaths as i64,
                    s.survivors as i64,
                    s.regulation,
                    s.births as i64,
                    s.size as i64,
                    s.mean_breeding_value,
                    s.mean_phenotype,
                ])
                .map_err(|e| DatabaseError::Insert(e.to_string()))?;
            }
        }
        tx.commit()
            .map_err(|e| DatabaseError::Transaction(e.to_string()))?;

        self.stats.individuals += new_individuals.len();
        self.stats.deaths += new_deaths.len();
        self.stats.years += new_years.len();
        Ok(())
    }

    /// Rows written so far.
    pub fn stats(&self) -> RecorderStats {
        self.stats
    }

    /// Close the database.
    pub fn close(self) -> Result<RecorderStats, DatabaseError> {
        self.db.close()?;
        Ok(self.stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn small_config() -> Configuration {
        let mut config = Configuration::new(1, 8);
        config.demography.carrying_capacity = 30;
        config.execution.seed = Some(5);
        config
    }

    #[test]
    fn test_recorder_flow() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run.sqlite");
        let mut sim = Simulation::new(small_config()).unwrap();
        let mut recorder = Recorder::new(&path, sim.configuration()).unwrap();

        recorder.record_simulation(&sim).unwrap();
        assert_eq!(recorder.stats().individuals, 30);
        assert_eq!(recorder.stats().years, 0);

        while !sim.is_finished() {
            sim.step().unwrap();
            recorder.record_simulation(&sim).unwrap();
        }
        // Nothing new to write
        recorder.record_simulation(&sim).unwrap();

        let stats = recorder.close().unwrap();
        assert_eq!(stats.individuals, sim.history().len());
        assert_eq!(stats.deaths, sim.history().deaths().len());
        assert_eq!(stats.years, 8);

        let db = Database::open(&path).unwrap();
        let db_stats = db.stats().unwrap();
        assert_eq!(db_stats.individual_records, sim.history().len());
        assert_eq!(db_stats.census_records, 8);
        let n_meta: i64 = db
            .connection()
            .query_row("SELECT COUNT(*) FROM metadata", [], |r| r.get(0))
            .unwrap();
        assert!(n_meta >= 10);
        db.close().unwrap();
    }

    #[test]
    fn test_set_metadata() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("meta.sqlite");
        let mut recorder = Recorder::new(&path, &small_config()).unwrap();
        recorder.set_metadata("outcome", "completed").unwrap();
        recorder.set_metadata("outcome", "aborted").unwrap();
        recorder.close().unwrap();

        let db = Database::open(&path).unwrap();
        let value: String = db
            .connection()
            .query_row(
                "SELECT value FROM metadata WHERE key = 'outcome'",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(value, "aborted");
        db.close().unwrap();
    }
}

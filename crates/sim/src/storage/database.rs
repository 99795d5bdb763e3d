//! Low-level database operations and schema management.

pub use crate::errors::DatabaseError;
use rusqlite::{Connection, Transaction};
use std::path::{Path, PathBuf};

/// Connection settings tuned for many small appending transactions.
const PRAGMAS: &str = "PRAGMA journal_mode = WAL;
PRAGMA synchronous = NORMAL;
PRAGMA temp_store = MEMORY;
PRAGMA cache_size = -64000;";

/// Tables of a recorded run. Every statement is idempotent so reopening an
/// existing file is harmless.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

-- Pedigree and phenotypes, one row per individual ever created
CREATE TABLE IF NOT EXISTS individuals (
    id INTEGER PRIMARY KEY,
    dam INTEGER,
    sire INTEGER,
    birth_year INTEGER NOT NULL,
    sex TEXT NOT NULL,
    a REAL NOT NULL,
    z REAL NOT NULL
);

-- Mortality ledger
CREATE TABLE IF NOT EXISTS deaths (
    id INTEGER PRIMARY KEY,
    year INTEGER NOT NULL
);

-- One row per simulated year
CREATE TABLE IF NOT EXISTS census (
    year INTEGER PRIMARY KEY,
    theta REAL NOT NULL,
    entering INTEGER NOT NULL,
    deaths INTEGER NOT NULL,
    survivors INTEGER NOT NULL,
    regulation REAL NOT NULL,
    births INTEGER NOT NULL,
    size INTEGER NOT NULL,
    mean_a REAL,
    mean_z REAL
);

CREATE INDEX IF NOT EXISTS idx_individuals_birth ON individuals(birth_year);
CREATE INDEX IF NOT EXISTS idx_deaths_year ON deaths(year);";

/// SQLite file holding one recorded run.
#[derive(Debug)]
pub struct Database {
    conn: Connection,
    path: PathBuf,
}

impl Database {
    /// Open `path`, creating the file and its tables if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DatabaseError> {
        let path = path.as_ref().to_path_buf();
        let conn = Connection::open(&path).map_err(|e| DatabaseError::Connection(e.to_string()))?;
        conn.execute_batch(PRAGMAS)
            .and_then(|_| conn.execute_batch(SCHEMA))
            .map_err(|e| DatabaseError::Initialization(e.to_string()))?;
        Ok(Self { conn, path })
    }

    /// Begin a transaction for batched operations.
    pub fn transaction(&mut self) -> Result<Transaction<'_>, DatabaseError> {
        self.conn
            .transaction()
            .map_err(|e| DatabaseError::Transaction(e.to_string()))
    }

    /// Underlying connection, for reads.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Fold the write-ahead log back into the main file and close it, so a
    /// finished run is a single self-contained file.
    pub fn close(self) -> Result<(), DatabaseError> {
        let folded = self
            .conn
            .execute_batch("PRAGMA wal_checkpoint(TRUNCATE); PRAGMA journal_mode = DELETE;");
        if let Err(e) = folded {
            tracing::warn!(path = %self.path.display(), "WAL checkpoint failed: {e}");
        }
        self.conn
            .close()
            .map_err(|(_, e)| DatabaseError::Close(e.to_string()))?;
        remove_sidecars(&self.path);
        Ok(())
    }

    /// Tables present and how many rows each run table holds.
    pub fn stats(&self) -> Result<DatabaseStats, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .map_err(|e| DatabaseError::Query(e.to_string()))?;

        let tables = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(|e| DatabaseError::Query(e.to_string()))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| DatabaseError::Query(e.to_string()))?;

        let count = |table: &str| -> Result<usize, DatabaseError> {
            self.conn
                .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                    row.get::<_, i64>(0)
                })
                .map(|n| n as usize)
                .map_err(|e| DatabaseError::Query(e.to_string()))
        };

        Ok(DatabaseStats {
            individual_records: count("individuals")?,
            death_records: count("deaths")?,
            census_records: count("census")?,
            tables,
        })
    }
}

/// Row counts of a database.
#[derive(Debug, Clone)]
pub struct DatabaseStats {
    pub individual_records: usize,
    pub death_records: usize,
    pub census_records: usize,
    pub tables: Vec<String>,
}

/// Remove `-wal`/`-shm` files left next to a database.
fn remove_sidecars(db_path: &Path) {
    for suffix in ["-wal", "-shm"] {
        let mut name = db_path.as_os_str().to_owned();
        name.push(suffix);
        match std::fs::remove_file(&name) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => {
                tracing::warn!("Could not remove {}: {e}", Path::new(&name).display());
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_database_creation() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("create.sqlite");

        let db = Database::open(&path).expect("Failed to create database");
        assert_eq!(db.path(), path.as_path());

        db.close().expect("Failed to close database");
        assert!(path.exists());
        assert!(!dir.path().join("create.sqlite-wal").exists());
    }

    #[test]
    fn test_schema_initialization() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("schema.sqlite")).expect("Failed to create database");
        let stats = db.stats().expect("Failed to get stats");

        for table in ["metadata", "individuals", "deaths", "census"] {
            assert!(stats.tables.contains(&table.to_string()), "missing {table}");
        }
        assert_eq!(stats.individual_records, 0);
        assert_eq!(stats.death_records, 0);
        assert_eq!(stats.census_records, 0);

        db.close().expect("Failed to close database");
    }

    #[test]
    fn test_transaction() {
        let dir = tempdir().unwrap();
        let mut db = Database::open(dir.path().join("tx.sqlite")).expect("Failed to create database");
        let tx = db.transaction().expect("Failed to begin transaction");
        tx.execute(
            "INSERT INTO metadata (key, value) VALUES ('k', 'v')",
            [],
        )
        .unwrap();
        tx.commit().expect("Failed to commit transaction");
        assert_eq!(db.stats().unwrap().tables.len(), 4);

        db.close().expect("Failed to close database");
    }

    #[test]
    fn test_reopen_keeps_schema() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reopen.sqlite");
        Database::open(&path).unwrap().close().unwrap();
        let db = Database::open(&path).unwrap();
        assert!(db.stats().is_ok());
        db.close().unwrap();
    }
}

use thiserror::Error;

/// Invalid simulation parameters.
///
/// Raised once, before any individual is created. A run never starts with a
/// configuration that fails validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    /// Selection width must be strictly positive.
    #[error("Invalid selection width omega = {0} (must be > 0)")]
    NonPositiveOmega(f64),

    /// Additive genetic variance cannot be negative.
    #[error("Invalid additive genetic variance VA = {0} (must be >= 0)")]
    NegativeAdditiveVariance(f64),

    /// Phenotypic variance must cover the additive genetic variance.
    #[error("Phenotypic variance VP = {vp} is smaller than additive variance VA = {va}")]
    PhenotypicBelowAdditive { vp: f64, va: f64 },

    /// Carrying capacity must be at least one individual.
    #[error("Invalid carrying capacity K = {0} (must be > 0)")]
    NonPositiveCapacity(usize),

    /// The year range is empty.
    #[error("Invalid year range: end year {end} is before start year {start}")]
    YearRange { start: i64, end: i64 },

    /// An explicit optimum trajectory does not cover the simulated years.
    #[error("Environment trajectory has {actual} values but the run spans {expected} years")]
    EnvironmentLength { expected: usize, actual: usize },

    /// Any other out-of-range parameter.
    #[error("Invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
}

impl ConfigurationError {
    pub(crate) fn invalid(name: &'static str, value: f64, reason: &'static str) -> Self {
        Self::InvalidParameter {
            name,
            value,
            reason,
        }
    }
}

/// Errors raised while running a simulation.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// A sampling distribution rejected its parameters.
    #[error("Distribution error in {context}: {message}")]
    Distribution {
        context: &'static str,
        message: String,
    },

    /// `step` was called after the final year.
    #[error("Simulation already finished at year {0}")]
    Finished(i64),
}

impl SimulationError {
    pub(crate) fn distribution(context: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Distribution {
            context,
            message: err.to_string(),
        }
    }
}

/// A History assembled from stored parts breaks the ledger invariants.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HistoryError {
    /// Identifiers must be strictly ascending in creation order.
    #[error("Individual {id} follows {previous}; identifiers must be strictly ascending")]
    UnorderedId { previous: u64, id: u64 },

    /// A death refers to an individual that is not in the ledger.
    #[error("Death recorded for unknown individual {0}")]
    UnknownDeath(u64),

    /// An individual can die only once, not before its birth year.
    #[error("Invalid death of individual {id} in year {year}")]
    InvalidDeath { id: u64, year: i64 },
}

/// Errors that can occur during simulation building.
#[derive(Debug, Error)]
pub enum BuilderError {
    /// A required parameter is missing
    #[error("Missing required parameter: {0}")]
    MissingRequired(&'static str),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Simulation(#[from] SimulationError),
}

/// Database error types.
#[derive(Debug, Clone, Error)]
pub enum DatabaseError {
    #[error("Database connection error: {0}")]
    Connection(String),
    #[error("Database initialization error: {0}")]
    Initialization(String),
    #[error("Transaction error: {0}")]
    Transaction(String),
    #[error("Query error: {0}")]
    Query(String),
    #[error("Insert error: {0}")]
    Insert(String),
    #[error("Close error: {0}")]
    Close(String),
    #[error("Stored data is malformed: {0}")]
    Malformed(String),
}

//! Shared default values for simulation configuration.
//! These values are used by the `init` command (via clap) and match
//! `Configuration::default()` in the simulation crate.

pub const CONFIG_FILE: &str = "pedisim.json";
pub const OUTPUT_DB: &str = "simulation.db";

// Execution
pub const START_YEAR: i64 = 1;
pub const END_YEAR: i64 = 100;

// Demography
pub const MATURITY: u32 = 1;
pub const BASEREPRO: f64 = 3.0;
pub const REPROVARF: f64 = 0.5;
pub const REPROVARM: f64 = 0.5;
pub const CARRYING_CAPACITY: usize = 200;
pub const REGULATION_STRENGTH: f64 = 4.0;

// Genetics
pub const VP: f64 = 1.0;
pub const VA: f64 = 0.5;

// Selection
pub const OMEGA: f64 = 1.0;
pub const THETA: f64 = 0.0;

use clap::Args;
use std::path::PathBuf;

use crate::defaults;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Output configuration file (JSON)
    #[arg(short, long, default_value = defaults::CONFIG_FILE)]
    pub output: PathBuf,

    /// First simulated year (founders are born in this year)
    #[arg(long, default_value_t = defaults::START_YEAR, allow_negative_numbers = true)]
    pub start_year: i64,

    /// Last simulated year (inclusive)
    #[arg(long, default_value_t = defaults::END_YEAR, allow_negative_numbers = true)]
    pub end_year: i64,

    /// Random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Age at which individuals start to reproduce
    #[arg(long, default_value_t = defaults::MATURITY)]
    pub maturity: u32,

    /// Mean litter size of a mature female below carrying capacity
    #[arg(long, default_value_t = defaults::BASEREPRO)]
    pub baserepro: f64,

    /// Female reproductive-success heterogeneity (0 = Poisson litters)
    #[arg(long, default_value_t = defaults::REPROVARF)]
    pub reprovarf: f64,

    /// Male reproductive-success heterogeneity (0 = equal mating chances)
    #[arg(long, default_value_t = defaults::REPROVARM)]
    pub reprovarm: f64,

    /// Carrying capacity K
    #[arg(short = 'k', long, default_value_t = defaults::CARRYING_CAPACITY)]
    pub carrying_capacity: usize,

    /// Number of founders
    ///
    /// Defaults to the carrying capacity.
    #[arg(long)]
    pub founders: Option<usize>,

    /// Severity of density regulation above K
    #[arg(long, default_value_t = defaults::REGULATION_STRENGTH)]
    pub regulation_strength: f64,

    /// Phenotypic variance VP
    #[arg(long, default_value_t = defaults::VP)]
    pub vp: f64,

    /// Additive genetic variance VA (0 disables evolution)
    #[arg(long, default_value_t = defaults::VA)]
    pub va: f64,

    /// Width of the Gaussian fitness function
    #[arg(long, default_value_t = defaults::OMEGA)]
    pub omega: f64,

    /// Baseline optimum phenotype
    #[arg(long, default_value_t = defaults::THETA, allow_negative_numbers = true)]
    pub theta: f64,

    /// Year in which the optimum shifts away from the baseline
    #[arg(long, requires = "shift_value", allow_negative_numbers = true)]
    pub shift_year: Option<i64>,

    /// Optimum after the shift
    #[arg(long, requires = "shift_year", allow_negative_numbers = true)]
    pub shift_value: Option<f64>,

    /// Number of years the shifted optimum lasts
    ///
    /// Without this flag the shift is permanent.
    #[arg(long, requires = "shift_year")]
    pub shift_duration: Option<u32>,
}

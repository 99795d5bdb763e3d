mod args;
mod commands;
pub mod defaults;
mod printing;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use args::InitArgs;
use commands::run::RunOptions;
use commands::{export, info, init, run, validate};

/// Pedisim: an individual-based simulator of an age-structured population
///
/// Follows a population with senescence, Gaussian viability selection on a
/// quantitative trait, and density regulation, year by year, and records the
/// full pedigree with breeding values and phenotypes.
#[derive(Parser, Debug)]
#[command(name = "pedisim")]
#[command(author, version, about = "Simulates evolutionary rescue in an age-structured population", long_about = None)]
struct Cli {
    /// Worker threads for per-individual stages
    ///
    /// Results do not depend on this. Defaults to one per logical CPU.
    #[arg(short = 't', long, global = true)]
    threads: Option<usize>,

    /// Log filter (e.g. "info", "pedisim_sim=debug")
    ///
    /// Overrides RUST_LOG. Defaults to "warn".
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a configuration file for a new experiment.
    ///
    /// Writes the parameters of an experiment (years, demography, variances,
    /// optimum trajectory) to a JSON file but does not run it yet.
    Init(Box<InitArgs>),

    /// Run a simulation and record it into a database.
    Run {
        /// Configuration file written by `init` (defaults if omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Database that receives the recorded run
        #[arg(short, long, default_value = defaults::OUTPUT_DB)]
        database: PathBuf,

        /// Seed replacing the one in the configuration
        #[arg(long)]
        seed: Option<u64>,

        /// Stop as soon as the population is extinct
        #[arg(long)]
        stop_on_extinction: bool,

        /// Hide the progress bar
        #[arg(long)]
        no_progress: bool,
    },

    /// Info: Show configuration and census of a recorded simulation.
    Info {
        /// Database path
        #[arg(short, long, default_value = defaults::OUTPUT_DB)]
        database: PathBuf,

        /// Print every recorded year instead of the last one
        #[arg(long)]
        all_years: bool,
    },

    /// Export recorded data as CSV or JSON.
    ///
    /// Writes the pedigree ledger or one of the per-year tables.
    Export {
        /// Database path
        #[arg(short, long, default_value = defaults::OUTPUT_DB)]
        database: PathBuf,

        /// Output format (csv, json)
        #[arg(short, long, default_value = "csv")]
        format: String,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// What to export (history, census, population-size, trajectories)
        #[arg(long, default_value = "census")]
        data_type: String,
    },

    /// Validate a recorded simulation.
    ///
    /// Checks the pedigree invariants and compares the stored census with
    /// the living counts rebuilt from the ledger.
    Validate {
        /// Database path
        #[arg(short, long, default_value = defaults::OUTPUT_DB)]
        database: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match &cli.log_level {
        Some(level) => EnvFilter::try_new(level)?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
    }

    match cli.command {
        Commands::Init(args) => {
            init::init_simulation(&args)?;
        }
        Commands::Run {
            config,
            database,
            seed,
            stop_on_extinction,
            no_progress,
        } => {
            run::run_simulation(&RunOptions {
                config,
                database,
                seed,
                stop_on_extinction,
                progress: !no_progress,
            })?;
        }
        Commands::Info {
            database,
            all_years,
        } => {
            info::show_info(&database, all_years)?;
        }
        Commands::Export {
            database,
            format,
            output,
            data_type,
        } => {
            export::export_data(&database, &format, output.as_ref(), &data_type)?;
        }
        Commands::Validate { database } => {
            validate::validate_database(&database)?;
        }
    }

    Ok(())
}

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use pedisim_sim::simulation::{Configuration, Simulation};
use pedisim_sim::storage::{QueryBuilder, Recorder};
use std::path::{Path, PathBuf};

use crate::printing::{print_census_row, print_parameters};

pub struct RunOptions {
    pub config: Option<PathBuf>,
    pub database: PathBuf,
    pub seed: Option<u64>,
    pub stop_on_extinction: bool,
    pub progress: bool,
}

pub fn load_config(path: &Path) -> Result<Configuration> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse configuration {}", path.display()))
}

pub fn run_simulation(opts: &RunOptions) -> Result<()> {
    println!("🧬 Pedisim - Running Simulation");
    println!("============================================\n");

    let mut config = match &opts.config {
        Some(path) => load_config(path)?,
        None => {
            println!("No configuration given, using defaults.");
            Configuration::default()
        }
    };
    if let Some(seed) = opts.seed {
        config.execution.seed = Some(seed);
    }

    if opts.database.exists() {
        let query = QueryBuilder::new(&opts.database).context("Failed to open database")?;
        let recorded = query
            .get_recorded_years()
            .context("Failed to inspect database")?;
        query.close().ok();
        if !recorded.is_empty() {
            anyhow::bail!(
                "Database {} already holds a run ({} years recorded)",
                opts.database.display(),
                recorded.len()
            );
        }
    }

    let mut sim = Simulation::new(config)
        .map_err(|e| anyhow::anyhow!("Failed to initialize simulation: {e}"))?;

    // The configuration now carries the resolved seed
    let mut recorder =
        Recorder::new(&opts.database, sim.configuration()).context("Failed to create recorder")?;
    recorder
        .record_simulation(&sim)
        .context("Failed to record founders")?;

    println!("Configuration:");
    print_parameters(sim.configuration());

    let n_years = sim.configuration().n_years();
    println!("Running {n_years} years...");

    let pb = if opts.progress {
        let pb = ProgressBar::new(n_years as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}",
                )?
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let mut outcome = "completed";
    while !sim.is_finished() {
        let summary = sim.step().map_err(|e| anyhow::anyhow!("Year {}: {e}", sim.current_year()))?;
        recorder
            .record_simulation(&sim)
            .with_context(|| format!("Failed to record year {}", summary.year))?;

        if let Some(pb) = &pb {
            pb.inc(1);
            pb.set_message(format!("N = {}", summary.size));
        }

        if opts.stop_on_extinction && summary.size == 0 && !sim.is_finished() {
            outcome = "extinct";
            break;
        }
    }

    if let Some(pb) = pb {
        pb.finish_with_message("Done");
    }

    recorder
        .set_metadata("outcome", outcome)
        .context("Failed to record outcome")?;
    let stats = recorder.close().context("Failed to close recorder")?;

    println!("\n✓ Simulation {outcome}!");
    if let Some(last) = sim.census().last() {
        print_census_row(last);
    }
    println!(
        "  Recorded {} individuals, {} deaths, {} years",
        stats.individuals, stats.deaths, stats.years
    );
    println!("  Seed: {}", sim.seed());
    println!(
        "\n💡 Use 'pedisim info -d {}' to view results",
        opts.database.display()
    );

    Ok(())
}

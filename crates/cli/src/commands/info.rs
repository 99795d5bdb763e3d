use anyhow::{Context, Result};
use pedisim_sim::storage::QueryBuilder;
use std::path::Path;

use crate::printing::{print_census_row, print_parameters};

pub fn show_info(database: &Path, all_years: bool) -> Result<()> {
    if !database.exists() {
        anyhow::bail!("Database {} does not exist", database.display());
    }
    let query = QueryBuilder::new(database).context("Failed to open database")?;
    let config = query
        .get_full_config()
        .context("Failed to get simulation info")?;
    let metadata = query.get_metadata().context("Failed to read metadata")?;
    let census = query.get_census().context("Failed to read census")?;
    let history = query.get_history().context("Failed to read history")?;
    query.close().ok();

    println!("\n📊 Simulation Information");
    println!("{}", "=".repeat(50));
    for key in ["version", "outcome"] {
        if let Some(value) = metadata.get(key) {
            println!("{key}: {value}");
        }
    }
    print_parameters(&config);

    println!("📈 Census ({} of {} years recorded)", census.len(), config.n_years());
    println!("  • Individuals ever alive: {}", history.len());
    println!("  • Deaths: {}", history.deaths().len());
    if all_years {
        census.iter().for_each(print_census_row);
    } else if let Some(last) = census.last() {
        print_census_row(last);
    } else {
        println!("  • No years recorded yet");
    }

    Ok(())
}

use anyhow::{Context, Result};
use pedisim_analysis::{
    mean_breeding_value_by_year, optimum_gap_by_year, phenotype_stats_by_year,
    population_size_by_year,
};
use pedisim_sim::storage::QueryBuilder;
use serde_json::json;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

fn opt(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

pub fn export_data(
    database: &Path,
    format: &str,
    output: Option<&PathBuf>,
    data_type: &str,
) -> Result<()> {
    if !matches!(format, "csv" | "json") {
        anyhow::bail!("Unknown format '{format}'. Use: csv or json");
    }
    if !database.exists() {
        anyhow::bail!("Database {} does not exist", database.display());
    }
    let query = QueryBuilder::new(database).context("Failed to open database")?;

    let content = match data_type {
        "history" => export_history(&query, format)?,
        "census" => export_census(&query, format)?,
        "population-size" => export_population_size(&query, format)?,
        "trajectories" => export_trajectories(&query, format)?,
        _ => anyhow::bail!(
            "Unknown data type '{data_type}'. Use: history, census, population-size, or trajectories"
        ),
    };
    query.close().ok();

    if let Some(path) = output {
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        eprintln!("✓ {data_type} exported to: {}", path.display());
    } else {
        println!("{content}");
    }

    Ok(())
}

fn export_history(query: &QueryBuilder, format: &str) -> Result<String> {
    let history = query.get_history().context("Failed to load history")?;

    if format == "json" {
        let data: Vec<_> = history
            .records()
            .map(|(ind, death_year)| {
                json!({
                    "id": ind.id(),
                    "dam": ind.dam(),
                    "sire": ind.sire(),
                    "birth_year": ind.birth_year(),
                    "sex": ind.sex().code(),
                    "a": ind.breeding_value(),
                    "z": ind.phenotype(),
                    "death_year": death_year,
                })
            })
            .collect();
        return Ok(serde_json::to_string_pretty(&data)?);
    }

    let mut csv = String::from("id,dam,sire,birth_year,sex,a,z,death_year\n");
    for (ind, death_year) in history.records() {
        writeln!(
            csv,
            "{},{},{},{},{},{},{},{}",
            ind.id(),
            ind.dam().map(|d| d.to_string()).unwrap_or_default(),
            ind.sire().map(|s| s.to_string()).unwrap_or_default(),
            ind.birth_year(),
            ind.sex().code(),
            ind.breeding_value(),
            ind.phenotype(),
            death_year.map(|y| y.to_string()).unwrap_or_default(),
        )?;
    }
    Ok(csv)
}

fn export_census(query: &QueryBuilder, format: &str) -> Result<String> {
    let census = query.get_census().context("Failed to load census")?;
    if census.is_empty() {
        anyhow::bail!("No census data found");
    }

    if format == "json" {
        return Ok(serde_json::to_string_pretty(&census)?);
    }

    let mut csv = String::from(
        "year,theta,entering,deaths,survivors,regulation,births,size,mean_a,mean_z\n",
    );
    for s in &census {
        writeln!(
            csv,
            "{},{},{},{},{},{},{},{},{},{}",
            s.year,
            s.theta,
            s.entering,
            s.deaths,
            s.survivors,
            s.regulation,
            s.births,
            s.size,
            opt(s.mean_breeding_value),
            opt(s.mean_phenotype),
        )?;
    }
    Ok(csv)
}

fn export_population_size(query: &QueryBuilder, format: &str) -> Result<String> {
    let config = query.get_full_config().context("Failed to load configuration")?;
    let history = query.get_history().context("Failed to load history")?;
    let sizes = population_size_by_year(&history, config.years());

    if format == "json" {
        let data: Vec<_> = sizes
            .iter()
            .map(|(year, size)| json!({ "year": year, "size": size }))
            .collect();
        return Ok(serde_json::to_string_pretty(&data)?);
    }

    let mut csv = String::from("year,size\n");
    for (year, size) in &sizes {
        writeln!(csv, "{year},{size}")?;
    }
    Ok(csv)
}

fn export_trajectories(query: &QueryBuilder, format: &str) -> Result<String> {
    let config = query.get_full_config().context("Failed to load configuration")?;
    let history = query.get_history().context("Failed to load history")?;
    let mean_a = mean_breeding_value_by_year(&history, config.years());
    let gap = optimum_gap_by_year(&history, &config);
    let z_stats = phenotype_stats_by_year(&history, config.years());

    if format == "json" {
        let data: Vec<_> = config
            .years()
            .map(|year| {
                json!({
                    "year": year,
                    "theta": config.theta(year),
                    "mean_a": mean_a[&year],
                    "gap": gap[&year],
                    "phenotype": z_stats[&year],
                })
            })
            .collect();
        return Ok(serde_json::to_string_pretty(&data)?);
    }

    let mut csv = String::from("year,theta,mean_a,gap,n,mean_z,std_z,min_z,max_z\n");
    for year in config.years() {
        let stats = z_stats[&year];
        write!(
            csv,
            "{year},{},{},{},",
            config.theta(year),
            opt(mean_a[&year]),
            opt(gap[&year])
        )?;
        match stats {
            Some(s) => writeln!(csv, "{},{},{},{},{}", s.n, s.mean, s.std, s.min, s.max)?,
            None => writeln!(csv, "0,,,,")?,
        }
    }
    Ok(csv)
}

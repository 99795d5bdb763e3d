use anyhow::{Context, Result};
use pedisim_analysis::{pedigree_summary, population_size_by_year, validate_pedigree};
use pedisim_sim::storage::QueryBuilder;
use std::path::Path;

/// Issues printed in full before the rest are summarized.
const MAX_LISTED: usize = 10;

pub fn validate_database(database: &Path) -> Result<()> {
    println!("🔍 Validating database: {}", database.display());

    if !database.exists() {
        anyhow::bail!("Database file does not exist");
    }

    let query = QueryBuilder::new(database).context("Failed to open database")?;
    let mut total_issues = 0;

    let config = match query.get_full_config() {
        Ok(config) => {
            println!("✓ Configuration: OK");
            config
        }
        Err(e) => {
            println!("✗ Configuration: FAILED - {e}");
            anyhow::bail!("Database holds no readable configuration");
        }
    };

    let history = match query.get_history() {
        Ok(history) => {
            println!("✓ History ledger: {} individuals", history.len());
            history
        }
        Err(e) => {
            println!("✗ History ledger: FAILED - {e}");
            anyhow::bail!("History could not be rebuilt");
        }
    };

    let issues = validate_pedigree(&history, config.demography.maturity);
    if issues.is_empty() {
        println!("✓ Pedigree: OK");
    } else {
        println!("✗ Pedigree: {} issue(s)", issues.len());
        for issue in issues.iter().take(MAX_LISTED) {
            println!("    - {issue}");
        }
        if issues.len() > MAX_LISTED {
            println!("    ... and {} more", issues.len() - MAX_LISTED);
        }
        total_issues += issues.len();
    }

    let summary = pedigree_summary(&history);
    if summary.founders != config.founder_count() {
        println!(
            "⚠️  Founders: {} recorded, {} configured",
            summary.founders,
            config.founder_count()
        );
        total_issues += 1;
    }

    match query.get_census() {
        Ok(census) => {
            let sizes = population_size_by_year(&history, config.years());
            let mismatched: Vec<i64> = census
                .iter()
                .filter(|s| sizes.get(&s.year) != Some(&s.size))
                .map(|s| s.year)
                .collect();
            if mismatched.is_empty() {
                println!("✓ Census: {} years consistent with the ledger", census.len());
            } else {
                println!("✗ Census: sizes differ from the ledger in years {mismatched:?}");
                total_issues += mismatched.len();
            }
            if census.len() < config.n_years() {
                println!(
                    "⚠️  Census covers {} of {} years",
                    census.len(),
                    config.n_years()
                );
            }
        }
        Err(e) => {
            println!("✗ Census: FAILED - {e}");
            total_issues += 1;
        }
    }
    query.close().ok();

    println!("\n{}", "=".repeat(50));
    if total_issues == 0 {
        println!("✓ Validation complete: No issues found");
    } else {
        println!("⚠️  Validation complete: {total_issues} issue(s) found");
    }

    Ok(())
}

use pedisim_sim::simulation::{Configuration, Environment, YearSummary};

pub fn print_parameters(config: &Configuration) {
    let exec = &config.execution;
    let demography = &config.demography;
    let genetics = &config.genetics;
    let selection = &config.selection;

    println!("\n📋 Simulation Configuration");
    println!(
        "  • Years: {}..={} ({} years) [--start-year, --end-year]",
        exec.start_year,
        exec.end_year,
        config.n_years()
    );
    if let Some(seed) = exec.seed {
        println!("  • Random Seed: {seed} [--seed]");
    } else {
        println!("  • Random Seed: Random [--seed]");
    }

    println!("\n👪 Demography");
    println!(
        "  • Carrying Capacity: {} [-k, --carrying-capacity]",
        demography.carrying_capacity
    );
    println!("  • Founders: {} [--founders]", config.founder_count());
    println!("  • Maturity: {} years [--maturity]", demography.maturity);
    println!(
        "  • Litter Size: mean {} [--baserepro], heterogeneity {} [--reprovarf]",
        demography.baserepro, demography.reprovarf
    );
    println!(
        "  • Male Mating Heterogeneity: {} [--reprovarm]",
        demography.reprovarm
    );
    println!(
        "  • Regulation Strength: {} [--regulation-strength]",
        demography.regulation_strength
    );

    println!("\n🧬 Genetics");
    match config.genetics_model() {
        Ok(model) => {
            println!("  • VP: {} [--vp]", model.phenotypic_variance());
            println!("  • VA: {} [--va]", model.additive_variance());
            println!("  • VE: {}", model.environmental_variance());
            println!("  • Heritability: {:.3}", model.heritability());
        }
        Err(e) => {
            println!("  • VP: {} [--vp]", genetics.vp);
            println!("  • VA: {} [--va]", genetics.va);
            println!("  ⚠ {e}");
        }
    }

    println!("\n🎯 Selection");
    println!("  • Omega: {} [--omega]", selection.omega);
    match &selection.environment {
        Environment::Constant(theta) => println!("  • Optimum: constant {theta} [--theta]"),
        Environment::Trajectory(values) => {
            let first = values.first().copied().unwrap_or_default();
            let changes = values.windows(2).filter(|w| w[0] != w[1]).count();
            println!(
                "  • Optimum: trajectory of {} years starting at {first} ({changes} changes)",
                values.len()
            );
        }
    }
    println!("  • Senescence: {:?}", config.senescence);
    println!();
}

pub fn print_census_row(summary: &YearSummary) {
    let fmt_mean = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |v| format!("{v:.3}"));
    println!(
        "  • Year {}: size {} (entering {}, deaths {}, births {}), θ = {}, mean a = {}, mean z = {}",
        summary.year,
        summary.size,
        summary.entering,
        summary.deaths,
        summary.births,
        summary.theta,
        fmt_mean(summary.mean_breeding_value),
        fmt_mean(summary.mean_phenotype),
    );
}

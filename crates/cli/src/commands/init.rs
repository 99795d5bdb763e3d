use anyhow::{Context, Result};
use pedisim_sim::simulation::{
    Configuration, DemographyConfig, Environment, ExecutionConfig, GeneticsConfig,
    SelectionConfig,
};

use crate::args::InitArgs;
use crate::printing::print_parameters;

pub fn init_simulation(args: &InitArgs) -> Result<()> {
    println!("🧬 Pedisim - Age-Structured Population Simulator");
    println!("============================================\n");

    let config = build_config(args)?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;

    println!("Configuration:");
    print_parameters(&config);

    let json = serde_json::to_string_pretty(&config).context("Failed to serialize configuration")?;
    std::fs::write(&args.output, json)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    println!("✓ Configuration written: {}", args.output.display());
    println!("\nSimulation initialized successfully!");
    println!(
        "\n💡 Use 'pedisim run -c {}' to start the simulation",
        args.output.display()
    );

    Ok(())
}

pub fn build_config(args: &InitArgs) -> Result<Configuration> {
    if args.end_year < args.start_year {
        anyhow::bail!(
            "End year {} precedes start year {}",
            args.end_year,
            args.start_year
        );
    }
    let years = args.start_year..=args.end_year;

    let environment = match (args.shift_year, args.shift_value) {
        (Some(shift_year), Some(value)) => {
            if !years.contains(&shift_year) {
                anyhow::bail!(
                    "Shift year {shift_year} is outside the simulated years {}..={}",
                    args.start_year,
                    args.end_year
                );
            }
            match args.shift_duration {
                Some(duration) => Environment::pulse(years, shift_year, duration, args.theta, value),
                None => Environment::step_change(years, shift_year, args.theta, value),
            }
        }
        (None, None) => Environment::constant(args.theta),
        _ => anyhow::bail!("--shift-year and --shift-value must be provided together"),
    };

    Ok(Configuration {
        execution: ExecutionConfig {
            start_year: args.start_year,
            end_year: args.end_year,
            seed: args.seed,
        },
        demography: DemographyConfig {
            maturity: args.maturity,
            baserepro: args.baserepro,
            reprovarf: args.reprovarf,
            reprovarm: args.reprovarm,
            carrying_capacity: args.carrying_capacity,
            founders: args.founders,
            regulation_strength: args.regulation_strength,
        },
        genetics: GeneticsConfig {
            vp: args.vp,
            va: args.va,
        },
        selection: SelectionConfig {
            omega: args.omega,
            environment,
        },
        senescence: Default::default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults;
    use std::path::PathBuf;

    fn default_args() -> InitArgs {
        InitArgs {
            output: PathBuf::from(defaults::CONFIG_FILE),
            start_year: defaults::START_YEAR,
            end_year: defaults::END_YEAR,
            seed: None,
            maturity: defaults::MATURITY,
            baserepro: defaults::BASEREPRO,
            reprovarf: defaults::REPROVARF,
            reprovarm: defaults::REPROVARM,
            carrying_capacity: defaults::CARRYING_CAPACITY,
            founders: None,
            regulation_strength: defaults::REGULATION_STRENGTH,
            vp: defaults::VP,
            va: defaults::VA,
            omega: defaults::OMEGA,
            theta: defaults::THETA,
            shift_year: None,
            shift_value: None,
            shift_duration: None,
        }
    }

    #[test]
    fn test_build_config_defaults() {
        let config = build_config(&default_args()).unwrap();
        assert_eq!(config, Configuration::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_build_config_permanent_shift() {
        let args = InitArgs {
            end_year: 10,
            shift_year: Some(6),
            shift_value: Some(1.5),
            ..default_args()
        };
        let config = build_config(&args).unwrap();
        assert_eq!(config.theta(5), 0.0);
        assert_eq!(config.theta(6), 1.5);
        assert_eq!(config.theta(10), 1.5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_build_config_pulse() {
        let args = InitArgs {
            end_year: 10,
            theta: 0.5,
            shift_year: Some(4),
            shift_value: Some(2.0),
            shift_duration: Some(2),
            ..default_args()
        };
        let config = build_config(&args).unwrap();
        let thetas: Vec<f64> = config.years().map(|y| config.theta(y)).collect();
        assert_eq!(
            thetas,
            vec![0.5, 0.5, 0.5, 2.0, 2.0, 0.5, 0.5, 0.5, 0.5, 0.5]
        );
    }

    #[test]
    fn test_build_config_rejects_bad_years() {
        let args = InitArgs {
            start_year: 10,
            end_year: 5,
            ..default_args()
        };
        assert!(build_config(&args).is_err());

        let args = InitArgs {
            end_year: 10,
            shift_year: Some(20),
            shift_value: Some(1.0),
            ..default_args()
        };
        assert!(build_config(&args).is_err());
    }
}

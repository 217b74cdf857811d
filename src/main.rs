use std::path::PathBuf;

use clap::{Parser, Subcommand};
use parachute_simulation::telemetry_system::export;
use parachute_simulation::*;
use tracing::Level;

#[derive(Parser)]
#[command(name = "parachute-sim")]
#[command(about = "Rocket recovery parachute descent simulator")]
#[command(version)]
struct Cli {
    /// Log phase starts and per-phase detail
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a descent and print the flight summary
    Run {
        /// Parameter file (JSON); defaults are used when omitted
        #[arg(short, long)]
        params: Option<PathBuf>,

        /// Write the time series as CSV
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Write the drift traces as CSV
        #[arg(long)]
        drift_csv: Option<PathBuf>,

        /// Write the full result bundle as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Write the default parameter set to a file
    Init {
        #[arg(short, long, default_value = "parameters.json")]
        output: PathBuf,
    },
    /// Check a parameter file and list every violated constraint
    Validate {
        #[arg(short, long)]
        params: PathBuf,
    },
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::WARN
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    match cli.command {
        Commands::Run {
            params,
            csv,
            drift_csv,
            json,
        } => {
            let parameters = match params {
                Some(path) => ParameterSet::load(path)?,
                None => ParameterSet::default(),
            };
            report_violations(&parameters)?;

            let results = parameters.run()?;
            println!("{}", FlightSummary::from_results(&results));

            if let Some(path) = csv {
                export::write_time_series_file(&path, &results)?;
                println!("Time series written to {}", path.display());
            }
            if let Some(path) = drift_csv {
                export::write_drift_file(&path, &results)?;
                println!("Drift traces written to {}", path.display());
            }
            if let Some(path) = json {
                export::write_results_json_file(&path, &results)?;
                println!("Results written to {}", path.display());
            }
        }
        Commands::Init { output } => {
            ParameterSet::default().save(&output)?;
            println!("Default parameters written to {}", output.display());
        }
        Commands::Validate { params } => {
            let parameters = ParameterSet::load(&params)?;
            report_violations(&parameters)?;
            println!("{}: parameters are valid", params.display());
        }
    }

    Ok(())
}

fn report_violations(parameters: &ParameterSet) -> Result<()> {
    let errors = parameters.validate();
    if errors.is_empty() {
        return Ok(());
    }
    eprintln!("Parameter validation failed:");
    for error in &errors {
        eprintln!("  - {}", error);
    }
    Err(SimulationError::ValidationError(errors))
}

//! bsfd - finite difference schemes against the Black-Scholes price
//!
//! # Commands
//!
//! - `bsfd run` - run the four schemes, print and write the comparison tables
//! - `bsfd config` - print the effective configuration as TOML
//!
//! Logging goes to stderr and is controlled by `RUST_LOG`
//! (e.g. `RUST_LOG=bsfd=debug`).

use anyhow::{Context, Result};
use bsfd::config::{CliOverrides, ExperimentConfig, SolverKind};
use bsfd::engines::{write_error_table, write_summary_table, write_value_table};
use bsfd::output::write_report;
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Compare finite difference schemes for the Black-Scholes European call
#[derive(Parser)]
#[command(name = "bsfd")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file (TOML); defaults reproduce the reference run
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every scheme and write values.csv, errors.csv and summary.csv
    Run {
        /// Output directory for the tables
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Time step dt
        #[arg(long)]
        time_step: Option<f64>,

        /// Price step ds
        #[arg(long)]
        space_step: Option<f64>,

        /// Linear solver for the implicit schemes (thomas, dense)
        #[arg(long)]
        solver: Option<SolverKind>,
    },

    /// Print the effective configuration
    Config,
}

/// Merge file, environment and command line, then validate once.
fn load_config(path: Option<&PathBuf>, overrides: &CliOverrides) -> Result<ExperimentConfig> {
    let mut config = match path {
        Some(p) => ExperimentConfig::load(p)
            .with_context(|| format!("loading configuration from {}", p.display()))?,
        None => ExperimentConfig::default(),
    };
    config
        .apply_env_overrides()
        .context("applying BSFD_* environment overrides")?;
    config.apply_cli_overrides(overrides);
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn run(config: ExperimentConfig) -> Result<()> {
    let experiment = config.experiment()?;
    let solver = config.grid.solver.solver();
    let outcome = experiment
        .run(solver.as_ref())
        .context("running scheme comparison")?;
    let report = &outcome.report;

    for (kind, error) in report.failures() {
        warn!(scheme = %kind, %error, "scheme omitted from tables");
    }

    let precision = config.output.precision;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "Values at t = {}", report.time())?;
    write_value_table(report, &mut out, precision)?;
    writeln!(out)?;
    writeln!(out, "Errors against the analytic price")?;
    write_error_table(report, &mut out, precision)?;
    writeln!(out)?;
    writeln!(out, "Error summary")?;
    write_summary_table(report, &mut out, precision)?;

    let paths = write_report(report, &config.output.directory, precision)
        .context("writing result tables")?;
    for p in paths {
        info!(path = %p.display(), "wrote table");
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            output_dir,
            time_step,
            space_step,
            solver,
        } => {
            let overrides = CliOverrides {
                output_dir,
                time_step,
                space_step,
                solver,
            };
            run(load_config(cli.config.as_ref(), &overrides)?)
        }
        Commands::Config => {
            let config = load_config(cli.config.as_ref(), &CliOverrides::default())?;
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
    }
}

//! Experiment configuration.
//!
//! Loaded from a TOML file with `[option]`, `[grid]`, `[report]` and
//! `[output]` sections. Every field is optional; missing ones take the
//! reference values (K = 50, T = 0.5, σ = 0.2, r = 0.01, dt = 0.0005,
//! ds = 1, report at t = 0.4 for S = 100, 110, …, 200).
//!
//! Priority, highest first: command-line flags, `BSFD_*` environment
//! variables, the configuration file, defaults. Layers are merged without
//! checking; [`ExperimentConfig::validate`] runs once on the merged result,
//! so a higher layer can repair a bad value in a lower one.

use bsfd_core::{ensure, Error, OptionParameters, Price, Rate, Real, Result, Time, Volatility};
use bsfd_engines::{Experiment, ReportSpec, DEFAULT_PRECISION};
use bsfd_math::{DenseLuSolver, LinearSolver, ThomasSolver};
use bsfd_methods::finite_differences::{GridSpec, DEFAULT_UPPER_MULTIPLE};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Environment variable overriding `grid.time_step`.
pub const ENV_TIME_STEP: &str = "BSFD_TIME_STEP";
/// Environment variable overriding `grid.space_step`.
pub const ENV_SPACE_STEP: &str = "BSFD_SPACE_STEP";
/// Environment variable overriding `output.directory`.
pub const ENV_OUTPUT_DIR: &str = "BSFD_OUTPUT_DIR";

/// Largest decimal precision accepted for the tables.
const MAX_PRECISION: usize = 17;

// ─── Sections ────────────────────────────────────────────────────────────────

/// Contract and market parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OptionConfig {
    /// Strike `K`.
    pub strike: Price,
    /// Maturity `T` in years.
    pub maturity: Time,
    /// Volatility `σ`.
    pub volatility: Volatility,
    /// Risk-free rate `r`.
    pub rate: Rate,
}

impl Default for OptionConfig {
    fn default() -> Self {
        Self {
            strike: 50.0,
            maturity: 0.5,
            volatility: 0.2,
            rate: 0.01,
        }
    }
}

/// Linear solver back end for the implicit schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolverKind {
    /// Thomas algorithm on the tridiagonal band.
    #[default]
    Thomas,
    /// Dense LU decomposition.
    Dense,
}

impl SolverKind {
    /// Instantiate the solver.
    pub fn solver(self) -> Box<dyn LinearSolver> {
        match self {
            SolverKind::Thomas => Box::new(ThomasSolver),
            SolverKind::Dense => Box::new(DenseLuSolver),
        }
    }
}

impl FromStr for SolverKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "thomas" => Ok(SolverKind::Thomas),
            "dense" | "lu" => Ok(SolverKind::Dense),
            _ => Err(Error::Config(format!(
                "unknown solver '{s}', expected 'thomas' or 'dense'"
            ))),
        }
    }
}

impl fmt::Display for SolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverKind::Thomas => write!(f, "thomas"),
            SolverKind::Dense => write!(f, "dense"),
        }
    }
}

/// Discretisation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridConfig {
    /// Time step `dt`.
    pub time_step: Time,
    /// Price step `ds`.
    pub space_step: Price,
    /// Upper price bound as a multiple of the strike.
    pub upper_multiple: Real,
    /// Solver for the implicit schemes.
    pub solver: SolverKind,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            time_step: 0.0005,
            space_step: 1.0,
            upper_multiple: DEFAULT_UPPER_MULTIPLE,
            solver: SolverKind::Thomas,
        }
    }
}

/// Reporting slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    /// Calendar time of the slice.
    pub time: Time,
    /// Spot prices to report, ascending.
    pub prices: Vec<Price>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        let spec = ReportSpec::default();
        Self {
            time: spec.time(),
            prices: spec.prices().to_vec(),
        }
    }
}

/// Where and how the tables are written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Directory receiving `values.csv`, `errors.csv` and `summary.csv`.
    pub directory: PathBuf,
    /// Decimal places of every number.
    pub precision: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("output"),
            precision: DEFAULT_PRECISION,
        }
    }
}

/// Values given on the command line; `None` keeps the lower layers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliOverrides {
    /// `--output-dir`.
    pub output_dir: Option<PathBuf>,
    /// `--time-step`.
    pub time_step: Option<Time>,
    /// `--space-step`.
    pub space_step: Option<Price>,
    /// `--solver`.
    pub solver: Option<SolverKind>,
}

// ─── Top level ───────────────────────────────────────────────────────────────

/// Complete configuration of one comparison run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExperimentConfig {
    /// `[option]` section.
    pub option: OptionConfig,
    /// `[grid]` section.
    pub grid: GridConfig,
    /// `[report]` section.
    pub report: ReportConfig,
    /// `[output]` section.
    pub output: OutputConfig,
}

impl ExperimentConfig {
    /// Read a TOML configuration file. The result is not yet validated.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read config file {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse a TOML document. Unknown keys and malformed values are
    /// rejected here; domain checks are left to [`Self::validate`].
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("cannot parse config: {e}")))
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Output(e.to_string()))
    }

    /// Apply the `BSFD_*` environment variables.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides looked up through `lookup`. Only unparsable values
    /// are rejected.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup(ENV_TIME_STEP) {
            self.grid.time_step = parse_real(ENV_TIME_STEP, &v)?;
        }
        if let Some(v) = lookup(ENV_SPACE_STEP) {
            self.grid.space_step = parse_real(ENV_SPACE_STEP, &v)?;
        }
        if let Some(v) = lookup(ENV_OUTPUT_DIR) {
            self.output.directory = PathBuf::from(v);
        }
        Ok(())
    }

    /// Apply command-line overrides, the highest-priority layer.
    pub fn apply_cli_overrides(&mut self, overrides: &CliOverrides) {
        if let Some(dir) = &overrides.output_dir {
            self.output.directory = dir.clone();
        }
        if let Some(dt) = overrides.time_step {
            self.grid.time_step = dt;
        }
        if let Some(ds) = overrides.space_step {
            self.grid.space_step = ds;
        }
        if let Some(solver) = overrides.solver {
            self.grid.solver = solver;
        }
    }

    /// Check that the configuration describes a runnable experiment.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.output.precision <= MAX_PRECISION,
            "output precision must be at most {MAX_PRECISION}, got {}",
            self.output.precision
        );
        self.experiment().map(|_| ())
    }

    /// Validated contract parameters.
    pub fn option_parameters(&self) -> Result<OptionParameters> {
        let o = &self.option;
        OptionParameters::new(o.strike, o.maturity, o.volatility, o.rate)
    }

    /// Grid steps and truncation.
    pub fn grid_spec(&self) -> GridSpec {
        GridSpec::new(self.grid.time_step, self.grid.space_step)
            .with_upper_multiple(self.grid.upper_multiple)
    }

    /// Validated reporting slice.
    pub fn report_spec(&self) -> Result<ReportSpec> {
        ReportSpec::new(self.report.time, self.report.prices.clone())
    }

    /// Build the experiment this configuration describes.
    pub fn experiment(&self) -> Result<Experiment> {
        Experiment::new(self.option_parameters()?, self.grid_spec(), self.report_spec()?)
    }
}

fn parse_real(key: &str, value: &str) -> Result<Real> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::Config(format!("{key} must be a number, got '{value}'")))
}

//! # bsfd
//!
//! Finite difference solvers for the Black-Scholes European call, compared
//! against the closed-form price.
//!
//! This crate is a **façade** that re-exports the workspace crates and adds
//! the file-based [`config`] layer and table [`output`] used by the `bsfd`
//! binary.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use bsfd::config::ExperimentConfig;
//!
//! let config = ExperimentConfig::default();
//! let experiment = config.experiment().unwrap();
//! let outcome = experiment.run(config.grid.solver.solver().as_ref()).unwrap();
//! for scheme in outcome.report.schemes() {
//!     println!("{}: {}", scheme.kind, scheme.report_error.max_abs);
//! }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Core types, aliases, and error definitions.
pub use bsfd_core as core;

/// Normal distribution, tridiagonal operator, and linear solvers.
pub use bsfd_math as math;

/// Grid, Black-Scholes operator, and time-stepping schemes.
pub use bsfd_methods as methods;

/// Analytic reference, error report, CSV tables, and experiments.
pub use bsfd_engines as engines;

/// TOML configuration with environment overrides.
pub mod config;

/// Writing the comparison tables to a directory.
pub mod output;

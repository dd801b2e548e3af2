//! # bsfd-engines
//!
//! Engines that sit on top of the finite difference methods: the
//! closed-form Black-Scholes reference, extraction and error reporting at
//! the requested price points, CSV table output, and the [`Experiment`]
//! that ties a full comparison run together.
//!
//! ## Engines
//!
//! - [`AnalyticEuropeanEngine`] — Black-Scholes closed form for European calls
//! - [`ComparisonReport`] — per-scheme values and errors at the reporting slice
//! - [`Experiment`] — grid, operator, analytic surface and all four schemes

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod analytic_european_engine;
pub mod experiment;
pub mod report;
pub mod tables;

pub use analytic_european_engine::{black_scholes_call, AnalyticEuropeanEngine};
pub use experiment::{Experiment, ExperimentOutcome};
pub use report::{ComparisonReport, ErrorSummary, ReportSpec, SchemeComparison};
pub use tables::{write_error_table, write_summary_table, write_value_table, DEFAULT_PRECISION};

//! # bsfd-math
//!
//! Mathematical utilities: the standard normal distribution (via statrs),
//! floating-point comparison, the banded [`TridiagonalOperator`], and the
//! pluggable [`LinearSolver`] capability with Thomas-algorithm and dense LU
//! (over nalgebra) implementations.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Floating-point comparison utilities.
pub mod comparison;

/// Probability distributions.
pub mod distributions;

/// Linear solvers for tridiagonal systems.
pub mod linear_solvers;

/// Tridiagonal matrix operator.
pub mod tridiagonal;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use comparison::is_whole;
pub use distributions::normal_cdf;
pub use linear_solvers::{DenseLuSolver, FactorizedSystem, LinearSolver, ThomasSolver};
pub use tridiagonal::TridiagonalOperator;

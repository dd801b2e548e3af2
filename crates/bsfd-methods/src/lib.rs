//! # bsfd-methods
//!
//! Numerical methods: the finite-difference grid, the discretised
//! Black-Scholes operator, and the four time-stepping schemes compared by
//! bsfd.
//!
//! # Modules
//!
//! * [`finite_differences`] — grid, operator, steppers, and scheme runner
//!
//! # Features
//!
//! * `parallel` — run the four schemes concurrently on a rayon pool

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Finite difference methods: grid, operator, time-stepping schemes.
pub mod finite_differences;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use finite_differences::{
    run_all_schemes, run_scheme, BlackScholesOperator, Grid, GridSpec, SchemeKind, SchemeResult,
    TimeStepper, ValueSurface,
};

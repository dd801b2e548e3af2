//! Finite difference methods for the Black-Scholes call PDE.
//!
//! The 1-D equation is solved on a uniform price grid in time-to-maturity,
//! starting from the payoff and marching to `τ = T` with one of four
//! schemes.
//!
//! # Overview
//!
//! * [`Grid`] — time/price axes, boundary values, initial surface
//! * [`ValueSurface`] — dense `(price, time)` values owned by one run
//! * [`BlackScholesOperator`] — tridiagonal generator `M` and `c(τ)`
//! * [`TimeStepper`] — forward Euler, backward Euler, trapezoidal, midpoint
//! * [`run_scheme`] / [`run_all_schemes`] — march over the time axis

pub mod grid;
pub mod operator;
pub mod runner;
pub mod schemes;
pub mod surface;

pub use grid::{Grid, GridSpec, DEFAULT_UPPER_MULTIPLE, MAX_GRID_NODES};
pub use operator::BlackScholesOperator;
pub use runner::{run_all_schemes, run_scheme, SchemeResult};
pub use schemes::{
    make_stepper, BackwardEuler, ForwardEuler, Midpoint, SchemeKind, TimeStepper, Trapezoidal,
};
pub use surface::ValueSurface;

//! Drives the steppers over the whole time axis.

use super::grid::Grid;
use super::operator::BlackScholesOperator;
use super::schemes::{make_stepper, SchemeKind};
use super::surface::ValueSurface;
use bsfd_core::Result;
use bsfd_math::LinearSolver;
use tracing::{debug, warn};

/// A completed scheme run: the scheme and its own value surface.
#[derive(Debug, Clone)]
pub struct SchemeResult {
    /// Scheme that produced the surface.
    pub kind: SchemeKind,
    /// Values on the full grid; boundary rows are those of
    /// [`Grid::initial_surface`].
    pub surface: ValueSurface,
    /// Number of time steps taken.
    pub steps: usize,
}

/// Run one scheme from the terminal payoff to `τ = T`.
///
/// The run gets a fresh surface from [`Grid::initial_surface`], so it never
/// observes another scheme's values. A failed linear solve aborts this run
/// only.
pub fn run_scheme(
    kind: SchemeKind,
    grid: &Grid,
    operator: &BlackScholesOperator,
    solver: &dyn LinearSolver,
) -> Result<SchemeResult> {
    debug!(scheme = %kind, solver = solver.name(), "starting scheme");
    let mut surface = grid.initial_surface();
    let mut stepper = make_stepper(kind, operator, grid.time_step(), solver)?;

    let steps = grid.time_len() - 1;
    for j in 0..steps {
        let tau = grid.time_to_maturity(j);
        let tau_next = grid.time_to_maturity(j + 1);
        let next = stepper.step(surface.interior_column(j), tau, tau_next)?;
        surface.set_interior_column(j + 1, &next)?;
    }

    debug!(scheme = %kind, steps, max_abs = surface.max_abs(), "scheme finished");
    Ok(SchemeResult {
        kind,
        surface,
        steps,
    })
}

/// Run every scheme in [`SchemeKind::ALL`] order.
///
/// Returns one result per scheme; a failing scheme does not stop the
/// others. With the `parallel` feature the schemes run on the rayon pool.
pub fn run_all_schemes(
    grid: &Grid,
    operator: &BlackScholesOperator,
    solver: &dyn LinearSolver,
) -> Vec<(SchemeKind, Result<SchemeResult>)> {
    let ratio = grid.explicit_stability_ratio();
    if ratio > 1.0 {
        warn!(
            ratio,
            "dt·σ²·S̄²/ds² exceeds 1, explicit schemes are expected to diverge"
        );
    }

    let run = |kind: SchemeKind| {
        let result = run_scheme(kind, grid, operator, solver);
        if let Err(e) = &result {
            warn!(scheme = %kind, error = %e, "scheme failed");
        }
        (kind, result)
    };

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        SchemeKind::ALL.par_iter().map(|&kind| run(kind)).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        SchemeKind::ALL.iter().map(|&kind| run(kind)).collect()
    }
}

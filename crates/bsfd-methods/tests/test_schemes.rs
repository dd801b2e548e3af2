//! Integration tests for the grid, operator, and scheme runner.
//!
//! These exercise the invariants every scheme must respect regardless of
//! its accuracy: grid geometry, untouched boundary rows, the terminal
//! payoff, the explicit stability limit, and a time-invariant operator.

use bsfd_core::OptionParameters;
use bsfd_math::{DenseLuSolver, ThomasSolver};
use bsfd_methods::finite_differences::{
    run_all_schemes, run_scheme, BlackScholesOperator, Grid, GridSpec, SchemeKind,
};
use proptest::prelude::*;

fn reference_params() -> OptionParameters {
    OptionParameters::new(50.0, 0.5, 0.2, 0.01).unwrap()
}

// ───────────────────────── grid geometry ─────────────────────────

proptest! {
    #[test]
    fn grid_lengths_and_monotonic_axes(
        nt in 1usize..400,
        ns in 2usize..400,
        dt in prop::sample::select(vec![0.001, 0.0025, 0.01, 0.05]),
        ds in prop::sample::select(vec![0.5, 1.0, 2.5]),
    ) {
        let maturity = nt as f64 * dt;
        let strike = ns as f64 * ds / 4.0;
        let params = OptionParameters::new(strike, maturity, 0.2, 0.01).unwrap();
        let grid = Grid::new(params, &GridSpec::new(dt, ds)).unwrap();

        prop_assert_eq!(grid.time_len(), (maturity / dt).round() as usize + 1);
        prop_assert_eq!(grid.space_len(), (grid.upper_bound() / ds).round() as usize + 1);

        let times = grid.times();
        prop_assert_eq!(times[0], maturity);
        prop_assert_eq!(*times.last().unwrap(), 0.0);
        for w in times.windows(2) {
            prop_assert!(w[0] > w[1]);
            prop_assert!(((w[0] - w[1]) - grid.time_step()).abs() <= 1e-9 * grid.time_step());
        }

        let prices = grid.prices();
        prop_assert_eq!(prices[0], 0.0);
        prop_assert_eq!(*prices.last().unwrap(), grid.upper_bound());
        for w in prices.windows(2) {
            prop_assert!(w[1] > w[0]);
            prop_assert!(((w[1] - w[0]) - grid.space_step()).abs() <= 1e-9 * grid.space_step());
        }
    }
}

// ───────────────────────── boundary fidelity ─────────────────────────

#[test]
fn boundary_rows_are_never_overwritten() {
    let params = reference_params();
    let grid = Grid::new(params, &GridSpec::new(0.005, 2.0)).unwrap();
    let operator = BlackScholesOperator::assemble(&grid);
    let top = grid.space_len() - 1;

    for (kind, result) in run_all_schemes(&grid, &operator, &ThomasSolver) {
        let surface = result.unwrap().surface;
        for j in 0..grid.time_len() {
            let tau = grid.time_to_maturity(j);
            assert_eq!(surface[(0, j)], 0.0, "{kind}: lower boundary at column {j}");
            assert_eq!(
                surface[(top, j)],
                grid.upper_bound() - params.strike() * (-params.rate() * tau).exp(),
                "{kind}: upper boundary at column {j}"
            );
        }
    }
}

#[test]
fn terminal_column_is_the_payoff() {
    let grid = Grid::new(reference_params(), &GridSpec::new(0.01, 1.0)).unwrap();
    let initial = grid.initial_surface();
    let operator = BlackScholesOperator::assemble(&grid);
    let terminal = grid.terminal_index();

    for (i, &s) in grid.prices().iter().enumerate() {
        assert_eq!(initial[(i, terminal)], (s - 50.0).max(0.0));
    }
    for kind in SchemeKind::ALL {
        let result = run_scheme(kind, &grid, &operator, &ThomasSolver).unwrap();
        assert_eq!(result.surface.column(terminal), initial.column(terminal), "{kind}");
    }
}

// ───────────────────────── stability ─────────────────────────

#[test]
fn forward_euler_is_bounded_below_the_stability_limit() {
    let grid = Grid::new(reference_params(), &GridSpec::new(0.0005, 1.0)).unwrap();
    assert!(grid.explicit_stability_ratio() < 1.0);
    let operator = BlackScholesOperator::assemble(&grid);
    let result = run_scheme(SchemeKind::ForwardEuler, &grid, &operator, &ThomasSolver).unwrap();
    assert!(result.surface.is_finite());
    assert!(result.surface.max_abs() <= grid.upper_bound());
}

#[test]
fn forward_euler_diverges_above_the_stability_limit() {
    let grid = Grid::new(reference_params(), &GridSpec::new(0.005, 1.0)).unwrap();
    assert!(grid.explicit_stability_ratio() > 1.0);
    let operator = BlackScholesOperator::assemble(&grid);
    let result = run_scheme(SchemeKind::ForwardEuler, &grid, &operator, &ThomasSolver).unwrap();
    let last = result.surface.interior_column(grid.final_index());
    let blown_up = last.iter().any(|v| !v.is_finite() || v.abs() > 1e6);
    assert!(blown_up, "forward Euler should diverge at ratio {}", grid.explicit_stability_ratio());
}

#[test]
fn implicit_schemes_stay_bounded_above_the_stability_limit() {
    let grid = Grid::new(reference_params(), &GridSpec::new(0.005, 1.0)).unwrap();
    let operator = BlackScholesOperator::assemble(&grid);
    for kind in [SchemeKind::BackwardEuler, SchemeKind::Trapezoidal] {
        let result = run_scheme(kind, &grid, &operator, &ThomasSolver).unwrap();
        assert!(result.surface.is_finite(), "{kind}");
        assert!(result.surface.max_abs() < 2.0 * grid.upper_bound(), "{kind}");
    }
}

// ───────────────────────── operator ─────────────────────────

#[test]
fn operator_is_time_invariant() {
    let grid = Grid::new(reference_params(), &GridSpec::new(0.01, 2.0)).unwrap();
    let before = BlackScholesOperator::assemble(&grid);
    let results = run_all_schemes(&grid, &before, &ThomasSolver);
    assert!(results.iter().all(|(_, r)| r.is_ok()));
    let after = BlackScholesOperator::assemble(&grid);
    assert_eq!(before, after);

    // The boundary vector is the only time-dependent piece.
    assert_ne!(before.boundary_vector(0.0), before.boundary_vector(0.5));
}

#[test]
fn thomas_and_dense_solvers_agree_on_full_runs() {
    let grid = Grid::new(reference_params(), &GridSpec::new(0.01, 2.0)).unwrap();
    let operator = BlackScholesOperator::assemble(&grid);
    for kind in [SchemeKind::BackwardEuler, SchemeKind::Trapezoidal] {
        let a = run_scheme(kind, &grid, &operator, &ThomasSolver).unwrap().surface;
        let b = run_scheme(kind, &grid, &operator, &DenseLuSolver).unwrap().surface;
        let diff = a.difference(&b).unwrap();
        assert!(diff.max_abs() < 1e-8, "{kind}: {}", diff.max_abs());
    }
}

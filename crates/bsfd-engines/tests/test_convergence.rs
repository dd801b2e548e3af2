//! Refinement study: halving both steps must shrink the implicit schemes'
//! error, and the trapezoidal rule must converge faster than backward
//! Euler.

use bsfd_core::OptionParameters;
use bsfd_engines::black_scholes_call;
use bsfd_math::ThomasSolver;
use bsfd_methods::finite_differences::{run_scheme, BlackScholesOperator, Grid, GridSpec, SchemeKind};

const LEVELS: [(f64, f64); 3] = [(0.02, 2.0), (0.01, 1.0), (0.005, 0.5)];
const SPOTS: [f64; 3] = [40.0, 50.0, 60.0];

/// Max absolute error at `SPOTS` with the full maturity remaining.
fn error_at(kind: SchemeKind, dt: f64, ds: f64) -> f64 {
    let params = OptionParameters::new(50.0, 0.5, 0.2, 0.01).unwrap();
    let grid = Grid::new(params, &GridSpec::new(dt, ds)).unwrap();
    let operator = BlackScholesOperator::assemble(&grid);
    let result = run_scheme(kind, &grid, &operator, &ThomasSolver).unwrap();
    let j = grid.final_index();
    SPOTS
        .iter()
        .map(|&s| {
            let i = grid.nearest_price_index(s);
            let exact = black_scholes_call(s, 50.0, 0.01, 0.2, 0.5);
            (result.surface[(i, j)] - exact).abs()
        })
        .fold(0.0, f64::max)
}

fn errors(kind: SchemeKind) -> Vec<f64> {
    LEVELS.iter().map(|&(dt, ds)| error_at(kind, dt, ds)).collect()
}

#[test]
fn implicit_errors_shrink_under_refinement() {
    for kind in [SchemeKind::BackwardEuler, SchemeKind::Trapezoidal] {
        let e = errors(kind);
        assert!(e[1] < e[0], "{kind}: {e:?}");
        assert!(e[2] < e[1], "{kind}: {e:?}");
    }
}

#[test]
fn trapezoidal_converges_faster_than_backward_euler() {
    let be = errors(SchemeKind::BackwardEuler);
    let cn = errors(SchemeKind::Trapezoidal);

    assert!(cn[2] < be[2], "trapezoidal {cn:?} vs backward Euler {be:?}");
    let be_ratio = be[0] / be[2];
    let cn_ratio = cn[0] / cn[2];
    assert!(cn_ratio > be_ratio, "ratios: trapezoidal {cn_ratio}, backward Euler {be_ratio}");

    assert!(cn[2] < 0.01, "{cn:?}");
    assert!(be[2] < 0.05, "{be:?}");
}

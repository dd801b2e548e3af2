//! A full scheme comparison: grid, operator, analytic surface, the four
//! schemes, and the report at the requested slice.

use crate::analytic_european_engine::AnalyticEuropeanEngine;
use crate::report::{ComparisonReport, ReportPoints, ReportSpec};
use bsfd_core::{OptionParameters, Result};
use bsfd_math::LinearSolver;
use bsfd_methods::finite_differences::{
    run_all_schemes, BlackScholesOperator, Grid, GridSpec, SchemeKind, SchemeResult,
    ValueSurface,
};
use tracing::info;

/// A validated comparison run.
///
/// All parameters are checked by [`Experiment::new`]; nothing is computed
/// until [`Experiment::run`].
#[derive(Debug, Clone)]
pub struct Experiment {
    grid: Grid,
    report_spec: ReportSpec,
    points: ReportPoints,
}

impl Experiment {
    /// Build the grid and resolve the reporting points.
    ///
    /// Any invalid parameter, step, or reporting point is a configuration
    /// error.
    pub fn new(params: OptionParameters, grid_spec: GridSpec, report_spec: ReportSpec) -> Result<Self> {
        let grid = Grid::new(params, &grid_spec)?;
        let points = report_spec.locate(&grid)?;
        Ok(Self {
            grid,
            report_spec,
            points,
        })
    }

    /// The grid every scheme runs on.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Requested reporting slice.
    pub fn report_spec(&self) -> &ReportSpec {
        &self.report_spec
    }

    /// Grid indices of the reporting slice.
    pub fn report_points(&self) -> &ReportPoints {
        &self.points
    }

    /// Assemble the operator once, run every scheme with `solver`, and
    /// compare against the analytic surface.
    ///
    /// A scheme that fails is recorded in the outcome; only an internal
    /// inconsistency aborts the whole run.
    pub fn run(&self, solver: &dyn LinearSolver) -> Result<ExperimentOutcome> {
        let grid = &self.grid;
        info!(
            time_points = grid.time_len(),
            price_points = grid.space_len(),
            dt = grid.time_step(),
            ds = grid.space_step(),
            solver = solver.name(),
            "running scheme comparison"
        );

        let operator = BlackScholesOperator::assemble(grid);
        let analytic = AnalyticEuropeanEngine::new(*grid.params()).surface(grid);
        let results = run_all_schemes(grid, &operator, solver);
        let report = ComparisonReport::build(grid, &self.points, &analytic, &results)?;

        for s in report.schemes() {
            info!(
                scheme = %s.kind,
                report_max_abs = s.report_error.max_abs,
                surface_max_abs = s.surface_error.max_abs,
                surface_mean_abs = s.surface_error.mean_abs,
                "scheme error"
            );
        }

        Ok(ExperimentOutcome {
            grid: grid.clone(),
            analytic,
            results,
            report,
        })
    }
}

/// Everything produced by one [`Experiment::run`].
#[derive(Debug, Clone)]
pub struct ExperimentOutcome {
    /// Grid the schemes ran on.
    pub grid: Grid,
    /// Analytic values on every grid node.
    pub analytic: ValueSurface,
    /// One entry per scheme, in [`SchemeKind::ALL`] order.
    pub results: Vec<(SchemeKind, Result<SchemeResult>)>,
    /// Comparison at the reporting slice.
    pub report: ComparisonReport,
}

impl ExperimentOutcome {
    /// Successful run of `kind`, if any.
    pub fn result(&self, kind: SchemeKind) -> Option<&SchemeResult> {
        self.results
            .iter()
            .find(|(k, _)| *k == kind)
            .and_then(|(_, r)| r.as_ref().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bsfd_math::ThomasSolver;

    fn params() -> OptionParameters {
        OptionParameters::new(50.0, 0.5, 0.2, 0.01).unwrap()
    }

    #[test]
    fn configuration_errors_surface_before_running() {
        let err = Experiment::new(params(), GridSpec::new(0.3, 1.0), ReportSpec::default())
            .unwrap_err();
        assert!(err.is_config());

        let late = ReportSpec::new(0.9, vec![100.0]).unwrap();
        let err = Experiment::new(params(), GridSpec::new(0.01, 1.0), late).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn outcome_holds_every_scheme() {
        let experiment =
            Experiment::new(params(), GridSpec::new(0.01, 2.0), ReportSpec::default()).unwrap();
        let outcome = experiment.run(&ThomasSolver).unwrap();
        assert_eq!(outcome.results.len(), 4);
        assert_eq!(outcome.report.schemes().len(), 4);
        assert!(outcome.report.failures().is_empty());
        assert_eq!(outcome.analytic.cols(), outcome.grid.time_len());
        for kind in SchemeKind::ALL {
            assert_eq!(outcome.result(kind).unwrap().kind, kind);
        }
    }
}

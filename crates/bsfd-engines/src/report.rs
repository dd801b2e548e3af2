//! Extraction of scheme values at the reporting points and their errors
//! against the analytic reference.

use bsfd_core::{ensure, Error, Price, Real, Result, Time};
use bsfd_methods::finite_differences::{Grid, SchemeKind, SchemeResult, ValueSurface};

/// Where to compare the schemes: one calendar time on the grid's time axis
/// and an ascending list of spot prices.
///
/// Both are snapped to the nearest grid node; the first node wins a tie.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSpec {
    time: Time,
    prices: Vec<Price>,
}

impl ReportSpec {
    /// Validate and build a reporting specification.
    ///
    /// `prices` must be non-empty, finite, non-negative and strictly
    /// ascending; `time` must be finite and non-negative. Bounds against a
    /// concrete grid are checked by [`ReportSpec::locate`].
    pub fn new(time: Time, prices: Vec<Price>) -> Result<Self> {
        ensure!(
            time.is_finite() && time >= 0.0,
            "report time must be finite and non-negative, got {time}"
        );
        ensure!(!prices.is_empty(), "at least one report price is required");
        ensure!(
            prices.iter().all(|p| p.is_finite() && *p >= 0.0),
            "report prices must be finite and non-negative, got {prices:?}"
        );
        ensure!(
            prices.windows(2).all(|w| w[0] < w[1]),
            "report prices must be strictly ascending, got {prices:?}"
        );
        Ok(Self { time, prices })
    }

    /// Calendar time of the reporting slice.
    pub fn time(&self) -> Time {
        self.time
    }

    /// Requested spot prices.
    pub fn prices(&self) -> &[Price] {
        &self.prices
    }

    /// Resolve the reporting points to grid indices.
    ///
    /// Fails with a configuration error when the time lies after maturity
    /// or a price lies above the upper bound of the grid.
    pub fn locate(&self, grid: &Grid) -> Result<ReportPoints> {
        let maturity = grid.params().maturity();
        ensure!(
            self.time <= maturity,
            "report time {} lies outside [0, {maturity}]",
            self.time
        );
        let upper = grid.upper_bound();
        if let Some(&last) = self.prices.last() {
            ensure!(
                last <= upper,
                "report price {last} lies outside [0, {upper}]"
            );
        }

        Ok(ReportPoints {
            time_index: grid.nearest_time_index(self.time),
            price_indices: self
                .prices
                .iter()
                .map(|&s| grid.nearest_price_index(s))
                .collect(),
        })
    }
}

impl Default for ReportSpec {
    /// `t = 0.4` and `S = 100, 110, …, 200`.
    fn default() -> Self {
        Self {
            time: 0.4,
            prices: (10..=20).map(|i| 10.0 * i as Real).collect(),
        }
    }
}

/// Grid indices of the reporting slice and rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPoints {
    /// Column of the reporting time.
    pub time_index: usize,
    /// Row of every reporting price, in request order.
    pub price_indices: Vec<usize>,
}

/// Maximum and mean absolute error over a set of nodes.
///
/// Both are NaN as soon as any error is NaN, so a diverged scheme is never
/// mistaken for an accurate one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorSummary {
    /// Largest absolute error.
    pub max_abs: Real,
    /// Mean absolute error.
    pub mean_abs: Real,
}

impl ErrorSummary {
    /// Summarise `errors`; an empty set summarises to zero.
    pub fn from_errors<'a, I>(errors: I) -> Self
    where
        I: IntoIterator<Item = &'a Real>,
    {
        let mut max_abs: Real = 0.0;
        let mut sum = 0.0;
        let mut count = 0usize;
        for &e in errors {
            let a = e.abs();
            max_abs = if max_abs.is_nan() || a.is_nan() {
                Real::NAN
            } else {
                max_abs.max(a)
            };
            sum += a;
            count += 1;
        }
        let mean_abs = if count == 0 { 0.0 } else { sum / count as Real };
        Self { max_abs, mean_abs }
    }
}

/// One successful scheme at the reporting points.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemeComparison {
    /// Scheme compared.
    pub kind: SchemeKind,
    /// Scheme values, one per reporting price.
    pub values: Vec<Real>,
    /// `value − analytic`, one per reporting price.
    pub errors: Vec<Real>,
    /// Summary of `errors`.
    pub report_error: ErrorSummary,
    /// Summary of the error over every node of the surface.
    pub surface_error: ErrorSummary,
}

/// Side-by-side comparison of every scheme with the analytic reference.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonReport {
    time: Time,
    prices: Vec<Price>,
    analytic: Vec<Real>,
    schemes: Vec<SchemeComparison>,
    failures: Vec<(SchemeKind, Error)>,
}

impl ComparisonReport {
    /// Compare `results` with `analytic` at `points`.
    ///
    /// Schemes keep the order of `results`. A failed scheme is listed in
    /// [`ComparisonReport::failures`] and contributes no values.
    pub fn build(
        grid: &Grid,
        points: &ReportPoints,
        analytic: &ValueSurface,
        results: &[(SchemeKind, Result<SchemeResult>)],
    ) -> Result<Self> {
        let j = points.time_index;
        let rows = &points.price_indices;
        let pick = |surface: &ValueSurface| -> Vec<Real> {
            rows.iter().map(|&i| surface[(i, j)]).collect()
        };

        let reference = pick(analytic);
        let mut schemes = Vec::new();
        let mut failures = Vec::new();
        for (kind, result) in results {
            match result {
                Ok(run) => {
                    let values = pick(&run.surface);
                    let errors: Vec<Real> =
                        values.iter().zip(&reference).map(|(v, a)| v - a).collect();
                    let surface_diff = run.surface.difference(analytic)?;
                    schemes.push(SchemeComparison {
                        kind: *kind,
                        report_error: ErrorSummary::from_errors(&errors),
                        surface_error: ErrorSummary::from_errors(surface_diff.iter()),
                        values,
                        errors,
                    });
                }
                Err(e) => failures.push((*kind, e.clone())),
            }
        }

        Ok(Self {
            time: grid.times()[j],
            prices: rows.iter().map(|&i| grid.prices()[i]).collect(),
            analytic: reference,
            schemes,
            failures,
        })
    }

    /// Grid time of the reporting slice.
    pub fn time(&self) -> Time {
        self.time
    }

    /// Grid prices of the reporting rows.
    pub fn prices(&self) -> &[Price] {
        &self.prices
    }

    /// Analytic values at the reporting rows.
    pub fn analytic(&self) -> &[Real] {
        &self.analytic
    }

    /// Successful schemes, in run order.
    pub fn schemes(&self) -> &[SchemeComparison] {
        &self.schemes
    }

    /// Comparison for `kind`, if that scheme succeeded.
    pub fn scheme(&self, kind: SchemeKind) -> Option<&SchemeComparison> {
        self.schemes.iter().find(|s| s.kind == kind)
    }

    /// Schemes that failed, with their error.
    pub fn failures(&self) -> &[(SchemeKind, Error)] {
        &self.failures
    }
}

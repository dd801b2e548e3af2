//! CSV rendering of a [`ComparisonReport`].
//!
//! Every writer takes any [`io::Write`] sink, emits a header row, and
//! formats numbers with a fixed number of decimals. Non-finite values are
//! written as `inf`, `-inf` or `NaN` so a diverged scheme stays visible.

use crate::report::ComparisonReport;
use bsfd_core::{Error, Real, Result};
use std::io;

/// Decimal places used when none is configured.
pub const DEFAULT_PRECISION: usize = 5;

fn output_error(e: csv::Error) -> Error {
    Error::Output(e.to_string())
}

fn fmt_value(v: Real, precision: usize) -> String {
    format!("{v:.precision$}")
}

fn finish<W: io::Write>(mut writer: csv::Writer<W>) -> Result<()> {
    writer.flush().map_err(|e| Error::Output(e.to_string()))
}

/// Scheme values and the analytic reference, one row per reporting price.
///
/// Columns: `price`, one per successful scheme (its label), `Analytics`.
pub fn write_value_table<W: io::Write>(
    report: &ComparisonReport,
    sink: W,
    precision: usize,
) -> Result<()> {
    let mut writer = csv::Writer::from_writer(sink);

    let mut header = vec!["price".to_string()];
    header.extend(report.schemes().iter().map(|s| s.kind.label().to_string()));
    header.push("Analytics".to_string());
    writer.write_record(&header).map_err(output_error)?;

    for (row, &price) in report.prices().iter().enumerate() {
        let mut record = vec![format!("S = {price}")];
        record.extend(
            report
                .schemes()
                .iter()
                .map(|s| fmt_value(s.values[row], precision)),
        );
        record.push(fmt_value(report.analytic()[row], precision));
        writer.write_record(&record).map_err(output_error)?;
    }

    finish(writer)
}

/// Scheme errors against the analytic reference, one row per reporting
/// price.
pub fn write_error_table<W: io::Write>(
    report: &ComparisonReport,
    sink: W,
    precision: usize,
) -> Result<()> {
    let mut writer = csv::Writer::from_writer(sink);

    let mut header = vec!["price".to_string()];
    header.extend(
        report
            .schemes()
            .iter()
            .map(|s| s.kind.error_label().to_string()),
    );
    writer.write_record(&header).map_err(output_error)?;

    for (row, &price) in report.prices().iter().enumerate() {
        let mut record = vec![format!("S = {price}")];
        record.extend(
            report
                .schemes()
                .iter()
                .map(|s| fmt_value(s.errors[row], precision)),
        );
        writer.write_record(&record).map_err(output_error)?;
    }

    finish(writer)
}

/// Max and mean absolute error per scheme, at the reporting points and
/// over the whole surface.
pub fn write_summary_table<W: io::Write>(
    report: &ComparisonReport,
    sink: W,
    precision: usize,
) -> Result<()> {
    let mut writer = csv::Writer::from_writer(sink);
    writer
        .write_record([
            "scheme",
            "report_max_abs",
            "report_mean_abs",
            "surface_max_abs",
            "surface_mean_abs",
        ])
        .map_err(output_error)?;

    for s in report.schemes() {
        writer
            .write_record([
                s.kind.label().to_string(),
                fmt_value(s.report_error.max_abs, precision),
                fmt_value(s.report_error.mean_abs, precision),
                fmt_value(s.surface_error.max_abs, precision),
                fmt_value(s.surface_error.mean_abs, precision),
            ])
            .map_err(output_error)?;
    }

    finish(writer)
}

//! Persisting a [`ComparisonReport`] as CSV files.

use bsfd_core::{Error, Result};
use bsfd_engines::{write_error_table, write_summary_table, write_value_table, ComparisonReport};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::info;

/// File name of the value table.
pub const VALUES_FILE: &str = "values.csv";
/// File name of the error table.
pub const ERRORS_FILE: &str = "errors.csv";
/// File name of the error summary.
pub const SUMMARY_FILE: &str = "summary.csv";

/// Write the value, error and summary tables into `directory`, creating it
/// if needed. Returns the paths written, in that order.
pub fn write_report(
    report: &ComparisonReport,
    directory: &Path,
    precision: usize,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(directory)
        .map_err(|e| Error::Output(format!("cannot create {}: {e}", directory.display())))?;

    let values = directory.join(VALUES_FILE);
    write_value_table(report, BufWriter::new(open(&values)?), precision)?;

    let errors = directory.join(ERRORS_FILE);
    write_error_table(report, BufWriter::new(open(&errors)?), precision)?;

    let summary = directory.join(SUMMARY_FILE);
    write_summary_table(report, BufWriter::new(open(&summary)?), precision)?;

    info!(directory = %directory.display(), "tables written");
    Ok(vec![values, errors, summary])
}

fn open(path: &Path) -> Result<File> {
    File::create(path).map_err(|e| Error::Output(format!("cannot create {}: {e}", path.display())))
}

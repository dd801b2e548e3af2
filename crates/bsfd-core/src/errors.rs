//! Error types for bsfd.
//!
//! Configuration problems, numerical failures of a single scheme, and
//! output failures are kept as distinct variants so that callers can tell
//! "the run was never valid" apart from "one scheme broke down".

use thiserror::Error;

/// The top-level error type used throughout bsfd.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Invalid option, grid, or reporting parameters (raised by `ensure!`).
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A linear solve hit a zero or non-finite pivot.
    #[error("singular linear system: zero or non-finite pivot at row {row}")]
    SingularMatrix {
        /// Row of the failing pivot.
        row: usize,
    },

    /// A vector or matrix did not have the expected length.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Expected length.
        expected: usize,
        /// Actual length.
        found: usize,
    },

    /// Failure while persisting a result table.
    #[error("output error: {0}")]
    Output(String),
}

impl Error {
    /// Return `true` for configuration errors, which are raised before any
    /// computation starts.
    pub fn is_config(&self) -> bool {
        matches!(self, Error::Config(_))
    }

    /// Return `true` for numerical failures of a linear solve.
    pub fn is_numerical(&self) -> bool {
        matches!(self, Error::SingularMatrix { .. })
    }
}

/// Shorthand `Result` type used throughout bsfd.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Validate a configuration precondition.
///
/// Returns `Err(Error::Config(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use bsfd_core::{ensure, errors::Error};
/// fn positive(x: f64) -> bsfd_core::errors::Result<f64> {
///     ensure!(x > 0.0, "x must be positive, got {x}");
///     Ok(x)
/// }
/// assert!(positive(1.0).is_ok());
/// assert!(matches!(positive(-1.0), Err(Error::Config(_))));
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Config(
                format!($($msg)*)
            ));
        }
    };
}

//! Pluggable `solve(A, b) → x` capability for tridiagonal systems.
//!
//! A [`LinearSolver`] turns a [`TridiagonalOperator`] into a
//! [`FactorizedSystem`] that can be solved repeatedly against new
//! right-hand sides. Time-stepping schemes whose left-hand matrix does not
//! change between steps factorise it once and reuse the factorisation.
//!
//! * [`ThomasSolver`] — banded LU without pivoting, `O(n)` per solve
//! * [`DenseLuSolver`] — dense LU with partial pivoting (nalgebra)

use crate::tridiagonal::TridiagonalOperator;
use bsfd_core::{Error, Real, Result};
use nalgebra::linalg::LU;
use nalgebra::{DVector, Dyn};
use std::fmt;

/// A factorised linear system ready to be solved for many right-hand sides.
pub trait FactorizedSystem: fmt::Debug + Send + Sync {
    /// Dimension of the system.
    fn size(&self) -> usize;

    /// Solve `A · x = rhs`.
    fn solve(&self, rhs: &[Real]) -> Result<Vec<Real>>;
}

/// Factorises tridiagonal systems.
pub trait LinearSolver: fmt::Debug + Send + Sync {
    /// Short identifier used in logs and configuration.
    fn name(&self) -> &'static str;

    /// Factorise `matrix`.
    ///
    /// Returns [`Error::SingularMatrix`] when the matrix cannot be inverted.
    fn factorize(&self, matrix: &TridiagonalOperator) -> Result<Box<dyn FactorizedSystem>>;

    /// One-shot solve of `matrix · x = rhs`.
    fn solve(&self, matrix: &TridiagonalOperator, rhs: &[Real]) -> Result<Vec<Real>> {
        self.factorize(matrix)?.solve(rhs)
    }
}

fn check_rhs(expected: usize, rhs: &[Real]) -> Result<()> {
    if rhs.len() != expected {
        return Err(Error::DimensionMismatch {
            expected,
            found: rhs.len(),
        });
    }
    Ok(())
}

#[inline]
fn is_degenerate_pivot(pivot: Real) -> bool {
    !pivot.is_finite() || pivot.abs() < Real::MIN_POSITIVE
}

// ─── Thomas algorithm ────────────────────────────────────────────────────────

/// Thomas algorithm (LU decomposition for tridiagonal systems).
#[derive(Debug, Clone, Copy, Default)]
pub struct ThomasSolver;

/// Forward-sweep coefficients of the Thomas algorithm.
#[derive(Debug, Clone)]
pub struct ThomasFactorization {
    lower: Vec<Real>,
    pivots: Vec<Real>,
    c_prime: Vec<Real>,
}

impl LinearSolver for ThomasSolver {
    fn name(&self) -> &'static str {
        "thomas"
    }

    fn factorize(&self, matrix: &TridiagonalOperator) -> Result<Box<dyn FactorizedSystem>> {
        Ok(Box::new(ThomasFactorization::new(matrix)?))
    }
}

impl ThomasFactorization {
    /// Run the forward sweep on `matrix`.
    pub fn new(matrix: &TridiagonalOperator) -> Result<Self> {
        let n = matrix.size();
        let mut pivots = vec![0.0; n];
        let mut c_prime = vec![0.0; n];

        for i in 0..n {
            let m = if i == 0 {
                matrix.diag[0]
            } else {
                matrix.diag[i] - matrix.lower[i] * c_prime[i - 1]
            };
            if is_degenerate_pivot(m) {
                return Err(Error::SingularMatrix { row: i });
            }
            pivots[i] = m;
            if i + 1 < n {
                c_prime[i] = matrix.upper[i] / m;
            }
        }

        Ok(Self {
            lower: matrix.lower.clone(),
            pivots,
            c_prime,
        })
    }
}

impl FactorizedSystem for ThomasFactorization {
    fn size(&self) -> usize {
        self.pivots.len()
    }

    fn solve(&self, rhs: &[Real]) -> Result<Vec<Real>> {
        let n = self.size();
        check_rhs(n, rhs)?;
        if n == 0 {
            return Ok(Vec::new());
        }

        // Forward sweep
        let mut x = vec![0.0; n];
        x[0] = rhs[0] / self.pivots[0];
        for i in 1..n {
            x[i] = (rhs[i] - self.lower[i] * x[i - 1]) / self.pivots[i];
        }

        // Back substitution
        for i in (0..n - 1).rev() {
            x[i] -= self.c_prime[i] * x[i + 1];
        }
        Ok(x)
    }
}

// ─── Dense LU ────────────────────────────────────────────────────────────────

/// Dense LU decomposition with partial pivoting, delegated to nalgebra.
///
/// Slower than [`ThomasSolver`] but robust for tridiagonal matrices that are
/// not diagonally dominant.
#[derive(Debug, Clone, Copy, Default)]
pub struct DenseLuSolver;

/// A dense LU factorisation.
pub struct DenseLuFactorization {
    lu: LU<Real, Dyn, Dyn>,
    size: usize,
}

impl fmt::Debug for DenseLuFactorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DenseLuFactorization")
            .field("size", &self.size)
            .finish()
    }
}

impl LinearSolver for DenseLuSolver {
    fn name(&self) -> &'static str {
        "dense"
    }

    fn factorize(&self, matrix: &TridiagonalOperator) -> Result<Box<dyn FactorizedSystem>> {
        let size = matrix.size();
        let lu = matrix.to_dense().lu();
        if !lu.is_invertible() {
            let u = lu.u();
            let row = (0..size)
                .find(|&i| is_degenerate_pivot(u[(i, i)]))
                .unwrap_or(0);
            return Err(Error::SingularMatrix { row });
        }
        tracing::trace!(size, "dense LU factorisation complete");
        Ok(Box::new(DenseLuFactorization { lu, size }))
    }
}

impl FactorizedSystem for DenseLuFactorization {
    fn size(&self) -> usize {
        self.size
    }

    fn solve(&self, rhs: &[Real]) -> Result<Vec<Real>> {
        check_rhs(self.size, rhs)?;
        let b = DVector::from_column_slice(rhs);
        self.lu
            .solve(&b)
            .map(|x| x.as_slice().to_vec())
            .ok_or(Error::SingularMatrix { row: 0 })
    }
}

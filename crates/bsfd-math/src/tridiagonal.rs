//! Tridiagonal matrix operator.
//!
//! The discretised Black-Scholes generator and every matrix derived from it
//! (`I − dt·M`, `I ± dt/2·M`) are tridiagonal, so they are stored as three
//! bands rather than as dense matrices.

use crate::linear_solvers::{LinearSolver, ThomasSolver};
use bsfd_core::{Error, Real, Result};
use nalgebra::DMatrix;

/// A tridiagonal matrix operator.
///
/// Stores the lower, diagonal, and upper bands, all of length `n`.
#[derive(Debug, Clone, PartialEq)]
pub struct TridiagonalOperator {
    /// Lower diagonal (index 0 unused, starts from row 1).
    pub lower: Vec<Real>,
    /// Main diagonal.
    pub diag: Vec<Real>,
    /// Upper diagonal (last index unused, ends at row n−2).
    pub upper: Vec<Real>,
}

impl TridiagonalOperator {
    /// Create a zero tridiagonal operator of size `n`.
    pub fn new(n: usize) -> Self {
        Self {
            lower: vec![0.0; n],
            diag: vec![0.0; n],
            upper: vec![0.0; n],
        }
    }

    /// Build from explicit bands, which must all have the same length.
    pub fn from_bands(lower: Vec<Real>, diag: Vec<Real>, upper: Vec<Real>) -> Result<Self> {
        let n = diag.len();
        check_len(n, lower.len())?;
        check_len(n, upper.len())?;
        Ok(Self { lower, diag, upper })
    }

    /// Size (number of rows/columns).
    pub fn size(&self) -> usize {
        self.diag.len()
    }

    /// Apply the operator: `y = A · x`.
    pub fn apply(&self, x: &[Real]) -> Result<Vec<Real>> {
        let mut y = vec![0.0; self.size()];
        self.apply_into(x, &mut y)?;
        Ok(y)
    }

    /// Apply the operator into a caller-provided buffer: `y = A · x`.
    pub fn apply_into(&self, x: &[Real], y: &mut [Real]) -> Result<()> {
        let n = self.size();
        check_len(n, x.len())?;
        check_len(n, y.len())?;
        for i in 0..n {
            let mut acc = self.diag[i] * x[i];
            if i > 0 {
                acc += self.lower[i] * x[i - 1];
            }
            if i + 1 < n {
                acc += self.upper[i] * x[i + 1];
            }
            y[i] = acc;
        }
        Ok(())
    }

    /// Solve `A · x = rhs` using the Thomas algorithm.
    ///
    /// Returns [`Error::SingularMatrix`] on a zero or non-finite pivot.
    pub fn solve(&self, rhs: &[Real]) -> Result<Vec<Real>> {
        ThomasSolver.solve(self, rhs)
    }

    /// Scale all entries by a scalar.
    pub fn scale(&mut self, factor: Real) {
        for v in &mut self.lower {
            *v *= factor;
        }
        for v in &mut self.diag {
            *v *= factor;
        }
        for v in &mut self.upper {
            *v *= factor;
        }
    }

    /// Add the identity matrix scaled by `factor`: `A ← A + factor · I`.
    pub fn add_identity(&mut self, factor: Real) {
        for d in &mut self.diag {
            *d += factor;
        }
    }

    /// Return `I + alpha · A` without modifying `self`.
    pub fn identity_plus_scaled(&self, alpha: Real) -> Self {
        let mut op = self.clone();
        op.scale(alpha);
        op.add_identity(1.0);
        op
    }

    /// Expand into a dense `n × n` matrix.
    pub fn to_dense(&self) -> DMatrix<Real> {
        let n = self.size();
        let mut m = DMatrix::zeros(n, n);
        for i in 0..n {
            m[(i, i)] = self.diag[i];
            if i > 0 {
                m[(i, i - 1)] = self.lower[i];
            }
            if i + 1 < n {
                m[(i, i + 1)] = self.upper[i];
            }
        }
        m
    }
}

fn check_len(expected: usize, found: usize) -> Result<()> {
    if expected != found {
        return Err(Error::DimensionMismatch { expected, found });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DVector;

    fn sample() -> TridiagonalOperator {
        // A = [[2, -1, 0], [-1, 2, -1], [0, -1, 2]]
        TridiagonalOperator::from_bands(
            vec![0.0, -1.0, -1.0],
            vec![2.0, 2.0, 2.0],
            vec![-1.0, -1.0, 0.0],
        )
        .unwrap()
    }

    #[test]
    fn thomas_algorithm_solves_identity() {
        let op = TridiagonalOperator::new(4).identity_plus_scaled(1.0);
        let rhs = vec![1.0, 2.0, 3.0, 4.0];
        let x = op.solve(&rhs).unwrap();
        for i in 0..4 {
            assert!((x[i] - rhs[i]).abs() < 1e-12);
        }
    }

    #[test]
    fn thomas_algorithm_solves_tridiagonal() {
        // x = [1, 2, 3]  =>  Ax = [0, 0, 4]
        let x = sample().solve(&[0.0, 0.0, 4.0]).unwrap();
        assert!((x[0] - 1.0).abs() < 1e-12);
        assert!((x[1] - 2.0).abs() < 1e-12);
        assert!((x[2] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn apply_matches_dense_product() {
        let op = sample();
        let x = [0.5, -1.5, 2.0];
        let y = op.apply(&x).unwrap();
        let dense = op.to_dense() * DVector::from_column_slice(&x);
        for i in 0..3 {
            assert!((y[i] - dense[i]).abs() < 1e-14);
        }
    }

    #[test]
    fn single_row_operator() {
        let op = TridiagonalOperator::from_bands(vec![7.0], vec![4.0], vec![9.0]).unwrap();
        assert_eq!(op.apply(&[2.0]).unwrap(), vec![8.0]);
        assert_eq!(op.solve(&[8.0]).unwrap(), vec![2.0]);
    }

    #[test]
    fn identity_plus_scaled_keeps_original() {
        let op = sample();
        let shifted = op.identity_plus_scaled(-0.5);
        assert_eq!(op, sample());
        assert_eq!(shifted.diag, vec![0.0, 0.0, 0.0]);
        assert_eq!(shifted.lower, vec![0.0, 0.5, 0.5]);
        assert_eq!(shifted.upper, vec![0.5, 0.5, 0.0]);
    }

    #[test]
    fn dimension_mismatch_is_reported() {
        let err = sample().apply(&[1.0, 2.0]).unwrap_err();
        assert_eq!(err, Error::DimensionMismatch { expected: 3, found: 2 });
        assert!(TridiagonalOperator::from_bands(vec![0.0], vec![1.0, 1.0], vec![0.0, 0.0]).is_err());
    }
}

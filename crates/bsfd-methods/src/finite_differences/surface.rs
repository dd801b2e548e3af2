//! `ValueSurface` — option values on the `(price, time)` grid.
//!
//! A thin newtype around `nalgebra::DMatrix<f64>` indexed by
//! `(price_index, time_index)`. Storage is column-major, so a time slice is a
//! contiguous run of memory and the schemes read and write whole columns.

use bsfd_core::{Error, Real, Result};
use nalgebra::DMatrix;
use std::ops::{Index, IndexMut};

/// Dense `Ns × Nt` surface of option values.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueSurface(DMatrix<Real>);

impl ValueSurface {
    /// Zero-filled surface with `rows` price points and `cols` time points.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self(DMatrix::zeros(rows, cols))
    }

    /// Build a surface by evaluating `f(price_index, time_index)`.
    pub fn from_fn<F: FnMut(usize, usize) -> Real>(rows: usize, cols: usize, f: F) -> Self {
        Self(DMatrix::from_fn(rows, cols, f))
    }

    /// Number of price points.
    pub fn rows(&self) -> usize {
        self.0.nrows()
    }

    /// Number of time points.
    pub fn cols(&self) -> usize {
        self.0.ncols()
    }

    /// Full time slice `j`, boundaries included.
    pub fn column(&self, j: usize) -> &[Real] {
        let n = self.rows();
        &self.0.as_slice()[j * n..(j + 1) * n]
    }

    /// Interior of time slice `j` (rows `1..Ns−1`).
    pub fn interior_column(&self, j: usize) -> &[Real] {
        let n = self.rows();
        &self.0.as_slice()[j * n + 1..(j + 1) * n - 1]
    }

    /// Overwrite the interior of time slice `j`; boundary rows are untouched.
    pub fn set_interior_column(&mut self, j: usize, values: &[Real]) -> Result<()> {
        let n = self.rows();
        let expected = n.saturating_sub(2);
        if values.len() != expected {
            return Err(Error::DimensionMismatch {
                expected,
                found: values.len(),
            });
        }
        self.0.as_mut_slice()[j * n + 1..(j + 1) * n - 1].copy_from_slice(values);
        Ok(())
    }

    /// Largest absolute value on the surface (NaN if any entry is NaN).
    pub fn max_abs(&self) -> Real {
        self.0.iter().fold(0.0, |acc: Real, &v| {
            if acc.is_nan() || v.is_nan() {
                Real::NAN
            } else {
                acc.max(v.abs())
            }
        })
    }

    /// Return `true` if every entry is finite.
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }

    /// Element-wise difference `self − other`.
    pub fn difference(&self, other: &ValueSurface) -> Result<ValueSurface> {
        if self.0.shape() != other.0.shape() {
            return Err(Error::DimensionMismatch {
                expected: self.0.len(),
                found: other.0.len(),
            });
        }
        Ok(Self(&self.0 - &other.0))
    }

    /// Iterate over all entries in column-major order.
    pub fn iter(&self) -> impl Iterator<Item = &Real> {
        self.0.iter()
    }
}

impl Index<(usize, usize)> for ValueSurface {
    type Output = Real;
    fn index(&self, (i, j): (usize, usize)) -> &Real {
        &self.0[(i, j)]
    }
}

impl IndexMut<(usize, usize)> for ValueSurface {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut Real {
        &mut self.0[(i, j)]
    }
}

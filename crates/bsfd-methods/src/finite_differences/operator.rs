//! Discretised Black-Scholes generator on the interior price points.
//!
//! In time-to-maturity `τ` the pricing PDE reads
//! `∂V/∂τ = ½σ²S²·∂²V/∂S² + rS·∂V/∂S − rV`. Central differences on the
//! interior points `s_1 … s_{Ns−2}` turn the right-hand side into
//! `M·U + c(τ)`, where `M` is tridiagonal and `c(τ)` carries the
//! contribution of the upper boundary node. The lower boundary is always 0
//! and contributes nothing.

use super::grid::{upper_boundary_value, Grid};
use bsfd_core::{Error, OptionParameters, Real, Result, Time};
use bsfd_math::TridiagonalOperator;

/// The spatial operator `M` together with its boundary coupling.
///
/// Coefficients depend on the price row but not on time, so the operator is
/// assembled once per grid and shared read-only by every scheme.
#[derive(Debug, Clone, PartialEq)]
pub struct BlackScholesOperator {
    matrix: TridiagonalOperator,
    upper_coupling: Real,
    params: OptionParameters,
    upper_bound: Real,
}

impl BlackScholesOperator {
    /// Assemble `M` for `grid`.
    ///
    /// Row `k` (price `s = s_{k+1}`) uses `a = ½σ²s²/ds²` and `b = rs/(2ds)`:
    /// lower `a − b`, diagonal `−2a − r`, upper `a + b`.
    pub fn assemble(grid: &Grid) -> Self {
        let params = *grid.params();
        let sigma2 = params.volatility() * params.volatility();
        let r = params.rate();
        let ds = grid.space_step();
        let n = grid.interior_len();
        let prices = &grid.prices()[1..grid.space_len() - 1];

        let mut matrix = TridiagonalOperator::new(n);
        let mut upper_coupling = 0.0;
        for (k, &s) in prices.iter().enumerate() {
            let a = 0.5 * sigma2 * s * s / (ds * ds);
            let b = r * s / (2.0 * ds);
            matrix.diag[k] = -2.0 * a - r;
            if k > 0 {
                matrix.lower[k] = a - b;
            }
            if k + 1 < n {
                matrix.upper[k] = a + b;
            } else {
                upper_coupling = a + b;
            }
        }

        Self {
            matrix,
            upper_coupling,
            params,
            upper_bound: grid.upper_bound(),
        }
    }

    /// The tridiagonal matrix `M`.
    pub fn matrix(&self) -> &TridiagonalOperator {
        &self.matrix
    }

    /// Number of interior points.
    pub fn size(&self) -> usize {
        self.matrix.size()
    }

    /// Coefficient linking the last interior row to the upper boundary node.
    pub fn upper_coupling(&self) -> Real {
        self.upper_coupling
    }

    /// Boundary-correction vector `c(τ)`: zero except for the last entry,
    /// which is the upper coupling times `S̄ − K·exp(−r·τ)`.
    pub fn boundary_vector(&self, time_to_maturity: Time) -> Vec<Real> {
        let mut c = vec![0.0; self.size()];
        if let Some(last) = c.last_mut() {
            *last = self.upper_correction(time_to_maturity);
        }
        c
    }

    /// Right-hand side of the semi-discrete system: `M·u + c(τ)`.
    pub fn generator(&self, u: &[Real], time_to_maturity: Time) -> Result<Vec<Real>> {
        let mut out = self.matrix.apply(u)?;
        if let Some(last) = out.last_mut() {
            *last += self.upper_correction(time_to_maturity);
        }
        Ok(out)
    }

    fn upper_correction(&self, time_to_maturity: Time) -> Real {
        self.upper_coupling * upper_boundary_value(&self.params, self.upper_bound, time_to_maturity)
    }
}

/// Element-wise `a + factor · b`.
pub(crate) fn axpy(a: &[Real], factor: Real, b: &[Real]) -> Result<Vec<Real>> {
    if a.len() != b.len() {
        return Err(Error::DimensionMismatch {
            expected: a.len(),
            found: b.len(),
        });
    }
    Ok(a.iter().zip(b).map(|(x, y)| x + factor * y).collect())
}

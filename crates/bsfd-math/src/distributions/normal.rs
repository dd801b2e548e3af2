//! Standard normal distribution.

use bsfd_core::Real;
use statrs::function::erf::erfc;
use std::f64::consts::FRAC_1_SQRT_2;

/// The standard normal cumulative distribution function Φ(x).
///
/// Evaluated as `½·erfc(−x/√2)`, which keeps full relative precision in the
/// lower tail. Infinite arguments map to 0 and 1.
pub fn normal_cdf(x: Real) -> Real {
    if x == Real::NEG_INFINITY {
        return 0.0;
    }
    if x == Real::INFINITY {
        return 1.0;
    }
    0.5 * erfc(-x * FRAC_1_SQRT_2)
}

//! Floating-point comparison utilities.

use bsfd_core::Real;

/// Return `true` if `ratio` lies within `rel_tol` of the nearest integer.
///
/// Used to decide whether a step evenly divides a domain length.
#[inline]
pub fn is_whole(ratio: Real, rel_tol: Real) -> bool {
    ratio.is_finite() && (ratio - ratio.round()).abs() <= rel_tol * ratio.abs().max(1.0)
}

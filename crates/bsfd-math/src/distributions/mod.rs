//! Probability distributions.
//!
//! Only the standard normal is needed by the Black-Scholes reference; it
//! delegates the error function to the `statrs` crate.

pub mod normal;

pub use normal::normal_cdf;

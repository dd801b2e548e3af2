//! European call contract and market parameters.

use crate::{ensure, errors::Result, Price, Rate, Real, Time, Volatility};

/// Strike, maturity, volatility, and risk-free rate of a European call under
/// constant-coefficient Black-Scholes dynamics.
///
/// Instances can only be built through [`OptionParameters::new`], so every
/// value downstream has already been validated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptionParameters {
    strike: Price,
    maturity: Time,
    volatility: Volatility,
    rate: Rate,
}

impl OptionParameters {
    /// Validate and build a parameter set.
    ///
    /// Strike, maturity, and volatility must be positive and finite; the
    /// rate must be finite and non-negative.
    pub fn new(strike: Price, maturity: Time, volatility: Volatility, rate: Rate) -> Result<Self> {
        ensure!(
            strike.is_finite() && strike > 0.0,
            "strike must be positive and finite, got {strike}"
        );
        ensure!(
            maturity.is_finite() && maturity > 0.0,
            "maturity must be positive and finite, got {maturity}"
        );
        ensure!(
            volatility.is_finite() && volatility > 0.0,
            "volatility must be positive and finite, got {volatility}"
        );
        ensure!(
            rate.is_finite() && rate >= 0.0,
            "rate must be non-negative and finite, got {rate}"
        );
        Ok(Self {
            strike,
            maturity,
            volatility,
            rate,
        })
    }

    /// Strike price `K`.
    pub fn strike(&self) -> Price {
        self.strike
    }

    /// Maturity `T` in years.
    pub fn maturity(&self) -> Time {
        self.maturity
    }

    /// Volatility `σ`.
    pub fn volatility(&self) -> Volatility {
        self.volatility
    }

    /// Continuously compounded risk-free rate `r`.
    pub fn rate(&self) -> Rate {
        self.rate
    }

    /// Call payoff `max(S − K, 0)`.
    #[inline]
    pub fn payoff(&self, spot: Price) -> Real {
        (spot - self.strike).max(0.0)
    }

    /// Discounted strike `K·exp(−r·τ)` for a time-to-maturity `τ`.
    #[inline]
    pub fn discounted_strike(&self, time_to_maturity: Time) -> Real {
        self.strike * (-self.rate * time_to_maturity).exp()
    }
}

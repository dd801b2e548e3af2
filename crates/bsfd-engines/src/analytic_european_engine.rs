//! Analytic European call engine (Black-Scholes).
//!
//! Supplies the closed-form reference every finite difference scheme is
//! measured against, both at single points and over a whole grid.

use bsfd_core::{OptionParameters, Price, Rate, Real, Time, Volatility};
use bsfd_math::distributions::normal_cdf;
use bsfd_methods::finite_differences::{Grid, ValueSurface};

/// Closed-form pricer for the European call described by a set of
/// [`OptionParameters`].
///
/// Implements the Black-Scholes solution without dividends:
///
/// $$C = S N(d_1) - K e^{-r\tau} N(d_2)$$
///
/// where $d_{1,2} = \frac{\ln(S/K) + (r \pm \sigma^2/2)\tau}{\sigma\sqrt{\tau}}$
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalyticEuropeanEngine {
    params: OptionParameters,
}

impl AnalyticEuropeanEngine {
    /// Create an engine for the given contract.
    pub fn new(params: OptionParameters) -> Self {
        Self { params }
    }

    /// Contract priced by this engine.
    pub fn params(&self) -> &OptionParameters {
        &self.params
    }

    /// Call value at `spot` with `time_to_maturity` years remaining.
    pub fn price(&self, spot: Price, time_to_maturity: Time) -> Real {
        black_scholes_call(
            spot,
            self.params.strike(),
            self.params.rate(),
            self.params.volatility(),
            time_to_maturity,
        )
    }

    /// Analytic values on every `(price, time)` node of `grid`.
    ///
    /// Column `j` is priced with the time-to-maturity of that column, so the
    /// terminal column reproduces the payoff exactly.
    pub fn surface(&self, grid: &Grid) -> ValueSurface {
        let prices = grid.prices();
        ValueSurface::from_fn(grid.space_len(), grid.time_len(), |i, j| {
            self.price(prices[i], grid.time_to_maturity(j))
        })
    }
}

/// Black-Scholes value of a European call.
///
/// `τ ≤ 0` gives the intrinsic value and `spot ≤ 0` gives 0. A vanishing
/// standard deviation collapses to the discounted forward intrinsic value.
pub fn black_scholes_call(
    spot: Price,
    strike: Price,
    rate: Rate,
    volatility: Volatility,
    time_to_maturity: Time,
) -> Real {
    let t = time_to_maturity;
    if t <= 0.0 {
        return (spot - strike).max(0.0);
    }
    if spot <= 0.0 {
        return 0.0;
    }

    let df = (-rate * t).exp();
    let std_dev = volatility * t.sqrt();
    if std_dev <= 1e-15 {
        return (spot - strike * df).max(0.0);
    }

    let d1 = ((spot / strike).ln() + (rate + 0.5 * volatility * volatility) * t) / std_dev;
    let d2 = d1 - std_dev;
    spot * normal_cdf(d1) - strike * df * normal_cdf(d2)
}

//! Closed-form reference values and no-arbitrage properties.

use approx::assert_abs_diff_eq;
use bsfd_core::OptionParameters;
use bsfd_engines::{black_scholes_call, AnalyticEuropeanEngine};
use proptest::prelude::*;

#[test]
fn known_value_in_the_money() {
    // K=50, T=0.5, σ=0.2, r=0.01, S=75
    let price = black_scholes_call(75.0, 50.0, 0.01, 0.2, 0.5);
    assert_abs_diff_eq!(price, 25.2540, epsilon = 1e-4);
    assert!(price > 25.25 && price < 25.26, "price = {price}");
}

#[test]
fn engine_agrees_with_free_function() {
    let params = OptionParameters::new(50.0, 0.5, 0.2, 0.01).unwrap();
    let engine = AnalyticEuropeanEngine::new(params);
    assert_eq!(engine.price(75.0, 0.5), black_scholes_call(75.0, 50.0, 0.01, 0.2, 0.5));
    assert_eq!(engine.price(60.0, 0.0), 10.0);
}

proptest! {
    #[test]
    fn call_lies_within_arbitrage_bounds(
        spot in 0.5f64..300.0,
        strike in 10.0f64..150.0,
        rate in 0.0f64..0.1,
        vol in 0.05f64..0.8,
        tau in 0.01f64..3.0,
    ) {
        let c = black_scholes_call(spot, strike, rate, vol, tau);
        let lower = (spot - strike * (-rate * tau).exp()).max(0.0);
        prop_assert!(c >= lower - 1e-9, "c = {c}, lower = {lower}");
        prop_assert!(c <= spot + 1e-9, "c = {c}, spot = {spot}");
    }

    #[test]
    fn call_increases_with_spot(
        spot in 1.0f64..200.0,
        bump in 0.01f64..10.0,
        vol in 0.05f64..0.8,
    ) {
        let lo = black_scholes_call(spot, 50.0, 0.01, vol, 0.5);
        let hi = black_scholes_call(spot + bump, 50.0, 0.01, vol, 0.5);
        prop_assert!(hi >= lo - 1e-12);
    }
}

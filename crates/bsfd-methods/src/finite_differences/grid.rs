//! Uniform time/price grid and the boundary-initialised value surface.

use super::surface::ValueSurface;
use bsfd_core::{ensure, OptionParameters, Price, Real, Result, Size, Time};
use bsfd_math::comparison::is_whole;

/// Default truncation of the price axis, as a multiple of the strike.
pub const DEFAULT_UPPER_MULTIPLE: Real = 4.0;

/// Relative tolerance used to decide that a step evenly divides its domain.
const DIVISIBILITY_TOLERANCE: Real = 1e-9;

/// Largest number of `(price, time)` nodes a grid may hold.
pub const MAX_GRID_NODES: usize = 50_000_000;

/// Step sizes and price truncation requested for a grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSpec {
    /// Requested time step `dt`.
    pub time_step: Time,
    /// Requested price step `ds`.
    pub space_step: Price,
    /// Upper price bound `S̄` as a multiple of the strike.
    pub upper_multiple: Real,
}

impl GridSpec {
    /// Steps `dt`, `ds` with the default upper multiple.
    pub fn new(time_step: Time, space_step: Price) -> Self {
        Self {
            time_step,
            space_step,
            upper_multiple: DEFAULT_UPPER_MULTIPLE,
        }
    }

    /// Override the price truncation multiple.
    pub fn with_upper_multiple(mut self, upper_multiple: Real) -> Self {
        self.upper_multiple = upper_multiple;
        self
    }
}

/// The discretised `(price, time)` domain.
///
/// * time axis `t[0..Nt]` runs from maturity `T` down to 0, so column `j`
///   has time-to-maturity `τ_j = j·dt`;
/// * price axis `s[0..Ns]` runs from 0 up to `S̄ = upper_multiple · K`.
///
/// Both axes include their end points exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    params: OptionParameters,
    times: Vec<Time>,
    prices: Vec<Price>,
    time_step: Time,
    space_step: Price,
    upper_bound: Price,
}

impl Grid {
    /// Build the grid, failing fast on any invalid step or domain.
    pub fn new(params: OptionParameters, spec: &GridSpec) -> Result<Self> {
        let GridSpec {
            time_step,
            space_step,
            upper_multiple,
        } = *spec;
        ensure!(
            time_step.is_finite() && time_step > 0.0,
            "time step must be positive and finite, got {time_step}"
        );
        ensure!(
            space_step.is_finite() && space_step > 0.0,
            "space step must be positive and finite, got {space_step}"
        );
        ensure!(
            upper_multiple.is_finite() && upper_multiple > 0.0,
            "upper price multiple must be positive and finite, got {upper_multiple}"
        );

        let maturity = params.maturity();
        let upper_bound = upper_multiple * params.strike();

        let time_ratio = maturity / time_step;
        ensure!(
            is_whole(time_ratio, DIVISIBILITY_TOLERANCE),
            "time step {time_step} does not evenly divide maturity {maturity}"
        );
        ensure!(
            time_ratio.round() >= 1.0,
            "time step {time_step} exceeds maturity {maturity}"
        );

        let space_ratio = upper_bound / space_step;
        ensure!(
            is_whole(space_ratio, DIVISIBILITY_TOLERANCE),
            "space step {space_step} does not evenly divide upper bound {upper_bound}"
        );
        ensure!(
            space_ratio.round() >= 2.0,
            "grid needs at least 3 price points, space step {space_step} over [0, {upper_bound}] gives {}",
            space_ratio.round() + 1.0
        );
        // Checked in floating point so that absurd ratios never reach a cast.
        let nodes = (time_ratio.round() + 1.0) * (space_ratio.round() + 1.0);
        ensure!(
            nodes <= MAX_GRID_NODES as Real,
            "grid of {nodes} nodes exceeds the limit of {MAX_GRID_NODES}"
        );
        let nt = time_ratio.round() as Size;
        let ns = space_ratio.round() as Size;

        let effective_space_step = upper_bound / ns as Real;
        let times = (0..=nt)
            .map(|j| maturity * ((nt - j) as Real / nt as Real))
            .collect();
        // Multiples of the step keep round prices exact; the top node is pinned to S̄.
        let prices = (0..=ns)
            .map(|i| {
                if i == ns {
                    upper_bound
                } else {
                    i as Real * effective_space_step
                }
            })
            .collect();

        Ok(Self {
            params,
            times,
            prices,
            time_step: maturity / nt as Real,
            space_step: effective_space_step,
            upper_bound,
        })
    }

    /// Option parameters the grid was built for.
    pub fn params(&self) -> &OptionParameters {
        &self.params
    }

    /// Time axis, from maturity down to 0.
    pub fn times(&self) -> &[Time] {
        &self.times
    }

    /// Price axis, from 0 up to the upper bound.
    pub fn prices(&self) -> &[Price] {
        &self.prices
    }

    /// Number of time points `Nt`.
    pub fn time_len(&self) -> usize {
        self.times.len()
    }

    /// Number of price points `Ns`.
    pub fn space_len(&self) -> usize {
        self.prices.len()
    }

    /// Number of interior price points `Ns − 2`.
    pub fn interior_len(&self) -> usize {
        self.prices.len() - 2
    }

    /// Effective time step.
    pub fn time_step(&self) -> Time {
        self.time_step
    }

    /// Effective price step.
    pub fn space_step(&self) -> Price {
        self.space_step
    }

    /// Upper price bound `S̄`.
    pub fn upper_bound(&self) -> Price {
        self.upper_bound
    }

    /// Column holding the terminal payoff (`t = T`, `τ = 0`).
    pub fn terminal_index(&self) -> usize {
        0
    }

    /// Last column reached by the schemes (`t = 0`, `τ = T`).
    pub fn final_index(&self) -> usize {
        self.times.len() - 1
    }

    /// Time-to-maturity of column `j`.
    pub fn time_to_maturity(&self, j: usize) -> Time {
        let nt = self.final_index();
        self.params.maturity() * (j as Real / nt as Real)
    }

    /// Upper boundary value `S̄ − K·exp(−r·τ)`.
    pub fn upper_boundary_value(&self, time_to_maturity: Time) -> Real {
        upper_boundary_value(&self.params, self.upper_bound, time_to_maturity)
    }

    /// Index of the grid time closest to `t` (first one on ties).
    pub fn nearest_time_index(&self, t: Time) -> usize {
        nearest_index(&self.times, t)
    }

    /// Index of the grid price closest to `s` (first one on ties).
    pub fn nearest_price_index(&self, s: Price) -> usize {
        nearest_index(&self.prices, s)
    }

    /// `dt·σ²·S̄²/ds²`; forward Euler diverges once this exceeds one.
    pub fn explicit_stability_ratio(&self) -> Real {
        let sigma = self.params.volatility();
        self.time_step * sigma * sigma * self.upper_bound * self.upper_bound
            / (self.space_step * self.space_step)
    }

    /// Fresh value surface carrying the terminal payoff and both price
    /// boundaries; interior columns other than the terminal one are zero.
    pub fn initial_surface(&self) -> ValueSurface {
        let ns = self.space_len();
        let nt = self.time_len();
        let mut surface = ValueSurface::zeros(ns, nt);
        let terminal = self.terminal_index();
        for (i, &s) in self.prices.iter().enumerate() {
            surface[(i, terminal)] = self.params.payoff(s);
        }
        for j in 0..nt {
            surface[(0, j)] = 0.0;
            surface[(ns - 1, j)] = self.upper_boundary_value(self.time_to_maturity(j));
        }
        surface
    }
}

/// Call value on the truncated upper price boundary, `S̄ − K·exp(−r·τ)`.
pub(crate) fn upper_boundary_value(
    params: &OptionParameters,
    upper_bound: Price,
    time_to_maturity: Time,
) -> Real {
    upper_bound - params.discounted_strike(time_to_maturity)
}

fn nearest_index(axis: &[Real], target: Real) -> usize {
    axis.iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| (*a - target).abs().total_cmp(&(*b - target).abs()))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn params() -> OptionParameters {
        OptionParameters::new(50.0, 0.5, 0.2, 0.01).unwrap()
    }

    #[test]
    fn reference_grid_dimensions() {
        let grid = Grid::new(params(), &GridSpec::new(0.0005, 1.0)).unwrap();
        assert_eq!(grid.time_len(), 1001);
        assert_eq!(grid.space_len(), 201);
        assert_eq!(grid.interior_len(), 199);
        assert_eq!(grid.times()[0], 0.5);
        assert_eq!(grid.times()[1000], 0.0);
        assert_eq!(grid.prices()[0], 0.0);
        assert_eq!(grid.prices()[200], 200.0);
        assert_eq!(grid.upper_bound(), 200.0);
    }

    #[test]
    fn time_to_maturity_runs_opposite_to_time_axis() {
        let grid = Grid::new(params(), &GridSpec::new(0.1, 10.0)).unwrap();
        assert_eq!(grid.time_to_maturity(grid.terminal_index()), 0.0);
        assert_eq!(grid.time_to_maturity(grid.final_index()), 0.5);
        for j in 0..grid.time_len() {
            assert_abs_diff_eq!(
                grid.times()[j] + grid.time_to_maturity(j),
                0.5,
                epsilon = 1e-15
            );
        }
    }

    #[test]
    fn rejects_uneven_steps() {
        let err = Grid::new(params(), &GridSpec::new(0.3, 1.0)).unwrap_err();
        assert!(err.is_config());
        let err = Grid::new(params(), &GridSpec::new(0.1, 3.0)).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn rejects_non_positive_steps() {
        assert!(Grid::new(params(), &GridSpec::new(0.0, 1.0)).is_err());
        assert!(Grid::new(params(), &GridSpec::new(0.1, -1.0)).is_err());
        assert!(Grid::new(params(), &GridSpec::new(f64::NAN, 1.0)).is_err());
        assert!(Grid::new(params(), &GridSpec::new(0.1, 1.0).with_upper_multiple(0.0)).is_err());
    }

    #[test]
    fn rejects_grid_without_interior() {
        // S̄ = 200 with ds = 200 gives only two price points.
        let err = Grid::new(params(), &GridSpec::new(0.1, 200.0)).unwrap_err();
        assert!(err.is_config());
        // ds = 100 leaves a single interior point.
        let grid = Grid::new(params(), &GridSpec::new(0.1, 100.0)).unwrap();
        assert_eq!(grid.interior_len(), 1);
    }

    #[test]
    fn initial_surface_boundaries() {
        let grid = Grid::new(params(), &GridSpec::new(0.05, 5.0)).unwrap();
        let u = grid.initial_surface();
        for (i, &s) in grid.prices().iter().enumerate() {
            assert_eq!(u[(i, 0)], (s - 50.0).max(0.0));
        }
        for j in 0..grid.time_len() {
            let tau = grid.time_to_maturity(j);
            assert_eq!(u[(0, j)], 0.0);
            assert_eq!(u[(grid.space_len() - 1, j)], 200.0 - 50.0 * (-0.01 * tau).exp());
        }
    }

    #[test]
    fn nearest_indices() {
        let grid = Grid::new(params(), &GridSpec::new(0.0005, 1.0)).unwrap();
        assert_eq!(grid.nearest_time_index(0.4), 200);
        assert_eq!(grid.nearest_price_index(100.0), 100);
        assert_eq!(grid.nearest_price_index(100.4), 100);
        assert_eq!(grid.nearest_price_index(1e6), 200);
        assert_eq!(grid.nearest_time_index(-1.0), 1000);
    }

    #[test]
    fn round_prices_stay_exact() {
        let grid = Grid::new(params(), &GridSpec::new(0.0005, 1.0)).unwrap();
        for (i, &s) in grid.prices().iter().enumerate() {
            assert_eq!(s, i as Real);
        }
        let grid = Grid::new(params(), &GridSpec::new(0.05, 10.0)).unwrap();
        assert_eq!(grid.prices()[11], 110.0);
        assert_eq!(grid.prices()[20], 200.0);
        // ds = 0.3 does not divide 200; 0.25 does, with an exact top node.
        let grid = Grid::new(params(), &GridSpec::new(0.05, 0.25)).unwrap();
        assert_eq!(grid.prices()[440], 110.0);
        assert_eq!(*grid.prices().last().unwrap(), 200.0);
    }

    #[test]
    fn oversized_grids_are_config_errors() {
        // Evenly dividing but far too fine: must fail before allocating.
        let err = Grid::new(params(), &GridSpec::new(0.5e-15, 1.0)).unwrap_err();
        assert!(err.is_config());
        let err = Grid::new(params(), &GridSpec::new(0.1, 1e-12)).unwrap_err();
        assert!(err.is_config());
        let err = Grid::new(params(), &GridSpec::new(1e-5, 0.01)).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn stability_ratio_of_reference_grid() {
        let grid = Grid::new(params(), &GridSpec::new(0.0005, 1.0)).unwrap();
        assert_abs_diff_eq!(grid.explicit_stability_ratio(), 0.8, epsilon = 1e-12);
    }
}

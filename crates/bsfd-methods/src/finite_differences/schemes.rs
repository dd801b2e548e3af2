//! Time-stepping schemes for the semi-discrete system `dU/dτ = M·U + c(τ)`.
//!
//! Every scheme is a [`TimeStepper`]: a small state machine that receives
//! the current interior slice and returns the next one. Steppers own the
//! history they need (the midpoint rule keeps the slice two steps back) and
//! any factorisation of a time-invariant left-hand matrix.

use super::operator::{axpy, BlackScholesOperator};
use bsfd_core::{Real, Result, Time};
use bsfd_math::{FactorizedSystem, LinearSolver, TridiagonalOperator};
use std::fmt;

// ─── Scheme selection ────────────────────────────────────────────────────────

/// Finite difference time-stepping scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SchemeKind {
    /// Explicit: `U⁺ = U + dt·(M·U + c(τ))`; conditionally stable.
    ForwardEuler,
    /// Fully implicit: `(I − dt·M)·U⁺ = U + dt·c(τ⁺)`; unconditionally stable.
    BackwardEuler,
    /// Crank-Nicolson average of explicit and implicit, second-order in time.
    Trapezoidal,
    /// Leapfrog `U⁺ = U⁻ + 2dt·(M·U + c(τ))`, bootstrapped by one trapezoidal step.
    Midpoint,
}

impl SchemeKind {
    /// All schemes, in reporting order.
    pub const ALL: [SchemeKind; 4] = [
        SchemeKind::ForwardEuler,
        SchemeKind::BackwardEuler,
        SchemeKind::Trapezoidal,
        SchemeKind::Midpoint,
    ];

    /// Column label in the value table.
    pub fn label(self) -> &'static str {
        match self {
            SchemeKind::ForwardEuler => "Forward_Euler",
            SchemeKind::BackwardEuler => "Backward_Euler",
            SchemeKind::Trapezoidal => "Trapezoidal",
            SchemeKind::Midpoint => "Midpoint",
        }
    }

    /// Column label in the error table.
    pub fn error_label(self) -> &'static str {
        match self {
            SchemeKind::ForwardEuler => "FE_err",
            SchemeKind::BackwardEuler => "BW_err",
            SchemeKind::Trapezoidal => "Trap_err",
            SchemeKind::Midpoint => "Mid_err",
        }
    }
}

impl fmt::Display for SchemeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ─── Stepper trait ───────────────────────────────────────────────────────────

/// One scheme's transition from the slice at `τ` to the slice at `τ + dt`.
pub trait TimeStepper: Send {
    /// Which scheme this is.
    fn kind(&self) -> SchemeKind;

    /// Advance the interior slice `current`, valid at `tau`, to `tau_next`.
    fn step(&mut self, current: &[Real], tau: Time, tau_next: Time) -> Result<Vec<Real>>;
}

/// Build the stepper for `kind`, factorising any left-hand matrix up front.
pub fn make_stepper<'a>(
    kind: SchemeKind,
    operator: &'a BlackScholesOperator,
    dt: Time,
    solver: &dyn LinearSolver,
) -> Result<Box<dyn TimeStepper + 'a>> {
    Ok(match kind {
        SchemeKind::ForwardEuler => Box::new(ForwardEuler::new(operator, dt)),
        SchemeKind::BackwardEuler => Box::new(BackwardEuler::new(operator, dt, solver)?),
        SchemeKind::Trapezoidal => Box::new(Trapezoidal::new(operator, dt, solver)?),
        SchemeKind::Midpoint => Box::new(Midpoint::new(operator, dt, solver)?),
    })
}

// ─── Forward Euler ───────────────────────────────────────────────────────────

/// Explicit Euler. No stabilisation: an unstable `dt/ds²` ratio diverges.
#[derive(Debug)]
pub struct ForwardEuler<'a> {
    operator: &'a BlackScholesOperator,
    dt: Time,
}

impl<'a> ForwardEuler<'a> {
    /// Stepper with time step `dt`.
    pub fn new(operator: &'a BlackScholesOperator, dt: Time) -> Self {
        Self { operator, dt }
    }
}

impl TimeStepper for ForwardEuler<'_> {
    fn kind(&self) -> SchemeKind {
        SchemeKind::ForwardEuler
    }

    fn step(&mut self, current: &[Real], tau: Time, _tau_next: Time) -> Result<Vec<Real>> {
        let rate = self.operator.generator(current, tau)?;
        axpy(current, self.dt, &rate)
    }
}

// ─── Backward Euler ──────────────────────────────────────────────────────────

/// Implicit Euler with `I − dt·M` factorised once.
#[derive(Debug)]
pub struct BackwardEuler<'a> {
    operator: &'a BlackScholesOperator,
    dt: Time,
    lhs: Box<dyn FactorizedSystem>,
}

impl<'a> BackwardEuler<'a> {
    /// Stepper with time step `dt`; fails if `I − dt·M` is singular.
    pub fn new(operator: &'a BlackScholesOperator, dt: Time, solver: &dyn LinearSolver) -> Result<Self> {
        let lhs = solver.factorize(&operator.matrix().identity_plus_scaled(-dt))?;
        Ok(Self { operator, dt, lhs })
    }
}

impl TimeStepper for BackwardEuler<'_> {
    fn kind(&self) -> SchemeKind {
        SchemeKind::BackwardEuler
    }

    fn step(&mut self, current: &[Real], _tau: Time, tau_next: Time) -> Result<Vec<Real>> {
        let c_next = self.operator.boundary_vector(tau_next);
        let rhs = axpy(current, self.dt, &c_next)?;
        self.lhs.solve(&rhs)
    }
}

// ─── Trapezoidal ─────────────────────────────────────────────────────────────

/// Crank-Nicolson with `I − dt/2·M` factorised once and `I + dt/2·M` kept
/// for the explicit half.
#[derive(Debug)]
pub struct Trapezoidal<'a> {
    operator: &'a BlackScholesOperator,
    dt: Time,
    explicit: TridiagonalOperator,
    lhs: Box<dyn FactorizedSystem>,
}

impl<'a> Trapezoidal<'a> {
    /// Stepper with time step `dt`; fails if `I − dt/2·M` is singular.
    pub fn new(operator: &'a BlackScholesOperator, dt: Time, solver: &dyn LinearSolver) -> Result<Self> {
        let half = 0.5 * dt;
        let lhs = solver.factorize(&operator.matrix().identity_plus_scaled(-half))?;
        Ok(Self {
            operator,
            dt,
            explicit: operator.matrix().identity_plus_scaled(half),
            lhs,
        })
    }
}

impl TimeStepper for Trapezoidal<'_> {
    fn kind(&self) -> SchemeKind {
        SchemeKind::Trapezoidal
    }

    fn step(&mut self, current: &[Real], tau: Time, tau_next: Time) -> Result<Vec<Real>> {
        let mut rhs = self.explicit.apply(current)?;
        let c_now = self.operator.boundary_vector(tau);
        let c_next = self.operator.boundary_vector(tau_next);
        let half = 0.5 * self.dt;
        for ((r, a), b) in rhs.iter_mut().zip(&c_now).zip(&c_next) {
            *r += half * (a + b);
        }
        self.lhs.solve(&rhs)
    }
}

// ─── Midpoint ────────────────────────────────────────────────────────────────

#[derive(Debug)]
enum MidpointState {
    /// No slice two steps back exists yet.
    Bootstrap,
    /// Holds the slice one step before `current`.
    Leapfrog { previous: Vec<Real> },
}

/// Explicit midpoint (leapfrog) rule with a trapezoidal first step.
#[derive(Debug)]
pub struct Midpoint<'a> {
    operator: &'a BlackScholesOperator,
    dt: Time,
    bootstrap: Trapezoidal<'a>,
    state: MidpointState,
}

impl<'a> Midpoint<'a> {
    /// Stepper with time step `dt`; the bootstrap step needs `I − dt/2·M`
    /// to be invertible.
    pub fn new(operator: &'a BlackScholesOperator, dt: Time, solver: &dyn LinearSolver) -> Result<Self> {
        Ok(Self {
            operator,
            dt,
            bootstrap: Trapezoidal::new(operator, dt, solver)?,
            state: MidpointState::Bootstrap,
        })
    }
}

impl TimeStepper for Midpoint<'_> {
    fn kind(&self) -> SchemeKind {
        SchemeKind::Midpoint
    }

    fn step(&mut self, current: &[Real], tau: Time, tau_next: Time) -> Result<Vec<Real>> {
        let next = match &self.state {
            MidpointState::Bootstrap => self.bootstrap.step(current, tau, tau_next)?,
            MidpointState::Leapfrog { previous } => {
                let rate = self.operator.generator(current, tau)?;
                axpy(previous, 2.0 * self.dt, &rate)?
            }
        };
        self.state = MidpointState::Leapfrog {
            previous: current.to_vec(),
        };
        Ok(next)
    }
}

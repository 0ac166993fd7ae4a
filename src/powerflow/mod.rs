//! Power-flow analysis.
//!
//! Two formulations are available:
//!
//! - [`dc_power_flow`]: linearized flow. Lossless, flat voltage, small angle
//!   differences; solves `B·θ = P` on the reduced (slack-less) system.
//! - [`ac_power_flow`]: full AC flow by Newton-Raphson on the polar power
//!   mismatch equations.
//!
//! Both take a [`Network`] by reference and return an annotated copy inside a
//! [`PowerFlowSolution`]: bus angles (degrees) and voltages, slack/PV
//! injections, and branch flows. The caller's network is never modified.
//!
//! ## Iteration life cycle
//!
//! ```text
//! Initialized ──> Iterating ──┬──> Converged
//!                             └──> IterationLimitReached
//! ```
//!
//! Both terminal states return the last estimate; hitting the iteration limit
//! is reported, not fatal.

mod ac;
mod dc;

pub use ac::{ac_power_flow, power_injections, Jacobian};
pub use dc::dc_power_flow;

use std::fmt;

use crate::linear::{LinearMethod, LinearSolver, Pivoting};
use crate::network::Network;
use crate::state::SolverState;

/// Default mismatch tolerance for AC power flow (per-unit).
pub const DEFAULT_TOLERANCE: f64 = 1e-3;

/// Default Newton-Raphson iteration cap.
pub const DEFAULT_MAX_ITERATIONS: usize = 50;

/// Stage of a power-flow run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerFlowStatus {
    /// Matrices assembled, no iteration performed yet
    Initialized,
    /// Iterating toward a solution
    Iterating,
    /// Tolerance met
    Converged,
    /// Iteration cap reached before the tolerance was met
    IterationLimitReached,
}

impl PowerFlowStatus {
    /// Terminal status for a finished run.
    pub fn from_converged(converged: bool) -> Self {
        if converged {
            PowerFlowStatus::Converged
        } else {
            PowerFlowStatus::IterationLimitReached
        }
    }
}

impl fmt::Display for PowerFlowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PowerFlowStatus::Initialized => "initialized",
            PowerFlowStatus::Iterating => "iterating",
            PowerFlowStatus::Converged => "converged",
            PowerFlowStatus::IterationLimitReached => "iteration limit reached",
        };
        f.pad(s)
    }
}

/// Configuration for power-flow runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerFlowConfig {
    /// AC mismatch and correction tolerance
    pub tolerance: f64,
    /// AC Newton-Raphson iteration cap
    pub max_iterations: usize,
    /// Solver settings for the DC angle system
    pub dc_solver: LinearSolver,
    /// Method for the DC angle system
    pub dc_method: LinearMethod,
    /// Row exchanges when factoring the AC Jacobian
    pub jacobian_pivoting: Pivoting,
}

impl Default for PowerFlowConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            dc_solver: LinearSolver::default(),
            dc_method: LinearMethod::GaussSeidel,
            jacobian_pivoting: Pivoting::Partial,
        }
    }
}

impl PowerFlowConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the AC convergence tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the AC iteration cap.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the linear solver and method used for DC flow.
    pub fn with_dc_solver(mut self, solver: LinearSolver, method: LinearMethod) -> Self {
        self.dc_solver = solver;
        self.dc_method = method;
        self
    }
}

/// Annotated network plus convergence bookkeeping.
///
/// `state.residual` is the largest mismatch at the returned voltages. An AC
/// run that stopped on a small correction reports `converged` even when this
/// mismatch is still above the tolerance.
#[derive(Debug, Clone, PartialEq)]
pub struct PowerFlowSolution {
    /// Copy of the input network with results filled in
    pub network: Network,
    pub state: SolverState,
    pub status: PowerFlowStatus,
}

impl PowerFlowSolution {
    pub fn converged(&self) -> bool {
        self.state.converged
    }
}

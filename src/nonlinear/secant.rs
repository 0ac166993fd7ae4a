//! Secant method.

use super::{RootFinder, RootMethod, RootSolution};
use crate::error::{Result, SolverError};
use crate::state::SolverState;

/// One secant step through `(x0, f0)` and `(x1, f1)`.
pub(super) fn secant_step(x0: f64, f0: f64, x1: f64, f1: f64) -> Result<f64> {
    if f1 == f0 {
        return Err(SolverError::DivisionByZero { x0, x1 });
    }
    Ok(x1 - f1 * (x1 - x0) / (f1 - f0))
}

impl RootFinder {
    /// Secant iteration starting from `x0`, `x1`.
    ///
    /// Returns an endpoint immediately if `f` already vanishes there.
    /// Converges when `|f(x)| < tol` at the newest iterate.
    pub fn secant<F>(&self, f: F, x0: f64, x1: f64) -> Result<RootSolution>
    where
        F: Fn(f64) -> f64,
    {
        let (mut x0, mut x1) = (x0, x1);
        let mut f0 = f(x0);
        if f0 == 0.0 {
            return Ok(RootSolution::finish(x0, SolverState::new(0, 0.0, true), RootMethod::Secant));
        }
        let mut f1 = f(x1);
        if f1 == 0.0 {
            return Ok(RootSolution::finish(x1, SolverState::new(0, 0.0, true), RootMethod::Secant));
        }

        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.max_iterations {
            let x2 = secant_step(x0, f0, x1, f1)?;
            x0 = x1;
            f0 = f1;
            x1 = x2;
            f1 = f(x2);
            iterations += 1;

            tracing::debug!(iteration = iterations, x = x1, fx = f1, "secant step");

            if f1.abs() < self.tolerance {
                converged = true;
                break;
            }
        }

        Ok(RootSolution::finish(
            x1,
            SolverState::new(iterations, f1.abs(), converged),
            RootMethod::Secant,
        ))
    }
}

//! Newton-Raphson with a finite-difference derivative.

use super::secant::secant_step;
use super::{RootFinder, RootMethod, RootSolution};
use crate::algebra::central_difference;
use crate::error::{Result, SolverError};
use crate::state::SolverState;

/// Derivative usable as a Newton divisor.
fn derivative_at<F>(f: &F, x: f64) -> Result<f64>
where
    F: Fn(f64) -> f64,
{
    let d = central_difference(f, x);
    if d == 0.0 || !d.is_finite() {
        tracing::warn!(x, "derivative vanished");
        return Err(SolverError::ZeroDerivative { x });
    }
    Ok(d)
}

impl RootFinder {
    /// Newton-Raphson seeded by one secant step from `(x0, x1)`.
    ///
    /// `f'` is approximated by centered differences. Converges when
    /// `|f(x)| < tol` at the newest iterate, which is what gets returned.
    pub fn newton_raphson<F>(&self, f: F, x0: f64, x1: f64) -> Result<RootSolution>
    where
        F: Fn(f64) -> f64,
    {
        let mut x = secant_step(x0, f(x0), x1, f(x1))?;
        let mut d = derivative_at(&f, x)?;
        let mut fx = f(x);
        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.max_iterations {
            x -= fx / d;
            fx = f(x);
            iterations += 1;

            tracing::debug!(iteration = iterations, x, fx, "newton step");

            if fx.abs() < self.tolerance {
                converged = true;
                break;
            }

            d = derivative_at(&f, x)?;
        }

        Ok(RootSolution::finish(
            x,
            SolverState::new(iterations, fx.abs(), converged),
            RootMethod::NewtonRaphson,
        ))
    }
}

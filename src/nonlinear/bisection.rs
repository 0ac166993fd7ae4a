//! Interval halving.

use super::{RootFinder, RootMethod, RootSolution};
use crate::error::{Result, SolverError};
use crate::state::SolverState;

impl RootFinder {
    /// Bisection on `[x0, x1]`.
    ///
    /// Requires `f(x0)·f(x1) ≤ 0`. The bracket is halved toward the side that
    /// keeps the sign change until `|f(x1) − f(x0)| < tol`. Since the ends
    /// always have opposite signs this bounds `|f|` at both ends of the
    /// bracket. Returns the last midpoint.
    pub fn bisection<F>(&self, f: F, x0: f64, x1: f64) -> Result<RootSolution>
    where
        F: Fn(f64) -> f64,
    {
        let (mut lower, mut upper) = (x0, x1);
        let mut f_lower = f(lower);
        let mut f_upper = f(upper);

        if f_lower * f_upper > 0.0 {
            tracing::warn!(x0, x1, "no sign change in bisection interval");
            return Err(SolverError::NoSignChange {
                lower: x0,
                upper: x1,
            });
        }

        if f_lower == 0.0 {
            return Ok(RootSolution::finish(lower, SolverState::new(0, 0.0, true), RootMethod::Bisection));
        }
        if f_upper == 0.0 {
            return Ok(RootSolution::finish(upper, SolverState::new(0, 0.0, true), RootMethod::Bisection));
        }

        let mut mid = (lower + upper) / 2.0;
        let mut residual = (f_upper - f_lower).abs();
        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.max_iterations {
            mid = (lower + upper) / 2.0;
            let f_mid = f(mid);
            iterations += 1;

            if f_mid == 0.0 {
                residual = 0.0;
                converged = true;
                break;
            }

            if f_lower * f_mid < 0.0 {
                upper = mid;
                f_upper = f_mid;
            } else {
                lower = mid;
                f_lower = f_mid;
            }

            residual = (f_upper - f_lower).abs();
            tracing::debug!(iteration = iterations, lower, upper, residual, "bisection step");

            if residual < self.tolerance {
                converged = true;
                break;
            }
        }

        Ok(RootSolution::finish(
            mid,
            SolverState::new(iterations, residual, converged),
            RootMethod::Bisection,
        ))
    }
}

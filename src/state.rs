//! Per-call iteration bookkeeping shared by every solver.

use crate::error::{Result, SolverError};

/// Outcome of a single solver invocation.
///
/// Produced fresh by every call and never retained between calls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverState {
    /// Iterations (sweeps, steps or Jacobian solves) consumed
    pub iterations: usize,
    /// Residual or mismatch magnitude at the returned estimate, NaN after
    /// numerical breakdown
    pub residual: f64,
    /// Whether the tolerance was met
    pub converged: bool,
}

impl SolverState {
    pub fn new(iterations: usize, residual: f64, converged: bool) -> Self {
        Self {
            iterations,
            residual,
            converged,
        }
    }

    /// Turn a non-converged state into [`SolverError::NonConvergence`].
    pub fn check(&self) -> Result<()> {
        if self.converged {
            Ok(())
        } else {
            Err(SolverError::non_convergence(self.iterations, self.residual))
        }
    }

    /// Emit the convergence diagnostic for a finished solve.
    pub(crate) fn report(&self, method: &str) {
        if self.converged {
            tracing::info!(
                method,
                iterations = self.iterations,
                residual = %format_args!("{:.2e}", self.residual),
                "solution converged"
            );
        } else {
            tracing::warn!(
                method,
                iterations = self.iterations,
                residual = %format_args!("{:.2e}", self.residual),
                "solution did not converge"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check() {
        assert!(SolverState::new(3, 1e-9, true).check().is_ok());
        let err = SolverState::new(50, 0.2, false).check().unwrap_err();
        assert!(matches!(
            err,
            SolverError::NonConvergence { iterations: 50, .. }
        ));
    }
}

//! Scalar root finding.
//!
//! All methods take a function `f`, two points `x0`, `x1`, and use the
//! tolerance and iteration cap of a [`RootFinder`]:
//!
//! - [`RootFinder::bisection`] needs `[x0, x1]` to bracket a sign change.
//! - [`RootFinder::secant`] treats `x0`, `x1` as the first two iterates.
//! - [`RootFinder::newton_raphson`] seeds itself with one secant step from
//!   `(x0, x1)` and differentiates `f` numerically.
//!
//! Reaching the iteration cap is reported through [`SolverState`], not as an
//! error. Typed errors are reserved for inputs the method cannot work with.

mod bisection;
mod newton;
mod secant;

use std::fmt;

use crate::error::Result;
use crate::state::SolverState;

/// Default tolerance on `|f(x)|`.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// Default iteration cap.
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Available root-finding methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum RootMethod {
    Bisection,
    Secant,
    NewtonRaphson,
}

impl RootMethod {
    pub const ALL: [RootMethod; 3] = [
        RootMethod::Bisection,
        RootMethod::Secant,
        RootMethod::NewtonRaphson,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            RootMethod::Bisection => "bisection",
            RootMethod::Secant => "secant",
            RootMethod::NewtonRaphson => "newton-raphson",
        }
    }
}

impl fmt::Display for RootMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Root estimate plus convergence bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootSolution {
    pub root: f64,
    pub state: SolverState,
}

impl RootSolution {
    pub fn converged(&self) -> bool {
        self.state.converged
    }

    /// Fail with [`SolverError::NonConvergence`](crate::SolverError::NonConvergence)
    /// unless the tolerance was met.
    pub fn require_converged(self) -> Result<Self> {
        self.state.check()?;
        Ok(self)
    }

    /// Report and wrap a finished search.
    fn finish(root: f64, state: SolverState, method: RootMethod) -> Self {
        state.report(method.name());
        Self { root, state }
    }
}

/// Configuration for the scalar root finders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootFinder {
    /// Convergence tolerance
    pub tolerance: f64,
    /// Maximum number of iterations
    pub max_iterations: usize,
}

impl Default for RootFinder {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl RootFinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a finder with explicit tolerance and iteration cap.
    pub fn with_config(tolerance: f64, max_iterations: usize) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Run the chosen method.
    pub fn find<F>(&self, f: F, x0: f64, x1: f64, method: RootMethod) -> Result<RootSolution>
    where
        F: Fn(f64) -> f64,
    {
        match method {
            RootMethod::Bisection => self.bisection(f, x0, x1),
            RootMethod::Secant => self.secant(f, x0, x1),
            RootMethod::NewtonRaphson => self.newton_raphson(f, x0, x1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn trig(x: f64) -> f64 {
        5.0 * x.cos().powi(2) - 3.0 * (3.0 * x).sin()
    }

    #[test]
    fn test_all_methods_agree_on_trig_function() {
        let finder = RootFinder::new();
        let roots: Vec<f64> = RootMethod::ALL
            .iter()
            .map(|&m| {
                let sol = finder.find(trig, 0.0, 5.0, m).unwrap();
                assert!(sol.converged(), "{} did not converge", m);
                sol.root
            })
            .collect();

        assert_abs_diff_eq!(roots[0], roots[2], epsilon = 1e-6);
        assert_abs_diff_eq!(roots[1], roots[2], epsilon = 1e-6);
        assert!(trig(roots[2]).abs() < 1e-9);
        assert!(roots[2] > 4.2 && roots[2] < 4.3);
    }

    #[test]
    fn test_repeatable() {
        let finder = RootFinder::new();
        for method in RootMethod::ALL {
            let a = finder.find(trig, 0.0, 5.0, method).unwrap();
            let b = finder.find(trig, 0.0, 5.0, method).unwrap();
            assert_eq!(a.root.to_bits(), b.root.to_bits());
            assert_eq!(a.state, b.state);
        }
    }

    #[test]
    fn test_require_converged() {
        let sol = RootFinder::new()
            .with_max_iterations(2)
            .bisection(trig, 0.0, 5.0)
            .unwrap();
        assert!(!sol.converged());
        assert!(sol.require_converged().is_err());
    }
}

//! Solvers for square linear systems `A x = b`.
//!
//! Two direct methods and two stationary iterative methods are provided:
//!
//! | Method | Kind | Notes |
//! |--------|------|-------|
//! | [`LinearMethod::Gauss`] | direct | forward elimination + back substitution |
//! | [`LinearMethod::Lu`] | direct | Doolittle factorization, `L` unit lower-triangular |
//! | [`LinearMethod::Jacobi`] | iterative | every component from the previous full iterate |
//! | [`LinearMethod::GaussSeidel`] | iterative | freshly updated components used within the sweep |
//!
//! The direct methods do not pivot unless [`Pivoting::Partial`] is selected;
//! a zero pivot is reported as [`SolverError::SingularPivot`] rather than
//! divided through. After a direct solve the residual `‖A·x − b‖∞` is checked
//! against the tolerance and reported through `tracing`.
//!
//! Solvers never touch the caller's matrix or vector: each call works on its
//! own copy and returns a fresh [`LinearSolution`].
//!
//! [`SolverError::SingularPivot`]: crate::SolverError::SingularPivot

mod direct;
mod iterative;

pub use direct::LuFactors;

use std::fmt;

use crate::algebra::{Matrix, Vector};
use crate::error::{Result, SolverError};
use crate::state::SolverState;

/// Default convergence tolerance for linear solvers.
pub const DEFAULT_TOLERANCE: f64 = 1e-5;

/// Default sweep cap for iterative solvers.
pub const DEFAULT_MAX_ITERATIONS: usize = 50;

/// Pivots and diagonal entries whose magnitude is at or below this fraction of
/// the largest matrix entry are treated as zero.
pub const PIVOT_EPSILON: f64 = 1e-15;

/// Absolute singularity threshold for `a`, scaled by its largest entry.
///
/// NaN when `a` holds a NaN; callers treat that as singular.
fn pivot_floor(a: &Matrix) -> f64 {
    PIVOT_EPSILON * a.max_abs()
}

/// A square, fully determined linear system.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearSystem {
    a: Matrix,
    b: Vector,
}

impl LinearSystem {
    /// Pair a coefficient matrix with a right-hand side.
    ///
    /// `a` must be square and `b` must have one entry per row.
    pub fn new(a: Matrix, b: Vector) -> Result<Self> {
        if !a.is_square() {
            return Err(SolverError::NotSquare {
                rows: a.rows(),
                cols: a.cols(),
            });
        }
        if b.len() != a.rows() {
            return Err(SolverError::dimension_mismatch(
                "linear system right-hand side",
                a.rows(),
                b.len(),
            ));
        }
        Ok(Self { a, b })
    }

    /// Split an augmented `[A | b]` matrix into a system.
    pub fn from_augmented(augmented: &Matrix) -> Result<Self> {
        let n = augmented.rows();
        if augmented.cols() != n + 1 {
            return Err(SolverError::dimension_mismatch(
                "augmented system columns",
                n + 1,
                augmented.cols(),
            ));
        }
        let mut a = Matrix::zeros(n, n);
        let mut b = Vector::zeros(n);
        for i in 0..n {
            let row = augmented.row(i);
            for j in 0..n {
                a[(i, j)] = row[j];
            }
            b[i] = row[n];
        }
        Ok(Self { a, b })
    }

    pub fn a(&self) -> &Matrix {
        &self.a
    }

    pub fn b(&self) -> &Vector {
        &self.b
    }

    /// Number of unknowns.
    pub fn size(&self) -> usize {
        self.b.len()
    }

    /// Infinity norm of `A·x − b`. NaN if any component is NaN.
    pub fn residual(&self, x: &Vector) -> Result<f64> {
        Ok(self.a.mul_vec(x)?.sub(&self.b)?.norm_inf())
    }
}

/// Available linear methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum LinearMethod {
    Gauss,
    Lu,
    Jacobi,
    GaussSeidel,
}

impl LinearMethod {
    /// Every method, in the order they are usually compared.
    pub const ALL: [LinearMethod; 4] = [
        LinearMethod::Gauss,
        LinearMethod::Lu,
        LinearMethod::Jacobi,
        LinearMethod::GaussSeidel,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            LinearMethod::Gauss => "gauss",
            LinearMethod::Lu => "lu",
            LinearMethod::Jacobi => "jacobi",
            LinearMethod::GaussSeidel => "gauss-seidel",
        }
    }
}

impl fmt::Display for LinearMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Row-exchange strategy for the direct methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pivoting {
    /// Use diagonal pivots as they come; a zero pivot is an error.
    #[default]
    None,
    /// Swap in the row with the largest magnitude in the pivot column.
    Partial,
}

/// Solution vector plus convergence bookkeeping.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearSolution {
    pub x: Vector,
    pub state: SolverState,
}

impl LinearSolution {
    pub fn converged(&self) -> bool {
        self.state.converged
    }

    /// Fail with [`SolverError::NonConvergence`] unless the tolerance was met.
    pub fn require_converged(self) -> Result<Self> {
        self.state.check()?;
        Ok(self)
    }
}

/// Configuration for the linear solvers.
///
/// Holds only settings; every solve is independent of any other.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearSolver {
    /// Residual bound (direct) or per-component change bound (iterative)
    pub tolerance: f64,
    /// Sweep cap for the iterative methods
    pub max_iterations: usize,
    /// Row-exchange strategy for Gauss and LU
    pub pivoting: Pivoting,
}

impl Default for LinearSolver {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            pivoting: Pivoting::None,
        }
    }
}

impl LinearSolver {
    /// Create a solver with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the convergence tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the sweep cap used by Jacobi and Gauss-Seidel.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the pivoting strategy used by Gauss and LU.
    pub fn with_pivoting(mut self, pivoting: Pivoting) -> Self {
        self.pivoting = pivoting;
        self
    }

    /// Solve with the chosen method.
    pub fn solve(&self, system: &LinearSystem, method: LinearMethod) -> Result<LinearSolution> {
        match method {
            LinearMethod::Gauss => self.gauss(system),
            LinearMethod::Lu => self.lu(system),
            LinearMethod::Jacobi => self.jacobi(system),
            LinearMethod::GaussSeidel => self.gauss_seidel(system),
        }
    }

    /// Compute the direct-solve residual and report it.
    fn finish_direct(&self, system: &LinearSystem, x: Vector, method: LinearMethod) -> Result<LinearSolution> {
        let residual = system.residual(&x)?;
        let state = SolverState::new(1, residual, residual <= self.tolerance);
        state.report(method.name());
        Ok(LinearSolution { x, state })
    }
}

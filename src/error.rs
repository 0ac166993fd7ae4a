//! Error types for the gridsolve toolkit.
//!
//! This module provides a unified error type [`SolverError`] that covers
//! malformed input (shape and singularity problems), root-finding failures,
//! network validation and case loading.
//!
//! Non-convergence is normally reported through a solution's
//! [`SolverState`](crate::SolverState) rather than as an error; the
//! [`SolverError::NonConvergence`] variant exists for callers that ask for a
//! hard failure via `require_converged()`.

use thiserror::Error;

/// Result type alias using [`SolverError`].
pub type Result<T> = std::result::Result<T, SolverError>;

/// Unified error type for all gridsolve operations.
#[derive(Error, Debug)]
pub enum SolverError {
    // ============ Shape Errors ============
    /// Operands of a matrix/vector operation have incompatible shapes
    #[error("Dimension mismatch in {operation}: expected {expected}, found {found}")]
    DimensionMismatch {
        operation: &'static str,
        expected: usize,
        found: usize,
    },

    /// Rows of unequal length passed to a matrix constructor
    #[error("Row {row} has {found} columns, expected {expected}")]
    RaggedMatrix {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A square matrix was required
    #[error("Matrix must be square, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    /// Attempted to normalize a vector of zero length
    #[error("Cannot normalize a zero vector")]
    ZeroVector,

    // ============ Linear Solver Errors ============
    /// Zero pivot encountered during elimination or decomposition
    #[error("Zero pivot at row {index} (value: {value:.2e}) - matrix is singular or needs pivoting")]
    SingularPivot { index: usize, value: f64 },

    /// Zero diagonal element in an iterative sweep
    #[error("Zero diagonal element at row {index} - iterative method cannot proceed")]
    SingularDiagonal { index: usize },

    // ============ Root Finding Errors ============
    /// Bisection bracket does not contain a sign change
    #[error("No sign change on [{lower}, {upper}] - interval does not bracket a root")]
    NoSignChange { lower: f64, upper: f64 },

    /// Derivative vanished during Newton-Raphson
    #[error("Derivative is zero at x = {x} - Newton-Raphson cannot proceed")]
    ZeroDerivative { x: f64 },

    /// Secant step with equal function values at both points
    #[error("Division by zero: f({x0}) == f({x1}) in secant step")]
    DivisionByZero { x0: f64, x1: f64 },

    /// Iteration cap exhausted without meeting tolerance
    #[error("Did not converge after {iterations} iterations (residual: {residual:.2e})")]
    NonConvergence { iterations: usize, residual: f64 },

    // ============ Network Errors ============
    /// Invalid bus/branch data
    #[error("Invalid network: {message}")]
    InvalidNetwork { message: String },

    // ============ I/O Errors ============
    /// Malformed linear system text
    #[error("Parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    /// Malformed network case
    #[error("Invalid case JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Error reading an input file
    #[error("Failed to read file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl SolverError {
    /// Create a dimension mismatch error
    pub fn dimension_mismatch(operation: &'static str, expected: usize, found: usize) -> Self {
        Self::DimensionMismatch {
            operation,
            expected,
            found,
        }
    }

    /// Create an invalid network error
    pub fn invalid_network(message: impl Into<String>) -> Self {
        Self::InvalidNetwork {
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::ParseError {
            line,
            message: message.into(),
        }
    }

    /// Create a non-convergence error
    pub fn non_convergence(iterations: usize, residual: f64) -> Self {
        Self::NonConvergence {
            iterations,
            residual,
        }
    }
}

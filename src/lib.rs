//! # Gridsolve Core
//!
//! Dense numerical solvers and power-flow analysis for small networks.
//!
//! This library provides:
//! - Dense matrix and vector primitives with shape-checked arithmetic
//! - Direct (Gauss, LU) and iterative (Jacobi, Gauss-Seidel) linear solvers
//! - Scalar root finders (bisection, secant, Newton-Raphson)
//! - DC and AC (Newton-Raphson) power flow over bus/branch networks
//!
//! ## Architecture
//!
//! - [`algebra`] - `Matrix`, `Vector`, angle conversion, numeric derivative
//! - [`linear`] - Linear systems and their solvers
//! - [`nonlinear`] - Root finding for `f(x) = 0`
//! - [`network`] - Bus/branch records, validation, network matrices
//! - [`powerflow`] - DC and AC power flow
//! - [`io`] - CSV linear systems and JSON network cases
//!
//! ## Usage
//!
//! ```
//! use gridsolve_core::{LinearMethod, LinearSolver, LinearSystem, Matrix, Vector};
//!
//! let a = Matrix::from_rows(vec![vec![4.0, 1.0], vec![1.0, 3.0]])?;
//! let system = LinearSystem::new(a, Vector::from(vec![1.0, 2.0]))?;
//! let solution = LinearSolver::new().solve(&system, LinearMethod::Lu)?;
//! assert!(solution.converged());
//! # Ok::<(), gridsolve_core::SolverError>(())
//! ```
//!
//! ## Convergence
//!
//! Every solver returns its result together with a [`SolverState`]
//! (iterations, residual, converged flag). Running out of iterations is not an
//! error: the last iterate is returned with `converged == false`. Shape
//! mismatches, zero pivots and invalid networks are errors.
//!
//! Diagnostics are emitted as `tracing` events; install a subscriber to see
//! them.

pub mod algebra;
pub mod error;
pub mod io;
pub mod linear;
pub mod network;
pub mod nonlinear;
pub mod powerflow;
pub mod state;

// Re-export main types for convenience
pub use algebra::{Matrix, Vector};
pub use error::{Result, SolverError};
pub use linear::{LinearMethod, LinearSolution, LinearSolver, LinearSystem, Pivoting};
pub use network::{Branch, Bus, BusType, Network};
pub use nonlinear::{RootFinder, RootMethod, RootSolution};
pub use powerflow::{ac_power_flow, dc_power_flow, PowerFlowConfig, PowerFlowSolution, PowerFlowStatus};
pub use state::SolverState;

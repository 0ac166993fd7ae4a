//! Stationary iterative solvers: Jacobi and Gauss-Seidel.
//!
//! Both start from the zero vector and stop when every component changed by
//! less than the tolerance in the last sweep, or when the sweep cap is hit.
//! Hitting the cap is not an error: the last iterate is returned with
//! `converged = false`. A sweep whose change is infinite or NaN ends the run
//! early, also unconverged.

use super::{pivot_floor, LinearMethod, LinearSolution, LinearSolver, LinearSystem};
use crate::algebra::{norm_inf, Matrix, Vector};
use crate::error::{Result, SolverError};
use crate::state::SolverState;

/// Every diagonal element must be usable as a divisor.
fn check_diagonal(a: &Matrix) -> Result<()> {
    let floor = pivot_floor(a);
    for i in 0..a.rows() {
        let d = a[(i, i)].abs();
        if d.is_nan() || floor.is_nan() || d <= floor {
            return Err(SolverError::SingularDiagonal { index: i });
        }
    }
    Ok(())
}

/// `Σ_{j≠i} A[i][j]·x[j]`
fn off_diagonal_sum(a: &Matrix, i: usize, x: &[f64]) -> f64 {
    a.row(i)
        .iter()
        .zip(x)
        .enumerate()
        .filter(|(j, _)| *j != i)
        .map(|(_, (aij, xj))| aij * xj)
        .sum()
}

impl LinearSolver {
    /// Jacobi iteration.
    ///
    /// Each sweep computes every component from the previous full iterate.
    pub fn jacobi(&self, system: &LinearSystem) -> Result<LinearSolution> {
        let a = system.a();
        let b = system.b();
        check_diagonal(a)?;

        let n = system.size();
        let mut x = Vector::zeros(n);
        let mut iterations = 0;
        let mut change = f64::INFINITY;
        let mut converged = false;

        while !converged && iterations < self.max_iterations {
            let next: Vector = (0..n)
                .map(|i| (b[i] - off_diagonal_sum(a, i, x.as_slice())) / a[(i, i)])
                .collect();

            change = norm_inf(next.sub(&x)?.as_slice());
            converged = change < self.tolerance;
            x = next;
            iterations += 1;

            tracing::debug!(sweep = iterations, change, "jacobi sweep");
            if !change.is_finite() {
                tracing::warn!(sweep = iterations, "jacobi diverged");
                break;
            }
        }

        let state = SolverState::new(iterations, change, converged);
        state.report(LinearMethod::Jacobi.name());
        Ok(LinearSolution { x, state })
    }

    /// Gauss-Seidel iteration.
    ///
    /// Components updated earlier in a sweep are used immediately by the
    /// components that follow them.
    pub fn gauss_seidel(&self, system: &LinearSystem) -> Result<LinearSolution> {
        let a = system.a();
        let b = system.b();
        check_diagonal(a)?;

        let n = system.size();
        let mut x = Vector::zeros(n);
        let mut iterations = 0;
        let mut change = f64::INFINITY;
        let mut converged = false;

        while !converged && iterations < self.max_iterations {
            converged = true;
            change = 0.0;

            for i in 0..n {
                let updated = (b[i] - off_diagonal_sum(a, i, x.as_slice())) / a[(i, i)];
                let delta = (updated - x[i]).abs();
                if delta.is_nan() || delta >= self.tolerance {
                    converged = false;
                }
                if delta > change || delta.is_nan() {
                    change = delta;
                }
                x[i] = updated;
            }

            iterations += 1;
            tracing::debug!(sweep = iterations, change, "gauss-seidel sweep");
            if !change.is_finite() {
                tracing::warn!(sweep = iterations, "gauss-seidel diverged");
                break;
            }
        }

        let state = SolverState::new(iterations, change, converged);
        state.report(LinearMethod::GaussSeidel.name());
        Ok(LinearSolution { x, state })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    fn dominant_system() -> LinearSystem {
        // Solution: x = [1, 2, -1]
        let a = Matrix::from_rows(vec![
            vec![10.0, -1.0, 2.0],
            vec![-1.0, 11.0, -1.0],
            vec![2.0, -1.0, 10.0],
        ])
        .unwrap();
        let b = Vector::from(vec![6.0, 22.0, -10.0]);
        LinearSystem::new(a, b).unwrap()
    }

    #[test]
    fn test_jacobi_converges() {
        let sol = LinearSolver::new().jacobi(&dominant_system()).unwrap();
        assert!(sol.converged());
        assert!(sol.state.iterations < 50);
        assert_abs_diff_eq!(sol.x[0], 1.0, epsilon = 1e-4);
        assert_abs_diff_eq!(sol.x[1], 2.0, epsilon = 1e-4);
        assert_abs_diff_eq!(sol.x[2], -1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_gauss_seidel_converges_faster() {
        let solver = LinearSolver::new();
        let system = dominant_system();
        let j = solver.jacobi(&system).unwrap();
        let gs = solver.gauss_seidel(&system).unwrap();
        assert!(gs.converged());
        assert!(gs.state.iterations <= j.state.iterations);
        for i in 0..3 {
            assert_abs_diff_eq!(gs.x[i], j.x[i], epsilon = 1e-4);
        }
    }

    #[test]
    fn test_first_sweeps_differ() {
        // After one sweep the two methods already disagree: Gauss-Seidel
        // feeds x[0] into the update of x[1].
        let solver = LinearSolver::new().with_max_iterations(1);
        let system = dominant_system();
        let j = solver.jacobi(&system).unwrap();
        let gs = solver.gauss_seidel(&system).unwrap();
        assert_abs_diff_eq!(j.x[0], 0.6);
        assert_abs_diff_eq!(gs.x[0], 0.6);
        assert_abs_diff_eq!(j.x[1], 2.0);
        assert_abs_diff_eq!(gs.x[1], (22.0 + 0.6) / 11.0, epsilon = 1e-15);
        assert!(!j.converged());
        assert!(!gs.converged());
    }

    #[test]
    fn test_zero_diagonal() {
        let a = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 0.0]]).unwrap();
        let system = LinearSystem::new(a, Vector::from(vec![1.0, 1.0])).unwrap();
        let solver = LinearSolver::new();
        assert!(matches!(
            solver.jacobi(&system),
            Err(SolverError::SingularDiagonal { index: 1 })
        ));
        assert!(matches!(
            solver.gauss_seidel(&system),
            Err(SolverError::SingularDiagonal { index: 1 })
        ));
    }

    #[test]
    fn test_iteration_cap_returns_last_iterate() {
        let solver = LinearSolver::new().with_max_iterations(3).with_tolerance(1e-14);
        let sol = solver.gauss_seidel(&dominant_system()).unwrap();
        assert!(!sol.converged());
        assert_eq!(sol.state.iterations, 3);
        assert_abs_diff_eq!(sol.x[1], 2.0, epsilon = 1e-2);
    }

    #[test]
    fn test_divergence_to_nan_is_not_converged() {
        // Spectral radius well above one: both methods blow up to NaN
        let a = Matrix::from_rows(vec![
            vec![1.0, 4.0, 4.0],
            vec![4.0, 1.0, -4.0],
            vec![4.0, 4.0, 1.0],
        ])
        .unwrap();
        let system = LinearSystem::new(a, Vector::from(vec![1.0, 1.0, 1.0])).unwrap();
        let solver = LinearSolver::new().with_max_iterations(1000);
        for sol in [
            solver.jacobi(&system).unwrap(),
            solver.gauss_seidel(&system).unwrap(),
        ] {
            assert!(!sol.converged());
            assert!(sol.state.residual.is_nan());
            assert!(sol.state.iterations < 1000);
        }
    }

    #[test]
    fn test_small_scale_diagonal_accepted() {
        let a = Matrix::identity(2).scale(1e-16);
        let system = LinearSystem::new(a, Vector::from(vec![1e-16, 2e-16])).unwrap();
        let solver = LinearSolver::new();
        for sol in [
            solver.jacobi(&system).unwrap(),
            solver.gauss_seidel(&system).unwrap(),
        ] {
            assert!(sol.converged());
            assert_abs_diff_eq!(sol.x[0], 1.0, epsilon = 1e-12);
            assert_abs_diff_eq!(sol.x[1], 2.0, epsilon = 1e-12);
        }
    }

    fn dominant_strategy() -> impl Strategy<Value = LinearSystem> {
        (2usize..6).prop_flat_map(|n| {
            (
                prop::collection::vec(-1.0f64..1.0, n * n),
                prop::collection::vec(-10.0f64..10.0, n),
            )
                .prop_map(move |(entries, rhs)| {
                    let mut a = Matrix::from_row_slice(n, n, &entries).unwrap();
                    for i in 0..n {
                        // Strictly dominant with margin
                        a[(i, i)] = n as f64 + 1.0;
                    }
                    LinearSystem::new(a, Vector::from(rhs)).unwrap()
                })
        })
    }

    proptest! {
        #[test]
        fn prop_iterative_agree_with_direct(system in dominant_strategy()) {
            let solver = LinearSolver::new().with_tolerance(1e-10).with_max_iterations(500);
            let direct = solver.gauss(&system).unwrap();
            let lu = solver.lu(&system).unwrap();
            let jacobi = solver.jacobi(&system).unwrap();
            let seidel = solver.gauss_seidel(&system).unwrap();

            prop_assert!(direct.converged());
            prop_assert!(lu.converged());
            prop_assert!(jacobi.converged());
            prop_assert!(seidel.converged());
            for i in 0..system.size() {
                prop_assert!((jacobi.x[i] - direct.x[i]).abs() < 1e-6);
                prop_assert!((seidel.x[i] - direct.x[i]).abs() < 1e-6);
                prop_assert!((lu.x[i] - direct.x[i]).abs() < 1e-9);
            }
        }

        #[test]
        fn prop_solvers_are_repeatable(system in dominant_strategy()) {
            let before = system.clone();
            let solver = LinearSolver::new();
            for method in LinearMethod::ALL {
                let first = solver.solve(&system, method).unwrap();
                let second = solver.solve(&system, method).unwrap();
                prop_assert_eq!(&first, &second);
            }
            prop_assert_eq!(system, before);
        }
    }
}

//! Direct solvers: Gaussian elimination and LU decomposition.

use super::{pivot_floor, LinearMethod, LinearSolution, LinearSolver, LinearSystem, Pivoting};
use crate::algebra::{dot, Matrix, Vector};
use crate::error::{Result, SolverError};

/// Doolittle factors `P·A = L·U` of a square matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct LuFactors {
    /// Unit lower-triangular factor
    pub l: Matrix,
    /// Upper-triangular factor
    pub u: Matrix,
    /// Row permutation: row `i` of `L·U` is row `perm[i]` of `A`
    pub perm: Vec<usize>,
}

impl LuFactors {
    /// Solve `L y = P b`, then `U x = y`.
    pub fn solve(&self, b: &Vector) -> Result<Vector> {
        let n = self.u.rows();
        if b.len() != n {
            return Err(SolverError::dimension_mismatch("LU solve", n, b.len()));
        }

        // Forward substitution
        let mut y = Vector::zeros(n);
        for i in 0..n {
            let sum = dot(&self.l.row(i)[..i], &y.as_slice()[..i]);
            y[i] = b[self.perm[i]] - sum;
        }

        // Back substitution
        let mut x = Vector::zeros(n);
        for i in (0..n).rev() {
            let sum = dot(&self.u.row(i)[i + 1..], &x.as_slice()[i + 1..]);
            x[i] = (y[i] - sum) / self.u[(i, i)];
        }

        Ok(x)
    }
}

/// Row holding the largest magnitude in column `k` at or below the diagonal.
fn select_pivot_row(m: &Matrix, k: usize) -> usize {
    let mut max_val = m[(k, k)].abs();
    let mut max_row = k;
    for i in (k + 1)..m.rows() {
        let val = m[(i, k)].abs();
        if val > max_val {
            max_val = val;
            max_row = i;
        }
    }
    max_row
}

fn check_pivot(pivot: f64, index: usize, floor: f64) -> Result<()> {
    if pivot.is_nan() || floor.is_nan() || pivot.abs() <= floor {
        return Err(SolverError::SingularPivot {
            index,
            value: pivot,
        });
    }
    Ok(())
}

impl LinearSolver {
    /// Gaussian elimination to upper-triangular form, then back substitution.
    pub fn gauss(&self, system: &LinearSystem) -> Result<LinearSolution> {
        let n = system.size();
        let mut a = system.a().clone();
        let mut b = system.b().clone();
        let floor = pivot_floor(&a);

        // Forward elimination
        for k in 0..n {
            if self.pivoting == Pivoting::Partial {
                let p = select_pivot_row(&a, k);
                if p != k {
                    a.swap_rows(k, p);
                    b.as_mut_slice().swap(k, p);
                }
            }

            let pivot = a[(k, k)];
            check_pivot(pivot, k, floor)?;

            for i in (k + 1)..n {
                let factor = a[(i, k)] / pivot;
                if factor == 0.0 {
                    continue;
                }
                for j in k..n {
                    let akj = a[(k, j)];
                    a[(i, j)] -= factor * akj;
                }
                let bk = b[k];
                b[i] -= factor * bk;
            }
        }

        // Back substitution
        let mut x = Vector::zeros(n);
        for k in (0..n).rev() {
            let sum = dot(&a.row(k)[k + 1..], &x.as_slice()[k + 1..]);
            x[k] = (b[k] - sum) / a[(k, k)];
        }

        self.finish_direct(system, x, LinearMethod::Gauss)
    }

    /// Factor a square matrix into unit lower and upper triangles.
    pub fn lu_factor(&self, a: &Matrix) -> Result<LuFactors> {
        if !a.is_square() {
            return Err(SolverError::NotSquare {
                rows: a.rows(),
                cols: a.cols(),
            });
        }
        let n = a.rows();
        let mut l = Matrix::identity(n);
        let mut u = a.clone();
        let mut perm: Vec<usize> = (0..n).collect();
        let floor = pivot_floor(a);

        for k in 0..n {
            if self.pivoting == Pivoting::Partial {
                let p = select_pivot_row(&u, k);
                if p != k {
                    u.swap_rows(k, p);
                    perm.swap(k, p);
                    // Multipliers already stored to the left of the diagonal move with their rows
                    for j in 0..k {
                        let tmp = l[(k, j)];
                        l[(k, j)] = l[(p, j)];
                        l[(p, j)] = tmp;
                    }
                }
            }

            let pivot = u[(k, k)];
            check_pivot(pivot, k, floor)?;

            for i in (k + 1)..n {
                let factor = u[(i, k)] / pivot;
                l[(i, k)] = factor;
                for j in k..n {
                    let ukj = u[(k, j)];
                    u[(i, j)] -= factor * ukj;
                }
            }
        }

        Ok(LuFactors { l, u, perm })
    }

    /// Solve through LU decomposition.
    pub fn lu(&self, system: &LinearSystem) -> Result<LinearSolution> {
        let factors = self.lu_factor(system.a())?;
        let x = factors.solve(system.b())?;
        self.finish_direct(system, x, LinearMethod::Lu)
    }
}

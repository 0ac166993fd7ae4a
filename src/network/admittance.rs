//! Network matrix assembly.
//!
//! Each branch is stamped like a two-terminal conductance:
//!
//! ```text
//!   Y[i,i] += y     Y[i,j] -= y
//!   Y[j,j] += y     Y[j,i] -= y
//! ```
//!
//! The DC susceptance matrix uses `y = 1/x` and ignores resistance and shunts.
//! The AC admittance matrix uses the complex series admittance
//! `y = 1/(r + jx)` and adds half the line charging `j·b/2` to both diagonals.

use num_complex::Complex64;

use super::graph::Network;
use crate::algebra::Matrix;
use crate::error::{Result, SolverError};

/// Series admittance `1/(r + jx)` of a branch.
pub fn series_admittance(r: f64, x: f64) -> Result<Complex64> {
    let z = Complex64::new(r, x);
    if z.norm_sqr() == 0.0 {
        return Err(SolverError::invalid_network("branch has zero series impedance"));
    }
    Ok(z.inv())
}

/// Real susceptance matrix `B` for DC power flow.
pub fn susceptance_matrix(network: &Network) -> Result<Matrix> {
    let n = network.size();
    let mut b = Matrix::zeros(n, n);

    for branch in network.branches() {
        if branch.x == 0.0 {
            return Err(SolverError::invalid_network(format!(
                "branch {}-{} has zero reactance",
                branch.from, branch.to
            )));
        }
        let (i, j) = network.terminals(branch)?;
        let y = 1.0 / branch.x;
        b.add_at(i, j, -y);
        b.add_at(j, i, -y);
        b.add_at(i, i, y);
        b.add_at(j, j, y);
    }

    Ok(b)
}

/// Complex bus admittance matrix `Y = G + jB` for AC power flow.
#[derive(Debug, Clone, PartialEq)]
pub struct AdmittanceMatrix {
    size: usize,
    data: Vec<Complex64>,
}

impl AdmittanceMatrix {
    /// Assemble `Y` from every branch of the network.
    pub fn build(network: &Network) -> Result<Self> {
        let size = network.size();
        let mut y = Self {
            size,
            data: vec![Complex64::new(0.0, 0.0); size * size],
        };

        for branch in network.branches() {
            let (i, j) = network.terminals(branch)?;
            let series = series_admittance(branch.r, branch.x)?;
            let charging = Complex64::new(0.0, branch.b / 2.0);
            y.stamp_series(i, j, series);
            y.add(i, i, charging);
            y.add(j, j, charging);
        }

        Ok(y)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Get element at (row, col).
    pub fn get(&self, row: usize, col: usize) -> Complex64 {
        self.data[row * self.size + col]
    }

    fn add(&mut self, row: usize, col: usize, value: Complex64) {
        self.data[row * self.size + col] += value;
    }

    /// Stamp a series admittance between buses `i` and `j`.
    fn stamp_series(&mut self, i: usize, j: usize, y: Complex64) {
        self.add(i, i, y);
        self.add(j, j, y);
        self.add(i, j, -y);
        self.add(j, i, -y);
    }

    /// Real part `G`.
    pub fn conductance(&self) -> Matrix {
        self.map(|v| v.re)
    }

    /// Imaginary part `B`.
    pub fn susceptance(&self) -> Matrix {
        self.map(|v| v.im)
    }

    fn map(&self, part: impl Fn(Complex64) -> f64) -> Matrix {
        let mut m = Matrix::zeros(self.size, self.size);
        for i in 0..self.size {
            for j in 0..self.size {
                m[(i, j)] = part(self.get(i, j));
            }
        }
        m
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{Branch, Bus};
    use approx::assert_abs_diff_eq;

    fn three_bus() -> Network {
        Network::new(
            vec![Bus::slack(1), Bus::pq(2, -0.5, -0.2), Bus::pv(3, 0.3, 1.01)],
            vec![
                Branch::new(1, 2, 0.02, 0.1, 0.04),
                Branch::new(2, 3, 0.0, 0.2, 0.0),
                Branch::reactance(1, 3, 0.25),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_susceptance_matrix() {
        let b = susceptance_matrix(&three_bus()).unwrap();
        assert_abs_diff_eq!(b[(0, 0)], 10.0 + 4.0, epsilon = 1e-12);
        assert_abs_diff_eq!(b[(1, 1)], 10.0 + 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(b[(0, 1)], -10.0, epsilon = 1e-12);
        assert_abs_diff_eq!(b[(2, 1)], -5.0, epsilon = 1e-12);
        assert_eq!(b, b.transpose());
        // Rows of a loop-free stamp sum to zero
        for i in 0..3 {
            assert_abs_diff_eq!(b.row(i).iter().sum::<f64>(), 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_zero_reactance_rejected() {
        let net = Network::new(
            vec![Bus::slack(1), Bus::pq(2, 0.0, 0.0)],
            vec![Branch::new(1, 2, 0.1, 0.0, 0.0)],
        )
        .unwrap();
        assert!(susceptance_matrix(&net).is_err());
        // AC tolerates pure resistance
        assert!(AdmittanceMatrix::build(&net).is_ok());
    }

    #[test]
    fn test_admittance_matrix() {
        let y = AdmittanceMatrix::build(&three_bus()).unwrap();
        let y12 = Complex64::new(0.02, 0.1).inv();
        let y23 = Complex64::new(0.0, -5.0);
        let y13 = Complex64::new(0.0, -4.0);

        assert_abs_diff_eq!(y.get(0, 1).re, -y12.re, epsilon = 1e-12);
        assert_abs_diff_eq!(y.get(0, 1).im, -y12.im, epsilon = 1e-12);
        let y11 = y12 + y13 + Complex64::new(0.0, 0.02);
        assert_abs_diff_eq!(y.get(0, 0).re, y11.re, epsilon = 1e-12);
        assert_abs_diff_eq!(y.get(0, 0).im, y11.im, epsilon = 1e-12);
        let y22 = y12 + y23 + Complex64::new(0.0, 0.02);
        assert_abs_diff_eq!(y.get(1, 1).im, y22.im, epsilon = 1e-12);

        let g = y.conductance();
        let b = y.susceptance();
        assert_eq!(g, g.transpose());
        assert_eq!(b, b.transpose());
        assert_abs_diff_eq!(b[(1, 2)], 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_impedance_rejected() {
        assert!(series_admittance(0.0, 0.0).is_err());
    }
}

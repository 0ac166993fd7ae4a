//! AC power flow by Newton-Raphson in polar coordinates.
//!
//! Unknowns are the angles of every non-slack bus followed by the voltage
//! magnitudes of every PQ bus. Mismatches are ordered the same way: `ΔP` for
//! non-slack buses, then `ΔQ` for PQ buses. PV buses keep their magnitude and
//! contribute no reactive equation.
//!
//! Each iteration solves `J·Δx = mismatch` and applies `θ += Δθ`, `V += ΔV`.
//! The run stops when the largest mismatch or the largest correction drops
//! below the tolerance, or when the iteration cap is reached.

use num_complex::Complex64;

use super::{PowerFlowConfig, PowerFlowSolution, PowerFlowStatus};
use crate::algebra::{deg_to_rad, rad_to_deg, Matrix, Vector};
use crate::error::Result;
use crate::linear::LinearSolver;
use crate::network::{series_admittance, AdmittanceMatrix, BusType, Network};
use crate::state::SolverState;

/// Calculated active and reactive injections at every bus.
///
/// ```text
/// P_i = V_i Σ_j V_j (G_ij cos θ_ij + B_ij sin θ_ij)
/// Q_i = V_i Σ_j V_j (G_ij sin θ_ij − B_ij cos θ_ij)
/// ```
pub fn power_injections(g: &Matrix, b: &Matrix, v: &[f64], theta: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let n = v.len();
    let mut p = vec![0.0; n];
    let mut q = vec![0.0; n];
    for i in 0..n {
        for j in 0..n {
            let (sin, cos) = (theta[i] - theta[j]).sin_cos();
            let vv = v[i] * v[j];
            p[i] += vv * (g[(i, j)] * cos + b[(i, j)] * sin);
            q[i] += vv * (g[(i, j)] * sin - b[(i, j)] * cos);
        }
    }
    (p, q)
}

/// Full partial-derivative blocks of the injection equations.
///
/// `h = ∂P/∂θ`, `n = ∂P/∂V`, `m = ∂Q/∂θ`, `l = ∂Q/∂V`, each `n × n` over all
/// buses. [`Jacobian::assemble`] picks the rows and columns that belong to
/// the unknowns.
#[derive(Debug, Clone, PartialEq)]
pub struct Jacobian {
    pub h: Matrix,
    pub n: Matrix,
    pub m: Matrix,
    pub l: Matrix,
}

impl Jacobian {
    pub fn evaluate(g: &Matrix, b: &Matrix, v: &[f64], theta: &[f64]) -> Self {
        let size = v.len();
        let mut jac = Self {
            h: Matrix::zeros(size, size),
            n: Matrix::zeros(size, size),
            m: Matrix::zeros(size, size),
            l: Matrix::zeros(size, size),
        };

        for i in 0..size {
            for j in 0..size {
                if i == j {
                    continue;
                }
                let (sin, cos) = (theta[i] - theta[j]).sin_cos();
                let a = g[(i, j)] * cos + b[(i, j)] * sin;
                let c = g[(i, j)] * sin - b[(i, j)] * cos;
                let vv = v[i] * v[j];

                jac.h[(i, j)] = vv * c;
                jac.n[(i, j)] = v[i] * a;
                jac.m[(i, j)] = -vv * a;
                jac.l[(i, j)] = v[i] * c;

                jac.h[(i, i)] -= vv * c;
                jac.n[(i, i)] += v[j] * a;
                jac.m[(i, i)] += vv * a;
                jac.l[(i, i)] += v[j] * c;
            }
            // Self terms from the V_i² G_ii and V_i² B_ii parts of P_i and Q_i
            jac.n[(i, i)] += 2.0 * g[(i, i)] * v[i];
            jac.l[(i, i)] -= 2.0 * b[(i, i)] * v[i];
        }

        jac
    }

    /// Reduced Jacobian for the given angle and magnitude unknowns.
    pub fn assemble(&self, angles: &[usize], magnitudes: &[usize]) -> Matrix {
        let na = angles.len();
        let dim = na + magnitudes.len();
        let mut out = Matrix::zeros(dim, dim);

        for (r, &i) in angles.iter().enumerate() {
            for (c, &j) in angles.iter().enumerate() {
                out[(r, c)] = self.h[(i, j)];
            }
            for (c, &j) in magnitudes.iter().enumerate() {
                out[(r, na + c)] = self.n[(i, j)];
            }
        }
        for (r, &i) in magnitudes.iter().enumerate() {
            for (c, &j) in angles.iter().enumerate() {
                out[(na + r, c)] = self.m[(i, j)];
            }
            for (c, &j) in magnitudes.iter().enumerate() {
                out[(na + r, na + c)] = self.l[(i, j)];
            }
        }

        out
    }
}

fn mismatch(
    network: &Network,
    calculated: &(Vec<f64>, Vec<f64>),
    angles: &[usize],
    magnitudes: &[usize],
) -> Vector {
    let buses = network.buses();
    let (p, q) = calculated;
    angles
        .iter()
        .map(|&i| buses[i].p - p[i])
        .chain(magnitudes.iter().map(|&i| buses[i].q - q[i]))
        .collect()
}

/// Solve the AC power flow by Newton-Raphson.
///
/// Starts from the voltages and angles recorded on the buses. Returns the
/// annotated network even when the iteration cap is reached; only malformed
/// networks and singular Jacobians are errors.
///
/// The reported residual is recomputed at the final voltages. After an exit
/// on a small correction it can exceed the tolerance.
pub fn ac_power_flow(network: &Network, config: &PowerFlowConfig) -> Result<PowerFlowSolution> {
    let n = network.size();
    let slack = network.slack_index();
    let y = AdmittanceMatrix::build(network)?;
    let g = y.conductance();
    let b = y.susceptance();

    let mut v: Vec<f64> = network.buses().iter().map(|bus| bus.voltage).collect();
    let mut theta: Vec<f64> = network.buses().iter().map(|bus| deg_to_rad(bus.angle)).collect();

    let angles: Vec<usize> = (0..n).filter(|&i| i != slack).collect();
    let magnitudes: Vec<usize> = (0..n)
        .filter(|&i| network.buses()[i].kind == BusType::PQ)
        .collect();
    let na = angles.len();
    let factorizer = LinearSolver::new().with_pivoting(config.jacobian_pivoting);

    let mut status = PowerFlowStatus::Initialized;
    tracing::debug!(
        buses = n,
        unknowns = na + magnitudes.len(),
        %status,
        "ac power flow"
    );

    let mut iterations = 0;
    let mut converged = false;
    loop {
        let calculated = power_injections(&g, &b, &v, &theta);
        let delta = mismatch(network, &calculated, &angles, &magnitudes);
        let worst = delta.norm_inf();
        tracing::debug!(iteration = iterations, mismatch = worst, "ac power flow");

        if worst < config.tolerance {
            converged = true;
            break;
        }
        if iterations >= config.max_iterations {
            break;
        }
        if status == PowerFlowStatus::Initialized {
            status = PowerFlowStatus::Iterating;
            tracing::debug!(%status, "ac power flow");
        }

        let jacobian = Jacobian::evaluate(&g, &b, &v, &theta).assemble(&angles, &magnitudes);
        let correction = factorizer.lu_factor(&jacobian)?.solve(&delta)?;

        for (k, &i) in angles.iter().enumerate() {
            theta[i] += correction[k];
        }
        for (k, &i) in magnitudes.iter().enumerate() {
            v[i] += correction[na + k];
        }
        iterations += 1;

        if correction.norm_inf() < config.tolerance {
            converged = true;
            break;
        }
    }

    let calculated = power_injections(&g, &b, &v, &theta);
    let residual = mismatch(network, &calculated, &angles, &magnitudes).norm_inf();
    let state = SolverState::new(iterations, residual, converged);
    state.report("ac power flow");
    let status = PowerFlowStatus::from_converged(converged);
    let (p, q) = calculated;

    let mut result = network.clone();
    for (i, bus) in result.buses.iter_mut().enumerate() {
        match bus.kind {
            BusType::Slack => {
                bus.p = p[i];
                bus.q = q[i];
            }
            BusType::PV => {
                bus.q = q[i];
                bus.angle = rad_to_deg(theta[i]);
            }
            BusType::PQ => {
                bus.voltage = v[i];
                bus.angle = rad_to_deg(theta[i]);
            }
        }
    }
    for branch in result.branches.iter_mut() {
        let (i, j) = network.terminals(branch)?;
        let vi = Complex64::from_polar(v[i], theta[i]);
        let vj = Complex64::from_polar(v[j], theta[j]);
        let current = (vi - vj) * series_admittance(branch.r, branch.x)?;
        let s = vi * current.conj();
        branch.p_flow = Some(s.re);
        branch.q_flow = Some(s.im);
    }

    Ok(PowerFlowSolution {
        network: result,
        state,
        status,
    })
}

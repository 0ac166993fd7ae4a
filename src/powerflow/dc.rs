//! Linearized (DC) power flow.

use super::{PowerFlowConfig, PowerFlowSolution, PowerFlowStatus};
use crate::algebra::{deg_to_rad, rad_to_deg, Vector};
use crate::error::Result;
use crate::linear::LinearSystem;
use crate::network::{susceptance_matrix, Network};

/// Solve the DC power flow.
///
/// Builds the susceptance matrix, drops the slack row and column, and solves
/// `B_red·θ = P_red − B[:,slack]·θ_slack` with the configured linear method.
/// Bus angles are written back in degrees and each branch gets
/// `p_flow = (θ_i − θ_j)/x`. The slack bus keeps its angle and receives the
/// injection that balances the network.
pub fn dc_power_flow(network: &Network, config: &PowerFlowConfig) -> Result<PowerFlowSolution> {
    let n = network.size();
    let slack = network.slack_index();
    let b = susceptance_matrix(network)?;
    let theta_ref = deg_to_rad(network.buses()[slack].angle);

    tracing::debug!(buses = n, slack, status = %PowerFlowStatus::Initialized, "dc power flow");

    let injections: Vector = (0..n)
        .filter(|&i| i != slack)
        .map(|i| network.buses()[i].p - b[(i, slack)] * theta_ref)
        .collect();
    let system = LinearSystem::new(b.minor(slack, slack), injections)?;

    tracing::debug!(status = %PowerFlowStatus::Iterating, method = %config.dc_method, "dc power flow");
    let solution = config.dc_solver.solve(&system, config.dc_method)?;

    // Reinsert the slack reference
    let mut theta = Vec::with_capacity(n);
    let mut reduced = solution.x.iter();
    for i in 0..n {
        if i == slack {
            theta.push(theta_ref);
        } else if let Some(&t) = reduced.next() {
            theta.push(t);
        }
    }

    let mut result = network.clone();
    for (i, bus) in result.buses.iter_mut().enumerate() {
        if i == slack {
            bus.p = b.row(i).iter().zip(&theta).map(|(bij, tj)| bij * tj).sum();
        } else {
            bus.angle = rad_to_deg(theta[i]);
        }
    }
    for branch in result.branches.iter_mut() {
        let (i, j) = network.terminals(branch)?;
        branch.p_flow = Some((theta[i] - theta[j]) / branch.x);
        branch.q_flow = None;
    }

    let status = PowerFlowStatus::from_converged(solution.state.converged);
    tracing::info!(%status, iterations = solution.state.iterations, "dc power flow finished");

    Ok(PowerFlowSolution {
        network: result,
        state: solution.state,
        status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linear::{LinearMethod, LinearSolver};
    use crate::network::{Branch, Bus};
    use approx::assert_abs_diff_eq;

    fn two_bus(p: f64) -> Network {
        Network::new(
            vec![Bus::pq(1, p, 0.0), Bus::slack(2)],
            vec![Branch::reactance(1, 2, 0.1)],
        )
        .unwrap()
    }

    #[test]
    fn test_two_bus_angle_difference() {
        let p = 0.5;
        let net = two_bus(p);
        let sol = dc_power_flow(&net, &PowerFlowConfig::default()).unwrap();
        assert!(sol.converged());
        assert_eq!(sol.status, PowerFlowStatus::Converged);

        let buses = sol.network.buses();
        let diff = deg_to_rad(buses[0].angle) - deg_to_rad(buses[1].angle);
        assert_abs_diff_eq!(diff, p * 0.1, epsilon = 1e-9);
        assert_eq!(buses[1].angle, 0.0);
        assert_abs_diff_eq!(buses[1].p, -p, epsilon = 1e-9);
        assert_abs_diff_eq!(sol.network.branches()[0].p_flow.unwrap(), p, epsilon = 1e-9);
    }

    #[test]
    fn test_slack_reference_angle_held() {
        let net = Network::new(
            vec![Bus::slack(1).with_voltage(1.0, 10.0), Bus::pq(2, -0.5, 0.0)],
            vec![Branch::reactance(1, 2, 0.1)],
        )
        .unwrap();
        let sol = dc_power_flow(&net, &PowerFlowConfig::default()).unwrap();
        let buses = sol.network.buses();
        assert_eq!(buses[0].angle, 10.0);
        assert_abs_diff_eq!(buses[0].angle - buses[1].angle, rad_to_deg(0.05), epsilon = 1e-7);
        assert_abs_diff_eq!(sol.network.branches()[0].p_flow.unwrap(), 0.5, epsilon = 1e-9);
    }

    #[test]
    fn test_three_bus_flows_balance() {
        // Slack is the last bus, as in the classic three-bus teaching case
        let net = Network::new(
            vec![Bus::pq(1, 0.6, 0.0), Bus::pq(2, -1.0, 0.0), Bus::slack(3)],
            vec![
                Branch::reactance(1, 2, 0.1),
                Branch::reactance(2, 3, 0.2),
                Branch::reactance(1, 3, 0.25),
            ],
        )
        .unwrap();
        let solver = LinearSolver::new()
            .with_tolerance(1e-12)
            .with_max_iterations(200);
        let config = PowerFlowConfig::default().with_dc_solver(solver, LinearMethod::GaussSeidel);
        let sol = dc_power_flow(&net, &config).unwrap();
        assert!(sol.converged());

        let flows: Vec<f64> = sol
            .network
            .branches()
            .iter()
            .map(|b| b.p_flow.unwrap())
            .collect();
        // Bus 1 exports 0.6 on branches 1-2 and 1-3
        assert_abs_diff_eq!(flows[0] + flows[2], 0.6, epsilon = 1e-9);
        // Bus 2 absorbs 1.0
        assert_abs_diff_eq!(flows[1] - flows[0], -1.0, epsilon = 1e-9);
        // Slack picks up the difference
        assert_abs_diff_eq!(sol.network.buses()[2].p, 0.4, epsilon = 1e-9);
    }

    #[test]
    fn test_direct_and_iterative_agree() {
        let net = two_bus(-0.3);
        let gs = dc_power_flow(&net, &PowerFlowConfig::default()).unwrap();
        let lu = dc_power_flow(
            &net,
            &PowerFlowConfig::default().with_dc_solver(LinearSolver::new(), LinearMethod::Lu),
        )
        .unwrap();
        assert_abs_diff_eq!(
            gs.network.buses()[0].angle,
            lu.network.buses()[0].angle,
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_input_untouched_and_repeatable() {
        let net = two_bus(0.5);
        let before = net.clone();
        let a = dc_power_flow(&net, &PowerFlowConfig::default()).unwrap();
        let b = dc_power_flow(&net, &PowerFlowConfig::default()).unwrap();
        assert_eq!(net, before);
        assert_eq!(a, b);
        assert!(net.branches()[0].p_flow.is_none());
    }

    #[test]
    fn test_zero_reactance_is_fatal() {
        let net = Network::new(
            vec![Bus::slack(1), Bus::pq(2, 0.1, 0.0)],
            vec![Branch::new(1, 2, 0.1, 0.0, 0.0)],
        )
        .unwrap();
        assert!(dc_power_flow(&net, &PowerFlowConfig::default()).is_err());
    }
}

//! Network validation.

use std::collections::HashMap;

use super::types::{Branch, Bus, BusType};
use crate::error::{Result, SolverError};

/// Validate a network for power flow.
///
/// Checks:
/// - At least one bus, with unique ids
/// - Exactly one slack bus
/// - Positive voltage magnitudes
/// - Every branch connects two different, existing buses
///
/// Returns the id-to-index map and the slack bus index.
pub fn validate_network(buses: &[Bus], branches: &[Branch]) -> Result<(HashMap<usize, usize>, usize)> {
    if buses.is_empty() {
        return Err(SolverError::invalid_network("network has no buses"));
    }

    let mut index = HashMap::with_capacity(buses.len());
    for (i, bus) in buses.iter().enumerate() {
        if index.insert(bus.id, i).is_some() {
            return Err(SolverError::invalid_network(format!(
                "duplicate bus id {}",
                bus.id
            )));
        }
        if bus.voltage <= 0.0 || bus.voltage.is_nan() {
            return Err(SolverError::invalid_network(format!(
                "bus {} has non-positive voltage magnitude {}",
                bus.id, bus.voltage
            )));
        }
    }

    let slacks: Vec<usize> = buses
        .iter()
        .enumerate()
        .filter(|(_, b)| b.kind == BusType::Slack)
        .map(|(i, _)| i)
        .collect();
    let slack = match slacks.as_slice() {
        [single] => *single,
        [] => return Err(SolverError::invalid_network("no slack bus")),
        _ => {
            return Err(SolverError::invalid_network(format!(
                "{} slack buses, expected exactly one",
                slacks.len()
            )))
        }
    };

    for (k, branch) in branches.iter().enumerate() {
        for id in [branch.from, branch.to] {
            if !index.contains_key(&id) {
                return Err(SolverError::invalid_network(format!(
                    "branch {} refers to unknown bus {}",
                    k, id
                )));
            }
        }
        if branch.from == branch.to {
            return Err(SolverError::invalid_network(format!(
                "branch {} connects bus {} to itself",
                k, branch.from
            )));
        }
    }

    Ok((index, slack))
}

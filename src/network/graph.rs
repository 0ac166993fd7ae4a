//! Network structure: buses, branches and the id-to-index mapping.

use std::collections::HashMap;

use super::types::{Branch, Bus};
use super::validate::validate_network;
use crate::error::{Result, SolverError};

/// A validated set of buses and branches.
///
/// Bus ids are mapped to matrix indices in the order buses were given.
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    pub(crate) buses: Vec<Bus>,
    pub(crate) branches: Vec<Branch>,
    index: HashMap<usize, usize>,
    slack: usize,
}

impl Network {
    /// Validate and index a network.
    pub fn new(buses: Vec<Bus>, branches: Vec<Branch>) -> Result<Self> {
        let (index, slack) = validate_network(&buses, &branches)?;
        Ok(Self {
            buses,
            branches,
            index,
            slack,
        })
    }

    pub fn buses(&self) -> &[Bus] {
        &self.buses
    }

    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    pub fn into_parts(self) -> (Vec<Bus>, Vec<Branch>) {
        (self.buses, self.branches)
    }

    /// Number of buses.
    pub fn size(&self) -> usize {
        self.buses.len()
    }

    /// Matrix index of the slack bus.
    pub fn slack_index(&self) -> usize {
        self.slack
    }

    /// Matrix index of a bus id.
    pub fn index_of(&self, id: usize) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// Matrix indices of a branch's terminals.
    pub fn terminals(&self, branch: &Branch) -> Result<(usize, usize)> {
        let lookup = |id: usize| {
            self.index_of(id).ok_or_else(|| {
                SolverError::invalid_network(format!("branch refers to unknown bus {}", id))
            })
        };
        Ok((lookup(branch.from)?, lookup(branch.to)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_follows_input_order() {
        let net = Network::new(
            vec![Bus::pq(7, -0.2, 0.0), Bus::slack(3), Bus::pv(5, 0.1, 1.0)],
            vec![Branch::reactance(7, 3, 0.1), Branch::reactance(3, 5, 0.2)],
        )
        .unwrap();
        assert_eq!(net.index_of(7), Some(0));
        assert_eq!(net.index_of(5), Some(2));
        assert_eq!(net.index_of(1), None);
        assert_eq!(net.slack_index(), 1);
        assert_eq!(net.terminals(&net.branches()[1]).unwrap(), (1, 2));
    }
}

//! Bus and branch records.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Role of a bus in the power-flow formulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BusType {
    /// Reference bus: angle and voltage fixed, P and Q computed
    Slack,
    /// Generator bus: P and |V| specified
    PV,
    /// Load bus: P and Q specified
    PQ,
}

impl fmt::Display for BusType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BusType::Slack => "SLACK",
            BusType::PV => "PV",
            BusType::PQ => "PQ",
        };
        f.pad(s)
    }
}

fn flat_voltage() -> f64 {
    1.0
}

/// A network node.
///
/// Powers and voltages are per-unit; `angle` is in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bus {
    /// 1-based bus number
    pub id: usize,
    #[serde(rename = "type")]
    pub kind: BusType,
    /// Net active power injection (generation minus load)
    #[serde(default)]
    pub p: f64,
    /// Net reactive power injection
    #[serde(default)]
    pub q: f64,
    /// Voltage magnitude
    #[serde(default = "flat_voltage")]
    pub voltage: f64,
    /// Voltage angle in degrees
    #[serde(default)]
    pub angle: f64,
}

impl Bus {
    /// Create a bus at flat start (1.0 pu, 0°).
    pub fn new(id: usize, kind: BusType, p: f64, q: f64) -> Self {
        Self {
            id,
            kind,
            p,
            q,
            voltage: 1.0,
            angle: 0.0,
        }
    }

    pub fn slack(id: usize) -> Self {
        Self::new(id, BusType::Slack, 0.0, 0.0)
    }

    pub fn pv(id: usize, p: f64, voltage: f64) -> Self {
        Self {
            voltage,
            ..Self::new(id, BusType::PV, p, 0.0)
        }
    }

    pub fn pq(id: usize, p: f64, q: f64) -> Self {
        Self::new(id, BusType::PQ, p, q)
    }

    /// Set the voltage magnitude and angle (degrees).
    pub fn with_voltage(mut self, voltage: f64, angle: f64) -> Self {
        self.voltage = voltage;
        self.angle = angle;
        self
    }

    pub fn is_slack(&self) -> bool {
        self.kind == BusType::Slack
    }
}

/// A line or transformer between two buses (pi model).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    /// Sending bus id
    pub from: usize,
    /// Receiving bus id
    pub to: usize,
    /// Series resistance
    #[serde(default)]
    pub r: f64,
    /// Series reactance
    pub x: f64,
    /// Total shunt susceptance, split half at each end
    #[serde(default)]
    pub b: f64,
    /// Active power flow from `from` to `to` (set by a power flow)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p_flow: Option<f64>,
    /// Reactive power flow from `from` to `to` (set by the AC power flow)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q_flow: Option<f64>,
}

impl Branch {
    /// Create a branch with no flows computed yet.
    pub fn new(from: usize, to: usize, r: f64, x: f64, b: f64) -> Self {
        Self {
            from,
            to,
            r,
            x,
            b,
            p_flow: None,
            q_flow: None,
        }
    }

    /// Lossless branch with reactance only.
    pub fn reactance(from: usize, to: usize, x: f64) -> Self {
        Self::new(from, to, 0.0, x, 0.0)
    }
}

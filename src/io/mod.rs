//! Case loading.
//!
//! Two text formats feed the solvers:
//!
//! - Linear systems: comma-separated rows of the augmented matrix `[A | b]`,
//!   preceded by a single header line that is ignored.
//!
//!   ```text
//!   a1,a2,a3,b
//!   2,1,-1,8
//!   -3,-1,2,-11
//!   -2,1,2,-3
//!   ```
//!
//! - Networks: a JSON object with `buses` and `branches` arrays of
//!   [`Bus`](crate::network::Bus) and [`Branch`](crate::network::Branch)
//!   records. Bus angles are in degrees.

use serde::Deserialize;

use crate::algebra::Matrix;
use crate::error::{Result, SolverError};
use crate::linear::LinearSystem;
use crate::network::{Branch, Bus, Network};

/// Parse an augmented linear system from CSV text.
pub fn parse_linear_system(input: &str) -> Result<LinearSystem> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| {
            let line = e.position().map(|p| p.line() as usize).unwrap_or(0);
            SolverError::parse(line, e.to_string())
        })?;
        let line = record.position().map(|p| p.line() as usize).unwrap_or(0);

        let row = record
            .iter()
            .map(|field| {
                field
                    .parse::<f64>()
                    .map_err(|_| SolverError::parse(line, format!("invalid number '{}'", field)))
            })
            .collect::<Result<Vec<f64>>>()?;
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(SolverError::parse(1, "no coefficient rows"));
    }

    let augmented = Matrix::from_rows(rows)?;
    LinearSystem::from_augmented(&augmented)
}

#[derive(Debug, Deserialize)]
struct NetworkCase {
    buses: Vec<Bus>,
    #[serde(default)]
    branches: Vec<Branch>,
}

/// Parse and validate a network case from JSON text.
pub fn parse_network(input: &str) -> Result<Network> {
    let case: NetworkCase = serde_json::from_str(input)?;
    Network::new(case.buses, case.branches)
}

#[cfg(feature = "cli")]
fn read_file(path: &std::path::Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| SolverError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })
}

/// Read a linear system file.
#[cfg(feature = "cli")]
pub fn read_linear_system_file(path: &std::path::Path) -> Result<LinearSystem> {
    parse_linear_system(&read_file(path)?)
}

/// Read a network case file.
#[cfg(feature = "cli")]
pub fn read_network_file(path: &std::path::Path) -> Result<Network> {
    parse_network(&read_file(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::BusType;

    const SYSTEM: &str = "a1,a2,a3,b\n2,1,-1,8\n-3,-1,2,-11\n-2,1,2,-3\n";

    #[test]
    fn test_parse_linear_system() {
        let system = parse_linear_system(SYSTEM).unwrap();
        assert_eq!(system.size(), 3);
        assert_eq!(system.a()[(1, 0)], -3.0);
        assert_eq!(system.b().as_slice(), &[8.0, -11.0, -3.0]);
    }

    #[test]
    fn test_parse_tolerates_spaces_and_blank_lines() {
        let text = "x,y,rhs\n 4, 1, 1\n\n1 ,3 ,2\n";
        let system = parse_linear_system(text).unwrap();
        assert_eq!(system.size(), 2);
        assert_eq!(system.b().as_slice(), &[1.0, 2.0]);
    }

    #[test]
    fn test_invalid_number_reports_line() {
        let err = parse_linear_system("h\n1,2,3\n4,five,6\n").unwrap_err();
        match err {
            SolverError::ParseError { line, message } => {
                assert_eq!(line, 3);
                assert!(message.contains("five"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_shape_errors() {
        assert!(matches!(
            parse_linear_system("h\n1,2,3\n4,5\n"),
            Err(SolverError::RaggedMatrix { row: 1, .. })
        ));
        assert!(matches!(
            parse_linear_system("h\n1,2,3\n"),
            Err(SolverError::DimensionMismatch { .. })
        ));
        assert!(matches!(
            parse_linear_system("header only\n"),
            Err(SolverError::ParseError { .. })
        ));
    }

    #[test]
    fn test_parse_network() {
        let json = r#"{
            "buses": [
                {"id": 1, "type": "SLACK"},
                {"id": 2, "type": "PQ", "p": -0.5, "q": -0.2},
                {"id": 3, "type": "PV", "p": 0.3, "voltage": 1.01}
            ],
            "branches": [
                {"from": 1, "to": 2, "r": 0.02, "x": 0.1, "b": 0.04},
                {"from": 2, "to": 3, "x": 0.2}
            ]
        }"#;
        let net = parse_network(json).unwrap();
        assert_eq!(net.size(), 3);
        assert_eq!(net.slack_index(), 0);
        assert_eq!(net.buses()[2].kind, BusType::PV);
        assert_eq!(net.buses()[2].voltage, 1.01);
        assert_eq!(net.buses()[1].voltage, 1.0);
        assert_eq!(net.branches()[1].r, 0.0);
        assert!(net.branches()[0].p_flow.is_none());
    }

    #[test]
    fn test_parse_network_rejects_bad_cases() {
        assert!(matches!(parse_network("{"), Err(SolverError::Json(_))));
        let no_slack = r#"{"buses": [{"id": 1, "type": "PQ"}], "branches": []}"#;
        assert!(matches!(
            parse_network(no_slack),
            Err(SolverError::InvalidNetwork { .. })
        ));
    }
}

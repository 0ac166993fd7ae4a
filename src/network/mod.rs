//! Power network representation.
//!
//! A [`Network`] is an indexed, validated collection of [`Bus`] and
//! [`Branch`] records. Bus ids are 1-based numbers chosen by the caller;
//! matrix indices follow the order in which buses were supplied.

mod admittance;
mod graph;
mod types;
mod validate;

pub use admittance::{series_admittance, susceptance_matrix, AdmittanceMatrix};
pub use graph::Network;
pub use types::{Branch, Bus, BusType};
pub use validate::validate_network;

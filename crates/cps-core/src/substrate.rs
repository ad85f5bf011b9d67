//! Per-substrate coupling data carried by agents and static nodes.

/// How a node couples to a substrate field.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub enum NodeKind {
    /// Exchanges mass with the field through passive, uptake, and release
    /// rate terms.
    Flux,
    /// Pins the field value at the node's location (Dirichlet-like).
    Fixed,
}

/// Coupling parameters and internal concentration of one node for one
/// substrate.
///
/// Rates are per millisecond; concentrations share the field's unit.
#[derive(Copy, Clone, PartialEq, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct SubstrateInfo {
    pub kind: NodeKind,
    pub concentration: f64,
    pub passive_rate: f64,
    pub uptake_rate: f64,
    pub release_rate: f64,
}

impl SubstrateInfo {
    /// A flux node with the given rate constants and zero internal
    /// concentration.
    pub fn flux(passive_rate: f64, uptake_rate: f64, release_rate: f64) -> Self {
        Self {
            kind: NodeKind::Flux,
            concentration: 0.0,
            passive_rate,
            uptake_rate,
            release_rate,
        }
    }

    /// A fixed node pinning the field to `concentration`.
    pub fn fixed(concentration: f64) -> Self {
        Self {
            kind: NodeKind::Fixed,
            concentration,
            passive_rate: 0.0,
            uptake_rate: 0.0,
            release_rate: 0.0,
        }
    }
}

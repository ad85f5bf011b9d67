//! Substrate node coupling.
//!
//! The flux update for one node against field value `C_f` is an explicit
//! Euler step of
//!
//!   dn = (k_p·(C_f − C_n) + k_u·C_f − k_r·C_n) · dt
//!
//! distributed over the node volume `v_n` and the field volume `v_f`:
//!
//!   C_n ← C_n + dn / v_n        C_f ← C_f − dn / v_f
//!
//! so the pre-decay mass `v_f·C_f + v_n·C_n` is conserved to machine
//! precision.  Fixed nodes bypass the exchange and pin the field value
//! instead (averaged over all fixed nodes in a well-mixed compartment,
//! overwriting the covered cell on a lattice).

use cps_core::SubstrateInfo;

/// A long-lived point source, e.g. a blood vessel cross-section.
///
/// `position` is a lattice cell for lattice fields and `None` in a
/// homogeneous field.
#[derive(Clone, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct StaticNode {
    pub position: Option<(i32, i32)>,
    pub volume: f64,
    pub info: SubstrateInfo,
}

impl StaticNode {
    pub fn new(position: Option<(i32, i32)>, volume: f64, info: SubstrateInfo) -> Self {
        Self { position, volume, info }
    }
}

/// Exchange mass between one flux node and the field value it sits on.
///
/// Returns the updated `(node_concentration, field_concentration)` pair.
#[inline]
pub(crate) fn flux_exchange(
    info: &SubstrateInfo,
    node_volume: f64,
    field_concentration: f64,
    field_volume: f64,
    dt: f64,
) -> (f64, f64) {
    let c_n = info.concentration;
    let c_f = field_concentration;
    let dn = (info.passive_rate * (c_f - c_n) + info.uptake_rate * c_f - info.release_rate * c_n)
        * dt;
    (c_n + dn / node_volume, c_f - dn / field_volume)
}

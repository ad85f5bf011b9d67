//! `cps-lattice` — grid kernels for the 2D lattice space.
//!
//! Pure functions over small scratch arrays; no agent or field state lives
//! here.  The space gathers positions and binding affinities into the scratch
//! representation once per trial, runs the kernels, and writes accepted
//! results back to its authoritative layer.
//!
//! | Module           | Contents                                             |
//! |------------------|------------------------------------------------------|
//! | [`path`]         | Bresenham line between two lattice cells             |
//! | [`neighborhood`] | von Neumann / Moore offset tables                    |
//! | [`energy`]       | pairwise and total binding interaction energy        |
//! | [`trial`]        | Metropolis displacement trial                        |
//! | [`search`]       | nearest-empty-site search for division targets       |

pub mod energy;
pub mod neighborhood;
pub mod path;
pub mod search;
pub mod trial;

#[cfg(test)]
mod tests;

/// A lattice cell coordinate.  Signed so neighbor arithmetic can go one step
/// out of bounds before the bounds check.
pub type Pos = [i32; 2];

pub use energy::{pairwise_energy, total_energy};
pub use neighborhood::{MOORE, VON_NEUMANN};
pub use path::bresenham;
pub use search::nearest_empty_sites;
pub use trial::{displace, displacement_trial};

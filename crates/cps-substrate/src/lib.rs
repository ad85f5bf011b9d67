//! `cps-substrate` — diffusing chemical substrate fields.
//!
//! A substrate field is a scalar concentration over its host space — a single
//! value in a well-mixed compartment, an `Nx×Ny` grid on a lattice — coupled
//! to point sources ("nodes").  *Static* nodes are long-lived sources such as
//! vessels; *dynamic* nodes are re-registered every space tick from the
//! agents that carry coupling data for the substrate.
//!
//! | Module         | Contents                                               |
//! |----------------|--------------------------------------------------------|
//! | [`node`]       | `StaticNode`, flux/fixed node update                   |
//! | [`homogeneous`]| `HomogeneousField` — scalar field, exponential decay   |
//! | [`lattice`]    | `Lattice2DField` — grid field, LOD diffusion–decay     |
//! | [`solver`]     | Thomas tridiagonal solve, Crank–Nicolson LOD sweep     |
//! | [`error`]      | `SubstrateError`, `SubstrateResult`                    |

pub mod error;
pub mod homogeneous;
pub mod lattice;
pub mod node;
pub mod solver;


pub use error::{SubstrateError, SubstrateResult};
pub use homogeneous::HomogeneousField;
pub use lattice::Lattice2DField;
pub use node::StaticNode;

/// Decay law applied after node coupling.  Only first-order kinetics are
/// currently defined.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
pub enum DecayKinetics {
    #[default]
    FirstOrder,
}

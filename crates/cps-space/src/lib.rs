//! `cps-space` — the geometric hosts of agents and substrate fields.
//!
//! A space owns the authoritative placement state and every substrate field
//! attached to it.  The simulation drives it through the [`Space`] trait:
//! placement changes at `add_agent`/`remove_agent`, and the whole mechanics
//! pipeline — displacement, division, removal, dynamic-node rebuild,
//! substrate integration — inside `update`, gated by the space's own agent
//! and substrate clocks.
//!
//! | Module         | Contents                                           |
//! |----------------|----------------------------------------------------|
//! | [`space`]      | `Space` trait, `TickCtx`, `SpaceState`             |
//! | [`homogeneous`]| `HomogeneousSpace` — well-mixed, capacity-bounded  |
//! | [`lattice2d`]  | `Lattice2DSpace` — exclusion lattice mechanics     |
//! | [`error`]      | `SpaceError`, `SpaceResult`                        |

pub mod error;
pub mod homogeneous;
pub mod lattice2d;
pub mod space;

#[cfg(test)]
mod tests;

pub use error::{SpaceError, SpaceResult};
pub use homogeneous::HomogeneousSpace;
pub use lattice2d::Lattice2DSpace;
pub use space::{Space, SpaceState, TickCtx};

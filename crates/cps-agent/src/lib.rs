//! `cps-agent` — agent state for the `rust_cps` simulator.
//!
//! # Crate layout
//!
//! | Module    | Contents                                                   |
//! |-----------|------------------------------------------------------------|
//! | [`value`] | `AttrValue` tagged union, `SubstrateMap`, `Params`         |
//! | [`agent`] | `Agent` (attribute bag + id), `IdSource`, [`keys`]         |
//! | [`arena`] | `AgentArena` — insertion-ordered owned agent storage       |
//!
//! # Design notes
//!
//! Agent state is a typed key→value bag rather than SoA arrays: the set of
//! attributes is open (every registered model provisions its own), agents are
//! created and destroyed throughout a run, and populations are small compared
//! to the per-tick numeric work in the substrate solver.  Hot per-trial data
//! (positions, binding affinities) is gathered into scratch arrays by the
//! space for the duration of one trial.

pub mod agent;
pub mod arena;
pub mod value;

#[cfg(test)]
mod tests;

pub use agent::{keys, Agent, IdSource};
pub use arena::AgentArena;
pub use value::{AttrValue, Params, SubstrateMap};

//! `cps-core` — foundational types for the `rust_cps` cell population
//! simulator.
//!
//! This crate is a dependency of every other `cps-*` crate.  It intentionally
//! has no `cps-*` dependencies and minimal external ones (only `rand`,
//! `serde`, and `thiserror`).
//!
//! # What lives here
//!
//! | Module        | Contents                                            |
//! |---------------|-----------------------------------------------------|
//! | [`ids`]       | `AgentId`                                           |
//! | [`time`]      | `Millis`, `TimeUnit`, `TimeSpan`                    |
//! | [`clock`]     | `UpdateClock` (per-subsystem interval timer)        |
//! | [`rng`]       | `SimRng` (single seeded engine-wide stream)         |
//! | [`substrate`] | `SubstrateInfo`, `NodeKind`                         |
//! | [`error`]     | `CoreError`, `CoreResult`                           |

pub mod clock;
pub mod error;
pub mod ids;
pub mod rng;
pub mod substrate;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use clock::UpdateClock;
pub use error::{CoreError, CoreResult};
pub use ids::AgentId;
pub use rng::SimRng;
pub use substrate::{NodeKind, SubstrateInfo};
pub use time::{Millis, TimeSpan, TimeUnit};

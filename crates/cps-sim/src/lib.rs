//! `cps-sim` — the tick loop orchestrator for the `rust_cps` framework.
//!
//! # Tick loop
//!
//! ```text
//! for each of ceil(time/dt) + 1 iterations:
//!   ① Events    — execute and drop every event whose due time has come
//!                 (insertion order).
//!   ② Models    — for each registered model whose clock is due, run
//!                 update_attributes over all agents in insertion order.
//!   ③ Space     — displacement / division / removal trials, dynamic-node
//!                 rebuild, substrate integration (space-owned sub-clocks).
//!   ④ History   — when the history clock is due, append a snapshot blob.
//!   ⑤ Advance global time by dt (skipped after the final iteration, so a
//!     run over T ends with time == ⌈T/dt⌉·dt).
//! ```
//!
//! The engine is single-threaded and deterministic for a fixed seed: one
//! RNG stream, stable event/model/agent ordering, fresh trial permutations
//! drawn in a fixed sequence.
//!
//! | Module       | Contents                                          |
//! |--------------|---------------------------------------------------|
//! | [`sim`]      | `Simulation`, `RunOptions`, `SaveMode`            |
//! | [`event`]    | `Event` — one-shot timed callback                 |
//! | [`snapshot`] | `Snapshot` blobs and `.lsd` history framing       |
//! | [`error`]    | `SimError`, `SimResult`                           |

pub mod error;
pub mod event;
pub mod sim;
pub mod snapshot;


pub use error::{SimError, SimResult};
pub use event::Event;
pub use sim::{RunOptions, SaveMode, Simulation};
pub use snapshot::{read_history, Snapshot};

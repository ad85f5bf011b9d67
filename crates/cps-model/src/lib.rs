//! `cps-model` — pluggable per-agent attribute models.
//!
//! A model owns an [`UpdateClock`] and is driven by the simulation scheduler:
//! when the clock is due, `update_attributes` runs once per agent in
//! insertion order, then the clock resets.  Models mutate agent attributes
//! only — they never touch the space or the substrate fields directly.
//!
//! | Module        | Contents                                                |
//! |---------------|---------------------------------------------------------|
//! | [`model`]     | the `Model` trait                                       |
//! | [`cellcycle`] | `FixedIncrementCellCycleModel`                          |
//! | [`toxicity`]  | `ConcentrationDependentToxicityModel`                   |
//! | [`transition`]| `StochasticTransitionModel`                             |
//! | [`noop`]      | `NoopModel` — placeholder that never touches an agent   |
//! | [`error`]     | `ModelError`, `ModelResult`                             |

pub mod cellcycle;
pub mod error;
pub mod model;
pub mod noop;
pub mod toxicity;
pub mod transition;


pub use cellcycle::{CycleLengthDistribution, FixedIncrementCellCycleModel};
pub use error::{ModelError, ModelResult};
pub use model::Model;
pub use noop::NoopModel;
pub use toxicity::ConcentrationDependentToxicityModel;
pub use transition::StochasticTransitionModel;

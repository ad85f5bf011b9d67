//! `cps-output` — post-processing for recorded simulation histories.
//!
//! Loads a `.lsd` history file back into decoded [`Snapshot`]s, reduces the
//! sequence to population time series, and round-trips those series through
//! CSV for analysis tooling.
//!
//! | Module      | Contents                                        |
//! |-------------|-------------------------------------------------|
//! | [`history`] | `.lsd` loading                                  |
//! | [`series`]  | `PopulationSeries` extraction and CSV I/O       |
//! | [`error`]   | `OutputError`, `OutputResult`                   |

pub mod error;
pub mod history;
pub mod series;


pub use cps_sim::Snapshot;
pub use error::{OutputError, OutputResult};
pub use history::load_snapshots;
pub use series::{PopulationPoint, PopulationSeries};

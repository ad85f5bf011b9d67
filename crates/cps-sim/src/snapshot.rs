//! Snapshot blobs and history file framing.
//!
//! A snapshot captures the restorable simulation state — id, time, the
//! ordered agent list, and the space (placement plus substrate arrays).  The
//! live registries (events, models, accumulated history) are deliberately
//! excluded and come back empty on restore.
//!
//! The history file `<id>.lsd` is one bincode-encoded `Vec<Vec<u8>>`: the
//! sequence of snapshot blobs in tick order.  The framing is the contract;
//! each blob is opaque to readers that only count or slice the sequence.

use std::fs;
use std::path::Path;

use cps_agent::Agent;
use cps_core::Millis;
use cps_space::SpaceState;

use crate::error::SimResult;

/// Restorable simulation state at one tick.
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Snapshot {
    pub id: String,
    pub time: Millis,
    pub agents: Vec<Agent>,
    pub space: Option<SpaceState>,
}

impl Snapshot {
    pub fn encode(&self) -> SimResult<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn decode(bytes: &[u8]) -> SimResult<Snapshot> {
        Ok(bincode::deserialize(bytes)?)
    }
}

/// Write the full blob sequence, replacing any previous file.
pub(crate) fn write_history(path: &Path, blobs: &[Vec<u8>]) -> SimResult<()> {
    let encoded = bincode::serialize(blobs)?;
    fs::write(path, encoded)?;
    Ok(())
}

/// Read back the blob sequence of a history file.
pub fn read_history(path: &Path) -> SimResult<Vec<Vec<u8>>> {
    let bytes = fs::read(path)?;
    Ok(bincode::deserialize(&bytes)?)
}

//! Loading recorded histories.

use std::path::Path;

use cps_sim::{read_history, Snapshot};

use crate::error::OutputResult;

/// Read a `.lsd` history file and decode every snapshot frame, in tick order.
pub fn load_snapshots(path: &Path) -> OutputResult<Vec<Snapshot>> {
    let blobs = read_history(path)?;
    let mut snapshots = Vec::with_capacity(blobs.len());
    for blob in &blobs {
        snapshots.push(Snapshot::decode(blob)?);
    }
    Ok(snapshots)
}

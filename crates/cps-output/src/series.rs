//! Population time series extracted from a snapshot sequence.

use std::path::Path;

use cps_agent::keys;
use cps_core::Millis;
use cps_sim::Snapshot;

use crate::error::{OutputError, OutputResult};

/// One sample: simulation time and a population count.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct PopulationPoint {
    pub time: Millis,
    pub population: u64,
}

/// Agent counts over time, one point per snapshot.
#[derive(Clone, Debug, Default)]
pub struct PopulationSeries {
    pub points: Vec<PopulationPoint>,
}

impl PopulationSeries {
    /// Total population at every snapshot.
    pub fn from_snapshots(snapshots: &[Snapshot]) -> Self {
        Self::counting(snapshots, |_| true)
    }

    /// Population restricted to agents whose `state` attribute equals
    /// `state` (e.g. `alive` vs `necrotic` compartments).
    pub fn with_state(snapshots: &[Snapshot], state: &str) -> Self {
        Self::counting(snapshots, |agent: &cps_agent::Agent| {
            agent.str_attr(keys::STATE) == Some(state)
        })
    }

    /// Population of agents matching an arbitrary predicate.
    pub fn counting<F>(snapshots: &[Snapshot], predicate: F) -> Self
    where
        F: Fn(&cps_agent::Agent) -> bool,
    {
        let points = snapshots
            .iter()
            .map(|snapshot| PopulationPoint {
                time: snapshot.time,
                population: snapshot.agents.iter().filter(|a| predicate(a)).count() as u64,
            })
            .collect();
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Write as CSV with a `time_ms,population` header.
    pub fn write_csv(&self, path: &Path) -> OutputResult<()> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(["time_ms", "population"])?;
        for point in &self.points {
            writer.write_record([point.time.0.to_string(), point.population.to_string()])?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Read a series back from CSV written by [`write_csv`][Self::write_csv].
    pub fn read_csv(path: &Path) -> OutputResult<Self> {
        let mut reader = csv::Reader::from_path(path)?;
        let mut points = Vec::new();
        for (i, record) in reader.records().enumerate() {
            let record = record?;
            let parse = |field: Option<&str>| -> OutputResult<u64> {
                field
                    .map(str::trim)
                    .and_then(|s| s.parse().ok())
                    .ok_or_else(|| OutputError::MalformedRow {
                        row: i + 2,
                        reason: format!("expected two integer fields, got {record:?}"),
                    })
            };
            points.push(PopulationPoint {
                time: Millis(parse(record.get(0))?),
                population: parse(record.get(1))?,
            });
        }
        Ok(Self { points })
    }
}

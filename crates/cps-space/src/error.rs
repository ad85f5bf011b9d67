use cps_core::AgentId;
use cps_substrate::SubstrateError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpaceError {
    /// Lattice placement outside the grid.
    #[error("position ({}, {}) is out of the bounds of the space", .position.0, .position.1)]
    OutOfBounds { position: (i32, i32) },

    /// Lattice-exclusion violation at placement time.
    #[error("position ({}, {}) is already occupied", .position.0, .position.1)]
    PositionOccupied { position: (i32, i32) },

    /// Lattice `add_agent` without a `position` parameter or attribute.
    #[error("adding an agent to a lattice space requires a 'position' parameter")]
    MissingPosition,

    /// A substrate name with no registered field behind it.
    #[error("unknown substrate '{0}'")]
    UnknownSubstrate(String),

    /// An agent participating in a trial lacks a required attribute.
    #[error("agent {agent} has no '{attribute}' attribute")]
    MissingAttribute {
        agent: AgentId,
        attribute: &'static str,
    },

    #[error(transparent)]
    Substrate(#[from] SubstrateError),
}

pub type SpaceResult<T> = Result<T, SpaceError>;

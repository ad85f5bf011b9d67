use cps_core::{AgentId, CoreError};
use cps_model::ModelError;
use cps_space::SpaceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("a simulation space is already installed and cannot be replaced")]
    SpaceAlreadyInstalled,

    #[error("agent {0} is not part of this simulation")]
    AgentNotFound(AgentId),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("space error: {0}")]
    Space(#[from] SpaceError),

    #[error("model error: {0}")]
    Model(#[from] ModelError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot encoding error: {0}")]
    Encode(#[from] bincode::Error),
}

pub type SimResult<T> = Result<T, SimError>;

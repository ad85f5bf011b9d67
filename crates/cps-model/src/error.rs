use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    /// A required attribute was neither present on the agent nor supplied as
    /// a creation parameter.
    #[error("required attribute '{0}' is not declared on the agent")]
    MissingAttribute(&'static str),

    /// The agent's substrate map has no entry for the substrate this model
    /// observes.
    #[error("agent carries no substrate coupling for '{0}'")]
    MissingSubstrate(String),
}

pub type ModelResult<T> = Result<T, ModelError>;

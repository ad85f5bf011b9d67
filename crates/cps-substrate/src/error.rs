use cps_core::AgentId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SubstrateError {
    /// A dynamic node's agent lacks an attribute the coupling step requires.
    #[error("agent {agent} is registered as a substrate node but has no '{attribute}' attribute")]
    MissingAttribute {
        agent: AgentId,
        attribute: &'static str,
    },
}

pub type SubstrateResult<T> = Result<T, SubstrateError>;

use cps_sim::SimError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("history error: {0}")]
    Sim(#[from] SimError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed series row {row}: {reason}")]
    MalformedRow { row: usize, reason: String },
}

pub type OutputResult<T> = Result<T, OutputError>;

//! Framework error type.
//!
//! Sub-crates define their own error enums and convert them upward into
//! `cps-sim`'s `SimError` via `From` impls; `CoreError` covers only what
//! this crate can fail at.

use thiserror::Error;

/// Errors raised by `cps-core` primitives.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown time unit '{0}' (expected one of: ms, sec, min, hour, day, week)")]
    UnknownTimeUnit(String),
}

/// Shorthand result type for `cps-core`.
pub type CoreResult<T> = Result<T, CoreError>;

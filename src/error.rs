//! Error taxonomy
//!
//! `RoundError` covers per-event failures inside a running round. They are
//! always absorbed by the step loop or the input bridge; a bad event never
//! halts a step. `ConfigError` is fatal to round construction and is
//! returned to whoever loads the settings or level.

use thiserror::Error;

use crate::sim::physics::BodyId;
use crate::sim::state::{BlockId, RoundPhase};

/// Per-event failures inside a round (never fatal).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RoundError {
    #[error("{action} is not valid while the round is {phase:?}")]
    InvalidTransition {
        action: &'static str,
        phase: RoundPhase,
    },

    #[error("Block {0} not found")]
    BlockNotFound(BlockId),

    #[error("Body {0} not found")]
    BodyNotFound(BodyId),
}

/// Malformed settings or level data, detected at load time.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Level contains no blocks")]
    EmptyLevel,

    #[error("Two blocks occupy column {column}, row {row}")]
    DuplicateCell { column: u32, row: u32 },

    #[error("Block at column {column}, row {row} lies outside the playfield")]
    BlockOutOfBounds { column: u32, row: u32 },

    #[error("Non-finite value for {0}")]
    NonFinite(&'static str),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue {
        field: &'static str,
        message: String,
    },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

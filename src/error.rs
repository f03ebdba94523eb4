//! Error types
//!
//! None of these are fatal to the simulation: callers log them and keep going
//! with the previous phase or with default values.

use thiserror::Error;

use crate::sim::GamePhase;

/// Rejected phase change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PhaseError {
    #[error("invalid phase transition {from:?} -> {to:?}")]
    InvalidTransition { from: GamePhase, to: GamePhase },
}

/// Progress storage failure
#[derive(Debug, Error)]
pub enum PersistError {
    /// No backing store (e.g. localStorage disabled or missing)
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Stored data exists but doesn't parse
    #[error("stored progress is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Convenience alias for persistence results
pub type PersistResult<T> = Result<T, PersistError>;

/// Tuning document failure
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning document is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Value parsed but is outside its usable range
    #[error("tuning value '{name}' = {value} is outside {range}")]
    OutOfRange {
        name: &'static str,
        value: f64,
        range: &'static str,
    },
}

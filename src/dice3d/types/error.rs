//! Error types for the dice roller.

use std::path::PathBuf;

use super::DiceType;

/// Errors surfaced by roll orchestration and settings I/O.
///
/// Per-die trouble (stalls, fallback tiers) never shows up here; it is
/// absorbed by the settle detector and only logged.
#[derive(Debug, thiserror::Error)]
pub enum RollError {
    /// No die of the requested type could be created.
    #[error("no {0} dice could be spawned")]
    SpawnFailed(DiceType),

    /// A roll is still waiting for its dice to settle.
    #[error("a roll is already in progress")]
    SessionActive,

    /// There is no roll session to read from.
    #[error("no roll has been started")]
    NoSession,

    /// An outcome was requested before every die had a value.
    #[error("die {index} has no resolved value yet")]
    UnresolvedDie { index: usize },

    /// An outcome needs at least one die.
    #[error("a roll outcome needs at least one die")]
    EmptyRoll,

    #[error("failed to access settings file {path}: {source}")]
    SettingsIo {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid settings file {path}: {source}")]
    SettingsFormat {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Convenience result type for roll operations.
pub type RollResult<T> = Result<T, RollError>;

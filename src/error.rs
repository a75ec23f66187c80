use thiserror::Error;

use crate::board::Position;

/// Everything the puzzle core can refuse to do.
#[derive(Debug, Error)]
pub enum PuzzleError {
    #[error("invalid square notation: {0:?}")]
    InvalidNotation(String),
    #[error("illegal move {from} -> {to}")]
    IllegalMove { from: Position, to: Position },
    #[error("a move is still animating")]
    Busy,
    #[error("results can only be submitted from an exit square")]
    NotTerminal,
    #[error("invalid value {value:?} for {setting}")]
    InvalidSetting { setting: &'static str, value: String },
    #[error("result sink failed: {0}")]
    Sink(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PuzzleError>;

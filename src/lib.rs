// Knight Trail: a single-player puzzle on a chess board.
// Features: knight/rook/bishop movement, scoring squares, shields,
// multipliers, unlimited undo, animated moves and result submission.

pub mod animation;
pub mod board;
pub mod config;
pub mod error;
pub mod history;
pub mod movegen;
pub mod scoring;
pub mod session;
pub mod squares;
pub mod submission;
pub mod ui;

pub use board::{PieceVariant, Position};
pub use config::PuzzleConfig;
pub use error::{PuzzleError, Result};
pub use session::{MoveOutcome, Session, UndoStrategy};

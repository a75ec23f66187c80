// Runtime settings for a trail game.

use crate::animation::{BusyPolicy, DEFAULT_MOVE_DURATION, MoveDriver};
use crate::scoring::ArithmeticPolicy;
use crate::session::{Session, UndoStrategy};
use crate::submission::{DEFAULT_DISPLAY_NAME, LogSink, OutboxSink, ResultSink};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Clone, Debug, PartialEq)]
pub struct PuzzleConfig {
    pub arithmetic: ArithmeticPolicy,
    pub undo: UndoStrategy,
    pub busy: BusyPolicy,
    pub move_duration: Duration,
    /// Where submitted results go; `None` only logs them.
    pub outbox: Option<PathBuf>,
    pub default_name: String,
    /// Seed for demo autoplay.
    pub seed: u64,
    pub use_unicode: bool,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            arithmetic: ArithmeticPolicy::default(),
            undo: UndoStrategy::default(),
            busy: BusyPolicy::default(),
            move_duration: DEFAULT_MOVE_DURATION,
            outbox: None,
            default_name: DEFAULT_DISPLAY_NAME.to_string(),
            seed: 2024,
            use_unicode: true,
        }
    }
}

impl PuzzleConfig {
    pub fn new_session(&self) -> Session {
        Session::new(self.arithmetic, self.undo)
    }

    pub fn new_driver(&self) -> MoveDriver {
        MoveDriver::new(self.new_session(), self.busy, self.move_duration)
    }

    pub fn result_sink(&self) -> Box<dyn ResultSink> {
        match &self.outbox {
            Some(path) => Box::new(OutboxSink::new(path.clone())),
            None => Box::new(LogSink),
        }
    }
}

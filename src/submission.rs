// Result submission.
//
// A finished trail is reported as a name, a score and the full move
// sequence. Delivery is fire-and-forget: a failing sink is logged and the
// player never sees an error.

use crate::error::{PuzzleError, Result};
use crate::session::Session;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

pub const DEFAULT_DISPLAY_NAME: &str = "Anonymous";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub display_name: String,
    pub score: i64,
    pub move_sequence: String,
    /// SHA-256 of the three fields above, hex encoded.
    pub receipt: String,
}

impl Submission {
    pub fn new(display_name: &str, score: i64, move_sequence: String) -> Self {
        let display_name = display_name.trim().to_string();
        let receipt = Self::digest(&display_name, score, &move_sequence);
        Self {
            display_name,
            score,
            move_sequence,
            receipt,
        }
    }

    /// Build the report for a finished session. Blank names fall back to
    /// `default_name`.
    pub fn from_session(session: &Session, name: &str, default_name: &str) -> Result<Self> {
        if !session.can_submit() {
            return Err(PuzzleError::NotTerminal);
        }
        let name = if name.trim().is_empty() {
            default_name
        } else {
            name
        };
        Ok(Self::new(name, session.score(), session.history().sequence()))
    }

    fn digest(name: &str, score: i64, moves: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(name.as_bytes());
        hasher.update(b"|");
        hasher.update(score.to_string().as_bytes());
        hasher.update(b"|");
        hasher.update(moves.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    pub fn verify(&self) -> bool {
        self.receipt == Self::digest(&self.display_name, self.score, &self.move_sequence)
    }

    /// Chat-style message body: name, score line, moves line.
    pub fn message(&self) -> String {
        format!(
            "{}\nScore: {}\nMoves: {}",
            self.display_name, self.score, self.move_sequence
        )
    }
}

pub trait ResultSink {
    fn send(&mut self, submission: &Submission) -> Result<()>;
}

/// Deliver and forget. Sink failures are logged, never returned.
pub fn submit(sink: &mut dyn ResultSink, submission: &Submission) {
    match sink.send(submission) {
        Ok(()) => info!(
            "submitted {} points for {} ({})",
            submission.score, submission.display_name, submission.receipt
        ),
        Err(e) => warn!("result submission failed: {}", e),
    }
}

/// Writes the message to the log only.
#[derive(Debug, Default)]
pub struct LogSink;

impl ResultSink for LogSink {
    fn send(&mut self, submission: &Submission) -> Result<()> {
        info!("result:\n{}", submission.message());
        Ok(())
    }
}

/// Appends one JSON object per line to a local file.
#[derive(Debug)]
pub struct OutboxSink {
    path: PathBuf,
}

impl OutboxSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn read_all(&self) -> Result<Vec<Submission>> {
        let text = std::fs::read_to_string(&self.path)?;
        text.lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| serde_json::from_str(l).map_err(PuzzleError::from))
            .collect()
    }
}

impl ResultSink for OutboxSink {
    fn send(&mut self, submission: &Submission) -> Result<()> {
        let line = serde_json::to_string(submission)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", line)?;
        Ok(())
    }
}

//! Timed move animation and the driver that gates session updates on it.
//!
//! A move is only committed to the session once its animation reaches the
//! final frame, so what is drawn and what is scored never disagree. Time is
//! passed in by the host (`now` is any monotonic offset) which keeps the
//! driver deterministic under test.
//!
//! While a move is animating further requests follow a [`BusyPolicy`]:
//! they are either refused, or the newest one is held and played right
//! after the running move commits, provided it is still legal then.

use crate::board::Position;
use crate::error::{PuzzleError, Result};
use crate::session::{MoveOutcome, Session};
use log::{debug, warn};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_MOVE_DURATION: Duration = Duration::from_millis(300);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum BusyPolicy {
    #[default]
    Reject,
    QueueOne,
}

impl FromStr for BusyPolicy {
    type Err = PuzzleError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(BusyPolicy::Reject),
            "queue" | "queue-one" => Ok(BusyPolicy::QueueOne),
            _ => Err(PuzzleError::InvalidSetting {
                setting: "busy",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for BusyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BusyPolicy::Reject => "reject",
            BusyPolicy::QueueOne => "queue",
        })
    }
}

// =====================
// Interpolation
// =====================

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Frame {
    /// Fractional board coordinates of the piece in flight.
    Moving { row: f64, col: f64, progress: f64 },
    Finished,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MoveAnimation {
    pub from: Position,
    pub to: Position,
    started: Duration,
    duration: Duration,
}

impl MoveAnimation {
    pub fn new(from: Position, to: Position, started: Duration, duration: Duration) -> Self {
        Self {
            from,
            to,
            started,
            duration,
        }
    }

    pub fn progress(&self, now: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.started);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    pub fn frame(&self, now: Duration) -> Frame {
        let progress = self.progress(now);
        if progress >= 1.0 {
            return Frame::Finished;
        }
        let lerp = |a: u8, b: u8| a as f64 + (b as f64 - a as f64) * progress;
        Frame::Moving {
            row: lerp(self.from.row, self.to.row),
            col: lerp(self.from.col, self.to.col),
            progress,
        }
    }
}

// =====================
// Driver
// =====================

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Request {
    Started,
    Queued,
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct Tick {
    pub frame: Option<Frame>,
    pub committed: Option<MoveOutcome>,
}

pub struct MoveDriver {
    session: Session,
    animation: Option<MoveAnimation>,
    queued: Option<Position>,
    policy: BusyPolicy,
    duration: Duration,
}

impl MoveDriver {
    pub fn new(session: Session, policy: BusyPolicy, duration: Duration) -> Self {
        Self {
            session,
            animation: None,
            queued: None,
            policy,
            duration,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn policy(&self) -> BusyPolicy {
        self.policy
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    pub fn queued(&self) -> Option<Position> {
        self.queued
    }

    pub fn request_move(&mut self, to: Position, now: Duration) -> Result<Request> {
        if self.animation.is_some() {
            return match self.policy {
                BusyPolicy::Reject => Err(PuzzleError::Busy),
                BusyPolicy::QueueOne => {
                    if let Some(old) = self.queued.replace(to) {
                        debug!("queued move {} replaced by {}", old, to);
                    }
                    Ok(Request::Queued)
                }
            };
        }
        self.start(to, now)?;
        Ok(Request::Started)
    }

    fn start(&mut self, to: Position, now: Duration) -> Result<()> {
        let from = self.session.position();
        if !self.session.is_legal(to) {
            return Err(PuzzleError::IllegalMove { from, to });
        }
        self.animation = Some(MoveAnimation::new(from, to, now, self.duration));
        Ok(())
    }

    /// Advance the running animation. The move is committed on the frame
    /// that finishes it.
    pub fn tick(&mut self, now: Duration) -> Tick {
        let Some(anim) = self.animation else {
            return Tick::default();
        };
        let frame = anim.frame(now);
        if frame != Frame::Finished {
            return Tick {
                frame: Some(frame),
                committed: None,
            };
        }

        self.animation = None;
        let committed = match self.session.apply_move(anim.to) {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                warn!("animated move could not be committed: {}", e);
                None
            }
        };

        if let Some(next) = self.queued.take() {
            if let Err(e) = self.start(next, now) {
                debug!("dropped queued move: {}", e);
            }
        }

        Tick {
            frame: Some(frame),
            committed,
        }
    }

    pub fn undo(&mut self) -> Result<bool> {
        if self.is_animating() {
            return Err(PuzzleError::Busy);
        }
        Ok(self.session.undo())
    }

    pub fn reset(&mut self) -> Result<()> {
        if self.is_animating() {
            return Err(PuzzleError::Busy);
        }
        self.queued = None;
        self.session.reset();
        Ok(())
    }
}

//! Game session: the single value every move, undo and reset goes through.
//!
//! A session owns the piece (square + variant), the score state and the move
//! log. Transitions never touch a display; they return a [`MoveOutcome`]
//! which front ends render however they like.
//!
//! Undo has two interchangeable strategies:
//! - `Replay` rebuilds the whole game from the starting square through the
//!   normal move pipeline. This is the reference behaviour.
//! - `Snapshot` pops a per-move record holding the state from before that
//!   move. It must always agree with `Replay`.

use crate::board::{PieceVariant, Position};
use crate::error::{PuzzleError, Result};
use crate::history::MoveHistory;
use crate::movegen::legal_moves;
use crate::scoring::{ArithmeticPolicy, ScoreBreakdown, ScoreState, score_move};
use crate::squares::{START, is_terminal, transformation};
use log::{debug, info};
use std::fmt;
use std::str::FromStr;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum UndoStrategy {
    #[default]
    Replay,
    Snapshot,
}

impl FromStr for UndoStrategy {
    type Err = PuzzleError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "replay" => Ok(UndoStrategy::Replay),
            "snapshot" => Ok(UndoStrategy::Snapshot),
            _ => Err(PuzzleError::InvalidSetting {
                setting: "undo",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for UndoStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UndoStrategy::Replay => "replay",
            UndoStrategy::Snapshot => "snapshot",
        })
    }
}

/// State needed to step back over one move without a replay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct MoveRecord {
    variant_before: PieceVariant,
    shield_before: u32,
    pending_before: u32,
    newly_visited: Option<Position>,
}

/// Result of one committed move.
#[derive(Clone, Debug, PartialEq)]
pub struct MoveOutcome {
    pub from: Position,
    pub to: Position,
    pub score: ScoreBreakdown,
    /// Variant for the next move.
    pub variant: PieceVariant,
    pub can_submit: bool,
}

impl fmt::Display for MoveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{} score {} ({:+})",
            self.from,
            self.to,
            self.score.score_after,
            self.score.delta()
        )
    }
}

/// What the board renderer needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderView {
    pub position: Position,
    pub variant: PieceVariant,
    pub visited: Vec<Position>,
    pub legal_moves: Vec<Position>,
}

/// What the status line needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusView {
    pub variant: PieceVariant,
    pub shield: u32,
    pub pending_multiplier: u32,
}

impl StatusView {
    pub fn piece_label(&self) -> String {
        format!("Current piece: {}", self.variant)
    }

    /// "[n]" while a shield is up, empty otherwise.
    pub fn shield_label(&self) -> String {
        if self.shield > 0 {
            format!("[{}]", self.shield)
        } else {
            String::new()
        }
    }

    /// "Xn" while a multiplier is armed, empty otherwise.
    pub fn multiplier_label(&self) -> String {
        if self.pending_multiplier > 0 {
            format!("X{}", self.pending_multiplier)
        } else {
            String::new()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    position: Position,
    variant: PieceVariant,
    scoring: ScoreState,
    history: MoveHistory,
    can_submit: bool,
    records: Vec<MoveRecord>,
    arithmetic: ArithmeticPolicy,
    undo_strategy: UndoStrategy,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(ArithmeticPolicy::default(), UndoStrategy::default())
    }
}

impl Session {
    pub fn new(arithmetic: ArithmeticPolicy, undo_strategy: UndoStrategy) -> Self {
        Self {
            position: START,
            variant: PieceVariant::Knight,
            scoring: ScoreState::default(),
            history: MoveHistory::new(START),
            can_submit: false,
            records: Vec::new(),
            arithmetic,
            undo_strategy,
        }
    }

    // =====================
    // Accessors
    // =====================

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn variant(&self) -> PieceVariant {
        self.variant
    }

    pub fn score(&self) -> i64 {
        self.scoring.score
    }

    pub fn shield(&self) -> u32 {
        self.scoring.shield
    }

    pub fn pending_multiplier(&self) -> u32 {
        self.scoring.pending_multiplier
    }

    pub fn history(&self) -> &MoveHistory {
        &self.history
    }

    pub fn can_submit(&self) -> bool {
        self.can_submit
    }

    pub fn is_visited(&self, pos: Position) -> bool {
        self.scoring.visited.contains(&pos)
    }

    pub fn visited(&self) -> impl Iterator<Item = Position> + '_ {
        self.scoring.visited.iter().copied()
    }

    pub fn arithmetic(&self) -> ArithmeticPolicy {
        self.arithmetic
    }

    pub fn undo_strategy(&self) -> UndoStrategy {
        self.undo_strategy
    }

    pub fn legal_moves(&self) -> Vec<Position> {
        legal_moves(self.position, self.variant)
    }

    pub fn is_legal(&self, to: Position) -> bool {
        self.legal_moves().contains(&to)
    }

    pub fn render_view(&self) -> RenderView {
        RenderView {
            position: self.position,
            variant: self.variant,
            visited: self.visited().collect(),
            legal_moves: self.legal_moves(),
        }
    }

    pub fn status(&self) -> StatusView {
        StatusView {
            variant: self.variant,
            shield: self.scoring.shield,
            pending_multiplier: self.scoring.pending_multiplier,
        }
    }

    // =====================
    // Transitions
    // =====================

    /// Play the piece to `to`. Illegal destinations leave the session
    /// untouched.
    pub fn apply_move(&mut self, to: Position) -> Result<MoveOutcome> {
        if !self.is_legal(to) {
            return Err(PuzzleError::IllegalMove {
                from: self.position,
                to,
            });
        }
        Ok(self.commit(to))
    }

    /// Copying variant of [`Session::apply_move`].
    pub fn with_move(&self, to: Position) -> Result<(Session, MoveOutcome)> {
        let mut next = self.clone();
        let outcome = next.apply_move(to)?;
        Ok((next, outcome))
    }

    fn commit(&mut self, to: Position) -> MoveOutcome {
        let from = self.position;
        let shield_before = self.scoring.shield;
        let pending_before = self.scoring.pending_multiplier;
        let variant_before = self.variant;

        let breakdown = score_move(&mut self.scoring, to, self.arithmetic);

        self.position = to;
        self.variant = transformation(to);
        self.can_submit = is_terminal(to);
        self.history.push(to, self.scoring.score);
        self.records.push(MoveRecord {
            variant_before,
            shield_before,
            pending_before,
            newly_visited: breakdown.newly_visited.then_some(to),
        });

        debug!(
            "move {}-{}: score {} -> {}, shield {}, pending x{}, next {}",
            from,
            to,
            breakdown.score_before,
            breakdown.score_after,
            self.scoring.shield,
            self.scoring.pending_multiplier,
            self.variant
        );

        MoveOutcome {
            from,
            to,
            score: breakdown,
            variant: self.variant,
            can_submit: self.can_submit,
        }
    }

    /// Take back the newest move. Returns `false` when only the starting
    /// square is left.
    pub fn undo(&mut self) -> bool {
        if self.history.at_start() {
            return false;
        }
        match self.undo_strategy {
            UndoStrategy::Replay => self.undo_by_replay(),
            UndoStrategy::Snapshot => self.undo_by_snapshot(),
        }
        self.can_submit = is_terminal(self.position);
        debug!(
            "undo ({}) -> {} score {}",
            self.undo_strategy, self.position, self.scoring.score
        );
        true
    }

    fn undo_by_replay(&mut self) {
        let mut remaining = self.history.clone();
        remaining.pop();
        let mut rebuilt = Session::new(self.arithmetic, self.undo_strategy);
        for to in remaining.moves().skip(1) {
            rebuilt.commit(to);
        }
        *self = rebuilt;
    }

    fn undo_by_snapshot(&mut self) {
        if self.history.pop().is_none() {
            return;
        }
        let Some(record) = self.records.pop() else {
            return;
        };
        self.position = self.history.current().unwrap_or(START);
        self.variant = record.variant_before;
        self.scoring.score = self.history.last_score();
        self.scoring.shield = record.shield_before;
        self.scoring.pending_multiplier = record.pending_before;
        if let Some(pos) = record.newly_visited {
            self.scoring.visited.remove(&pos);
        }
    }

    /// Back to the starting square with a clean slate. Policies are kept.
    pub fn reset(&mut self) {
        *self = Session::new(self.arithmetic, self.undo_strategy);
        info!("session reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::from_notation;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;

    fn sq(s: &str) -> Position {
        from_notation(s).unwrap()
    }

    fn play(session: &mut Session, moves: &[&str]) {
        for m in moves {
            session
                .apply_move(sq(m))
                .unwrap_or_else(|e| panic!("{} rejected: {}", m, e));
        }
    }

    fn both() -> [Session; 2] {
        [
            Session::new(ArithmeticPolicy::Exact, UndoStrategy::Replay),
            Session::new(ArithmeticPolicy::Exact, UndoStrategy::Snapshot),
        ]
    }

    // Everything a player can observe, without the policy fields.
    fn observable(s: &Session) -> (Position, PieceVariant, i64, u32, u32, Vec<Position>, String, bool) {
        (
            s.position(),
            s.variant(),
            s.score(),
            s.shield(),
            s.pending_multiplier(),
            s.visited().collect(),
            s.history().text(),
            s.can_submit(),
        )
    }

    #[test]
    fn fresh_session_state() {
        let s = Session::default();
        assert_eq!(s.position(), sq("b1"));
        assert_eq!(s.variant(), PieceVariant::Knight);
        assert_eq!(s.score(), 0);
        assert_eq!(s.history().text(), "b1");
        assert_eq!(s.history().scores(), &[0]);
        assert!(!s.can_submit());
    }

    #[test]
    fn undo_on_fresh_session_is_noop() {
        for mut s in both() {
            let before = s.clone();
            assert!(!s.undo());
            assert_eq!(s, before);
        }
    }

    #[test]
    fn illegal_move_leaves_session_untouched() {
        let mut s = Session::default();
        let before = s.clone();
        let err = s.apply_move(sq("b3")).unwrap_err();
        assert!(matches!(err, PuzzleError::IllegalMove { .. }));
        assert_eq!(s, before);
    }

    #[test]
    fn trail_to_exit_through_bishop() {
        for mut s in both() {
            play(&mut s, &["c3"]);
            assert_eq!(s.score(), 100);
            let out = s.apply_move(sq("e4")).unwrap();
            assert_eq!(out.variant, PieceVariant::Bishop);
            assert_eq!(s.score(), 90);
            assert!(s.is_legal(sq("a8")));

            let out = s.apply_move(sq("a8")).unwrap();
            assert!(out.can_submit);
            assert!(!out.score.penalty_applied);
            assert_eq!(s.score(), 90);
            assert!(s.legal_moves().is_empty());

            assert!(s.undo());
            assert_eq!(s.position(), sq("e4"));
            assert_eq!(s.variant(), PieceVariant::Bishop);
            assert_eq!(s.score(), 90);
            assert!(!s.can_submit());
        }
    }

    #[test]
    fn rook_transformation_lasts_one_move() {
        let mut s = Session::default();
        // b1 -> c3 -> d1 (rook trigger) -> d8 as a rook -> knight again.
        play(&mut s, &["c3", "d1"]);
        assert_eq!(s.variant(), PieceVariant::Rook);
        play(&mut s, &["d8"]);
        assert_eq!(s.variant(), PieceVariant::Knight);
    }

    #[test]
    fn ninth_entry_wraps_history_row() {
        let mut s = Session::default();
        play(&mut s, &["c3", "b1", "c3", "b1", "c3", "b1", "c3"]);
        assert_eq!(s.history().rows().len(), 1);
        assert_eq!(s.history().rows()[0].len(), 8);
        play(&mut s, &["b1"]);
        assert_eq!(s.history().rows().len(), 2);
        assert_eq!(s.history().rows()[0].len(), 8);

        assert!(s.undo());
        assert_eq!(s.history().rows().len(), 1);
    }

    #[test]
    fn special_square_refires_only_after_undo() {
        for mut s in both() {
            play(&mut s, &["d2"]);
            assert_eq!(s.score(), 100);
            assert!(s.undo());
            assert!(!s.is_visited(sq("d2")));
            play(&mut s, &["d2"]);
            assert_eq!(s.score(), 100);

            // Without an undo the second visit only decays.
            play(&mut s, &["b1", "d2"]);
            assert_eq!(s.score(), 90);
        }
    }

    #[test]
    fn snapshot_keeps_square_visited_by_an_earlier_move() {
        let mut s = Session::new(ArithmeticPolicy::Exact, UndoStrategy::Snapshot);
        play(&mut s, &["d2", "b1", "d2"]);
        assert!(s.undo());
        assert!(s.is_visited(sq("d2")));
    }

    #[test]
    fn multiplier_is_consumed_by_the_next_move_only() {
        let mut s = Session::default();
        // d2 (100), then f3 arms x2 for the award on g1.
        play(&mut s, &["d2", "f3"]);
        assert_eq!(s.pending_multiplier(), 2);
        assert_eq!(s.status().multiplier_label(), "X2");
        let out = s.apply_move(sq("g1")).unwrap();
        assert_eq!(out.score.special_points, Some(200));
        assert_eq!(s.pending_multiplier(), 0);
        assert_eq!(s.status().multiplier_label(), "");
    }

    #[test]
    fn reset_restores_start_and_keeps_policies() {
        let mut s = Session::new(ArithmeticPolicy::Integer, UndoStrategy::Snapshot);
        play(&mut s, &["c3", "e4"]);
        s.reset();
        assert_eq!(s, Session::new(ArithmeticPolicy::Integer, UndoStrategy::Snapshot));
    }

    #[test]
    fn status_labels() {
        let status = StatusView {
            variant: PieceVariant::Rook,
            shield: 3,
            pending_multiplier: 0,
        };
        assert_eq!(status.piece_label(), "Current piece: Rook");
        assert_eq!(status.shield_label(), "[3]");
        assert_eq!(status.multiplier_label(), "");
    }

    #[test]
    fn render_view_matches_session() {
        let mut s = Session::default();
        play(&mut s, &["d2"]);
        let view = s.render_view();
        assert_eq!(view.position, sq("d2"));
        assert_eq!(view.visited, vec![sq("d2")]);
        assert_eq!(view.legal_moves, s.legal_moves());
    }

    #[test]
    fn undo_inverts_every_move_of_random_walks() {
        for seed in 0..40u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            for mut s in both() {
                for _ in 0..60 {
                    let moves = s.legal_moves();
                    let Some(&to) = moves.choose(&mut rng) else {
                        break;
                    };
                    let before = s.clone();
                    let (mut after, _) = s.with_move(to).unwrap();
                    assert!(after.undo());
                    assert_eq!(after, before, "seed {} move {}", seed, to);
                    s.apply_move(to).unwrap();
                }
            }
        }
    }

    #[test]
    fn undo_strategies_agree() {
        for seed in 100..130u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let [mut replay, mut snapshot] = both();
            for _ in 0..40 {
                let moves = replay.legal_moves();
                let Some(&to) = moves.choose(&mut rng) else {
                    break;
                };
                replay.apply_move(to).unwrap();
                snapshot.apply_move(to).unwrap();
            }
            while replay.undo() {
                assert!(snapshot.undo());
                assert_eq!(observable(&replay), observable(&snapshot), "seed {}", seed);
            }
            assert!(!snapshot.undo());
        }
    }
}

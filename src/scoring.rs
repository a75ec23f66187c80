//! Score pipeline for one committed move.
//!
//! The steps run in a fixed order because they interact:
//! 1. arm the multiplier for the *next* move (never this one)
//! 2. apply the 10% decay unless the square is exempt or a shield is up
//! 3. tick the shield down, then let the square grant a fresh shield
//! 4. apply an unvisited bonus factor
//! 5. award unvisited special points, scaled by the multiplier armed on the
//!    previous move
//! 6. round to the stored integer score
//!
//! Intermediate rounding is governed by [`ArithmeticPolicy`].

use crate::board::Position;
use crate::error::PuzzleError;
use crate::squares::{
    bonus_factor, is_penalty_free, multiplier_trigger, shield_trigger, special_points,
};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

pub const DECAY: f64 = 0.9;

/// How intermediate values are rounded between pipeline steps.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum ArithmeticPolicy {
    /// Full precision until the final per-move rounding.
    #[default]
    Exact,
    /// Whole numbers after every multiply or add.
    Integer,
}

impl ArithmeticPolicy {
    fn settle(self, value: f64) -> f64 {
        match self {
            ArithmeticPolicy::Exact => value,
            ArithmeticPolicy::Integer => value.round(),
        }
    }
}

impl FromStr for ArithmeticPolicy {
    type Err = PuzzleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exact" => Ok(ArithmeticPolicy::Exact),
            "integer" | "int" => Ok(ArithmeticPolicy::Integer),
            _ => Err(PuzzleError::InvalidSetting {
                setting: "arithmetic",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ArithmeticPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ArithmeticPolicy::Exact => "exact",
            ArithmeticPolicy::Integer => "integer",
        })
    }
}

/// The part of a session the score pipeline reads and writes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScoreState {
    pub score: i64,
    /// Moves left during which the decay is suppressed.
    pub shield: u32,
    /// Multiplier for the next special-square award, 0 when unarmed.
    pub pending_multiplier: u32,
    /// Special and bonus squares already collected.
    pub visited: BTreeSet<Position>,
}

/// Everything one pass of the pipeline did, for displays and logs.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoreBreakdown {
    pub score_before: i64,
    pub score_after: i64,
    pub penalty_applied: bool,
    pub shield_granted: Option<u32>,
    pub multiplier_armed: Option<u32>,
    pub multiplier_used: Option<u32>,
    pub bonus_factor: Option<f64>,
    pub special_points: Option<u32>,
    /// The destination was marked visited by this move.
    pub newly_visited: bool,
}

impl ScoreBreakdown {
    pub fn delta(&self) -> i64 {
        self.score_after - self.score_before
    }
}

pub fn score_move(state: &mut ScoreState, dest: Position, policy: ArithmeticPolicy) -> ScoreBreakdown {
    let score_before = state.score;
    let incoming_multiplier = state.pending_multiplier;
    let multiplier_armed = multiplier_trigger(dest);

    let mut score = score_before as f64;

    let penalty_applied = !is_penalty_free(dest) && state.shield == 0;
    if penalty_applied {
        score = policy.settle(score * DECAY);
    }

    // The shield is read above before it ticks down.
    if state.shield > 0 {
        state.shield -= 1;
    }
    let shield_granted = shield_trigger(dest);
    if let Some(moves) = shield_granted {
        state.shield = moves;
    }

    let already_visited = state.visited.contains(&dest);

    let bonus = if already_visited { None } else { bonus_factor(dest) };
    if let Some(factor) = bonus {
        score = policy.settle(score * factor);
    }

    let mut multiplier_used = None;
    let special = if already_visited {
        None
    } else {
        special_points(dest).map(|base| {
            if incoming_multiplier > 0 {
                multiplier_used = Some(incoming_multiplier);
                base * incoming_multiplier
            } else {
                base
            }
        })
    };
    if let Some(points) = special {
        score = policy.settle(score + points as f64);
    }

    let newly_visited = bonus.is_some() || special.is_some();
    if newly_visited {
        state.visited.insert(dest);
    }

    state.score = score.round() as i64;
    // Whatever was armed before this move expires here.
    state.pending_multiplier = multiplier_armed.unwrap_or(0);

    ScoreBreakdown {
        score_before,
        score_after: state.score,
        penalty_applied,
        shield_granted,
        multiplier_armed,
        multiplier_used,
        bonus_factor: bonus,
        special_points: special,
        newly_visited,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::from_notation;

    fn sq(s: &str) -> Position {
        from_notation(s).unwrap()
    }

    fn with_score(score: i64) -> ScoreState {
        ScoreState {
            score,
            ..ScoreState::default()
        }
    }

    #[test]
    fn bonus_square_after_decay() {
        let mut st = with_score(1000);
        let b = score_move(&mut st, sq("a1"), ArithmeticPolicy::Exact);
        assert!(b.penalty_applied);
        assert_eq!(b.bonus_factor, Some(1.7));
        assert_eq!(st.score, 1530);
        assert!(st.visited.contains(&sq("a1")));
    }

    #[test]
    fn bonus_fires_once() {
        let mut st = with_score(1000);
        score_move(&mut st, sq("a1"), ArithmeticPolicy::Exact);
        let b = score_move(&mut st, sq("a1"), ArithmeticPolicy::Exact);
        assert_eq!(b.bonus_factor, None);
        assert_eq!(st.score, 1377);
    }

    #[test]
    fn pending_multiplier_scales_special_award() {
        let mut st = with_score(0);
        st.pending_multiplier = 3;
        let b = score_move(&mut st, sq("b8"), ArithmeticPolicy::Exact);
        assert_eq!(b.special_points, Some(1800));
        assert_eq!(b.multiplier_used, Some(3));
        assert_eq!(st.score, 1800);
        assert_eq!(st.pending_multiplier, 0);
    }

    #[test]
    fn multiplier_armed_by_this_move_waits_for_the_next() {
        let mut st = with_score(0);
        let b = score_move(&mut st, sq("h1"), ArithmeticPolicy::Exact);
        assert_eq!(b.multiplier_armed, Some(3));
        assert_eq!(st.pending_multiplier, 3);
    }

    #[test]
    fn pending_multiplier_expires_without_a_special_square() {
        let mut st = with_score(100);
        st.pending_multiplier = 2;
        score_move(&mut st, sq("e2"), ArithmeticPolicy::Exact);
        assert_eq!(st.pending_multiplier, 0);
        let b = score_move(&mut st, sq("d4"), ArithmeticPolicy::Exact);
        assert_eq!(b.special_points, Some(200));
    }

    #[test]
    fn shield_suppresses_decay_for_its_duration() {
        let mut st = with_score(1000);
        // a4 itself is not exempt, so the decay still applies on landing.
        let b = score_move(&mut st, sq("a4"), ArithmeticPolicy::Exact);
        assert!(b.penalty_applied);
        assert_eq!(st.score, 900);
        assert_eq!(st.shield, 2);

        assert!(!score_move(&mut st, sq("b6"), ArithmeticPolicy::Exact).penalty_applied);
        assert_eq!(st.shield, 1);
        let before = st.score;
        assert!(!score_move(&mut st, sq("a4"), ArithmeticPolicy::Exact).penalty_applied);
        // Landing on a4 again re-grants the shield after the tick.
        assert_eq!(st.shield, 2);
        assert_eq!(st.score, before);
    }

    #[test]
    fn shield_runs_out_on_third_move() {
        let mut st = with_score(1000);
        score_move(&mut st, sq("a4"), ArithmeticPolicy::Exact);
        assert!(!score_move(&mut st, sq("e3"), ArithmeticPolicy::Exact).penalty_applied);
        assert!(!score_move(&mut st, sq("g6"), ArithmeticPolicy::Exact).penalty_applied);
        assert!(score_move(&mut st, sq("h4"), ArithmeticPolicy::Exact).penalty_applied);
    }

    #[test]
    fn exempt_squares_skip_decay() {
        let mut st = with_score(1000);
        let b = score_move(&mut st, sq("c2"), ArithmeticPolicy::Exact);
        assert!(!b.penalty_applied);
        assert_eq!(st.score, 1000);
    }

    #[test]
    fn special_square_fires_once() {
        let mut st = with_score(0);
        score_move(&mut st, sq("d4"), ArithmeticPolicy::Exact);
        assert_eq!(st.score, 200);
        let b = score_move(&mut st, sq("d4"), ArithmeticPolicy::Exact);
        assert_eq!(b.special_points, None);
        assert_eq!(st.score, 180);
    }

    #[test]
    fn policies_only_differ_in_intermediate_rounding() {
        // 333 * 0.9 = 299.7, * 1.3 = 389.61
        let run = |policy| {
            let mut st = with_score(333);
            score_move(&mut st, sq("e5"), policy);
            st.score
        };
        assert_eq!(run(ArithmeticPolicy::Exact), 390);
        // 299.7 -> 300, * 1.3 = 390
        assert_eq!(run(ArithmeticPolicy::Integer), 390);

        // 15 * 0.9 = 13.5; exact keeps 13.5 * 1.2 = 16.2, integer rounds to 14 first.
        let run = |policy| {
            let mut st = with_score(15);
            score_move(&mut st, sq("e3"), policy);
            st.score
        };
        assert_eq!(run(ArithmeticPolicy::Exact), 16);
        assert_eq!(run(ArithmeticPolicy::Integer), 17);
    }

    #[test]
    fn policy_parsing() {
        assert_eq!("Integer".parse::<ArithmeticPolicy>().unwrap(), ArithmeticPolicy::Integer);
        // A two-decimal mode never differs from exact: scores are whole
        // before every move and one decay plus one factor stays within cents.
        assert!("cents".parse::<ArithmeticPolicy>().is_err());
        assert!("fuzzy".parse::<ArithmeticPolicy>().is_err());
        assert_eq!(ArithmeticPolicy::Integer.to_string(), "integer");
    }
}

//! Fixed rule tables of the trail board.
//!
//! Every rule is keyed by square notation. The tables never change during a
//! game; per-game state (which squares were already collected) lives in the
//! session.

use crate::board::{PieceVariant, Position};

/// Where every game begins.
pub const START: Position = Position::at(7, 1); // b1

/// Exit squares. Once the piece stands on one the game is over.
pub const TERMINAL_SQUARES: [&str; 4] = ["a8", "c8", "e8", "g8"];

pub const SPECIAL_SQUARES: [(&str, u32); 20] = [
    ("a3", 100),
    ("a5", 300),
    ("a7", 200),
    ("b8", 600),
    ("c1", 200),
    ("c3", 100),
    ("c5", 100),
    ("d2", 100),
    ("d4", 200),
    ("d6", 100),
    ("d8", 600),
    ("f2", 200),
    ("f4", 300),
    ("f6", 200),
    ("f8", 600),
    ("g1", 100),
    ("g7", 200),
    ("h2", 200),
    ("h4", 200),
    ("h8", 600),
];

pub const BONUS_SQUARES: [(&str, f64); 10] = [
    ("a1", 1.7),
    ("b2", 1.2),
    ("b6", 1.3),
    ("c7", 1.2),
    ("e1", 1.3),
    ("e3", 1.2),
    ("e5", 1.3),
    ("e7", 1.3),
    ("g5", 1.2),
    ("h6", 1.3),
];

pub const MULTIPLIER_SQUARES: [(&str, u32); 7] = [
    ("a6", 2),
    ("b3", 2),
    ("e6", 2),
    ("f3", 2),
    ("h5", 2),
    ("f7", 3),
    ("h1", 3),
];

pub const SHIELD_SQUARES: [(&str, u32); 8] = [
    ("a4", 2),
    ("d3", 2),
    ("d5", 2),
    ("f1", 2),
    ("h7", 2),
    ("a2", 3),
    ("b7", 3),
    ("g4", 3),
];

pub const NO_PENALTY_SQUARES: [&str; 13] = [
    "b1", "b5", "c2", "c4", "c6", "e2", "f5", "g2", "h3", "a8", "c8", "e8", "g8",
];

pub const BISHOP_TRIGGERS: [&str; 3] = ["b4", "e4", "g3"];
pub const ROOK_TRIGGERS: [&str; 3] = ["d1", "d7", "g6"];

fn lookup<T: Copy>(table: &[(&str, T)], pos: Position) -> Option<T> {
    let n = pos.notation();
    table.iter().find(|(sq, _)| n == *sq).map(|&(_, v)| v)
}

fn listed(table: &[&str], pos: Position) -> bool {
    let n = pos.notation();
    table.iter().any(|sq| n == *sq)
}

pub fn is_terminal(pos: Position) -> bool {
    listed(&TERMINAL_SQUARES, pos)
}

pub fn special_points(pos: Position) -> Option<u32> {
    lookup(&SPECIAL_SQUARES, pos)
}

pub fn bonus_factor(pos: Position) -> Option<f64> {
    lookup(&BONUS_SQUARES, pos)
}

pub fn multiplier_trigger(pos: Position) -> Option<u32> {
    lookup(&MULTIPLIER_SQUARES, pos)
}

pub fn shield_trigger(pos: Position) -> Option<u32> {
    lookup(&SHIELD_SQUARES, pos)
}

pub fn is_penalty_free(pos: Position) -> bool {
    listed(&NO_PENALTY_SQUARES, pos)
}

/// The variant the piece takes for the move after landing on `pos`.
pub fn transformation(pos: Position) -> PieceVariant {
    if listed(&BISHOP_TRIGGERS, pos) {
        PieceVariant::Bishop
    } else if listed(&ROOK_TRIGGERS, pos) {
        PieceVariant::Rook
    } else {
        PieceVariant::Knight
    }
}

/// What a square does, for legends and board markers.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SquareRule {
    Terminal,
    Special(u32),
    Bonus(f64),
    Multiplier(u32),
    Shield(u32),
    Transform(PieceVariant),
    Plain,
}

pub fn rule_of(pos: Position) -> SquareRule {
    if is_terminal(pos) {
        return SquareRule::Terminal;
    }
    if let Some(points) = special_points(pos) {
        return SquareRule::Special(points);
    }
    if let Some(factor) = bonus_factor(pos) {
        return SquareRule::Bonus(factor);
    }
    if let Some(m) = multiplier_trigger(pos) {
        return SquareRule::Multiplier(m);
    }
    if let Some(s) = shield_trigger(pos) {
        return SquareRule::Shield(s);
    }
    match transformation(pos) {
        PieceVariant::Knight => SquareRule::Plain,
        v => SquareRule::Transform(v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::from_notation;

    fn sq(s: &str) -> Position {
        from_notation(s).unwrap()
    }

    #[test]
    fn start_is_b1_and_penalty_free() {
        assert_eq!(START.notation(), "b1");
        assert!(is_penalty_free(START));
        assert!(!is_terminal(START));
    }

    #[test]
    fn every_table_entry_is_a_valid_square() {
        let names = TERMINAL_SQUARES
            .iter()
            .chain(NO_PENALTY_SQUARES.iter())
            .chain(BISHOP_TRIGGERS.iter())
            .chain(ROOK_TRIGGERS.iter())
            .copied()
            .chain(SPECIAL_SQUARES.iter().map(|(s, _)| *s))
            .chain(BONUS_SQUARES.iter().map(|(s, _)| *s))
            .chain(MULTIPLIER_SQUARES.iter().map(|(s, _)| *s))
            .chain(SHIELD_SQUARES.iter().map(|(s, _)| *s));
        for name in names {
            assert!(from_notation(name).is_ok(), "{} is not a square", name);
        }
    }

    #[test]
    fn lookups() {
        assert_eq!(special_points(sq("b8")), Some(600));
        assert_eq!(special_points(sq("a1")), None);
        assert_eq!(bonus_factor(sq("a1")), Some(1.7));
        assert_eq!(multiplier_trigger(sq("h1")), Some(3));
        assert_eq!(multiplier_trigger(sq("a6")), Some(2));
        assert_eq!(shield_trigger(sq("a4")), Some(2));
        assert_eq!(shield_trigger(sq("g4")), Some(3));
        assert!(is_terminal(sq("e8")));
        assert!(!is_terminal(sq("b8")));
    }

    #[test]
    fn transformations() {
        assert_eq!(transformation(sq("e4")), PieceVariant::Bishop);
        assert_eq!(transformation(sq("g6")), PieceVariant::Rook);
        assert_eq!(transformation(sq("c3")), PieceVariant::Knight);
    }

    #[test]
    fn rules_for_legend() {
        assert_eq!(rule_of(sq("a8")), SquareRule::Terminal);
        assert_eq!(rule_of(sq("d8")), SquareRule::Special(600));
        assert_eq!(rule_of(sq("d7")), SquareRule::Transform(PieceVariant::Rook));
        assert_eq!(rule_of(sq("b1")), SquareRule::Plain);
    }
}

// Board coordinates, square notation and the piece variants the trail piece
// can take.
//
// Row 0 is rank 8 and column 0 is file 'a', so the board reads top-down the
// way it is drawn.

use crate::error::{PuzzleError, Result};
use std::fmt;
use std::str::FromStr;

pub const BOARD_SIZE: u8 = 8;
const FILES: &[u8; 8] = b"abcdefgh";

// =====================
// Position
// =====================

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    /// Bounds-checked constructor.
    pub fn new(row: u8, col: u8) -> Option<Position> {
        if on_board(row as i32, col as i32) {
            Some(Position { row, col })
        } else {
            None
        }
    }

    /// Constructor for table constants; the caller guarantees the bounds.
    pub const fn at(row: u8, col: u8) -> Position {
        debug_assert!(row < BOARD_SIZE && col < BOARD_SIZE);
        Position { row, col }
    }

    /// Position shifted by a signed offset, if it stays on the board.
    pub fn offset(self, dr: i32, dc: i32) -> Option<Position> {
        let r = self.row as i32 + dr;
        let c = self.col as i32 + dc;
        if on_board(r, c) {
            Some(Position::at(r as u8, c as u8))
        } else {
            None
        }
    }

    pub fn notation(self) -> Notation {
        Notation([FILES[self.col as usize], b'0' + (BOARD_SIZE - self.row)])
    }

    /// Parse "b1" style notation. Surrounding whitespace and an upper-case
    /// file letter are accepted.
    pub fn from_notation(s: &str) -> Result<Position> {
        let t = s.trim();
        let bytes = t.as_bytes();
        if bytes.len() != 2 {
            return Err(PuzzleError::InvalidNotation(s.to_string()));
        }
        let f = bytes[0].to_ascii_lowercase();
        let rch = bytes[1];
        if !(b'a'..=b'h').contains(&f) || !(b'1'..=b'8').contains(&rch) {
            return Err(PuzzleError::InvalidNotation(s.to_string()));
        }
        let col = f - b'a';
        let rank = rch - b'0';
        Ok(Position::at(BOARD_SIZE - rank, col))
    }

    /// All 64 squares, row-major from a8.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..BOARD_SIZE).flat_map(|row| (0..BOARD_SIZE).map(move |col| Position::at(row, col)))
    }

    pub fn is_light(self) -> bool {
        (self.row + self.col) % 2 == 0
    }
}

fn on_board(row: i32, col: i32) -> bool {
    (0..BOARD_SIZE as i32).contains(&row) && (0..BOARD_SIZE as i32).contains(&col)
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.notation())
    }
}

impl FromStr for Position {
    type Err = PuzzleError;

    fn from_str(s: &str) -> Result<Position> {
        Position::from_notation(s)
    }
}

pub fn to_notation(pos: Position) -> String {
    pos.notation().to_string()
}

pub fn from_notation(s: &str) -> Result<Position> {
    Position::from_notation(s)
}

// =====================
// Notation
// =====================

/// Two-character square label, e.g. "d4". Always valid ASCII.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Notation([u8; 2]);

impl Notation {
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).unwrap_or("??")
    }
}

impl fmt::Display for Notation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PartialEq<&str> for Notation {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

// =====================
// Piece variants
// =====================

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum PieceVariant {
    #[default]
    Knight,
    Rook,
    Bishop,
}

impl PieceVariant {
    pub fn to_char(self) -> char {
        match self {
            PieceVariant::Knight => 'N',
            PieceVariant::Rook => 'R',
            PieceVariant::Bishop => 'B',
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PieceVariant::Knight => "Knight",
            PieceVariant::Rook => "Rook",
            PieceVariant::Bishop => "Bishop",
        }
    }
}

impl fmt::Display for PieceVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

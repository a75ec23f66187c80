// Move log of a trail game.
//
// Moves are kept in display rows of eight; the ninth move opens a new row.
// Every logged move has a matching integer score snapshot, so the score
// after any prefix of the game can be read back without replaying it.

use crate::board::Position;

pub const ROW_LEN: usize = 8;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveHistory {
    rows: Vec<Vec<Position>>,
    scores: Vec<i64>,
}

impl MoveHistory {
    /// A log holding only the starting square, with score 0.
    pub fn new(start: Position) -> Self {
        Self {
            rows: vec![vec![start]],
            scores: vec![0],
        }
    }

    pub fn push(&mut self, pos: Position, score: i64) {
        match self.rows.last_mut() {
            Some(row) if row.len() < ROW_LEN => row.push(pos),
            _ => self.rows.push(vec![pos]),
        }
        self.scores.push(score);
    }

    /// Drop the newest move. The starting square is never removed.
    pub fn pop(&mut self) -> Option<Position> {
        if self.len() <= 1 {
            return None;
        }
        let row = self.rows.last_mut()?;
        let pos = row.pop()?;
        if row.is_empty() {
            self.rows.pop();
        }
        self.scores.pop();
        Some(pos)
    }

    /// Number of logged squares, the start included.
    pub fn len(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Only the starting square has been logged.
    pub fn at_start(&self) -> bool {
        self.len() <= 1
    }

    pub fn current(&self) -> Option<Position> {
        self.rows.last().and_then(|row| row.last()).copied()
    }

    /// Score after the newest move, 0 for an empty log.
    pub fn last_score(&self) -> i64 {
        self.scores.last().copied().unwrap_or(0)
    }

    pub fn rows(&self) -> &[Vec<Position>] {
        &self.rows
    }

    pub fn scores(&self) -> &[i64] {
        &self.scores
    }

    pub fn moves(&self) -> impl Iterator<Item = Position> + '_ {
        self.rows.iter().flatten().copied()
    }

    /// "b1-c3-..." over the whole game, as sent with a result.
    pub fn sequence(&self) -> String {
        self.moves()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join("-")
    }

    /// One line per row; every row but the last ends with '-' so the lines
    /// read as a single continuous trail.
    pub fn text(&self) -> String {
        let last = self.rows.len().saturating_sub(1);
        self.rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let line = row.iter().map(|p| p.to_string()).collect::<Vec<_>>().join("-");
                if i == last { line } else { line + "-" }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

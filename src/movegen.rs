// Legal destinations for the trail piece.
//
// There is only ever one piece on the board, so nothing blocks a slider and
// nothing can be captured. The only square that stops movement is an exit
// square.

use crate::board::{BOARD_SIZE, PieceVariant, Position};
use crate::squares::is_terminal;

const KNIGHT_DELTAS: [(i32, i32); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

const ROOK_DIRS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
const BISHOP_DIRS: [(i32, i32); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// Destinations for `variant` standing on `pos`, sorted row-major.
pub fn legal_moves(pos: Position, variant: PieceVariant) -> Vec<Position> {
    let mut moves = Vec::with_capacity(14);
    if is_terminal(pos) {
        return moves;
    }
    match variant {
        PieceVariant::Knight => gen_leaper_moves(pos, &KNIGHT_DELTAS, &mut moves),
        PieceVariant::Rook => gen_slider_moves(pos, &ROOK_DIRS, &mut moves),
        PieceVariant::Bishop => gen_slider_moves(pos, &BISHOP_DIRS, &mut moves),
    }
    moves.sort();
    moves
}

pub fn is_legal(from: Position, variant: PieceVariant, to: Position) -> bool {
    legal_moves(from, variant).contains(&to)
}

fn gen_leaper_moves(pos: Position, deltas: &[(i32, i32)], moves: &mut Vec<Position>) {
    moves.extend(deltas.iter().filter_map(|&(dr, dc)| pos.offset(dr, dc)));
}

fn gen_slider_moves(pos: Position, dirs: &[(i32, i32)], moves: &mut Vec<Position>) {
    for &(dr, dc) in dirs {
        for step in 1..BOARD_SIZE as i32 {
            match pos.offset(dr * step, dc * step) {
                Some(to) => moves.push(to),
                None => break,
            }
        }
    }
}

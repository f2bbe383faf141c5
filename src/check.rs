//! King safety queries.
//!
//! All of them work on a cloned board, so the caller's board is never observed in a
//! hypothetical state.

use crate::board::{Board, Color, PieceId, Square};
use crate::moves::{can_move_to, classify_move};

/// Would the king be attacked if it stood on `square`?
///
/// Enemy pieces are asked for their raw reach only (no self-check test of their own),
/// which keeps the recursion between move legality and check detection one level deep.
pub fn is_in_check_at(board: &Board, king: PieceId, square: Square) -> bool {
    let color = board.piece(king).color;
    let mut simulated = board.clone();
    simulated.place(king, square);
    let attacked = simulated.pieces_of(color.opposite())
        .any(|enemy| can_move_to(&simulated, enemy, square, false));
    attacked
}

pub fn is_in_check(board: &Board, color: Color) -> bool {
    let king = match board.king(color) {
        Some(king) => king,
        None => return false,
    };
    match board.piece(king).square {
        Some(square) => is_in_check_at(board, king, square),
        None => false,
    }
}

pub fn has_legal_move(board: &Board, color: Color, current_move_number: u32) -> bool {
    board.pieces_of(color).any(|id| {
        Square::all().any(|target| classify_move(board, id, target, current_move_number).is_some())
    })
}

/// Escapes include en passant captures as well as ordinary moves.
pub fn is_in_checkmate(board: &Board, color: Color, current_move_number: u32) -> bool {
    is_in_check(board, color) && !has_legal_move(board, color, current_move_number)
}

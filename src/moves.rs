use std::collections::HashSet;
use crate::board::{Board, Color, PieceId, PieceType, Square};
use crate::check::{is_in_check, is_in_check_at};
use crate::error::{ChessError, ChessResult};

const KING_START_COL: usize = 4;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MoveKind {
    Normal,
    EnPassant { captured: Square },
    Castle { rook_from: Square, rook_to: Square },
}

fn deltas(from: Square, to: Square) -> (isize, isize) {
    (to.row as isize - from.row as isize, to.col as isize - from.col as isize)
}

/// Every square strictly between `from` and `to` is empty. Only meaningful for
/// straight or diagonal lines.
fn path_clear(board: &Board, from: Square, to: Square) -> bool {
    let (row_delta, col_delta) = deltas(from, to);
    let (row_step, col_step) = (row_delta.signum(), col_delta.signum());
    let mut current = from;
    loop {
        current = match current.offset(row_step, col_step) {
            Some(square) => square,
            None => return false,
        };
        if current == to {
            return true;
        }
        if !board.is_empty(current) {
            return false;
        }
    }
}

fn pawn_geometry(board: &Board, color: Color, num_moves: u32, from: Square, to: Square) -> bool {
    let (row_delta, col_delta) = deltas(from, to);
    let forward = color.forward();
    let target = board.get(to);
    if row_delta == forward {
        match col_delta.abs() {
            0 => target.is_none(),
            1 => target.is_some_and(|p| p.color != color),
            _ => false,
        }
    }
    else if row_delta == 2 * forward {
        col_delta == 0 &&
            num_moves == 0 &&
            from.row == color.pawn_start_row() &&
            target.is_none() &&
            from.offset(forward, 0).is_some_and(|middle| board.is_empty(middle))
    }
    else {
        false
    }
}

fn geometry_allows(board: &Board, color: Color, kind: PieceType, num_moves: u32, from: Square, to: Square) -> bool {
    let (row_delta, col_delta) = deltas(from, to);
    let distance_squared = row_delta * row_delta + col_delta * col_delta;
    let straight = row_delta == 0 || col_delta == 0;
    let diagonal = row_delta.abs() == col_delta.abs();
    match kind {
        PieceType::King => distance_squared == 1 || distance_squared == 2,
        PieceType::Knight => distance_squared == 5,
        PieceType::Bishop => diagonal && path_clear(board, from, to),
        PieceType::Rook => straight && path_clear(board, from, to),
        PieceType::Queen => (straight || diagonal) && path_clear(board, from, to),
        PieceType::Pawn => pawn_geometry(board, color, num_moves, from, to),
    }
}

/// Would the piece's own king be attacked after it moves to `target`?
/// `captured` is an extra square emptied by the move (en passant).
fn leaves_king_in_check(board: &Board, id: PieceId, target: Square, captured: Option<Square>) -> bool {
    let mut simulated = board.clone();
    if let Some(square) = captured {
        simulated.remove(square);
    }
    simulated.place(id, target);
    is_in_check(&simulated, board.piece(id).color)
}

/// Ordinary move of a piece: geometry, occupancy and path rules, and optionally the
/// safety of its own king. Castling and en passant are not covered here.
///
/// With `check_self_king_safety == false` this is the raw reach used by the check oracle;
/// a king then ignores whether the destination is attacked.
pub fn can_move_to(board: &Board, id: PieceId, target: Square, check_self_king_safety: bool) -> bool {
    let piece = board.piece(id);
    let from = match piece.square {
        Some(square) => square,
        None => return false,
    };
    if !target.on_board() || target == from {
        return false;
    }
    if board.get(target).is_some_and(|p| p.color == piece.color) {
        return false;
    }
    if !geometry_allows(board, piece.color, piece.kind, piece.num_moves, from, target) {
        return false;
    }
    if !check_self_king_safety {
        return true;
    }
    match piece.kind {
        PieceType::King => !is_in_check_at(board, id, target),
        _ => !leaves_king_in_check(board, id, target, None),
    }
}

fn en_passant_capture(board: &Board, id: PieceId, target: Square, current_move_number: u32) -> Option<Square> {
    let pawn = board.piece(id);
    let from = pawn.square?;
    if pawn.kind != PieceType::Pawn || from.row != pawn.color.en_passant_row() {
        return None;
    }
    let (row_delta, col_delta) = deltas(from, target);
    if row_delta != pawn.color.forward() || col_delta.abs() != 1 || !board.is_empty(target) {
        return None;
    }
    let captured = Square::new(from.row, target.col);
    let victim = board.get(captured)?;
    let just_advanced = victim.kind == PieceType::Pawn &&
        victim.color != pawn.color &&
        victim.num_moves == 1 &&
        victim.last_move_number + 1 == current_move_number;
    (just_advanced && !leaves_king_in_check(board, id, target, Some(captured))).then_some(captured)
}

pub fn can_en_passant_to(board: &Board, id: PieceId, target: Square, current_move_number: u32) -> bool {
    target.on_board() && en_passant_capture(board, id, target, current_move_number).is_some()
}

fn castling(board: &Board, id: PieceId, target: Square) -> Option<MoveKind> {
    let king = board.piece(id);
    let from = king.square?;
    let rank = king.color.back_rank();
    if king.kind != PieceType::King || king.num_moves != 0 || from != Square::new(rank, KING_START_COL) || target.row != rank {
        return None;
    }
    let (rook_col, rook_to_col, transit) = match target.col {
        6 => (7, 5, [5, 6]),
        2 => (0, 3, [3, 2]),
        _ => return None,
    };
    let rook_from = Square::new(rank, rook_col);
    let rook = board.get(rook_from)?;
    if rook.kind != PieceType::Rook || rook.color != king.color || rook.num_moves != 0 {
        return None;
    }
    // the queenside rook also crosses the b-file
    if rook_col == 0 && !board.is_empty(Square::new(rank, 1)) {
        return None;
    }
    let transit: Vec<Square> = transit.iter().map(|&col| Square::new(rank, col)).collect();
    if transit.iter().any(|&square| !board.is_empty(square)) || is_in_check(board, king.color) {
        return None;
    }
    transit.iter()
        .all(|&square| !is_in_check_at(board, id, square))
        .then_some(MoveKind::Castle { rook_from, rook_to: Square::new(rank, rook_to_col) })
}

pub fn can_castle_to(board: &Board, id: PieceId, target: Square) -> bool {
    target.on_board() && castling(board, id, target).is_some()
}

/// Full legality of moving `id` to `target` on the half-move `current_move_number`,
/// including en passant and castling.
pub fn classify_move(board: &Board, id: PieceId, target: Square, current_move_number: u32) -> Option<MoveKind> {
    if !target.on_board() {
        return None;
    }
    if can_move_to(board, id, target, true) {
        return Some(MoveKind::Normal);
    }
    match board.piece(id).kind {
        PieceType::Pawn => en_passant_capture(board, id, target, current_move_number)
            .map(|captured| MoveKind::EnPassant { captured }),
        PieceType::King => castling(board, id, target),
        _ => None,
    }
}

pub fn legal_destinations(board: &Board, id: PieceId, current_move_number: u32) -> HashSet<Square> {
    Square::all()
        .filter(|&target| classify_move(board, id, target, current_move_number).is_some())
        .collect()
}

/// Validates and executes a move. On failure nothing changes.
///
/// Promotion is a separate step, see [`promote`].
pub fn attempt_move_to(board: &mut Board, id: PieceId, target: Square, current_move_number: u32) -> ChessResult<MoveKind> {
    let from = board.piece(id).square.ok_or(ChessError::OffBoard(id))?;
    let kind = classify_move(board, id, target, current_move_number)
        .ok_or(ChessError::IllegalMove { from, to: target })?;
    match kind {
        MoveKind::Normal => board.place(id, target),
        MoveKind::EnPassant { captured } => {
            log::trace!("{} takes en passant on {}", from, captured);
            board.remove(captured);
            board.place(id, target);
        }
        MoveKind::Castle { rook_from, rook_to } => {
            log::trace!("Castling {} -> {}, rook {} -> {}", from, target, rook_from, rook_to);
            board.place(id, target);
            if let Some(rook) = board.id_at(rook_from) {
                board.place(rook, rook_to);
                board.record_move(rook, current_move_number);
            }
        }
    }
    board.record_move(id, current_move_number);
    Ok(kind)
}

pub fn will_be_promoted(color: Color, target_row: usize) -> bool {
    target_row == color.promotion_row()
}

/// Replaces a pawn standing on its farthest rank with a new piece of `kind`.
pub fn promote(board: &mut Board, id: PieceId, kind: PieceType) -> ChessResult<PieceId> {
    let pawn = *board.piece(id);
    let square = pawn.square.ok_or(ChessError::OffBoard(id))?;
    if pawn.kind != PieceType::Pawn || !will_be_promoted(pawn.color, square.row) {
        return Err(ChessError::NotOnPromotionRank(square));
    }
    if !kind.is_promotion_target() {
        return Err(ChessError::InvalidPromotion(kind));
    }
    log::trace!("Promoting {} pawn on {} to {:?}", pawn.color, square, kind);
    board.replace(square, kind).ok_or(ChessError::NoPieceAt(square))
}

use std::collections::HashMap;
use std::fmt;
use serde::Serializer;
use crate::board::Color::{Black, White};

pub const WIDTH: usize = 8;
pub const HEIGHT: usize = 8;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PieceType {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

impl PieceType {
    pub fn from_promotion_letter(letter: &str) -> Option<PieceType> {
        match letter {
            "Q" => Some(PieceType::Queen),
            "R" => Some(PieceType::Rook),
            "B" => Some(PieceType::Bishop),
            "N" => Some(PieceType::Knight),
            _ => None,
        }
    }

    pub fn is_promotion_target(&self) -> bool {
        matches!(self, PieceType::Queen | PieceType::Rook | PieceType::Bishop | PieceType::Knight)
    }

    pub fn letter(&self) -> char {
        match self {
            PieceType::King => 'K',
            PieceType::Queen => 'Q',
            PieceType::Rook => 'R',
            PieceType::Bishop => 'B',
            PieceType::Knight => 'N',
            PieceType::Pawn => 'P',
        }
    }
}

/// A side of the game. White moves on odd move numbers, Black on even ones.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, serde::Serialize)]
pub enum Color {
    White, Black
}

impl Color {
    pub fn opposite(&self) -> Color {
        if self == &White {
            Black
        } else {
            White
        }
    }

    pub fn to_move(move_number: u32) -> Color {
        if move_number % 2 == 1 { White } else { Black }
    }

    pub fn back_rank(&self) -> usize {
        match self {
            White => 7,
            Black => 0,
        }
    }

    pub fn pawn_start_row(&self) -> usize {
        match self {
            White => 6,
            Black => 1,
        }
    }

    /// Row a pawn must stand on to capture en passant.
    pub fn en_passant_row(&self) -> usize {
        match self {
            White => 3,
            Black => 4,
        }
    }

    pub fn promotion_row(&self) -> usize {
        match self {
            White => 0,
            Black => 7,
        }
    }

    /// Row delta of a single pawn step.
    pub fn forward(&self) -> isize {
        match self {
            White => -1,
            Black => 1,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            White => write!(f, "White"),
            Black => write!(f, "Black"),
        }
    }
}

/// Row 0 is rank 8, column 0 is file `a`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Square {
    pub row: usize,
    pub col: usize,
}

impl Square {
    pub const fn new(row: usize, col: usize) -> Self {
        Square { row, col }
    }

    pub fn on_board(&self) -> bool {
        self.row < HEIGHT && self.col < WIDTH
    }

    pub fn offset(&self, row_delta: isize, col_delta: isize) -> Option<Square> {
        let row = self.row as isize + row_delta;
        let col = self.col as isize + col_delta;
        (row >= 0 && row < HEIGHT as isize && col >= 0 && col < WIDTH as isize)
            .then_some(Square::new(row as usize, col as usize))
    }

    pub fn all() -> impl Iterator<Item = Square> {
        (0..HEIGHT).flat_map(|row| (0..WIDTH).map(move |col| Square::new(row, col)))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = (b'a' + self.col as u8) as char;
        write!(f, "{}{}", file, HEIGHT - self.row)
    }
}

pub type PieceId = usize;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceType,
    /// `None` once the piece was captured or replaced by promotion.
    pub square: Option<Square>,
    pub num_moves: u32,
    /// Move number of the last successful move, 0 if the piece never moved.
    pub last_move_number: u32,
}

impl Piece {
    fn new(color: Color, kind: PieceType, square: Square) -> Self {
        Piece { color, kind, square: Some(square), num_moves: 0, last_move_number: 0 }
    }

    pub fn is_on_board(&self) -> bool {
        self.square.is_some()
    }
}

/// Grid of piece ids over an arena of piece records.
///
/// Pieces are never removed from the arena, so a `PieceId` stays valid for the whole game;
/// a captured piece simply loses its square.
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    squares: [[Option<PieceId>; WIDTH]; HEIGHT],
    pieces: Vec<Piece>,
    kings: HashMap<Color, PieceId>,
}

impl Board {
    pub fn empty() -> Self {
        Board {
            squares: [[None; WIDTH]; HEIGHT],
            pieces: Vec::new(),
            kings: HashMap::new(),
        }
    }

    pub fn id_at(&self, square: Square) -> Option<PieceId> {
        self.squares[square.row][square.col]
    }

    pub fn get(&self, square: Square) -> Option<&Piece> {
        self.id_at(square).map(|id| &self.pieces[id])
    }

    pub fn is_empty(&self, square: Square) -> bool {
        self.id_at(square).is_none()
    }

    pub fn piece(&self, id: PieceId) -> &Piece {
        &self.pieces[id]
    }

    pub fn king(&self, color: Color) -> Option<PieceId> {
        self.kings.get(&color).copied()
    }

    /// Creates a fresh piece on `square`, overwriting any occupant.
    pub fn add(&mut self, color: Color, kind: PieceType, square: Square) -> PieceId {
        let id = self.pieces.len();
        self.pieces.push(Piece::new(color, kind, square));
        self.occupy(id, square);
        if kind == PieceType::King {
            self.kings.insert(color, id);
        }
        id
    }

    /// Moves a piece to `square`, vacating its current square. An overwritten occupant
    /// is treated as captured.
    pub fn place(&mut self, id: PieceId, square: Square) {
        if let Some(from) = self.pieces[id].square {
            self.squares[from.row][from.col] = None;
        }
        self.occupy(id, square);
    }

    pub fn remove(&mut self, square: Square) -> Option<PieceId> {
        let id = self.squares[square.row][square.col].take()?;
        self.pieces[id].square = None;
        Some(id)
    }

    /// Puts a new piece of `kind` in place of the piece on `square`, keeping its color.
    /// The replacement starts with a fresh move history.
    pub fn replace(&mut self, square: Square, kind: PieceType) -> Option<PieceId> {
        let old = self.remove(square)?;
        let color = self.pieces[old].color;
        Some(self.add(color, kind, square))
    }

    pub fn record_move(&mut self, id: PieceId, move_number: u32) {
        let piece = &mut self.pieces[id];
        piece.num_moves += 1;
        piece.last_move_number = move_number;
    }

    /// On-board pieces of one color.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = PieceId> + '_ {
        self.pieces.iter()
            .enumerate()
            .filter(move |(_, p)| p.color == color && p.is_on_board())
            .map(|(id, _)| id)
    }

    fn occupy(&mut self, id: PieceId, square: Square) {
        if let Some(previous) = self.squares[square.row][square.col] {
            if previous != id {
                self.pieces[previous].square = None;
            }
        }
        self.squares[square.row][square.col] = Some(id);
        self.pieces[id].square = Some(square);
    }
}

pub fn to_string(board: &Board) -> String {
    let mut result: String = String::new();
    for row in 0..HEIGHT {
        for col in 0..WIDTH {
            let icon = match board.get(Square::new(row, col)) {
                None => ' ',
                Some(p) => match p.color {
                    White => p.kind.letter(),
                    Black => p.kind.letter().to_ascii_lowercase(),
                }
            };
            result.push(icon);
        }
        result.push('\n');
    }
    result.pop();
    result
}

impl serde::Serialize for Board {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error> where S: Serializer {
        serializer.serialize_str(to_string(self).as_str())
    }
}

const BACK_RANK: [PieceType; WIDTH] = [
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Queen,
    PieceType::King,
    PieceType::Bishop,
    PieceType::Knight,
    PieceType::Rook,
];

pub fn new_board() -> Board {
    let mut board = Board::empty();
    for color in [White, Black] {
        for (col, kind) in BACK_RANK.iter().enumerate() {
            board.add(color, *kind, Square::new(color.back_rank(), col));
        }
        for col in 0..WIDTH {
            board.add(color, PieceType::Pawn, Square::new(color.pawn_start_row(), col));
        }
    }
    board
}

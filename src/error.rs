//! Errors returned by the rules engine and the input parser.
//!
//! Every variant is recoverable: the rejected action leaves the board and the session
//! exactly as they were.

use thiserror::Error;
use crate::board::{Color, PieceId, PieceType, Square};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChessError {
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("No piece at {0}")]
    NoPieceAt(Square),

    #[error("Piece {0} is no longer on the board")]
    OffBoard(PieceId),

    #[error("Piece at {square} belongs to {owner}")]
    WrongTeam { square: Square, owner: Color },

    #[error("Illegal move from {from} to {to}")]
    IllegalMove { from: Square, to: Square },

    #[error("Cannot promote to {0:?}")]
    InvalidPromotion(PieceType),

    #[error("Promotion piece given for a move that does not promote")]
    PromotionNotApplicable,

    #[error("Piece at {0} is not a pawn on its promotion rank")]
    NotOnPromotionRank(Square),

    #[error("{0} has to answer the pending draw offer")]
    DrawOfferPending(Color),

    #[error("There is no draw offer to accept")]
    NoDrawOffer,

    #[error("The game is over")]
    GameOver,
}

pub type ChessResult<T> = Result<T, ChessError>;

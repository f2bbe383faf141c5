//! Two-player chess rules: board state, move legality, check and checkmate detection,
//! and a turn coordinator that drives one game from structured input.

pub mod board;
pub mod check;
pub mod communication_protocol;
pub mod config;
pub mod error;
pub mod game;
pub mod moves;

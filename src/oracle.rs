//! Narrow interface over the rules engine.
//!
//! Everything the converter needs from chess rules goes through here:
//! starting position, legal application of a move, short/long notation
//! resolution, and FEN snapshots. The rest of the crate never touches
//! `shakmaty` beyond the `Move` re-export.

use shakmaty::fen::Fen;
use shakmaty::san::San;
use shakmaty::uci::UciMove;
use shakmaty::{Chess, EnPassantMode, Position as _};

use crate::game_tree::Color;

pub use shakmaty::Move;

/// Board state as tracked by the rules engine.
pub type Position = Chess;

/// The standard starting position.
pub fn initial_position() -> Position {
    Chess::default()
}

/// Apply a legal move, returning the resulting position.
pub fn apply(pos: &Position, mv: Move) -> Result<Position, String> {
    let lan = to_long_notation(mv.clone());
    pos.clone()
        .play(mv)
        .map_err(|_| format!("move '{lan}' is not legal in this position"))
}

/// Resolve a parsed short-notation token against a position.
pub fn resolve_san(pos: &Position, san: &San) -> Result<Move, String> {
    san.to_move(pos)
        .map_err(|e| format!("illegal move '{san}': {e}"))
}

/// Canonical short notation for a legal move, check/mate suffix included.
pub fn to_short_notation(pos: &Position, mv: Move) -> String {
    let san = San::from_move(pos, mv.clone()).to_string();
    match pos.clone().play(mv) {
        Ok(after) if after.is_checkmate() => format!("{san}#"),
        Ok(after) if after.is_check() => format!("{san}+"),
        _ => san,
    }
}

/// Context-free long notation for a move (origin, destination, promotion).
pub fn to_long_notation(mv: Move) -> String {
    UciMove::from_standard(mv).to_string()
}

/// Resolve a long-notation token against a position.
pub fn parse_long(pos: &Position, lan: &str) -> Result<Move, String> {
    let uci: UciMove = lan
        .parse()
        .map_err(|_| format!("'{lan}' is not long notation"))?;
    uci.to_move(pos)
        .map_err(|_| format!("'{lan}' is not legal in this position"))
}

/// All legal moves in a position.
pub fn legal_moves(pos: &Position) -> Vec<Move> {
    pos.legal_moves().into_iter().collect()
}

/// Side to move.
pub fn side_to_move(pos: &Position) -> Color {
    match pos.turn() {
        shakmaty::Color::White => Color::White,
        shakmaty::Color::Black => Color::Black,
    }
}

/// Full-move counter of the position (increments after Black's move).
pub fn fullmove_number(pos: &Position) -> u32 {
    pos.fullmoves().get()
}

/// FEN snapshot of a position.
pub fn fen(pos: &Position) -> String {
    Fen::from_position(pos, EnPassantMode::Legal).to_string()
}

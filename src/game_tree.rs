//! Move-tree model shared by both conversion directions.
//!
//! A `Game` owns its main line; each `MoveRecord` owns the alternative
//! lines that branch off right after it. The serde derives double as the
//! structured document schema.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::annotations::Annotations;

/// Side that played a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Color {
    #[serde(rename = "w")]
    White,
    #[serde(rename = "b")]
    Black,
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Color::White => "w",
            Color::Black => "b",
        })
    }
}

/// One played move together with everything hanging off it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveRecord {
    /// Short algebraic notation, check/mate suffix included.
    pub san: String,
    /// Origin and destination squares (plus promotion piece), e.g. "g1f3".
    #[serde(default)]
    pub lan: String,
    /// Full-move number; shared by a White move and the Black reply.
    pub move_number: u32,
    pub color: Color,
    #[serde(default)]
    pub annotations: Annotations,
    /// Alternatives to this move, in source order.
    #[serde(default)]
    pub variations: Vec<Line>,
    /// Position after the move, when snapshots were requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fen: Option<String>,
}

impl MoveRecord {
    pub fn new(san: String, lan: String, move_number: u32, color: Color) -> Self {
        Self {
            san,
            lan,
            move_number,
            color,
            annotations: Annotations::default(),
            variations: Vec::new(),
            fen: None,
        }
    }
}

/// A sequence of moves: the main line or one alternative branch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Line {
    #[serde(default)]
    pub label: String,
    #[serde(rename = "line")]
    pub moves: Vec<MoveRecord>,
}

/// One complete game with its ordered header metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    #[serde(default)]
    pub game_id: String,
    #[serde(default)]
    pub metadata: IndexMap<String, String>,
    pub moves: Vec<MoveRecord>,
    #[serde(default)]
    pub notes: String,
}

impl Game {
    /// Total plies in the game, variations included.
    pub fn ply_count(&self) -> usize {
        walk(&self.moves).len()
    }
}

/// Pre-order traversal of a line and every variation beneath it. Yields
/// `(record, depth, in_variation)`; the main line is depth 0.
pub fn walk(moves: &[MoveRecord]) -> Vec<(&MoveRecord, usize, bool)> {
    let mut out = Vec::new();
    collect(moves, 0, &mut out);
    out
}

fn collect<'a>(
    moves: &'a [MoveRecord],
    depth: usize,
    out: &mut Vec<(&'a MoveRecord, usize, bool)>,
) {
    for record in moves {
        out.push((record, depth, depth > 0));
        for variation in &record.variations {
            collect(&variation.moves, depth + 1, out);
        }
    }
}

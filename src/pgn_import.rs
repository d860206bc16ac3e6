//! Text-to-tree adapter over the streaming PGN parser.
//!
//! `GameCollector` replays every accepted token against the oracle, so the
//! records it produces already carry canonical short notation, long notation,
//! move numbers and colors. Variations are collected on a stack of line
//! frames and attached to the move they are an alternative to.

use std::io::Read;
use std::ops::ControlFlow;

use indexmap::IndexMap;
use pgn_reader::{Outcome, RawComment, RawTag, Reader, SanPlus, Skip, Visitor};
use tracing::debug;

use crate::document::{self, IdStyle};
use crate::error::ConvertError;
use crate::game_tree::{Game, Line, MoveRecord};
use crate::oracle::{self, Position};

/// Options for the import adapter.
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Record a FEN snapshot after every move.
    pub include_fen: bool,
    /// Keep header keys exactly as written instead of normalizing them to
    /// document form. The prettify pipeline re-renders headers verbatim.
    pub raw_headers: bool,
    pub id_style: IdStyle,
}

/// One level of the line stack: the moves gathered so far, the position
/// after the last of them, and the position before it (where an alternative
/// to that move would start).
struct Frame {
    moves: Vec<MoveRecord>,
    pos: Position,
    branch_point: Option<Position>,
}

impl Frame {
    fn new(pos: Position) -> Self {
        Self {
            moves: Vec::new(),
            pos,
            branch_point: None,
        }
    }
}

/// Movetext state while one game is being read.
struct GameState {
    metadata: IndexMap<String, String>,
    stack: Vec<Frame>,
}

/// Visitor that builds `Game` trees from a PGN stream.
struct GameCollector {
    options: ImportOptions,
    games: Vec<Game>,
    dropped_empty: usize,
    /// First oracle failure; fatal for the whole source.
    error: Option<String>,
}

impl GameCollector {
    fn new(options: ImportOptions) -> Self {
        Self {
            options,
            games: Vec::new(),
            dropped_empty: 0,
            error: None,
        }
    }

    fn close_variation(state: &mut GameState) {
        let frame = state.stack.pop().expect("caller checked stack depth");
        let parent = state.stack.last_mut().expect("caller checked stack depth");
        if frame.moves.is_empty() {
            return;
        }
        match parent.moves.last_mut() {
            Some(record) => record.variations.push(Line {
                label: String::new(),
                moves: frame.moves,
            }),
            None => debug!("dropping variation with no move to attach to"),
        }
    }
}

impl Visitor for GameCollector {
    type Tags = IndexMap<String, String>;
    type Movetext = GameState;
    type Output = ();

    fn begin_tags(&mut self) -> ControlFlow<(), Self::Tags> {
        ControlFlow::Continue(IndexMap::new())
    }

    fn tag(&mut self, tags: &mut Self::Tags, name: &[u8], value: RawTag<'_>) -> ControlFlow<()> {
        let key = String::from_utf8_lossy(name);
        let key = if self.options.raw_headers {
            key.into_owned()
        } else {
            document::normalize_header_key(&key)
        };
        tags.insert(key, value.decode_utf8_lossy().into_owned());
        ControlFlow::Continue(())
    }

    fn begin_movetext(&mut self, tags: Self::Tags) -> ControlFlow<(), GameState> {
        ControlFlow::Continue(GameState {
            metadata: tags,
            stack: vec![Frame::new(oracle::initial_position())],
        })
    }

    fn san(&mut self, state: &mut GameState, san_plus: SanPlus) -> ControlFlow<()> {
        let frame = state.stack.last_mut().expect("root frame always present");
        let mv = match oracle::resolve_san(&frame.pos, &san_plus.san) {
            Ok(mv) => mv,
            Err(e) => {
                self.error = Some(e);
                return ControlFlow::Break(());
            }
        };

        // Canonical notation from the oracle, not the source spelling.
        let mut record = MoveRecord::new(
            oracle::to_short_notation(&frame.pos, mv.clone()),
            oracle::to_long_notation(mv.clone()),
            oracle::fullmove_number(&frame.pos),
            oracle::side_to_move(&frame.pos),
        );

        let after = match oracle::apply(&frame.pos, mv) {
            Ok(after) => after,
            Err(e) => {
                self.error = Some(e);
                return ControlFlow::Break(());
            }
        };
        if self.options.include_fen {
            record.fen = Some(oracle::fen(&after));
        }
        frame.branch_point = Some(std::mem::replace(&mut frame.pos, after));
        frame.moves.push(record);
        ControlFlow::Continue(())
    }

    fn comment(&mut self, state: &mut GameState, comment: RawComment<'_>) -> ControlFlow<()> {
        let text = String::from_utf8_lossy(comment.as_bytes());
        let text = text.trim();
        if text.is_empty() {
            return ControlFlow::Continue(());
        }
        let frame = state.stack.last_mut().expect("root frame always present");
        match frame.moves.last_mut() {
            Some(record) => record.annotations.append_comment(text),
            None => debug!(comment = text, "dropping comment with no preceding move"),
        }
        ControlFlow::Continue(())
    }

    fn begin_variation(&mut self, state: &mut GameState) -> ControlFlow<(), Skip> {
        let frame = state.stack.last().expect("root frame always present");
        match frame.branch_point.clone() {
            Some(pos) => {
                state.stack.push(Frame::new(pos));
                ControlFlow::Continue(Skip(false))
            }
            None => {
                debug!("skipping variation with no move to branch from");
                ControlFlow::Continue(Skip(true))
            }
        }
    }

    fn end_variation(&mut self, state: &mut GameState) -> ControlFlow<()> {
        // A stray ')' without its '(' is ignored.
        if state.stack.len() > 1 {
            Self::close_variation(state);
        }
        ControlFlow::Continue(())
    }

    fn outcome(&mut self, state: &mut GameState, outcome: Outcome) -> ControlFlow<()> {
        // The termination token backfills a missing or unknown Result header.
        let key = if self.options.raw_headers { "Result" } else { "result" };
        let current = state.metadata.get(key).map(String::as_str).unwrap_or("*");
        if current == "*" {
            state.metadata.insert(key.to_string(), outcome.to_string());
        }
        ControlFlow::Continue(())
    }

    fn end_game(&mut self, mut state: GameState) {
        // Unbalanced sources: game end closes any open groups.
        while state.stack.len() > 1 {
            Self::close_variation(&mut state);
        }
        let main = state.stack.pop().expect("root frame always present");
        if main.moves.is_empty() {
            self.dropped_empty += 1;
            return;
        }
        let game_id = if self.options.raw_headers {
            String::new()
        } else {
            document::make_game_id(&state.metadata, self.options.id_style)
        };
        self.games.push(Game {
            game_id,
            metadata: state.metadata,
            moves: main.moves,
            notes: String::new(),
        });
    }
}

/// Read every game from a PGN source.
///
/// A token the oracle cannot resolve, or a stream the parser rejects, fails
/// the whole source. Header-only games are dropped; a source with no
/// surviving games is empty.
pub fn read_games<R: Read>(input: R, options: &ImportOptions) -> Result<Vec<Game>, ConvertError> {
    let mut reader = Reader::new(input);
    let mut collector = GameCollector::new(options.clone());
    loop {
        match reader.read_game(&mut collector) {
            Ok(Some(())) => {
                if let Some(e) = collector.error.take() {
                    return Err(ConvertError::SourceUnreadable(e));
                }
            }
            Ok(None) => break,
            Err(e) => return Err(ConvertError::SourceUnreadable(e.to_string())),
        }
    }
    if collector.dropped_empty > 0 {
        debug!(count = collector.dropped_empty, "dropped games with no moves");
    }
    if collector.games.is_empty() {
        return Err(ConvertError::EmptySource);
    }
    Ok(collector.games)
}

/// Read every game from in-memory PGN text.
pub fn parse_games(text: &str, options: &ImportOptions) -> Result<Vec<Game>, ConvertError> {
    read_games(text.as_bytes(), options)
}

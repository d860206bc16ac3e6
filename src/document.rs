//! Structured-document side of the converter: schema mapping, header-key
//! normalization, game ids, and the consistency pass that guards the
//! document-to-PGN direction.

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::ConvertError;
use crate::game_tree::Game;
use crate::oracle;
use crate::pgn_export;

/// Which headers feed the generated game id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IdStyle {
    /// `event_date`.
    #[default]
    EventDate,
    /// `event_site_date_round_white_black`.
    Detailed,
}

const ID_UNKNOWN: &str = "unknown";

/// Document field name for a PGN header key.
pub fn normalize_header_key(key: &str) -> String {
    let key = key.to_lowercase();
    if key == "timecontrol" {
        "time_control".to_string()
    } else {
        key
    }
}

/// PGN display form of a document field name. Raw header keys from the
/// prettify pipeline pass through unchanged (they already start upper-case).
pub fn display_header_key(key: &str) -> String {
    match key {
        "time_control" => "TimeControl".to_string(),
        "whitetimecontrol" => "WhiteTimeControl".to_string(),
        "blacktimecontrol" => "BlackTimeControl".to_string(),
        "orientation" => "Orientation".to_string(),
        _ => {
            let mut chars = key.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
    }
}

/// Descriptive id for a game, assembled from its normalized headers.
/// Missing headers contribute the literal `unknown`; spaces and slashes
/// become underscores. Ids are descriptive, not unique.
pub fn make_game_id(metadata: &IndexMap<String, String>, style: IdStyle) -> String {
    let part = |key: &str| -> &str {
        metadata.get(key).map(String::as_str).unwrap_or(ID_UNKNOWN)
    };
    let joined = match style {
        IdStyle::EventDate => format!("{}_{}", part("event"), part("date")),
        IdStyle::Detailed => format!(
            "{}_{}_{}_{}_{}_{}",
            part("event"),
            part("site"),
            part("date"),
            part("round"),
            part("white"),
            part("black")
        ),
    };
    joined.replace(' ', "_").replace('/', "_")
}

/// Parse a document source into games.
///
/// Syntactically broken JSON is an unreadable source; JSON that parses but
/// does not match the game schema is a consistency violation. A single game
/// object is accepted in place of a one-element array.
pub fn read_document(text: &str) -> Result<Vec<Game>, ConvertError> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| ConvertError::SourceUnreadable(format!("invalid JSON: {e}")))?;
    let games = if value.is_array() {
        serde_json::from_value::<Vec<Game>>(value)
    } else {
        serde_json::from_value::<Game>(value).map(|game| vec![game])
    }
    .map_err(|e| {
        ConvertError::Consistency(format!("document does not match the game schema: {e}"))
    })?;
    if games.is_empty() {
        return Err(ConvertError::EmptySource);
    }
    Ok(games)
}

/// Replay a game's main line against the oracle and verify the stored
/// SAN/LAN pairs agree with it.
///
/// Variations are exempt: documents produced elsewhere may carry branch
/// notation this tool cannot vouch for, and branches are emitted verbatim.
pub fn validate_main_line(game: &Game) -> Result<(), ConvertError> {
    let mut pos = oracle::initial_position();
    for (ply, record) in game.moves.iter().enumerate() {
        let context = format!("game '{}', ply {}", game.game_id, ply + 1);
        if record.san.trim().is_empty() {
            return Err(ConvertError::Consistency(format!("{context}: empty san")));
        }
        if record.lan.trim().is_empty() {
            return Err(ConvertError::Consistency(format!(
                "{context}: missing long notation for '{}'",
                record.san
            )));
        }
        let mv = oracle::parse_long(&pos, &record.lan)
            .map_err(|e| ConvertError::Consistency(format!("{context}: {e}")))?;
        let canonical = oracle::to_short_notation(&pos, mv.clone());
        if !canonical.eq_ignore_ascii_case(&record.san) {
            return Err(ConvertError::Consistency(format!(
                "{context}: document says '{}' but '{}' plays as '{}'",
                record.san, record.lan, canonical
            )));
        }
        let color = oracle::side_to_move(&pos);
        if record.color != color {
            return Err(ConvertError::Consistency(format!(
                "{context}: '{}' is a '{}' move, document says '{}'",
                record.san, color, record.color
            )));
        }
        let number = oracle::fullmove_number(&pos);
        if record.move_number != number {
            return Err(ConvertError::Consistency(format!(
                "{context}: stored move number {}, position says {}",
                record.move_number, number
            )));
        }
        pos = oracle::apply(&pos, mv)
            .map_err(|e| ConvertError::Consistency(format!("{context}: {e}")))?;
    }
    Ok(())
}

/// Serialize games as the structured document: a pretty-printed array, even
/// for a single game.
pub fn write_document(games: &[Game]) -> Result<String, ConvertError> {
    Ok(serde_json::to_string_pretty(games)?)
}

/// Render games as PGN text. Every game is validated before any text is
/// produced, so a failing document yields no output at all.
pub fn games_to_pgn(games: &[Game]) -> Result<String, ConvertError> {
    for game in games {
        validate_main_line(game)?;
    }
    let rendered: Vec<String> = games.iter().map(pgn_export::render_game).collect();
    Ok(rendered.join("\n"))
}

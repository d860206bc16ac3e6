//! Tree-to-text serialization: linear annotated movetext from a move tree.

use crate::document;
use crate::game_tree::{Color, Game, MoveRecord};

/// Render one line of play, recursing into the variations hanging off it.
///
/// White moves carry a `"N. "` prefix; a comment follows its move in braces,
/// before any variation groups; each variation renders as `"( ... )"` in
/// stored order. The fragment carries no leading or trailing whitespace.
pub fn render_line(moves: &[MoveRecord]) -> String {
    let mut text = String::new();
    for record in moves {
        if record.color == Color::White {
            text.push_str(&format!("{}. ", record.move_number));
        }
        text.push_str(&record.san);
        text.push(' ');
        if let Some(comment) = record.annotations.comment.as_deref() {
            if !comment.is_empty() {
                text.push_str(&format!("{{{comment}}} "));
            }
        }
        for variation in &record.variations {
            text.push_str(&format!("( {} ) ", render_line(&variation.moves)));
        }
    }
    text.trim().to_string()
}

/// Render a complete game: bracketed header lines in metadata order, a blank
/// line, then the movetext terminated by the result token.
pub fn render_game(game: &Game) -> String {
    let mut out = String::new();
    for (key, value) in &game.metadata {
        out.push_str(&format!(
            "[{} \"{}\"]\n",
            document::display_header_key(key),
            value
        ));
    }
    out.push('\n');

    let movetext = render_line(&game.moves);
    let result = game
        .metadata
        .get("result")
        .map(String::as_str)
        .unwrap_or("*");
    if movetext.is_empty() {
        out.push_str(&format!("{result}\n"));
    } else {
        out.push_str(&format!("{movetext} {result}\n"));
    }
    out
}

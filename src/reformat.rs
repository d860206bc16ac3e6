//! Cosmetic reflow of linear movetext: one move pair per line, variations
//! indented by nesting depth. Best-effort pattern rewriting over valid
//! serializer output; never used on the conversion paths.

use regex::Regex;

use crate::game_tree::Game;
use crate::pgn_export;

/// Reflow serialized movetext.
///
/// White move numbers open lines, comments stick to their move token, and
/// every parenthesized variation group is re-indented two spaces per nesting
/// level. Stable when re-run on text that needs no restructuring, but
/// byte-for-byte idempotence is not a contract.
pub fn reformat_movetext(movetext: &str) -> String {
    // Black continuation numbers ("8... ") pair with the preceding move.
    let ellipsis = Regex::new(r"\s\d+\.\.\.\s").unwrap();
    let text = ellipsis.replace_all(movetext, " ").into_owned();

    // Comments attach directly to their move token.
    let text = text.replace(" {", "{");

    // Every White move number opens a line.
    let number = Regex::new(r"(\d+\.\s)").unwrap();
    let text = number
        .replace_all(&text, "\n$1")
        .trim_start_matches('\n')
        .to_string();

    let text = indent_variations(&text);

    // A continuation move pushed onto its own line rejoins its pair.
    let split_pair = Regex::new(r"(?m)^(\d+\. \S[^\n]*)\n([A-Za-z][^\n]*)$").unwrap();
    let text = split_pair.replace_all(&text, "$1 $2").into_owned();

    // A comment alone on a line belongs to the move above it.
    let lone_comment = Regex::new(r"([A-Za-z0-9][^\n]*)\n(\{[^}\n]*\})").unwrap();
    let text = lone_comment.replace_all(&text, "$1 $2").into_owned();

    // Collapse blank lines left over from the rewrites.
    let blank = Regex::new(r"\n\s*\n+").unwrap();
    let text = blank.replace_all(&text, "\n").into_owned();

    let lines: Vec<&str> = text.lines().map(str::trim_end).collect();
    lines.join("\n").trim().to_string()
}

/// Recursively indent parenthesized variation groups, two spaces per level.
fn indent_variations(text: &str) -> String {
    let mut out = String::new();
    let mut rest = text;
    while let Some((start, end)) = next_group(rest) {
        out.push_str(&rest[..start]);
        let inner = indent_variations(rest[start + 1..end].trim());
        out.push_str("(\n");
        for line in inner.lines().filter(|l| !l.trim().is_empty()) {
            out.push_str("  ");
            out.push_str(line);
            out.push('\n');
        }
        out.push(')');
        rest = &rest[end + 1..];
    }
    out.push_str(rest);
    out
}

/// Byte offsets of the next balanced `( ... )` group. Parentheses inside
/// `{}` comments are plain text, not group delimiters. Unbalanced text
/// yields no group and is left alone.
fn next_group(text: &str) -> Option<(usize, usize)> {
    let mut depth = 0usize;
    let mut in_comment = false;
    let mut start = None;
    for (i, b) in text.bytes().enumerate() {
        match b {
            b'{' if !in_comment => in_comment = true,
            b'}' if in_comment => in_comment = false,
            b'(' if !in_comment => {
                if depth == 0 {
                    start = Some(i);
                }
                depth += 1;
            }
            b')' if !in_comment && depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    return Some((start.expect("group start recorded at depth 0"), i));
                }
            }
            _ => {}
        }
    }
    None
}

/// Re-render parsed games: original headers verbatim, reflowed movetext,
/// result token at the end, blank lines between games.
pub fn prettify_games(games: &[Game]) -> String {
    let mut blocks = Vec::new();
    for game in games {
        let mut block = String::new();
        for (key, value) in &game.metadata {
            block.push_str(&format!("[{key} \"{value}\"]\n"));
        }
        block.push('\n');
        let result = game
            .metadata
            .get("Result")
            .or_else(|| game.metadata.get("result"))
            .map(String::as_str)
            .unwrap_or("*");
        let movetext = format!("{} {}", pgn_export::render_line(&game.moves), result);
        block.push_str(&reformat_movetext(&movetext));
        block.push('\n');
        blocks.push(block);
    }
    blocks.join("\n")
}

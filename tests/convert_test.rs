//! Integration tests: file and directory conversion, output naming, and the
//! no-partial-output guarantee, all against temporary directories.

use std::fs;
use std::path::Path;

use pgnconv::convert::{
    convert_dir, convert_file, json_file_to_pgn, pgn_file_to_json, prettify_file,
};
use pgnconv::{ConvertError, ConvertOptions, Direction};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const SIMPLE_GAME: &str = "[Event \"Club\"]\n[Result \"1-0\"]\n\n1. e4 e5 2. Nf3 Nc6 1-0\n";

const VALID_DOCUMENT: &str = r#"[
  {
    "game_id": "club",
    "metadata": { "event": "Club", "result": "1-0" },
    "moves": [
      { "san": "e4", "lan": "e2e4", "move_number": 1, "color": "w", "annotations": {}, "variations": [] },
      { "san": "e5", "lan": "e7e5", "move_number": 1, "color": "b", "annotations": {}, "variations": [] }
    ],
    "notes": ""
  }
]"#;

/// Same document, but the second move's notations disagree.
const INCONSISTENT_DOCUMENT: &str = r#"[
  {
    "game_id": "club",
    "metadata": { "event": "Club" },
    "moves": [
      { "san": "e4", "lan": "e2e4", "move_number": 1, "color": "w", "annotations": {}, "variations": [] },
      { "san": "Nf6", "lan": "e7e5", "move_number": 1, "color": "b", "annotations": {}, "variations": [] }
    ],
    "notes": ""
  }
]"#;

fn write(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

// ---------------------------------------------------------------------------
// Single files
// ---------------------------------------------------------------------------

#[test]
fn pgn_file_converts_to_sibling_json() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "game.pgn", SIMPLE_GAME);

    let output = convert_file(&input, &ConvertOptions::default()).unwrap();
    assert_eq!(output, dir.path().join("game.json"));

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.contains("\"game_id\""));
    assert!(text.contains("\"san\": \"Nf3\""));
}

#[test]
fn json_file_converts_to_converted_pgn() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "club.json", VALID_DOCUMENT);

    let output = convert_file(&input, &ConvertOptions::default()).unwrap();
    assert_eq!(output, dir.path().join("club_converted.pgn"));

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.contains("[Event \"Club\"]"));
    assert!(text.contains("1. e4 e5 1-0"));
}

#[test]
fn inconsistent_document_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "bad.json", INCONSISTENT_DOCUMENT);

    let err = json_file_to_pgn(&input).unwrap_err();
    assert!(matches!(err, ConvertError::Consistency(_)));
    assert!(!dir.path().join("bad_converted.pgn").exists());
}

#[test]
fn empty_pgn_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "empty.pgn", "");

    let err = pgn_file_to_json(&input, &ConvertOptions::default()).unwrap_err();
    assert!(matches!(err, ConvertError::EmptySource));
    assert!(!dir.path().join("empty.json").exists());
}

#[test]
fn header_only_pgn_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "headers.pgn", "[Event \"Nothing\"]\n\n*\n");

    let err = pgn_file_to_json(&input, &ConvertOptions::default()).unwrap_err();
    assert!(matches!(err, ConvertError::EmptySource));
    assert!(!dir.path().join("headers.json").exists());
}

#[test]
fn prettify_writes_formatted_sibling() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(
        dir.path(),
        "annotated.pgn",
        "[Event \"Test\"]\n[Result \"*\"]\n\n1. e4 e5 2. Nf3 (2. Bc4) Nc6 *\n",
    );

    let output = prettify_file(&input, &ConvertOptions::default()).unwrap();
    assert_eq!(output, dir.path().join("annotated_formatted.pgn"));

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.contains("[Event \"Test\"]"));
    assert!(text.contains("2. Nf3 (\n  2. Bc4\n) Nc6"));
}

// ---------------------------------------------------------------------------
// Directories
// ---------------------------------------------------------------------------

#[test]
fn directory_walk_converts_recursively_and_skips_generated() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.pgn", SIMPLE_GAME);
    write(dir.path(), "old_converted.pgn", SIMPLE_GAME);
    fs::create_dir(dir.path().join("sub")).unwrap();
    write(&dir.path().join("sub"), "b.pgn", SIMPLE_GAME);

    let summary = convert_dir(
        dir.path(),
        Direction::PgnToJson,
        &ConvertOptions::default(),
    )
    .unwrap();

    assert_eq!(summary.converted, 2);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.failed, 0);
    assert!(dir.path().join("a.json").exists());
    assert!(dir.path().join("sub/b.json").exists());
    assert!(!dir.path().join("old_converted.json").exists());
}

#[test]
fn directory_walk_skips_schema_documents() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "game_schema.json", "{}");
    write(dir.path(), "club.json", VALID_DOCUMENT);

    let summary = convert_dir(
        dir.path(),
        Direction::JsonToPgn,
        &ConvertOptions::default(),
    )
    .unwrap();

    assert_eq!(summary.converted, 1);
    assert_eq!(summary.skipped, 1);
    assert!(dir.path().join("club_converted.pgn").exists());
    assert!(!dir.path().join("game_schema_converted.pgn").exists());
}

#[test]
fn directory_walk_counts_failures_and_continues() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "bad.json", INCONSISTENT_DOCUMENT);
    write(dir.path(), "good.json", VALID_DOCUMENT);

    let summary = convert_dir(
        dir.path(),
        Direction::JsonToPgn,
        &ConvertOptions::default(),
    )
    .unwrap();

    assert_eq!(summary.converted, 1);
    assert_eq!(summary.failed, 1);
    assert!(dir.path().join("good_converted.pgn").exists());
    assert!(!dir.path().join("bad_converted.pgn").exists());
}

#[test]
fn prettify_direction_formats_directory() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "x.pgn", SIMPLE_GAME);

    let summary = convert_dir(
        dir.path(),
        Direction::Prettify,
        &ConvertOptions::default(),
    )
    .unwrap();

    assert_eq!(summary.converted, 1);
    let text = fs::read_to_string(dir.path().join("x_formatted.pgn")).unwrap();
    assert!(text.starts_with("[Event \"Club\"]"));
    assert!(text.contains("1. e4 e5\n2. Nf3 Nc6 1-0"));
}

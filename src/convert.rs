//! Batch entry points: single-file dispatch and directory conversion.

use std::fs;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use crate::document::{self, IdStyle};
use crate::error::ConvertError;
use crate::pgn_import::{self, ImportOptions};
use crate::reformat;

/// Conversion to run over a directory tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    PgnToJson,
    JsonToPgn,
    Prettify,
}

/// Options shared by the batch entry points.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Record a FEN snapshot after every move of the document output.
    pub include_fen: bool,
    pub id_style: IdStyle,
}

impl ConvertOptions {
    fn import_options(&self, raw_headers: bool) -> ImportOptions {
        ImportOptions {
            include_fen: self.include_fen,
            raw_headers,
            id_style: self.id_style,
        }
    }
}

/// Outcome counts for a directory run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DirSummary {
    pub converted: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Convert one file, dispatching on its extension. Returns the output path.
pub fn convert_file(path: &Path, options: &ConvertOptions) -> Result<PathBuf, ConvertError> {
    match extension_of(path).as_deref() {
        Some("pgn") => pgn_file_to_json(path, options),
        Some("json") => json_file_to_pgn(path),
        _ => Err(ConvertError::Unsupported(path.display().to_string())),
    }
}

/// PGN to structured document. The output lands next to the input as
/// `<stem>.json`.
pub fn pgn_file_to_json(path: &Path, options: &ConvertOptions) -> Result<PathBuf, ConvertError> {
    let file = fs::File::open(path)?;
    let games = pgn_import::read_games(BufReader::new(file), &options.import_options(false))?;
    let plies: usize = games.iter().map(|g| g.ply_count()).sum();
    info!(path = %path.display(), games = games.len(), plies, "Parsed PGN source");

    let output = path.with_extension("json");
    fs::write(&output, document::write_document(&games)?)?;
    info!(path = %output.display(), "Wrote document");
    Ok(output)
}

/// Structured document to PGN. The output is `<stem>_converted.pgn`;
/// nothing is written unless every game in the document validates.
pub fn json_file_to_pgn(path: &Path) -> Result<PathBuf, ConvertError> {
    let text = fs::read_to_string(path)?;
    let games = document::read_document(&text)?;
    let pgn = document::games_to_pgn(&games)?;

    let output = sibling_with_suffix(path, "_converted", "pgn");
    fs::write(&output, pgn)?;
    info!(path = %output.display(), games = games.len(), "Wrote PGN");
    Ok(output)
}

/// Parse, validate and reflow a PGN file into `<stem>_formatted.pgn`.
pub fn prettify_file(path: &Path, options: &ConvertOptions) -> Result<PathBuf, ConvertError> {
    let file = fs::File::open(path)?;
    let games = pgn_import::read_games(BufReader::new(file), &options.import_options(true))?;
    info!(path = %path.display(), games = games.len(), "Parsed PGN source");

    let output = sibling_with_suffix(path, "_formatted", "pgn");
    fs::write(&output, reformat::prettify_games(&games))?;
    info!(path = %output.display(), "Wrote reformatted PGN");
    Ok(output)
}

/// Convert every matching file under `root`.
///
/// Inputs already carrying a `_converted`/`_formatted` suffix and documents
/// whose name marks them as schema definitions are skipped. A failing file
/// is logged and counted; the walk continues.
pub fn convert_dir(
    root: &Path,
    direction: Direction,
    options: &ConvertOptions,
) -> Result<DirSummary, ConvertError> {
    let extension = match direction {
        Direction::PgnToJson | Direction::Prettify => "pgn",
        Direction::JsonToPgn => "json",
    };
    let pattern = format!("{}/**/*.{}", root.display(), extension);
    let paths = glob::glob(&pattern)
        .map_err(|e| ConvertError::Unsupported(format!("bad search pattern '{pattern}': {e}")))?;

    let mut summary = DirSummary::default();
    for path in paths.filter_map(|p| p.ok()) {
        if should_skip(&path) {
            debug!(path = %path.display(), "Skipping generated or schema file");
            summary.skipped += 1;
            continue;
        }
        let outcome = match direction {
            Direction::PgnToJson => pgn_file_to_json(&path, options),
            Direction::JsonToPgn => json_file_to_pgn(&path),
            Direction::Prettify => prettify_file(&path, options),
        };
        match outcome {
            Ok(_) => summary.converted += 1,
            Err(ConvertError::EmptySource) => {
                warn!(path = %path.display(), "No games found, skipping");
                summary.skipped += 1;
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "Conversion failed");
                summary.failed += 1;
            }
        }
    }
    Ok(summary)
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension().map(|e| e.to_string_lossy().to_lowercase())
}

/// Generated outputs and schema definitions are never conversion inputs.
fn should_skip(path: &Path) -> bool {
    let name = match path.file_name() {
        Some(name) => name.to_string_lossy().to_lowercase(),
        None => return true,
    };
    let stem = name.rsplit_once('.').map(|(stem, _)| stem).unwrap_or(&name);
    stem.ends_with("_converted")
        || stem.ends_with("_formatted")
        || (name.ends_with(".json") && name.contains("schema"))
}

fn sibling_with_suffix(path: &Path, suffix: &str, extension: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{stem}{suffix}.{extension}"))
}

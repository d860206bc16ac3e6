//! Convert annotated chess game archives between linear PGN movetext and a
//! structured JSON document format, with a validating reformatter for
//! nested variations.
//!
//! The rules engine (`shakmaty`) sits behind [`oracle`]; PGN tokenization is
//! delegated to `pgn-reader`. Both conversion directions share the move-tree
//! model in [`game_tree`].

pub mod annotations;
pub mod convert;
pub mod document;
pub mod error;
pub mod game_tree;
pub mod oracle;
pub mod pgn_export;
pub mod pgn_import;
pub mod reformat;

pub use convert::{convert_dir, convert_file, prettify_file, ConvertOptions, DirSummary, Direction};
pub use document::IdStyle;
pub use error::ConvertError;
pub use game_tree::{Color, Game, Line, MoveRecord};

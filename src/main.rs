use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use tracing::info;

use pgnconv::{convert_dir, convert_file, prettify_file, ConvertOptions, Direction, IdStyle};

/// Convert chess game archives between PGN and a structured JSON document
/// format, or reflow PGN variations for readability.
#[derive(Parser)]
#[command(name = "pgnconv")]
#[command(about = "Convert chess games between PGN and JSON documents", version)]
struct Args {
    /// File or directory to convert
    path: PathBuf,

    /// What to do with the input. Single files dispatch by extension unless
    /// prettify is selected; directories follow the mode.
    #[arg(short, long, value_enum, default_value = "pgn2json")]
    mode: Mode,

    /// Record a FEN snapshot after every move of the document output
    #[arg(long)]
    fen: bool,

    /// Which headers feed generated game ids
    #[arg(long, value_enum, default_value = "event-date")]
    id_style: IdStyleArg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    Pgn2json,
    Json2pgn,
    Prettify,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum IdStyleArg {
    /// event+date
    EventDate,
    /// event+site+date+round+white+black
    Detailed,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    let options = ConvertOptions {
        include_fen: args.fen,
        id_style: match args.id_style {
            IdStyleArg::EventDate => IdStyle::EventDate,
            IdStyleArg::Detailed => IdStyle::Detailed,
        },
    };

    if args.path.is_dir() {
        let direction = match args.mode {
            Mode::Pgn2json => Direction::PgnToJson,
            Mode::Json2pgn => Direction::JsonToPgn,
            Mode::Prettify => Direction::Prettify,
        };
        let summary = convert_dir(&args.path, direction, &options)?;
        info!(
            converted = summary.converted,
            skipped = summary.skipped,
            failed = summary.failed,
            "Directory conversion complete"
        );
        if summary.failed > 0 {
            process::exit(1);
        }
    } else {
        let output = match args.mode {
            Mode::Prettify => prettify_file(&args.path, &options)?,
            _ => convert_file(&args.path, &options)?,
        };
        info!(path = %output.display(), "Conversion complete");
    }
    Ok(())
}

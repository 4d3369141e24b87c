//! Terminal sliding-tile puzzle.
//!
//! Cuts a picture into a square grid, scrambles it, and lets you click (or
//! use the arrow keys) to slide tiles back into place.

mod terminal;

use std::error::Error;
use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Mutex;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tile_puzzle::config::{DEFAULT_DIM, DEFAULT_START_MOVES};
use tile_puzzle::picture::Picture;
use tile_puzzle::{PuzzleConfig, Session};

/// Slide the tiles back into place to restore the picture.
#[derive(Parser)]
#[command(name = "tile-puzzle")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Tiles per side.
    #[arg(long, default_value_t = DEFAULT_DIM)]
    dim: usize,

    /// Random slides used to scramble the board.
    #[arg(long, default_value_t = DEFAULT_START_MOVES)]
    moves: usize,

    /// Seed for a reproducible scramble.
    #[arg(long)]
    seed: Option<u64>,

    /// Text-art file to use as the picture.
    #[arg(long, value_name = "FILE")]
    picture: Option<PathBuf>,

    /// Tile width in terminal columns.
    #[arg(
        long,
        default_value_t = 12,
        value_parser = clap::value_parser!(u16).range(1..=i64::from(terminal::MAX_TILE_CELLS))
    )]
    tile_width: u16,

    /// Tile height in terminal rows.
    #[arg(
        long,
        default_value_t = 5,
        value_parser = clap::value_parser!(u16).range(1..=i64::from(terminal::MAX_TILE_CELLS))
    )]
    tile_height: u16,

    /// Print the scrambled board and exit instead of playing.
    #[arg(long)]
    print: bool,

    /// Write logs here; the terminal itself is taken by the game.
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    if let Some(path) = &cli.log_file {
        init_tracing(File::create(path)?);
    }

    let config = PuzzleConfig::default()
        .with_dim(cli.dim)
        .with_shuffle_moves(cli.moves)
        .with_seed(cli.seed);
    let mut session = Session::new(config)?;

    let tile = (usize::from(cli.tile_width), usize::from(cli.tile_height));
    let picture = match &cli.picture {
        Some(path) => Picture::load(path)?,
        None => Picture::pattern(cli.dim * tile.0, cli.dim * tile.1),
    };
    picture.check_tileable(cli.dim)?;

    session.start();

    if cli.print {
        println!("Shuffled puzzle:\n{}", session.grid());
        return Ok(());
    }

    info!(
        dim = cli.dim,
        width = picture.width(),
        height = picture.height(),
        "starting terminal session"
    );
    terminal::run(&mut session, &picture, tile)?;
    Ok(())
}

fn init_tracing(file: File) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .compact()
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn cli_defaults() {
        let cli = Cli::parse_from(["tile-puzzle"]);
        assert_eq!(cli.dim, 3);
        assert_eq!(cli.moves, 200);
        assert_eq!(cli.seed, None);
        assert!(!cli.print);
    }

    #[test]
    fn zero_tile_width_is_rejected() {
        assert!(Cli::try_parse_from(["tile-puzzle", "--tile-width", "0"]).is_err());
    }

    #[test]
    fn oversized_tiles_are_rejected() {
        let tall = ["tile-puzzle", "--dim", "3", "--tile-height", "21845"];
        assert!(Cli::try_parse_from(tall).is_err());
        assert!(Cli::try_parse_from(["tile-puzzle", "--tile-width", "65"]).is_err());

        let cli = Cli::try_parse_from(["tile-puzzle", "--tile-width", "64", "--tile-height", "64"])
            .unwrap();
        assert_eq!((cli.tile_width, cli.tile_height), (64, 64));
    }
}

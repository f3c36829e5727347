//! xnb - unpack XNB content to editable text + sidecars, and pack it back
//!
//! # Commands
//!
//! - `xnb unpack <input> [output]` - container(s) → `.json` text + `.png`/`.tbin` sidecars
//! - `xnb pack <input> [output]` - `.json` text + sidecars → container(s)
//!
//! `input` may be a single file or a directory. Directories are converted
//! file by file, keeping their layout under `output`.
//!
//! # Config file
//!
//! ```toml
//! [convert]
//! indent = 2
//! verbose = true
//! ```

mod batch;
mod config;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use xnb_extract::{ConvertOptions, JsonContainer, PngCodec};

use crate::batch::Direction;

#[derive(Parser)]
#[command(name = "xnb")]
#[command(about = "Convert XNB content to editable text + sidecar files and back")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Container file(s) → text document + sidecars
    Unpack(ConvertArgs),

    /// Text document + sidecars → container file(s)
    Pack(ConvertArgs),
}

/// Arguments shared by both directions
#[derive(Args)]
struct ConvertArgs {
    /// Input file or directory
    input: PathBuf,

    /// Output file or directory (defaults to next to the input)
    output: Option<PathBuf>,

    /// Indent width of text documents (0 = compact)
    #[arg(long)]
    indent: Option<usize>,

    /// Log every converted file and extracted asset
    #[arg(short, long)]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// TOML file with a [convert] table of defaults
    #[arg(long)]
    config: Option<PathBuf>,
}

impl ConvertArgs {
    /// Config file defaults with explicit flags layered on top
    fn options(&self) -> Result<ConvertOptions> {
        let mut opts = match &self.config {
            Some(path) => config::load(path)?.convert,
            None => ConvertOptions::default(),
        };
        if let Some(indent) = self.indent {
            opts.indent = indent;
        }
        if self.verbose {
            opts.verbose = true;
            opts.quiet = false;
        }
        if self.quiet {
            opts.quiet = true;
            opts.verbose = false;
        }
        Ok(opts)
    }
}

fn init_logging(opts: &ConvertOptions) {
    let level = if opts.quiet {
        Level::WARN
    } else if opts.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (direction, args) = match cli.command {
        Commands::Unpack(args) => (Direction::Unpack, args),
        Commands::Pack(args) => (Direction::Pack, args),
    };
    let opts = args.options()?;
    init_logging(&opts);

    let summary = batch::run(
        direction,
        &args.input,
        args.output.as_deref(),
        &JsonContainer,
        &PngCodec,
        &opts,
    )?;

    if summary.failed > 0 {
        anyhow::bail!(
            "{} of {} files failed to {}",
            summary.failed,
            summary.total(),
            direction
        );
    }
    if !opts.quiet {
        tracing::info!("{} {} file(s)", direction.past_tense(), summary.converted);
    }
    Ok(())
}

//! threadlens - Entry Point

use clap::Parser;
use std::path::PathBuf;
use threadlens::config::CliOverrides;
use threadlens::state::PreviewPosition;
use tracing::info;

/// threadlens - navigate long agent transcripts in the terminal
#[derive(Parser, Debug)]
#[command(name = "threadlens")]
#[command(version)]
#[command(about = "Terminal navigator for JSONL agent conversation transcripts")]
pub struct Args {
    /// Path to the JSONL transcript
    pub file: PathBuf,

    /// Start in the raw transcript view
    #[arg(long)]
    pub raw: bool,

    /// Where a jumped-to entry lands: top, middle or bottom
    #[arg(long, value_parser = parse_preview)]
    pub preview: Option<PreviewPosition>,

    /// Minimap width in columns
    #[arg(long, value_parser = clap::value_parser!(u16).range(2..))]
    pub minimap_width: Option<u16>,

    /// Directory for exported stages
    #[arg(long)]
    pub export_dir: Option<PathBuf>,

    /// Disable colors
    #[arg(long)]
    pub no_color: bool,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

fn parse_preview(raw: &str) -> Result<PreviewPosition, String> {
    PreviewPosition::parse(raw).ok_or_else(|| format!("expected top, middle or bottom, got {raw:?}"))
}

impl Args {
    /// CLI values that override config file and environment.
    ///
    /// Flags only override when set, so `--raw` absent keeps the config
    /// file's `start_in_raw`.
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            preview_position: self.preview,
            minimap_width: self.minimap_width.map(usize::from),
            export_dir: self.export_dir.clone(),
            start_in_raw: self.raw.then_some(true),
            color: self.no_color.then_some(false),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Defaults → Config File → Env Vars → CLI Args
    let config = threadlens::config::resolve(args.config.clone(), args.overrides())?;

    threadlens::logging::init(&config.log_file_path)?;
    info!(config = ?config, "Configuration loaded and resolved");

    let (transcript, stats) = threadlens::source::Transcript::load(&args.file)?;
    info!(
        lines = stats.lines,
        skipped = stats.skipped,
        "Transcript ready"
    );

    threadlens::view::run_with_transcript(transcript, &config)?;

    Ok(())
}

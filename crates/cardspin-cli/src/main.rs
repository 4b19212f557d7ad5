//! Command line interface for cardspin: looping turntable GIFs from
//! front/back card photographs.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use cardspin::{discover_pairs, run_batch, write_json, BatchOptions, RotationConfig};
use tracing::info;
use tracing_log::LogTracer;
use tracing_subscriber::EnvFilter;

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "cardspin")]
#[command(about = "Generate looping turntable GIFs from front/back card photographs")]
#[command(version)]
struct Cli {
    /// Only warnings and errors on stderr.
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a looping GIF for every card pair found in a directory.
    Generate(CliGenerateArgs),

    /// List the card pairs a directory would yield, without rendering.
    Pairs(CliPairsArgs),
}

#[derive(Debug, Clone, Args)]
struct CliGenerateArgs {
    /// Directory scanned for `<id>_front.jpg` / `<id>_back.jpg` pairs.
    #[arg(long)]
    input: PathBuf,

    /// Directory the GIFs are written into (created if missing).
    #[arg(long)]
    out: PathBuf,

    /// Number of frames in one full turn.
    #[arg(long, default_value = "240")]
    frames: u32,

    /// Display time per frame in milliseconds (GIF rounds to 10 ms steps).
    #[arg(long, default_value = "60")]
    delay_ms: u16,

    /// Black margin added on every side of the card, in pixels.
    #[arg(long, default_value = "100")]
    buffer_px: u32,

    /// Amplitude of the vertical corner lift, in pixels.
    #[arg(long, default_value = "50")]
    zoom: f64,

    /// Also write every rendered frame as `<id>_<index>.png` into this
    /// directory.
    #[arg(long)]
    frames_dir: Option<PathBuf>,

    /// Write a JSON run report to this path.
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
struct CliPairsArgs {
    /// Directory scanned for `<id>_front.jpg` / `<id>_back.jpg` pairs.
    #[arg(long)]
    input: PathBuf,
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();

    let default_filter = if cli.quiet { "warn" } else { "info" };
    let _ = LogTracer::init();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    match cli.command {
        Commands::Generate(args) => run_generate(&args),
        Commands::Pairs(args) => run_pairs(&args),
    }
}

// ── generate ───────────────────────────────────────────────────────────

fn run_generate(args: &CliGenerateArgs) -> CliResult<()> {
    let options = BatchOptions {
        input_dir: args.input.clone(),
        output_dir: args.out.clone(),
        config: RotationConfig {
            frames: args.frames,
            delay_ms: args.delay_ms,
            buffer_px: args.buffer_px,
            zoom: args.zoom,
        },
        frames_dir: args.frames_dir.clone(),
    };

    let report = run_batch(&options)?;

    if let Some(path) = &args.report {
        write_json(path, &report)?;
        info!("report written to {}", path.display());
    }

    let ok = report.cards.len() - report.failed();
    info!(
        "{} gif(s) written, {} failed, {} ms total",
        ok,
        report.failed(),
        report.elapsed_ms
    );

    if report.failed() > 0 {
        return Err(format!("{} card(s) failed", report.failed()).into());
    }
    Ok(())
}

// ── pairs ──────────────────────────────────────────────────────────────

fn run_pairs(args: &CliPairsArgs) -> CliResult<()> {
    let pairs = discover_pairs(&args.input)?;
    for pair in &pairs {
        println!("{}", pair.id);
    }
    info!("{} valid image pair(s) detected", pairs.len());
    Ok(())
}

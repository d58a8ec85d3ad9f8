use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use podshrink::{
    convert_to_srt, parse_segments, render_transcript, Config, ExtractiveSummarizer, ShrinkDriver,
    ShrinkProgress, TextCleaner, WhitespaceCleaner,
};
use tokio::sync::mpsc;
use tracing::{info, warn};

#[derive(Parser)]
#[command(
    name = "podshrink",
    about = "Transcript shrinking and subtitle conversion for podcast production"
)]
struct Cli {
    /// Config file (TOML, extension omitted)
    #[arg(long, default_value = "config/podshrink")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Reduce a timestamped transcript to a smaller set of refined segments
    Shrink {
        /// Transcript file to read
        input: PathBuf,

        /// Where to write the reduced transcript (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Emit refined segments as JSON instead of plain text
        #[arg(long)]
        json: bool,
    },

    /// Convert a transcript to SRT subtitles
    Convert {
        /// Transcript file to read
        input: PathBuf,

        /// Where to write the .srt file (next to the input if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)?;

    match cli.command {
        Command::Shrink {
            input,
            output,
            json,
        } => run_shrink(cfg, input, output, json).await,
        Command::Convert { input, output } => run_convert(input, output),
    }
}

async fn run_shrink(
    cfg: Config,
    input: PathBuf,
    output: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let raw = fs::read_to_string(&input)
        .with_context(|| format!("Failed to read transcript: {}", input.display()))?;

    let cleaner = WhitespaceCleaner;
    let segments = parse_segments(&cleaner.clean(&raw));

    if segments.is_empty() {
        warn!(
            "No timestamped segments found in {}; nothing to shrink",
            input.display()
        );
        return Ok(());
    }

    info!("Loaded {} segments from {}", segments.len(), input.display());

    let driver = ShrinkDriver::new(cfg.shrink, Arc::new(ExtractiveSummarizer))?;

    let (tx, mut rx) = mpsc::unbounded_channel::<ShrinkProgress>();
    let progress_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            info!("[{:>3.0}%] {}", event.fraction * 100.0, event.status);
        }
    });

    let outcome = driver.run(&segments, Some(tx)).await;
    progress_task
        .await
        .context("Progress reporting task panicked")?;

    let rendered = if json {
        let mut body = serde_json::to_string_pretty(&outcome.refined)?;
        body.push('\n');
        body
    } else {
        render_transcript(&outcome.refined)
    };

    write_output(&rendered, output.as_deref())?;

    // Partial results have already been written; the halt reason still
    // fails the command so scripts notice.
    if let Some(halt) = &outcome.halt {
        bail!("shrink incomplete: {}", halt);
    }

    info!(
        "Shrink complete: {} refined segments from {} windows",
        outcome.refined.len(),
        outcome.windows_total
    );

    Ok(())
}

fn run_convert(input: PathBuf, output: Option<PathBuf>) -> Result<()> {
    let raw = fs::read_to_string(&input)
        .with_context(|| format!("Failed to read transcript: {}", input.display()))?;

    let srt = convert_to_srt(&raw)
        .with_context(|| format!("Failed to convert {}", input.display()))?;

    let target = output.unwrap_or_else(|| input.with_extension("srt"));
    fs::write(&target, srt)
        .with_context(|| format!("Failed to write SRT file: {}", target.display()))?;

    info!("Wrote {}", target.display());

    Ok(())
}

fn write_output(body: &str, output: Option<&std::path::Path>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, body)
                .with_context(|| format!("Failed to write output: {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => print!("{}", body),
    }
    Ok(())
}

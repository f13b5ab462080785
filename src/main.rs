//! Sorting Visualizer
//!
//! Interactive terminal front end for the step-producing sort engine.
//! `--headless` plays a single run to stdout instead.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use tracing::info;

use sortviz::config::{ConfigManager, VisualizerConfig};
use sortviz::render::tui::VisualizerTui;
use sortviz::render::{JsonLinesRenderer, TextRenderer};
use sortviz::utils::{init_file_logging, init_logging};
use sortviz::{Algorithm, Player};

// ──────────────────────────────────────────────────────────────────────────────
// CONFIGURATION
// ──────────────────────────────────────────────────────────────────────────────

/// Animate comparison sorts in the terminal.
#[derive(Parser)]
#[command(name = "sortviz", version, about = "Animate comparison sorts in the terminal")]
struct Args {
    /// Algorithm to select first (bubble, insertion, selection, merge, quick)
    #[arg(long, short)]
    algorithm: Option<Algorithm>,

    /// Number of bars
    #[arg(long, short)]
    size: Option<usize>,

    /// Milliseconds between frames (1-100)
    #[arg(long)]
    delay_ms: Option<u64>,

    /// JSON config file; missing file means defaults
    #[arg(long, default_value = "sortviz.json")]
    config: PathBuf,

    /// Play one run to stdout and exit
    #[arg(long)]
    headless: bool,

    /// With --headless, print frames as JSON lines
    #[arg(long, requires = "headless")]
    json: bool,
}

async fn resolve_config(args: &Args) -> Result<VisualizerConfig> {
    let mut config = ConfigManager::new(&args.config)
        .load()
        .await
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;
    config.apply_env().context("Invalid SORTVIZ_* environment override")?;

    if let Some(algorithm) = args.algorithm {
        config.algorithm = algorithm;
    }
    if let Some(size) = args.size {
        config.size = size;
    }
    if let Some(delay_ms) = args.delay_ms {
        config.delay_ms = delay_ms;
    }
    config.validate()?;
    Ok(config)
}

// ──────────────────────────────────────────────────────────────────────────────
// MAIN ENTRY POINT
// ──────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    let args = Args::parse();

    let _log_guard = if args.headless {
        init_logging()?;
        None
    } else {
        Some(init_file_logging(std::env::temp_dir())?)
    };

    let config = resolve_config(&args).await?;
    info!(?config, "configuration resolved");
    let player = Player::new(&config)?;

    if !args.headless {
        return VisualizerTui::new(player).run().await;
    }

    let outcome = if args.json {
        player.start(JsonLinesRenderer::new(io::stdout()))?.wait().await?
    } else {
        let stdout = io::stdout();
        let colored = stdout.is_terminal();
        let renderer = TextRenderer::new(stdout).with_ansi_colors(colored);
        player.start(renderer)?.wait().await?
    };
    info!(?outcome, "headless run finished");
    Ok(())
}

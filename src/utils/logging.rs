//! Logging setup
//!
//! One tracing subscriber for the whole process: `EnvFilter` (honours
//! `RUST_LOG`, defaults to `sortviz=info`) plus a fmt layer. The TUI owns
//! the terminal, so in that mode logs go to a daily file instead.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

const DEFAULT_FILTER: &str = "sortviz=info";

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Log to stderr
pub fn init_logging() -> anyhow::Result<()> {
    Registry::default()
        .with(filter())
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .try_init()?;
    Ok(())
}

/// Log to `<dir>/sortviz.log.<date>`; keep the guard alive until exit
pub fn init_file_logging(dir: impl AsRef<Path>) -> anyhow::Result<WorkerGuard> {
    let appender = tracing_appender::rolling::daily(dir, "sortviz.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    Registry::default()
        .with(filter())
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer),
        )
        .try_init()?;
    Ok(guard)
}

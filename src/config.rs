//! Visualizer Configuration
//!
//! Defaults: 50 bars, 50ms between frames,
//! bubble sort selected. Values come from an optional JSON file, then
//! `SORTVIZ_*` environment variables, then command-line flags.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tokio::fs;
use tracing::debug;

use crate::error::{Result, SortError};
use crate::sort::Algorithm;

pub const MIN_DELAY_MS: u64 = 1;
pub const MAX_DELAY_MS: u64 = 100;
pub const DEFAULT_DELAY_MS: u64 = 50;
pub const DEFAULT_SIZE: usize = 50;

pub const ENV_SIZE: &str = "SORTVIZ_SIZE";
pub const ENV_DELAY_MS: &str = "SORTVIZ_DELAY_MS";
pub const ENV_ALGORITHM: &str = "SORTVIZ_ALGORITHM";

/// Pause between two frames, validated to `MIN_DELAY_MS..=MAX_DELAY_MS`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct Delay(u64);

impl Delay {
    pub fn from_millis(ms: u64) -> Result<Self> {
        if (MIN_DELAY_MS..=MAX_DELAY_MS).contains(&ms) {
            Ok(Self(ms))
        } else {
            Err(SortError::InvalidDelay { requested: ms, min: MIN_DELAY_MS, max: MAX_DELAY_MS })
        }
    }

    pub fn as_millis(&self) -> u64 {
        self.0
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_millis(self.0)
    }

    /// Step the delay by `delta` ms, clamped to the valid range
    pub fn adjusted(&self, delta: i64) -> Self {
        let ms = (self.0 as i64 + delta).clamp(MIN_DELAY_MS as i64, MAX_DELAY_MS as i64);
        Self(ms as u64)
    }
}

impl Default for Delay {
    fn default() -> Self {
        Self(DEFAULT_DELAY_MS)
    }
}

impl TryFrom<u64> for Delay {
    type Error = SortError;

    fn try_from(ms: u64) -> Result<Self> {
        Self::from_millis(ms)
    }
}

impl From<Delay> for u64 {
    fn from(delay: Delay) -> u64 {
        delay.0
    }
}

/// Settings for one visualizer session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualizerConfig {
    /// Number of bars per sequence
    pub size: usize,
    /// Milliseconds between frames
    pub delay_ms: u64,
    /// Initially selected algorithm
    pub algorithm: Algorithm,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            delay_ms: DEFAULT_DELAY_MS,
            algorithm: Algorithm::Bubble,
        }
    }
}

impl VisualizerConfig {
    /// Override fields from `SORTVIZ_*` environment variables
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_vars(|key| std::env::var(key).ok())
    }

    /// Override fields from any key lookup; unset keys are left alone
    pub fn apply_vars<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_SIZE) {
            let size: i64 = raw
                .trim()
                .parse()
                .map_err(|_| SortError::Config(format!("{ENV_SIZE}='{raw}' is not an integer")))?;
            self.size = usize::try_from(size).map_err(|_| SortError::InvalidSize(size.to_string()))?;
            debug!(size = self.size, "size overridden from environment");
        }
        if let Some(raw) = lookup(ENV_DELAY_MS) {
            self.delay_ms = raw
                .trim()
                .parse()
                .map_err(|_| SortError::Config(format!("{ENV_DELAY_MS}='{raw}' is not an integer")))?;
            debug!(delay_ms = self.delay_ms, "delay overridden from environment");
        }
        if let Some(raw) = lookup(ENV_ALGORITHM) {
            self.algorithm = raw.parse()?;
            debug!(algorithm = %self.algorithm, "algorithm overridden from environment");
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.size == 0 {
            return Err(SortError::InvalidSize(self.size.to_string()));
        }
        Delay::from_millis(self.delay_ms)?;
        Ok(())
    }

    pub fn delay(&self) -> Result<Delay> {
        Delay::from_millis(self.delay_ms)
    }
}

/// Loads and stores `VisualizerConfig` as pretty JSON
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read the file; a missing file yields the defaults
    pub async fn load(&self) -> Result<VisualizerConfig> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no config file, using defaults");
            return Ok(VisualizerConfig::default());
        }
        let content = fs::read_to_string(&self.path).await?;
        let config: VisualizerConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub async fn save(&self, config: &VisualizerConfig) -> Result<()> {
        let content = serde_json::to_string_pretty(config)?;
        fs::write(&self.path, content).await?;
        Ok(())
    }
}

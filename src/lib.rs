//! Sorting Visualizer Engine
//!
//! Animates comparison sorts by replaying every intermediate state of the
//! array at a controllable pace:
//! - Dataset generation (random magnitudes, per-element colors)
//! - Step-producing sorts (bubble, insertion, selection, merge, quick)
//! - Playback driver with at-most-one active run and clean aborts
//! - Terminal renderers (plain text, JSON lines, interactive TUI)
//!
//! ```
//! use sortviz::{run, Sequence};
//!
//! let frames: Vec<_> = run("bubble", Sequence::from_magnitudes(&[2, 1]))?
//!     .map(|f| f.magnitudes())
//!     .collect();
//! assert_eq!(frames, vec![vec![1, 2]]);
//! # Ok::<(), sortviz::SortError>(())
//! ```

pub mod config;
pub mod error;
pub mod model;
pub mod playback;
pub mod render;
pub mod sort;
pub mod utils;

// Re-exports for convenience
pub use config::{Delay, VisualizerConfig};
pub use error::{Result, SortError};
pub use model::{generate, Element, Frame, Sequence};
pub use playback::{play, AbortFlag, Player, RunOutcome, RunStatus};
pub use render::Renderer;
pub use sort::{run, Algorithm, FrameStream};

//! Playback Driver
//!
//! Paces a frame stream into a renderer. The driver is the only place that
//! suspends: once per frame, for exactly the configured delay, and it
//! checks the abort flag before pulling each frame so a stopped run never
//! computes ahead.

pub mod events;
pub mod player;

pub use events::{EventBus, PlaybackEvent};
pub use player::{Player, PlayerSnapshot, RunHandle, RunStatus};

use serde::{Deserialize, Serialize};
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::Delay;
use crate::model::Frame;
use crate::render::Renderer;

/// Shared "abort requested" flag, checked at every suspension point
#[derive(Debug, Clone, Default)]
pub struct AbortFlag(Arc<AtomicBool>);

impl AbortFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// Every frame was delivered
    Completed { frames: usize },
    /// Stopped before the stream ran out
    Aborted { frames: usize },
}

impl RunOutcome {
    pub fn frames(&self) -> usize {
        match self {
            RunOutcome::Completed { frames } | RunOutcome::Aborted { frames } => *frames,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, RunOutcome::Completed { .. })
    }
}

/// Deliver `frames` one at a time, sleeping `delay` after each.
///
/// `on_frame` runs synchronously for every frame; returning
/// `ControlFlow::Break` refuses the frame and ends the run as aborted.
/// Completion is reported only after the last frame was accepted.
pub async fn play<I, F>(frames: I, delay: Delay, abort: &AbortFlag, mut on_frame: F) -> RunOutcome
where
    I: IntoIterator<Item = Frame>,
    F: FnMut(&Frame) -> ControlFlow<()>,
{
    let mut frames = frames.into_iter();
    let mut delivered = 0;

    loop {
        if abort.is_requested() {
            info!(delivered, "playback aborted");
            return RunOutcome::Aborted { frames: delivered };
        }
        let Some(frame) = frames.next() else {
            break;
        };
        if on_frame(&frame).is_break() {
            info!(delivered, "frame refused, playback stopped");
            return RunOutcome::Aborted { frames: delivered };
        }
        delivered += 1;
        debug!(step = frame.step(), "frame delivered");
        tokio::time::sleep(delay.as_duration()).await;
    }

    RunOutcome::Completed { frames: delivered }
}

/// `play` straight into a renderer, notifying it of the outcome
pub async fn play_to<I, R>(frames: I, delay: Delay, abort: &AbortFlag, renderer: &mut R) -> RunOutcome
where
    I: IntoIterator<Item = Frame>,
    R: Renderer + ?Sized,
{
    let outcome = play(frames, delay, abort, |frame| {
        renderer.render(frame);
        ControlFlow::Continue(())
    })
    .await;
    renderer.finish(&outcome);
    outcome
}

//! Renderer Collaborators
//!
//! A renderer draws frames and owns no sorting logic. It only ever sees
//! shared references, so it cannot alter a frame.

pub mod text;
pub mod tui;

pub use text::{JsonLinesRenderer, TextRenderer};

use crate::model::Frame;
use crate::playback::RunOutcome;

/// Consumer of the frames a run produces
pub trait Renderer: Send {
    /// Draw one frame. Called once per frame, in order.
    fn render(&mut self, frame: &Frame);

    /// Called once after the last frame, or when the run stops early
    fn finish(&mut self, _outcome: &RunOutcome) {}
}

impl<F> Renderer for F
where
    F: FnMut(&Frame) + Send,
{
    fn render(&mut self, frame: &Frame) {
        self(frame)
    }
}

/// Renderer that drops everything; useful for headless timing runs
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _frame: &Frame) {}
}

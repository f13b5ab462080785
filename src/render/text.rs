//! Plain terminal renderers for headless runs.

use std::io::{self, Write};
use tracing::warn;

use super::Renderer;
use crate::model::{Element, Frame, MAX_MAGNITUDE};
use crate::playback::RunOutcome;

const BAR: char = '█';

/// Draws each frame as a column chart, one column per element
pub struct TextRenderer<W: Write + Send> {
    out: W,
    height: usize,
    ansi_colors: bool,
    last_error: Option<io::Error>,
}

impl<W: Write + Send> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, height: 10, ansi_colors: false, last_error: None }
    }

    /// Rows used for the tallest possible bar
    pub fn with_height(mut self, height: usize) -> Self {
        self.height = height.max(1);
        self
    }

    /// Paint bars in their element colors using 24-bit ANSI escapes
    pub fn with_ansi_colors(mut self, enabled: bool) -> Self {
        self.ansi_colors = enabled;
        self
    }

    /// The most recent write failure, if any
    pub fn last_error(&self) -> Option<&io::Error> {
        self.last_error.as_ref()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn bar_height(&self, element: &Element) -> usize {
        let m = element.magnitude.min(MAX_MAGNITUDE) as usize;
        (m * self.height).div_ceil(MAX_MAGNITUDE as usize)
    }

    fn draw(&mut self, frame: &Frame) -> io::Result<()> {
        let heights: Vec<usize> = frame.elements().iter().map(|e| self.bar_height(e)).collect();
        let mut chart = format!("step {}\n", frame.step());

        for row in (1..=self.height).rev() {
            for (element, &h) in frame.elements().iter().zip(&heights) {
                if h < row {
                    chart.push(' ');
                } else if self.ansi_colors {
                    let c = element.color;
                    chart.push_str(&format!("\x1b[38;2;{};{};{}m{}\x1b[0m", c.r, c.g, c.b, BAR));
                } else {
                    chart.push(BAR);
                }
            }
            chart.push('\n');
        }

        self.out.write_all(chart.as_bytes())?;
        self.out.flush()
    }
}

impl<W: Write + Send> Renderer for TextRenderer<W> {
    fn render(&mut self, frame: &Frame) {
        if let Err(e) = self.draw(frame) {
            warn!("failed to draw frame {}: {}", frame.step(), e);
            self.last_error = Some(e);
        }
    }

    fn finish(&mut self, outcome: &RunOutcome) {
        let line = match outcome {
            RunOutcome::Completed { frames } => format!("sorted after {} frames\n", frames),
            RunOutcome::Aborted { frames } => format!("aborted after {} frames\n", frames),
        };
        if let Err(e) = self.out.write_all(line.as_bytes()).and_then(|_| self.out.flush()) {
            warn!("failed to write run summary: {}", e);
            self.last_error = Some(e);
        }
    }
}

/// Writes every frame as one JSON object per line
pub struct JsonLinesRenderer<W: Write + Send> {
    out: W,
    last_error: Option<io::Error>,
}

impl<W: Write + Send> JsonLinesRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, last_error: None }
    }

    /// The most recent write failure, if any
    pub fn last_error(&self) -> Option<&io::Error> {
        self.last_error.as_ref()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> Renderer for JsonLinesRenderer<W> {
    fn render(&mut self, frame: &Frame) {
        let written = serde_json::to_writer(&mut self.out, frame)
            .map_err(io::Error::from)
            .and_then(|_| self.out.write_all(b"\n"));
        if let Err(e) = written {
            warn!("failed to write frame {}: {}", frame.step(), e);
            self.last_error = Some(e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Sequence;
    use crate::sort::Algorithm;

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_columns_scale_with_magnitude() {
        let frame = Algorithm::Bubble
            .run(Sequence::from_magnitudes(&[100, 50]))
            .next()
            .unwrap();
        let mut renderer = TextRenderer::new(Vec::new()).with_height(2);
        renderer.render(&frame);

        let out = String::from_utf8(renderer.into_inner()).unwrap();
        assert_eq!(out, "step 1\n █\n██\n");
    }

    #[test]
    fn test_finish_reports_outcome() {
        let mut renderer = TextRenderer::new(Vec::new());
        renderer.finish(&RunOutcome::Completed { frames: 4 });
        let out = String::from_utf8(renderer.into_inner()).unwrap();
        assert_eq!(out, "sorted after 4 frames\n");
    }

    #[test]
    fn test_json_lines() {
        let frames: Vec<Frame> = Algorithm::Insertion
            .run(Sequence::from_magnitudes(&[2, 1, 3]))
            .collect();
        let mut renderer = JsonLinesRenderer::new(Vec::new());
        for frame in &frames {
            renderer.render(frame);
        }

        let out = String::from_utf8(renderer.into_inner()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 1);
        let parsed: Frame = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(parsed.magnitudes(), vec![1, 2, 3]);
    }

    #[test]
    fn test_write_failures_are_kept() {
        let frame = Algorithm::Bubble
            .run(Sequence::from_magnitudes(&[2, 1]))
            .next()
            .unwrap();

        let mut text = TextRenderer::new(ClosedPipe);
        assert!(text.last_error().is_none());
        text.render(&frame);
        assert_eq!(text.last_error().map(|e| e.kind()), Some(io::ErrorKind::BrokenPipe));

        let mut json = JsonLinesRenderer::new(ClosedPipe);
        assert!(json.last_error().is_none());
        json.render(&frame);
        assert!(json.last_error().is_some());
    }
}

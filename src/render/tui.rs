//! Interactive Terminal Front End
//!
//! Bar chart, algorithm selector, speed control and event log over a
//! shared `Player`. Each run gets its own frame channel, so frames still
//! queued from a superseded run never reach the chart.

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, List, ListItem, Paragraph},
    Frame as TermFrame, Terminal,
};
use std::io::stdout;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};

use super::Renderer;
use crate::model::{Frame, Sequence, MAX_MAGNITUDE};
use crate::playback::{PlaybackEvent, Player, RunHandle, RunOutcome, RunStatus};
use crate::sort::Algorithm;

/// Frames travel from the playback task to the UI loop over this channel
enum AppEvent {
    Frame(Frame),
    Finished(RunOutcome),
}

/// Renderer handed to each run; forwards frames to the UI loop
struct ChannelRenderer {
    tx: mpsc::UnboundedSender<AppEvent>,
}

impl Renderer for ChannelRenderer {
    fn render(&mut self, frame: &Frame) {
        let _ = self.tx.send(AppEvent::Frame(frame.clone()));
    }

    fn finish(&mut self, outcome: &RunOutcome) {
        let _ = self.tx.send(AppEvent::Finished(*outcome));
    }
}

/// TUI Application State
struct App {
    player: Player,
    bars: Sequence,
    logs: Vec<String>,
    /// Frames of the run currently on screen
    event_rx: mpsc::UnboundedReceiver<AppEvent>,
    playback_rx: broadcast::Receiver<PlaybackEvent>,
}

impl App {
    fn new(player: Player) -> Self {
        let (_, rx) = mpsc::unbounded_channel();
        let playback_rx = player.subscribe();
        let bars = player.snapshot().sequence;
        Self { player, bars, logs: Vec::new(), event_rx: rx, playback_rx }
    }

    fn push_log(&mut self, msg: String) {
        self.logs.push(msg);
        if self.logs.len() > 100 {
            self.logs.remove(0);
        }
    }

    /// Drop the channel of the previous run along with anything still queued on it
    fn detach(&mut self) {
        let (_, rx) = mpsc::unbounded_channel();
        self.event_rx = rx;
    }

    fn start(&mut self) -> Option<RunHandle> {
        let (tx, rx) = mpsc::unbounded_channel();
        match self.player.start(ChannelRenderer { tx }) {
            Ok(handle) => {
                self.event_rx = rx;
                Some(handle)
            }
            Err(e) => {
                self.push_log(format!("! {}", e));
                None
            }
        }
    }

    fn shuffle(&mut self) {
        match self.player.shuffle() {
            Ok(()) => {
                self.detach();
                self.bars = self.player.snapshot().sequence;
            }
            Err(e) => self.push_log(format!("! {}", e)),
        }
    }

    fn select(&mut self, algorithm: Algorithm) {
        self.player.select_algorithm(algorithm);
        self.detach();
        self.bars = self.player.snapshot().sequence;
    }

    fn adjust_delay(&mut self, delta: i64) {
        let delay = self.player.snapshot().delay.adjusted(delta);
        self.player.set_delay(delay);
    }

    fn drain_events(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            match event {
                AppEvent::Frame(frame) => self.bars = Sequence::from(frame),
                AppEvent::Finished(outcome) => {
                    if !outcome.is_completed() {
                        self.bars = self.player.snapshot().sequence;
                    }
                }
            }
        }

        loop {
            match self.playback_rx.try_recv() {
                Ok(PlaybackEvent::FrameDelivered { .. }) => {}
                Ok(PlaybackEvent::RunStarted { algorithm, size, .. }) => {
                    self.push_log(format!("> {} on {} bars", algorithm.label(), size))
                }
                Ok(PlaybackEvent::RunCompleted { frames, .. }) => {
                    self.push_log(format!("✓ sorted in {} frames", frames))
                }
                Ok(PlaybackEvent::RunAborted { frames, .. }) => {
                    self.push_log(format!("x aborted after {} frames", frames))
                }
                Ok(PlaybackEvent::Shuffled { size }) => self.push_log(format!("~ shuffled {} bars", size)),
                Ok(PlaybackEvent::AlgorithmSelected { algorithm }) => {
                    self.push_log(format!("* {}", algorithm.label()))
                }
                Ok(PlaybackEvent::DelayChanged { delay_ms }) => self.push_log(format!("@ {} ms", delay_ms)),
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                Err(_) => break,
            }
        }
    }
}

/// Interactive bar-chart front end for a `Player`
pub struct VisualizerTui {
    player: Player,
}

impl VisualizerTui {
    pub fn new(player: Player) -> Self {
        Self { player }
    }

    /// Take over the terminal until the user quits. The key loop blocks,
    /// so it runs on the blocking pool and leaves the runtime free for
    /// playback tasks.
    pub async fn run(self) -> Result<()> {
        let player = self.player.clone();
        let result = tokio::task::spawn_blocking(move || -> Result<()> {
            enable_raw_mode()?;
            stdout().execute(EnterAlternateScreen)?;
            let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

            let result = event_loop(&mut terminal, App::new(self.player));

            disable_raw_mode()?;
            stdout().execute(LeaveAlternateScreen)?;
            result
        })
        .await?;
        player.abort();
        result
    }
}

fn event_loop<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> Result<()> {
    let tick_rate = Duration::from_millis(16);

    loop {
        app.drain_events();
        terminal.draw(|f| ui(f, &app))?;

        if !event::poll(tick_rate)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => break,
            KeyCode::Enter | KeyCode::Char('s') => {
                app.start();
            }
            KeyCode::Char('r') => app.shuffle(),
            KeyCode::Left => {
                let prev = app.player.snapshot().algorithm.previous();
                app.select(prev);
            }
            KeyCode::Right => {
                let next = app.player.snapshot().algorithm.next();
                app.select(next);
            }
            KeyCode::Char(c @ '1'..='5') => {
                let index = c as usize - '1' as usize;
                app.select(Algorithm::ALL[index]);
            }
            KeyCode::Char('+') | KeyCode::Char('=') => app.adjust_delay(1),
            KeyCode::Char('-') => app.adjust_delay(-1),
            KeyCode::Up => app.adjust_delay(10),
            KeyCode::Down => app.adjust_delay(-10),
            _ => {}
        }
    }
    Ok(())
}

fn to_term_color(color: crate::model::Color) -> Color {
    Color::Rgb(color.r, color.g, color.b)
}

fn ui(f: &mut TermFrame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(8),
            Constraint::Length(7),
            Constraint::Length(1),
        ])
        .split(f.area());

    // Bars
    let chart_area = chunks[0];
    let n = app.bars.len().max(1) as u16;
    let bar_width = (chart_area.width.saturating_sub(2) / n).max(1);
    let bars: Vec<Bar> = app
        .bars
        .elements()
        .iter()
        .map(|e| {
            Bar::default()
                .value(u64::from(e.magnitude))
                .text_value(String::new())
                .style(Style::default().fg(to_term_color(e.color)))
        })
        .collect();
    let chart = BarChart::default()
        .block(Block::default().borders(Borders::ALL).title(" Sorting Visualizer "))
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(0)
        .max(u64::from(MAX_MAGNITUDE));
    f.render_widget(chart, chart_area);

    let lower = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    // Controls
    let snap = app.player.snapshot();
    let (status_text, status_color) = match snap.status {
        RunStatus::Idle => ("Idle", Color::Gray),
        RunStatus::Running => ("Sorting...", Color::Yellow),
        RunStatus::Sorted => ("Sorted", Color::Green),
    };
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let controls = Paragraph::new(vec![
        Line::from(vec![
            Span::styled("Algorithm: ", bold),
            Span::styled(snap.algorithm.label(), Style::default().fg(Color::Cyan)),
        ]),
        Line::from(vec![
            Span::styled("Speed (ms): ", bold),
            Span::from(snap.delay.as_millis().to_string()),
        ]),
        Line::from(vec![
            Span::styled("Status: ", bold),
            Span::styled(status_text, Style::default().fg(status_color)),
        ]),
        Line::from(vec![
            Span::styled("Frames: ", bold),
            Span::from(snap.frames_delivered.to_string()),
        ]),
    ])
    .block(Block::default().borders(Borders::ALL).title(" Controls "));
    f.render_widget(controls, lower[0]);

    // Event log, newest at the bottom
    let visible = lower[1].height.saturating_sub(2) as usize;
    let logs: Vec<ListItem> = app
        .logs
        .iter()
        .skip(app.logs.len().saturating_sub(visible))
        .map(|l| ListItem::new(l.as_str()))
        .collect();
    let logs_list = List::new(logs).block(Block::default().borders(Borders::ALL).title(" Events "));
    f.render_widget(logs_list, lower[1]);

    let footer = Paragraph::new(
        " ENTER/s: Sort | r: Shuffle | ←/→ 1-5: Algorithm | +/- ↑/↓: Speed | q/ESC: Quit ",
    )
    .style(Style::default().fg(Color::DarkGray));
    f.render_widget(footer, chunks[2]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VisualizerConfig;
    use ratatui::backend::TestBackend;

    #[tokio::test]
    async fn test_renders_controls() {
        let player = Player::with_sequence(
            &VisualizerConfig { algorithm: Algorithm::Merge, ..Default::default() },
            Sequence::from_magnitudes(&[30, 10, 20]),
        )
        .unwrap();
        let app = App::new(player);
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();

        terminal.draw(|f| ui(f, &app)).unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("Merge Sort"));
        assert!(text.contains("Idle"));
    }

    #[tokio::test]
    async fn test_run_updates_bars() {
        let player = Player::with_sequence(
            &VisualizerConfig { delay_ms: 1, ..Default::default() },
            Sequence::from_magnitudes(&[2, 1]),
        )
        .unwrap();
        let mut app = App::new(player.clone());

        app.start().unwrap().wait().await.unwrap();
        app.drain_events();

        assert_eq!(app.bars.magnitudes(), vec![1, 2]);
        assert!(app.logs.iter().any(|l| l.contains("sorted in 1 frames")));
    }

    fn descending_player(algorithm: Algorithm) -> Player {
        Player::with_sequence(
            &VisualizerConfig { delay_ms: 100, algorithm, ..Default::default() },
            Sequence::from_magnitudes(&[9, 8, 7, 6, 5, 4, 3, 2, 1]),
        )
        .unwrap()
    }

    async fn wait_for_first_frame(player: &Player) {
        while player.snapshot().frames_delivered == 0 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_shuffle_mid_run_discards_queued_frames() {
        let player = descending_player(Algorithm::Bubble);
        let mut app = App::new(player.clone());
        let handle = app.start().unwrap();
        wait_for_first_frame(&player).await;

        app.shuffle();
        let fresh = player.snapshot().sequence;
        app.drain_events();
        assert_eq!(app.bars, fresh);

        let outcome = handle.wait().await.unwrap();
        assert!(!outcome.is_completed());
        app.drain_events();
        assert_eq!(app.bars, fresh);
        assert_eq!(player.status(), RunStatus::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_select_mid_run_keeps_last_delivered_frame() {
        let player = descending_player(Algorithm::Bubble);
        let mut app = App::new(player.clone());
        let handle = app.start().unwrap();
        wait_for_first_frame(&player).await;

        app.select(Algorithm::Quick);
        let kept = player.snapshot().sequence;
        assert_eq!(kept.magnitudes(), vec![8, 9, 7, 6, 5, 4, 3, 2, 1]);
        app.drain_events();
        assert_eq!(app.bars, kept);

        assert!(!handle.wait().await.unwrap().is_completed());
        app.drain_events();
        assert_eq!(app.bars, kept);

        // The next run starts from the kept frame with the new algorithm
        let outcome = app.start().unwrap().wait().await.unwrap();
        assert!(outcome.is_completed());
        app.drain_events();
        assert!(app.bars.is_sorted());
        assert_eq!(player.status(), RunStatus::Sorted);
    }
}

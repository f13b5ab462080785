//! Player: the single owner of visualizer state.
//!
//! Holds the current sequence, selected algorithm, delay, and the run in
//! flight, and enforces `Idle -> Running -> (Sorted | Idle)`. At most one
//! run is active. Starting a second one is rejected; shuffling or switching
//! algorithm aborts the active one first. Frames are delivered only after
//! re-checking, under the state lock, that their run is still the active
//! one, so a superseded run can never reach a renderer.

use serde::{Deserialize, Serialize};
use std::ops::ControlFlow;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::events::{EventBus, PlaybackEvent};
use super::{play, AbortFlag, RunOutcome};
use crate::config::{Delay, VisualizerConfig};
use crate::error::{Result, SortError};
use crate::model::{generate, Frame, Sequence};
use crate::render::Renderer;
use crate::sort::Algorithm;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Idle,
    Running,
    Sorted,
}

/// Read-only copy of the player state, handed to views
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSnapshot {
    pub status: RunStatus,
    pub algorithm: Algorithm,
    pub delay: Delay,
    /// Latest delivered frame, or the initial sequence
    pub sequence: Sequence,
    pub run_id: Option<Uuid>,
    pub frames_delivered: usize,
}

struct ActiveRun {
    id: Uuid,
    abort: AbortFlag,
}

struct PlayerState {
    status: RunStatus,
    algorithm: Algorithm,
    delay: Delay,
    size: usize,
    sequence: Sequence,
    active: Option<ActiveRun>,
    last_run: Option<Uuid>,
    frames_delivered: usize,
}

impl PlayerState {
    /// Stop the active run, if any; returns its id
    fn abort_active(&mut self) -> Option<Uuid> {
        let run = self.active.take()?;
        run.abort.request();
        self.status = RunStatus::Idle;
        Some(run.id)
    }
}

struct Shared {
    state: Mutex<PlayerState>,
    /// Serialises renderer calls across runs
    delivery: Mutex<()>,
    events: EventBus,
}

/// Handle to a spawned run
#[derive(Debug)]
pub struct RunHandle {
    id: Uuid,
    join: JoinHandle<RunOutcome>,
}

impl RunHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Wait for the run to finish
    pub async fn wait(self) -> std::result::Result<RunOutcome, JoinError> {
        self.join.await
    }
}

/// Cheap to clone; clones drive the same state
#[derive(Clone)]
pub struct Player {
    shared: Arc<Shared>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Player {
    /// Validate `config` and generate the first sequence
    pub fn new(config: &VisualizerConfig) -> Result<Self> {
        config.validate()?;
        let sequence = generate(config.size)?;
        Self::with_sequence(config, sequence)
    }

    /// Start from a given sequence; later shuffles keep its length
    pub fn with_sequence(config: &VisualizerConfig, sequence: Sequence) -> Result<Self> {
        if sequence.is_empty() {
            return Err(SortError::InvalidSize("0".to_string()));
        }
        let state = PlayerState {
            status: RunStatus::Idle,
            algorithm: config.algorithm,
            delay: config.delay()?,
            size: sequence.len(),
            sequence,
            active: None,
            last_run: None,
            frames_delivered: 0,
        };
        Ok(Self {
            shared: Arc::new(Shared {
                state: Mutex::new(state),
                delivery: Mutex::new(()),
                events: EventBus::new(),
            }),
        })
    }

    pub fn snapshot(&self) -> PlayerSnapshot {
        let state = lock(&self.shared.state);
        PlayerSnapshot {
            status: state.status,
            algorithm: state.algorithm,
            delay: state.delay,
            sequence: state.sequence.clone(),
            run_id: state.active.as_ref().map(|r| r.id).or(state.last_run),
            frames_delivered: state.frames_delivered,
        }
    }

    pub fn status(&self) -> RunStatus {
        lock(&self.shared.state).status
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PlaybackEvent> {
        self.shared.events.subscribe()
    }

    /// Sort the current sequence with the selected algorithm, pacing frames
    /// into `renderer` on a background task.
    ///
    /// Fails with `ConcurrentRunConflict` while another run is in flight.
    /// Must be called from within a tokio runtime.
    pub fn start<R>(&self, renderer: R) -> Result<RunHandle>
    where
        R: Renderer + 'static,
    {
        let (id, stream, delay, abort) = {
            let mut state = lock(&self.shared.state);
            if let Some(active) = &state.active {
                warn!(active = %active.id, "rejected run start while another run is in flight");
                return Err(SortError::ConcurrentRunConflict { active: active.id });
            }

            let id = Uuid::new_v4();
            let abort = AbortFlag::new();
            let stream = state.algorithm.run(state.sequence.clone());
            state.status = RunStatus::Running;
            state.active = Some(ActiveRun { id, abort: abort.clone() });
            state.last_run = Some(id);
            state.frames_delivered = 0;

            info!(run = %id, algorithm = %state.algorithm, size = state.sequence.len(), delay_ms = state.delay.as_millis(), "run started");
            self.shared.events.publish(PlaybackEvent::RunStarted {
                run_id: id,
                algorithm: state.algorithm,
                size: state.sequence.len(),
                at: chrono::Utc::now(),
            });
            (id, stream, state.delay, abort)
        };

        let shared = self.shared.clone();
        let join = tokio::spawn(async move {
            let mut renderer = renderer;
            let outcome = play(stream, delay, &abort, |frame| shared.deliver(id, frame, &mut renderer)).await;
            shared.finish(id, &outcome);
            renderer.finish(&outcome);
            outcome
        });

        Ok(RunHandle { id, join })
    }

    /// Replace the sequence with a fresh random one of the same length.
    /// Any active run is aborted and a `Sorted` status is cleared.
    pub fn shuffle(&self) -> Result<()> {
        let mut state = lock(&self.shared.state);
        let sequence = generate(state.size)?;
        if let Some(id) = state.abort_active() {
            info!(run = %id, "run aborted by shuffle");
        }
        state.sequence = sequence;
        state.status = RunStatus::Idle;
        state.frames_delivered = 0;
        debug!(size = state.size, "sequence shuffled");
        self.shared.events.publish(PlaybackEvent::Shuffled { size: state.size });
        Ok(())
    }

    /// Select the algorithm for the next run. An active run is aborted and
    /// the sequence keeps its last delivered frame.
    pub fn select_algorithm(&self, algorithm: Algorithm) {
        let mut state = lock(&self.shared.state);
        if let Some(id) = state.abort_active() {
            info!(run = %id, %algorithm, "run aborted by algorithm switch");
        }
        state.algorithm = algorithm;
        self.shared.events.publish(PlaybackEvent::AlgorithmSelected { algorithm });
    }

    /// Change the pace; applies from the next run
    pub fn set_delay(&self, delay: Delay) {
        let mut state = lock(&self.shared.state);
        state.delay = delay;
        self.shared.events.publish(PlaybackEvent::DelayChanged { delay_ms: delay.as_millis() });
    }

    /// Stop the active run; returns false when nothing was running
    pub fn abort(&self) -> bool {
        let mut state = lock(&self.shared.state);
        match state.abort_active() {
            Some(id) => {
                info!(run = %id, "run aborted");
                true
            }
            None => false,
        }
    }
}

impl Shared {
    fn deliver<R: Renderer + ?Sized>(&self, id: Uuid, frame: &Frame, renderer: &mut R) -> ControlFlow<()> {
        let _delivery = lock(&self.delivery);
        {
            let mut state = lock(&self.state);
            let current = matches!(&state.active, Some(run) if run.id == id && !run.abort.is_requested());
            if !current {
                debug!(run = %id, step = frame.step(), "dropping frame from superseded run");
                return ControlFlow::Break(());
            }
            state.sequence = Sequence::new(frame.elements().to_vec());
            state.frames_delivered += 1;
        }
        renderer.render(frame);
        self.events.publish(PlaybackEvent::FrameDelivered { run_id: id, step: frame.step() });
        ControlFlow::Continue(())
    }

    fn finish(&self, id: Uuid, outcome: &RunOutcome) {
        let mut state = lock(&self.state);
        let still_active = state.active.as_ref().is_some_and(|run| run.id == id);
        let at = chrono::Utc::now();
        match outcome {
            RunOutcome::Completed { frames } if still_active => {
                state.active = None;
                state.status = RunStatus::Sorted;
                info!(run = %id, frames, "run completed");
                self.events.publish(PlaybackEvent::RunCompleted { run_id: id, frames: *frames, at });
            }
            _ => {
                if still_active {
                    state.active = None;
                    state.status = RunStatus::Idle;
                }
                info!(run = %id, frames = outcome.frames(), "run stopped early");
                self.events.publish(PlaybackEvent::RunAborted { run_id: id, frames: outcome.frames(), at });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    fn config(delay_ms: u64, algorithm: Algorithm) -> VisualizerConfig {
        VisualizerConfig { size: 4, delay_ms, algorithm }
    }

    fn collector() -> (Arc<StdMutex<Vec<Vec<u32>>>>, impl Renderer + 'static) {
        let seen = Arc::new(StdMutex::new(Vec::new()));
        let sink = seen.clone();
        (seen, move |f: &Frame| sink.lock().unwrap().push(f.magnitudes()))
    }

    #[tokio::test]
    async fn test_run_reaches_sorted() {
        let player = Player::with_sequence(
            &config(1, Algorithm::Bubble),
            Sequence::from_magnitudes(&[2, 1]),
        )
        .unwrap();
        let (seen, renderer) = collector();

        let outcome = player.start(renderer).unwrap().wait().await.unwrap();

        assert_eq!(outcome, RunOutcome::Completed { frames: 1 });
        assert_eq!(*seen.lock().unwrap(), vec![vec![1, 2]]);
        let snap = player.snapshot();
        assert_eq!(snap.status, RunStatus::Sorted);
        assert_eq!(snap.sequence.magnitudes(), vec![1, 2]);
        assert_eq!(snap.frames_delivered, 1);
    }

    #[tokio::test]
    async fn test_second_start_is_rejected() {
        let player = Player::with_sequence(
            &config(100, Algorithm::Bubble),
            Sequence::from_magnitudes(&[4, 3, 2, 1]),
        )
        .unwrap();
        let first = player.start(|_: &Frame| {}).unwrap();

        let err = player.start(|_: &Frame| {}).unwrap_err();
        assert_eq!(err, SortError::ConcurrentRunConflict { active: first.id() });

        assert!(player.abort());
        assert!(!first.wait().await.unwrap().is_completed());
        assert_eq!(player.status(), RunStatus::Idle);
    }

    #[tokio::test]
    async fn test_shuffle_clears_sorted() {
        let player = Player::with_sequence(
            &config(1, Algorithm::Selection),
            Sequence::from_magnitudes(&[1, 2, 3]),
        )
        .unwrap();
        let outcome = player.start(|_: &Frame| {}).unwrap().wait().await.unwrap();
        assert_eq!(outcome, RunOutcome::Completed { frames: 0 });
        assert_eq!(player.status(), RunStatus::Sorted);

        player.shuffle().unwrap();
        let snap = player.snapshot();
        assert_eq!(snap.status, RunStatus::Idle);
        assert_eq!(snap.sequence.len(), 3);
    }

    #[tokio::test]
    async fn test_select_while_idle_keeps_data() {
        let player = Player::with_sequence(
            &config(1, Algorithm::Bubble),
            Sequence::from_magnitudes(&[3, 1, 2]),
        )
        .unwrap();
        let before = player.snapshot().sequence;
        player.select_algorithm(Algorithm::Quick);

        let snap = player.snapshot();
        assert_eq!(snap.algorithm, Algorithm::Quick);
        assert_eq!(snap.sequence, before);
        assert_eq!(snap.status, RunStatus::Idle);
    }

    #[test]
    fn test_rejects_empty_sequence() {
        let err = Player::with_sequence(&VisualizerConfig::default(), Sequence::default())
            .err()
            .unwrap();
        assert_eq!(err, SortError::InvalidSize("0".to_string()));
    }
}

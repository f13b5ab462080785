//! Playback Event Bus
//!
//! Asynchronous pub/sub for run lifecycle notifications. Each `Player`
//! owns one bus; views subscribe to it instead of polling.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::sort::Algorithm;

/// Things that happen to a player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum PlaybackEvent {
    /// A run began playing
    RunStarted { run_id: Uuid, algorithm: Algorithm, size: usize, at: DateTime<Utc> },
    /// A frame reached the renderer
    FrameDelivered { run_id: Uuid, step: usize },
    /// The final frame was delivered; the sequence is sorted
    RunCompleted { run_id: Uuid, frames: usize, at: DateTime<Utc> },
    /// The run stopped early
    RunAborted { run_id: Uuid, frames: usize, at: DateTime<Utc> },
    /// A fresh sequence replaced the old one
    Shuffled { size: usize },
    AlgorithmSelected { algorithm: Algorithm },
    DelayChanged { delay_ms: u64 },
}

/// Fan-out of `PlaybackEvent`s to any number of views
pub struct EventBus {
    tx: broadcast::Sender<PlaybackEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1024);
        Self { tx }
    }

    /// Events sent with no subscribers are dropped
    pub fn publish(&self, event: PlaybackEvent) {
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PlaybackEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

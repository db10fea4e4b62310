//! # Debate Session
//!
//! Handle owned by the hosting process and shared with the front door. Owns
//! the transcript and the run state, starts the turn loop at most once and
//! exposes the read side: history, cursor polls and live subscriptions.

use futures::Stream;
use log::{debug, error, info};
use serde::Serialize;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::orchestrator::TurnScheduler;
use crate::core::DebateConfig;
use crate::features::broadcast::{live_feed, FeedEvent};
use crate::features::participants::Participant;
use crate::features::transcript::{Snapshot, TranscriptStore, Turn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionState {
    /// Constructed, loop not started
    Idle,
    Running,
    /// Loop cancelled; terminal
    Stopped,
}

pub struct DebateSession {
    store: Arc<TranscriptStore>,
    /// Seat A then seat B
    participants: [Arc<dyn Participant>; 2],
    config: DebateConfig,
    state: Mutex<SessionState>,
    shutdown: CancellationToken,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl DebateSession {
    /// `seat_a` speaks first
    pub fn new(
        config: DebateConfig,
        seat_a: Arc<dyn Participant>,
        seat_b: Arc<dyn Participant>,
    ) -> Self {
        Self {
            store: Arc::new(TranscriptStore::new(config.feed_capacity)),
            participants: [seat_a, seat_b],
            config,
            state: Mutex::new(SessionState::Idle),
            shutdown: CancellationToken::new(),
            task: Mutex::new(None),
        }
    }

    /// Spawn the turn loop unless it was already started. Returns `true` only
    /// for the call that actually started it. Must run inside a tokio runtime.
    pub fn start_if_not_running(&self) -> bool {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        match *state {
            SessionState::Running => false,
            SessionState::Stopped => {
                debug!("Ignoring start request for a stopped debate");
                false
            }
            SessionState::Idle => {
                let scheduler = TurnScheduler::new(
                    self.store.clone(),
                    self.participants.clone(),
                    self.config.clone(),
                );
                let handle = tokio::spawn(scheduler.run(self.shutdown.clone()));
                *self.task.lock().unwrap_or_else(PoisonError::into_inner) = Some(handle);
                *state = SessionState::Running;
                info!("Debate started");
                true
            }
        }
    }

    /// Cancel the loop and wait for it to wind down. Open subscriptions end.
    pub async fn stop(&self) {
        {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            if *state == SessionState::Stopped {
                return;
            }
            *state = SessionState::Stopped;
        }
        self.shutdown.cancel();

        let handle = self.task.lock().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                error!("Debate loop task ended abnormally: {e}");
            }
        }
        info!("Debate stopped");
    }

    pub fn state(&self) -> SessionState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_running(&self) -> bool {
        self.state() == SessionState::Running
    }

    /// Full transcript snapshot
    pub fn history(&self) -> Vec<Turn> {
        self.store.history()
    }

    /// Turns after `cursor` plus the current total
    pub fn since(&self, cursor: u64) -> Snapshot {
        self.store.snapshot_since(cursor)
    }

    pub fn total(&self) -> usize {
        self.store.len()
    }

    /// Replay-then-tail subscription, independent per caller
    pub fn subscribe(&self) -> impl Stream<Item = FeedEvent> + Send + 'static {
        live_feed(self.store.clone(), self.config.heartbeat, self.shutdown.clone())
    }

    /// Seat A then seat B
    pub fn participants(&self) -> &[Arc<dyn Participant>; 2] {
        &self.participants
    }
}

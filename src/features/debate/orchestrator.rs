//! # Debate Orchestrator
//!
//! The turn loop. Seat A opens with a fixed prompt, then the seats alternate by
//! transcript parity: build context, ask the active participant, commit the
//! reply or a tagged error turn, pause, repeat until shut down.

use futures::FutureExt;
use log::{debug, error, info};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use super::context::recent_context;
use crate::core::{DebateConfig, ParticipantError};
use crate::features::participants::Participant;
use crate::features::transcript::{Seat, TranscriptStore, Turn};

/// Drives the alternating-turn loop; the only writer to the transcript
pub struct TurnScheduler {
    store: Arc<TranscriptStore>,
    /// Indexed by [`Seat::index`]
    participants: [Arc<dyn Participant>; 2],
    config: DebateConfig,
}

impl TurnScheduler {
    pub fn new(
        store: Arc<TranscriptStore>,
        participants: [Arc<dyn Participant>; 2],
        config: DebateConfig,
    ) -> Self {
        Self {
            store,
            participants,
            config,
        }
    }

    pub fn participant(&self, seat: Seat) -> &Arc<dyn Participant> {
        &self.participants[seat.index()]
    }

    /// Commit the opening turn for seat A if the transcript is empty
    pub fn seed_opener(&self) -> Option<Turn> {
        if !self.store.is_empty() {
            return None;
        }
        let opener = self.participant(Seat::A);
        Some(
            self.store
                .append(Seat::A, opener.name(), &self.config.opening_prompt),
        )
    }

    /// Produce exactly one turn
    pub async fn take_turn(&self) -> Turn {
        if let Some(opening) = self.seed_opener() {
            return opening;
        }

        let seat = Seat::for_turn_count(self.store.len());
        let participant = self.participant(seat);
        let context = recent_context(&self.store, self.config.context_turns);

        debug!(
            "Turn {}: {} responding to {} chars of context",
            self.store.len() + 1,
            participant.name(),
            context.len()
        );

        match participant.respond(&context).await {
            Ok(text) if !text.trim().is_empty() => {
                self.store.append(seat, participant.name(), &text)
            }
            Ok(_) => self.record_failure(seat, &ParticipantError::EmptyResponse),
            Err(e) => self.record_failure(seat, &e),
        }
    }

    fn record_failure(&self, seat: Seat, e: &ParticipantError) -> Turn {
        let name = self.participant(seat).name();
        error!("{name} failed with: {e} ({})", e.kind());
        self.store.append_error(seat, name, &e.to_string())
    }

    /// Run until `shutdown` is cancelled. A panicking iteration is logged and
    /// followed by the cooldown; it never ends the loop.
    pub async fn run(self, shutdown: CancellationToken) {
        info!(
            "Debate loop started: {} vs {}",
            self.participant(Seat::A).name(),
            self.participant(Seat::B).name()
        );
        self.seed_opener();

        loop {
            let outcome = tokio::select! {
                _ = shutdown.cancelled() => break,
                outcome = AssertUnwindSafe(self.take_turn()).catch_unwind() => outcome,
            };

            let pause = match outcome {
                Ok(_) => self.config.turn_delay,
                Err(panic) => {
                    error!("Debate loop error: {}", panic_message(&*panic));
                    self.config.cooldown
                }
            };

            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = sleep(pause) => {}
            }
        }

        info!("Debate loop stopped after {} turns", self.store.len());
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

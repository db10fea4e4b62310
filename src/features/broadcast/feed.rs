//! # Live Feed
//!
//! Replay-then-tail stream over the transcript. A subscriber first gets the
//! full history, then each committed turn as it is pushed, with a heartbeat
//! whenever nothing arrived for one interval. A subscriber that falls further
//! behind than the broadcast buffer refills the gap from the store by cursor,
//! so it never drops a turn and never holds up the writer.

use futures::stream::{self, Stream};
use log::warn;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio_util::sync::CancellationToken;

use crate::features::transcript::{TranscriptStore, Turn};

/// Item of a live subscription
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    Turn(Turn),
    /// Nothing new within one heartbeat interval
    Heartbeat,
}

struct FeedState {
    store: Arc<TranscriptStore>,
    backlog: VecDeque<Turn>,
    rx: broadcast::Receiver<Turn>,
    /// Sequence of the last turn yielded
    cursor: u64,
    heartbeat: Duration,
    shutdown: CancellationToken,
}

impl FeedState {
    fn refill(&mut self) {
        let missing = self.store.since(self.cursor);
        let known = self.backlog.back().map(|t| t.sequence).unwrap_or(self.cursor);
        self.backlog
            .extend(missing.into_iter().filter(|t| t.sequence > known));
    }
}

/// Subscribe to `store`. The stream ends once `shutdown` is cancelled and the
/// replayed history has been drained.
pub fn live_feed(
    store: Arc<TranscriptStore>,
    heartbeat: Duration,
    shutdown: CancellationToken,
) -> impl Stream<Item = FeedEvent> + Send + 'static {
    let (history, rx) = store.subscribe();

    let state = FeedState {
        store,
        backlog: history.into(),
        rx,
        cursor: 0,
        heartbeat,
        shutdown,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(turn) = state.backlog.pop_front() {
                state.cursor = turn.sequence;
                return Some((FeedEvent::Turn(turn), state));
            }

            let received = tokio::select! {
                _ = state.shutdown.cancelled() => return None,
                received = tokio::time::timeout(state.heartbeat, state.rx.recv()) => received,
            };

            match received {
                Err(_) => return Some((FeedEvent::Heartbeat, state)),
                Ok(Ok(turn)) => {
                    if turn.sequence <= state.cursor {
                        continue;
                    }
                    if turn.sequence != state.cursor + 1 {
                        state.refill();
                        continue;
                    }
                    state.cursor = turn.sequence;
                    return Some((FeedEvent::Turn(turn), state));
                }
                Ok(Err(RecvError::Lagged(skipped))) => {
                    warn!(
                        "Live feed subscriber lagged behind by {skipped} turns, \
                         catching up from transcript"
                    );
                    state.refill();
                }
                Ok(Err(RecvError::Closed)) => return None,
            }
        }
    })
}

//! # Transcript Store
//!
//! Append-only, ordered log of turns. Sequence numbers are handed out under the
//! write lock together with the live-feed notification, so a reader that takes
//! a snapshot and subscribes under the read lock sees every turn exactly once.

use chrono::Local;
use log::info;
use serde::Serialize;
use std::sync::{PoisonError, RwLock};
use tokio::sync::broadcast;

use super::turn::{Seat, Turn};

/// Turns after a cursor plus the transcript length at read time
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub turns: Vec<Turn>,
    pub total: usize,
}

pub struct TranscriptStore {
    turns: RwLock<Vec<Turn>>,
    /// Live notification of each committed turn
    feed: broadcast::Sender<Turn>,
}

impl TranscriptStore {
    /// `feed_capacity` bounds how far a subscriber may fall behind before it
    /// has to catch up from the store
    pub fn new(feed_capacity: usize) -> Self {
        let (feed, _) = broadcast::channel(feed_capacity.max(1));
        Self {
            turns: RwLock::new(Vec::new()),
            feed,
        }
    }

    /// Commit an utterance; text is trimmed
    pub fn append(&self, seat: Seat, speaker: &str, text: &str) -> Turn {
        self.push(seat, speaker, text.trim(), false)
    }

    /// Commit a recorded failure for `seat`
    pub fn append_error(&self, seat: Seat, speaker: &str, detail: &str) -> Turn {
        self.push(seat, speaker, &format!("[API Error: {}]", detail.trim()), true)
    }

    fn push(&self, seat: Seat, speaker: &str, text: &str, is_error: bool) -> Turn {
        let mut turns = self.turns.write().unwrap_or_else(PoisonError::into_inner);

        let turn = Turn {
            sequence: turns.len() as u64 + 1,
            seat,
            speaker: speaker.to_string(),
            text: text.to_string(),
            timestamp: Local::now(),
            is_error,
        };
        turns.push(turn.clone());

        // No receivers is fine; the turn is already stored
        let _ = self.feed.send(turn.clone());
        drop(turns);

        info!("Turn {}: {}", turn.sequence, turn);
        turn
    }

    /// All turns with `sequence > cursor`, in order
    pub fn since(&self, cursor: u64) -> Vec<Turn> {
        let turns = self.turns.read().unwrap_or_else(PoisonError::into_inner);
        Self::tail(&turns, cursor)
    }

    /// Same as [`since`](Self::since) plus the length, read under one lock
    pub fn snapshot_since(&self, cursor: u64) -> Snapshot {
        let turns = self.turns.read().unwrap_or_else(PoisonError::into_inner);
        Snapshot {
            turns: Self::tail(&turns, cursor),
            total: turns.len(),
        }
    }

    pub fn history(&self) -> Vec<Turn> {
        self.since(0)
    }

    pub fn len(&self) -> usize {
        self.turns.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Last `limit` turns, recorded errors included, oldest first
    pub fn recent_turns(&self, limit: usize) -> Vec<Turn> {
        let turns = self.turns.read().unwrap_or_else(PoisonError::into_inner);
        turns[turns.len().saturating_sub(limit)..].to_vec()
    }

    /// Full history and a receiver for everything after it, atomically
    pub fn subscribe(&self) -> (Vec<Turn>, broadcast::Receiver<Turn>) {
        let turns = self.turns.read().unwrap_or_else(PoisonError::into_inner);
        (turns.clone(), self.feed.subscribe())
    }

    fn tail(turns: &[Turn], cursor: u64) -> Vec<Turn> {
        // sequence == index + 1
        let start = usize::try_from(cursor).unwrap_or(usize::MAX).min(turns.len());
        turns[start..].to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn store_with(n: usize) -> TranscriptStore {
        let store = TranscriptStore::new(16);
        for i in 0..n {
            let seat = Seat::for_turn_count(i);
            store.append(seat, "speaker", &format!("line {}", i + 1));
        }
        store
    }

    #[test]
    fn test_sequences_start_at_one_and_are_gap_free() {
        let store = store_with(5);
        let sequences: Vec<u64> = store.history().iter().map(|t| t.sequence).collect();
        assert_eq!(sequences, vec![1, 2, 3, 4, 5]);
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn test_since_returns_strictly_later_turns() {
        let store = store_with(6);
        for n in 0..=8u64 {
            let turns = store.since(n);
            let expected: Vec<u64> = (n + 1..=6).collect();
            let got: Vec<u64> = turns.iter().map(|t| t.sequence).collect();
            assert_eq!(got, expected, "since({n})");
        }
    }

    #[test]
    fn test_append_trims_text() {
        let store = TranscriptStore::new(4);
        let turn = store.append(Seat::A, "Claude", "  hello there \n");
        assert_eq!(turn.text, "hello there");
        assert!(!turn.is_error);
    }

    #[test]
    fn test_error_turns_are_tagged() {
        let store = TranscriptStore::new(4);
        let turn = store.append_error(Seat::B, "Grok", "API timeout");
        assert!(turn.is_error);
        assert_eq!(turn.text, "[API Error: API timeout]");
    }

    #[test]
    fn test_snapshot_reports_total() {
        let store = store_with(4);
        let snapshot = store.snapshot_since(3);
        assert_eq!(snapshot.total, 4);
        assert_eq!(snapshot.turns.len(), 1);
        assert_eq!(snapshot.turns[0].sequence, 4);
    }

    #[test]
    fn test_recent_turns_include_errors() {
        let store = TranscriptStore::new(8);
        store.append(Seat::A, "Claude", "one");
        store.append(Seat::B, "Grok", "two");
        store.append_error(Seat::A, "Claude", "boom");
        store.append(Seat::B, "Grok", "three");

        let texts: Vec<String> = store
            .recent_turns(2)
            .into_iter()
            .map(|t| t.text)
            .collect();
        assert_eq!(texts, vec!["[API Error: boom]", "three"]);
        assert_eq!(store.recent_turns(10).len(), 4);
        assert!(TranscriptStore::new(8).recent_turns(4).is_empty());
    }

    #[tokio::test]
    async fn test_subscribe_sees_later_appends() {
        let store = store_with(2);
        let (history, mut rx) = store.subscribe();
        assert_eq!(history.len(), 2);

        store.append(Seat::A, "Claude", "third");
        let turn = rx.recv().await.unwrap();
        assert_eq!(turn.sequence, 3);
    }

    #[test]
    fn test_concurrent_appends_stay_gap_free() {
        let store = Arc::new(TranscriptStore::new(4));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for _ in 0..50 {
                        store.append(Seat::A, "writer", "x");
                        let _ = store.since(0);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let sequences: Vec<u64> = store.history().iter().map(|t| t.sequence).collect();
        assert_eq!(sequences, (1..=400).collect::<Vec<u64>>());
    }
}

//! # Debate Context
//!
//! Bounded slice of recent history handed to the next speaker.

use crate::features::transcript::{TranscriptStore, Turn};

/// Raw utterances, oldest first, one per line
pub fn format_context(turns: &[Turn]) -> String {
    turns
        .iter()
        .map(|turn| turn.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Context for the next turn: the last `window` turns, recorded errors included
pub fn recent_context(store: &TranscriptStore, window: usize) -> String {
    format_context(&store.recent_turns(window))
}

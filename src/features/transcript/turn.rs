//! Turn and seat types

use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt;

/// One of the fixed participant positions. Seat A always opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Seat {
    A,
    B,
}

impl Seat {
    /// Speaking order
    pub const ALL: [Seat; 2] = [Seat::A, Seat::B];

    /// Seat that speaks next when `turn_count` turns already exist
    pub fn for_turn_count(turn_count: usize) -> Seat {
        Self::ALL[turn_count % Self::ALL.len()]
    }

    pub fn index(self) -> usize {
        match self {
            Seat::A => 0,
            Seat::B => 1,
        }
    }
}

/// A single committed line of the debate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Turn {
    /// 1-based, gap-free, assigned by the store
    pub sequence: u64,
    pub seat: Seat,
    /// Display name of the participant in `seat`
    pub speaker: String,
    pub text: String,
    /// Wall-clock capture at append time; display only
    #[serde(serialize_with = "serialize_clock")]
    pub timestamp: DateTime<Local>,
    /// Recorded failure rather than an utterance
    pub is_error: bool,
}

impl Turn {
    /// `HH:MM:SS` rendering of the timestamp
    pub fn clock(&self) -> String {
        self.timestamp.format("%H:%M:%S").to_string()
    }
}

/// Legacy single-line rendering: `Speaker (HH:MM:SS): text`
impl fmt::Display for Turn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.speaker, self.clock(), self.text)
    }
}

fn serialize_clock<S>(timestamp: &DateTime<Local>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_str(&timestamp.format("%H:%M:%S"))
}

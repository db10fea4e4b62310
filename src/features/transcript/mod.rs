//! # Feature: Transcript
//!
//! In-memory, append-only record of the debate. Single source of truth for
//! history, cursor polling and live replay. Lives for the process lifetime.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Structured turns with seat and error flag; legacy line is display only
//! - 1.0.0: Initial release with ordered log and broadcast notification

pub mod store;
pub mod turn;

pub use store::{Snapshot, TranscriptStore};
pub use turn::{Seat, Turn};

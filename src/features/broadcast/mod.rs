//! # Feature: Live Broadcast
//!
//! Fan-out of committed turns to any number of observers. Reads only from the
//! transcript; there is no separate storage.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Push-based tail with cursor catch-up for lagging subscribers
//! - 1.0.0: Initial release with replay and heartbeat

pub mod feed;

pub use feed::{live_feed, FeedEvent};

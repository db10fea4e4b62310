//! # Feature: Debate
//!
//! Runs an endless two-seat debate: seat A opens with a fixed prompt, then the
//! seats alternate by transcript parity. Failures become visible error turns
//! and never stop the loop.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 2.0.0: Session handle with idempotent start, cancellation and live subscriptions
//! - 1.1.0: Panic isolation per iteration with cooldown
//! - 1.0.0: Initial alternating turn loop

pub mod context;
pub mod orchestrator;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use context::{format_context, recent_context};
pub use orchestrator::TurnScheduler;
pub use session::{DebateSession, SessionState};

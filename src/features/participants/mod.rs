//! # Feature: Participants
//!
//! Clients for the two upstream models taking part in the debate. Each client
//! builds its persona prompt, calls its API under a bounded retry policy and
//! normalizes the reply into plain text or a tagged error.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.2.0: Escalating per-attempt timeouts (15s/30s/45s) with linear backoff
//! - 1.1.0: Anthropic messages format alongside OpenAI-compatible chat completions
//! - 1.0.0: Initial release with Grok chat completions client

pub mod client;
pub mod prompt;
pub mod provider;
pub mod retry;

pub use client::{HttpParticipant, Participant};
pub use prompt::PromptBuilder;
pub use retry::with_retry;

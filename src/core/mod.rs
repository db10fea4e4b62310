//! # Core Module
//!
//! Core domain types, configuration, and error handling for the debate relay.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.2.0: Per-attempt timeout schedule and backoff unit in retry configuration
//! - 1.1.0: Add error module with the participant failure taxonomy
//! - 1.0.0: Initial creation with config and response modules

pub mod config;
pub mod error;
pub mod response;

// Re-export commonly used items
pub use config::{ApiFormat, Config, DebateConfig, ParticipantConfig, RetryPolicy};
pub use error::ParticipantError;
pub use response::{truncate_chars, DETAIL_LIMIT, ERROR_BODY_LIMIT};

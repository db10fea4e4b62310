// Core layer - shared types, configuration and errors
pub mod core;

// Features layer - transcript, participants, broadcast and the debate loop
pub mod features;

// HTTP front door
pub mod server;

// Re-export core config
pub use core::{Config, DebateConfig, ParticipantConfig, ParticipantError};

// Re-export feature items
pub use features::{
    // Broadcast
    FeedEvent,
    // Debate
    DebateSession, SessionState,
    // Participants
    HttpParticipant, Participant,
    // Transcript
    Seat, TranscriptStore, Turn,
};

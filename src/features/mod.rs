// Feature modules, leaf-first: transcript has no feature dependencies,
// debate ties the others together.
pub mod broadcast;
pub mod debate;
pub mod participants;
pub mod transcript;

pub use broadcast::{live_feed, FeedEvent};
pub use debate::{DebateSession, SessionState, TurnScheduler};
pub use participants::{HttpParticipant, Participant, PromptBuilder};
pub use transcript::{Seat, Snapshot, TranscriptStore, Turn};

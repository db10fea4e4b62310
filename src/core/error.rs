//! # Participant Error Taxonomy
//!
//! Every failure a participant call can end in. The scheduler branches on these
//! kinds instead of matching on strings, and the retry loop asks
//! [`ParticipantError::is_retriable`] whether another attempt can change the outcome.
//!
//! | Kind                | Retried |
//! |---------------------|---------|
//! | `Timeout`           | yes     |
//! | `RateLimited`       | yes     |
//! | `NetworkError`      | yes     |
//! | `Upstream` (5xx)    | yes     |
//! | `Upstream` (other)  | no      |
//! | `MissingCredential` | no      |
//! | `MalformedResponse` | no      |
//! | `EmptyResponse`     | no      |

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParticipantError {
    /// No API key configured for this participant
    #[error("{participant} API key not configured")]
    MissingCredential { participant: String },

    /// The attempt did not finish within its timeout
    #[error("API timeout")]
    Timeout,

    /// Upstream answered 429
    #[error("rate limited (429)")]
    RateLimited,

    /// Upstream answered 200 with a body we could not interpret
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Upstream answered 200 without any text
    #[error("empty response from API")]
    EmptyResponse,

    /// Connection-level failure before a status was received
    #[error("network issue - {0}")]
    NetworkError(String),

    /// Any other non-success status
    #[error("HTTP {status}: {body}")]
    Upstream { status: u16, body: String },
}

impl ParticipantError {
    /// Whether another attempt could plausibly succeed
    pub fn is_retriable(&self) -> bool {
        match self {
            Self::Timeout | Self::RateLimited | Self::NetworkError(_) => true,
            Self::Upstream { status, .. } => *status >= 500,
            Self::MissingCredential { .. } | Self::MalformedResponse(_) | Self::EmptyResponse => {
                false
            }
        }
    }

    /// Short stable name of the kind, used in logs and probe output
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingCredential { .. } => "missing_credential",
            Self::Timeout => "timeout",
            Self::RateLimited => "rate_limited",
            Self::MalformedResponse(_) => "malformed_response",
            Self::EmptyResponse => "empty_response",
            Self::NetworkError(_) => "network_error",
            Self::Upstream { .. } => "upstream",
        }
    }
}

//! # Participant Client
//!
//! Uniform `respond(context)` contract over one upstream model. All failure
//! paths resolve to a [`ParticipantError`]; nothing here panics or leaks a
//! transport error type to the scheduler.

use anyhow::Result;
use async_trait::async_trait;
use log::{debug, info};
use serde_json::Value;
use std::time::Duration;
use uuid::Uuid;

use super::prompt::PromptBuilder;
use super::provider;
use super::retry::with_retry;
use crate::core::{
    truncate_chars, ParticipantConfig, ParticipantError, DETAIL_LIMIT, ERROR_BODY_LIMIT,
};

/// One side of the debate
#[async_trait]
pub trait Participant: Send + Sync {
    /// Display name used as the speaker of this participant's turns
    fn name(&self) -> &str;

    /// Whether a credential is configured (reported by the health endpoint)
    fn has_credential(&self) -> bool {
        true
    }

    /// Produce the next utterance given the recent conversation, newest line last
    async fn respond(&self, context: &str) -> Result<String, ParticipantError>;
}

/// Participant backed by an HTTP chat API
pub struct HttpParticipant {
    config: ParticipantConfig,
    http: reqwest::Client,
}

impl HttpParticipant {
    pub fn new(config: ParticipantConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("debate-relay/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ParticipantConfig {
        &self.config
    }

    /// Single request/response exchange, no retries
    async fn attempt(
        &self,
        api_key: &str,
        body: &Value,
        limit: Duration,
        request_id: Uuid,
        attempt: u32,
    ) -> Result<String, ParticipantError> {
        debug!(
            "[{request_id}] Sending request to {} API (attempt {attempt}, timeout {limit:?})",
            self.config.name
        );

        let request = self
            .http
            .post(&self.config.endpoint)
            .timeout(limit)
            .json(body);
        let request = provider::authorize(self.config.format, request, api_key);

        let response = request.send().await.map_err(classify_transport)?;
        let status = response.status();
        info!("[{request_id}] {} API response status: {status}", self.config.name);

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ParticipantError::RateLimited);
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let body = if text.trim().is_empty() {
                "No error details".to_string()
            } else {
                truncate_chars(text.trim(), ERROR_BODY_LIMIT)
            };
            return Err(ParticipantError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await.map_err(classify_transport)?;
        let payload: Value = serde_json::from_slice(&bytes).map_err(|e| {
            ParticipantError::MalformedResponse(truncate_chars(&e.to_string(), DETAIL_LIMIT))
        })?;

        provider::extract_text(self.config.format, &payload)
    }
}

#[async_trait]
impl Participant for HttpParticipant {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn has_credential(&self) -> bool {
        self.config.api_key.is_some()
    }

    async fn respond(&self, context: &str) -> Result<String, ParticipantError> {
        let api_key = self.config.api_key.as_deref().ok_or_else(|| {
            ParticipantError::MissingCredential {
                participant: self.config.name.clone(),
            }
        })?;

        let request_id = Uuid::new_v4();
        let prompt = PromptBuilder::new(&self.config.prompt_template)
            .with_context(context)
            .build();
        let body = provider::build_request(&self.config, &prompt);

        let label = format!("[{request_id}] {}", self.config.name);
        with_retry(&self.config.retry, &label, |attempt, limit| {
            self.attempt(api_key, &body, limit, request_id, attempt)
        })
        .await
    }
}

fn classify_transport(e: reqwest::Error) -> ParticipantError {
    if e.is_timeout() {
        ParticipantError::Timeout
    } else {
        ParticipantError::NetworkError(truncate_chars(&e.to_string(), DETAIL_LIMIT))
    }
}

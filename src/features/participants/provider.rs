//! Upstream wire formats
//!
//! Request bodies, auth headers and response normalization for the two
//! supported API shapes. Everything here is pure so it can be tested without
//! a network.

use reqwest::RequestBuilder;
use serde_json::{json, Value};

use crate::core::{ApiFormat, ParticipantConfig, ParticipantError};

pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// JSON body for a single-prompt request
pub fn build_request(config: &ParticipantConfig, prompt: &str) -> Value {
    let messages = json!([{ "role": "user", "content": prompt }]);

    let mut body = match config.format {
        ApiFormat::OpenAiChat => json!({
            "model": config.model,
            "messages": messages,
            "stream": false,
            "max_tokens": config.max_tokens,
        }),
        ApiFormat::AnthropicMessages => json!({
            "model": config.model,
            "messages": messages,
            "max_tokens": config.max_tokens,
        }),
    };

    if let Some(temperature) = config.temperature {
        body["temperature"] = json!(temperature);
    }
    body
}

/// Attach credentials the way each API expects them
pub fn authorize(format: ApiFormat, request: RequestBuilder, api_key: &str) -> RequestBuilder {
    match format {
        ApiFormat::OpenAiChat => request.bearer_auth(api_key),
        ApiFormat::AnthropicMessages => request
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION),
    }
}

/// Pull the reply text out of a successful response body
pub fn extract_text(format: ApiFormat, payload: &Value) -> Result<String, ParticipantError> {
    if !payload.is_object() {
        return Err(ParticipantError::MalformedResponse(
            "response body is not a JSON object".to_string(),
        ));
    }

    let text = match format {
        ApiFormat::OpenAiChat => first_entry(payload, "choices")?
            .and_then(|choice| choice.get("message"))
            .and_then(|message| message.get("content")),
        ApiFormat::AnthropicMessages => first_entry(payload, "content")?
            .and_then(|block| block.get("text")),
    };

    match text {
        None | Some(Value::Null) => Err(ParticipantError::EmptyResponse),
        Some(Value::String(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                Err(ParticipantError::EmptyResponse)
            } else {
                Ok(trimmed.to_string())
            }
        }
        Some(other) => Err(ParticipantError::MalformedResponse(format!(
            "expected text, found {other}"
        ))),
    }
}

/// First element of an array field; `None` when the field is absent or empty
fn first_entry<'a>(payload: &'a Value, field: &str) -> Result<Option<&'a Value>, ParticipantError> {
    match payload.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => Ok(items.first()),
        Some(_) => Err(ParticipantError::MalformedResponse(format!(
            "`{field}` is not an array"
        ))),
    }
}

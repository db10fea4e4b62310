//! # Configuration
//!
//! Environment-driven configuration for both participants and the turn loop.
//! Everything the engine needs is resolved here once at startup and handed to
//! the session by value; nothing below this module reads the environment.

use anyhow::{anyhow, Result};
use std::str::FromStr;
use std::time::Duration;

pub const CLAUDE_ENDPOINT: &str = "https://api.anthropic.com/v1/messages";
pub const GROK_ENDPOINT: &str = "https://api.x.ai/v1/chat/completions";
pub const CLAUDE_MODEL: &str = "claude-3-haiku-20240307";
pub const GROK_MODEL: &str = "grok-4";

pub const DEFAULT_OPENING_PROMPT: &str =
    "What is consciousness and how might it emerge from complex information processing?";

pub const CLAUDE_PROMPT: &str = "You are Claude, participating in a philosophical discussion. Here's the recent conversation:

{context}

Please respond with your perspective on this topic. Keep your response to 1-2 sentences.";

pub const GROK_PROMPT: &str = "You are Grok, an AI assistant with a unique perspective. Here's the recent conversation:

{context}

Please respond with your thoughts on this topic. Keep your response to 1-2 sentences and share your genuine perspective.";

/// Wire format spoken by an upstream endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiFormat {
    /// `POST /v1/messages`, `x-api-key` header, text under `content[0].text`
    AnthropicMessages,
    /// `POST /v1/chat/completions`, Bearer auth, text under `choices[0].message.content`
    OpenAiChat,
}

/// Attempt budget and timing for one participant's upstream calls
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Timeout per attempt; the last entry repeats if the budget is longer
    pub attempt_timeouts: Vec<Duration>,
    /// Wait before retry `n` is `n * backoff_unit`
    pub backoff_unit: Duration,
}

impl RetryPolicy {
    /// Timeout for a 1-based attempt number
    pub fn timeout_for(&self, attempt: u32) -> Duration {
        let index = (attempt.max(1) - 1) as usize;
        self.attempt_timeouts
            .get(index)
            .or_else(|| self.attempt_timeouts.last())
            .copied()
            .unwrap_or(Duration::from_secs(45))
    }

    /// Wait after a failed 1-based attempt, before the next one starts
    pub fn backoff_after(&self, attempt: u32) -> Duration {
        self.backoff_unit.saturating_mul(attempt)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            attempt_timeouts: vec![
                Duration::from_secs(15),
                Duration::from_secs(30),
                Duration::from_secs(45),
            ],
            backoff_unit: Duration::from_secs(2),
        }
    }
}

/// Everything needed to talk to one upstream model
#[derive(Debug, Clone)]
pub struct ParticipantConfig {
    /// Display name, used as the speaker on every turn
    pub name: String,
    pub format: ApiFormat,
    pub endpoint: String,
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: Option<f32>,
    pub max_tokens: u32,
    /// Persona instruction with a `{context}` placeholder
    pub prompt_template: String,
    pub retry: RetryPolicy,
}

impl ParticipantConfig {
    pub fn claude() -> Self {
        Self {
            name: "Claude".to_string(),
            format: ApiFormat::AnthropicMessages,
            endpoint: CLAUDE_ENDPOINT.to_string(),
            api_key: None,
            model: CLAUDE_MODEL.to_string(),
            temperature: None,
            max_tokens: 200,
            prompt_template: CLAUDE_PROMPT.to_string(),
            retry: RetryPolicy::default(),
        }
    }

    pub fn grok() -> Self {
        Self {
            name: "Grok".to_string(),
            format: ApiFormat::OpenAiChat,
            endpoint: GROK_ENDPOINT.to_string(),
            api_key: None,
            model: GROK_MODEL.to_string(),
            temperature: Some(0.8),
            max_tokens: 200,
            prompt_template: GROK_PROMPT.to_string(),
            retry: RetryPolicy::default(),
        }
    }
}

/// Pacing and windowing of the turn loop
#[derive(Debug, Clone)]
pub struct DebateConfig {
    /// Text of turn 1, spoken by seat A without a model call
    pub opening_prompt: String,
    /// How many recent turns are fed back as context
    pub context_turns: usize,
    /// Pause between turns
    pub turn_delay: Duration,
    /// Pause after an iteration failed unexpectedly
    pub cooldown: Duration,
    /// Idle interval after which subscribers get a heartbeat
    pub heartbeat: Duration,
    /// Live feed buffer per subscriber before it has to catch up from the store
    pub feed_capacity: usize,
}

impl Default for DebateConfig {
    fn default() -> Self {
        Self {
            opening_prompt: DEFAULT_OPENING_PROMPT.to_string(),
            context_turns: 4,
            turn_delay: Duration::from_secs(5),
            cooldown: Duration::from_secs(10),
            heartbeat: Duration::from_secs(1),
            feed_capacity: 256,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Seat A, speaks first
    pub claude: ParticipantConfig,
    /// Seat B
    pub grok: ParticipantConfig,
    pub debate: DebateConfig,
    pub port: u16,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the process environment in production)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let retry = RetryPolicy {
            max_attempts: parse_or(&get, "RETRY_ATTEMPTS", 3u32)?.max(1),
            attempt_timeouts: match get("ATTEMPT_TIMEOUTS_SECS") {
                Some(raw) => parse_secs_list("ATTEMPT_TIMEOUTS_SECS", &raw)?,
                None => RetryPolicy::default().attempt_timeouts,
            },
            backoff_unit: Duration::from_secs(parse_or(&get, "BACKOFF_UNIT_SECS", 2u64)?),
        };
        let max_tokens = parse_or(&get, "MAX_OUTPUT_TOKENS", 200u32)?;

        let mut claude = ParticipantConfig::claude();
        claude.api_key = get("CLAUDE_API_KEY");
        claude.endpoint = get("CLAUDE_ENDPOINT").unwrap_or(claude.endpoint);
        claude.model = get("CLAUDE_MODEL").unwrap_or(claude.model);
        claude.temperature = parse_opt(&get, "CLAUDE_TEMPERATURE")?.or(claude.temperature);
        claude.prompt_template = get("CLAUDE_PROMPT").unwrap_or(claude.prompt_template);
        claude.max_tokens = max_tokens;
        claude.retry = retry.clone();

        let mut grok = ParticipantConfig::grok();
        grok.api_key = get("GROK_API_KEY");
        grok.endpoint = get("GROK_ENDPOINT").unwrap_or(grok.endpoint);
        grok.model = get("GROK_MODEL").unwrap_or(grok.model);
        grok.temperature = parse_opt(&get, "GROK_TEMPERATURE")?.or(grok.temperature);
        grok.prompt_template = get("GROK_PROMPT").unwrap_or(grok.prompt_template);
        grok.max_tokens = max_tokens;
        grok.retry = retry;

        let turn_delay = parse_or(&get, "TURN_DELAY_SECS", 5u64)?;
        let cooldown = parse_or(&get, "COOLDOWN_SECS", turn_delay.saturating_mul(2))?;
        let debate = DebateConfig {
            opening_prompt: get("OPENING_PROMPT")
                .unwrap_or_else(|| DEFAULT_OPENING_PROMPT.to_string()),
            context_turns: parse_or(&get, "CONTEXT_TURNS", 4usize)?.max(1),
            turn_delay: Duration::from_secs(turn_delay),
            cooldown: Duration::from_secs(cooldown),
            heartbeat: Duration::from_secs(parse_or(&get, "HEARTBEAT_SECS", 1u64)?.max(1)),
            ..DebateConfig::default()
        };

        Ok(Config {
            claude,
            grok,
            debate,
            port: parse_or(&get, "PORT", 5000u16)?,
            log_level: get("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    Ok(parse_opt(get, key)?.unwrap_or(default))
}

fn parse_opt<T, G>(get: &G, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| anyhow!("Invalid value for {key} ({raw}): {e}")),
        None => Ok(None),
    }
}

fn parse_secs_list(key: &str, raw: &str) -> Result<Vec<Duration>> {
    let secs = raw
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|e| anyhow!("Invalid value for {key} ({raw}): {e}"))
        })
        .collect::<Result<Vec<_>>>()?;

    if secs.is_empty() {
        return Err(anyhow!("{key} must list at least one timeout"));
    }
    Ok(secs)
}

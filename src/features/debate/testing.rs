//! Scripted participants for exercising the turn loop without a network

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::core::{DebateConfig, ParticipantError};
use crate::features::participants::Participant;

/// Millisecond pacing so loop tests finish quickly
pub fn fast_config() -> DebateConfig {
    DebateConfig {
        opening_prompt: "Is the mind computable?".to_string(),
        context_turns: 4,
        turn_delay: Duration::from_millis(5),
        cooldown: Duration::from_millis(10),
        heartbeat: Duration::from_millis(50),
        feed_capacity: 64,
    }
}

enum Behavior {
    Reply(String),
    Fail(ParticipantError),
    PanicOnce(String),
}

/// Participant answering from a fixed script and recording what it was asked
pub struct Scripted {
    name: String,
    behavior: Behavior,
    calls: AtomicUsize,
    contexts: Mutex<VecDeque<String>>,
}

impl Scripted {
    fn new(name: &str, behavior: Behavior) -> Self {
        Self {
            name: name.to_string(),
            behavior,
            calls: AtomicUsize::new(0),
            contexts: Mutex::new(VecDeque::new()),
        }
    }

    pub fn replying(name: &str, reply: &str) -> Self {
        Self::new(name, Behavior::Reply(reply.to_string()))
    }

    pub fn failing(name: &str, error: ParticipantError) -> Self {
        Self::new(name, Behavior::Fail(error))
    }

    /// Panics on the first call, replies on every later one
    pub fn panicking_once(name: &str, reply: &str) -> Self {
        Self::new(name, Behavior::PanicOnce(reply.to_string()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn contexts(&self) -> Vec<String> {
        self.contexts.lock().unwrap().iter().cloned().collect()
    }
}

#[async_trait]
impl Participant for Scripted {
    fn name(&self) -> &str {
        &self.name
    }

    async fn respond(&self, context: &str) -> Result<String, ParticipantError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.contexts.lock().unwrap().push_back(context.to_string());
        tokio::task::yield_now().await;

        match &self.behavior {
            Behavior::Reply(reply) => Ok(reply.clone()),
            Behavior::Fail(error) => Err(error.clone()),
            Behavior::PanicOnce(_) if call == 0 => panic!("scripted participant blew up"),
            Behavior::PanicOnce(reply) => Ok(reply.clone()),
        }
    }
}

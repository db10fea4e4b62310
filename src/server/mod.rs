//! # HTTP Front Door
//!
//! Thin axum surface over a shared [`DebateSession`]: health, live event
//! stream, cursor polling and a connectivity probe. Every response is open to
//! any origin.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Stream ends on shutdown so graceful stop does not hang on open clients
//! - 1.0.0: Initial routes

use axum::extract::{Query, State};
use axum::http::{header, HeaderValue};
use axum::response::sse::{Event, Sse};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{middleware, Json, Router};
use futures::{Stream, StreamExt};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::core::{truncate_chars, DETAIL_LIMIT};
use crate::features::broadcast::FeedEvent;
use crate::features::debate::DebateSession;
use crate::features::transcript::Turn;

/// Message sent to each participant by the connectivity probe
pub const PROBE_MESSAGE: &str = "Test: Hello";

pub fn router(session: Arc<DebateSession>) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/stream", get(stream))
        .route("/api/logs", get(logs))
        .route("/test-apis", get(test_apis))
        .layer(middleware::map_response(allow_any_origin))
        .with_state(session)
}

async fn allow_any_origin(mut response: Response) -> Response {
    response
        .headers_mut()
        .insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    response
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    total_messages: usize,
    debate_active: bool,
    /// Participant name (lowercase) to ✓ or ✗
    api_keys: BTreeMap<String, &'static str>,
}

async fn health(State(session): State<Arc<DebateSession>>) -> Json<HealthResponse> {
    let api_keys = session
        .participants()
        .iter()
        .map(|p| {
            let mark = if p.has_credential() { "✓" } else { "✗" };
            (p.name().to_lowercase(), mark)
        })
        .collect();

    Json(HealthResponse {
        status: "running",
        total_messages: session.total(),
        debate_active: session.is_running(),
        api_keys,
    })
}

/// Body of one `data:` line on the stream
#[derive(Serialize)]
#[serde(untagged)]
enum StreamPayload<'a> {
    Message { message: &'a Turn },
    Heartbeat { heartbeat: bool },
}

fn sse_event(event: FeedEvent) -> Result<Event, axum::Error> {
    let payload = match &event {
        FeedEvent::Turn(turn) => StreamPayload::Message { message: turn },
        FeedEvent::Heartbeat => StreamPayload::Heartbeat { heartbeat: true },
    };
    Event::default().json_data(payload)
}

async fn stream(
    State(session): State<Arc<DebateSession>>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    session.start_if_not_running();
    debug!("New stream subscriber at {} turns", session.total());
    Sse::new(session.subscribe().map(sse_event))
}

#[derive(Deserialize)]
struct LogsQuery {
    #[serde(default)]
    since: u64,
}

#[derive(Serialize)]
struct LogsResponse {
    status: &'static str,
    logs: Vec<Turn>,
    total: usize,
}

async fn logs(
    State(session): State<Arc<DebateSession>>,
    Query(query): Query<LogsQuery>,
) -> Json<LogsResponse> {
    session.start_if_not_running();
    let snapshot = session.since(query.since);
    Json(LogsResponse {
        status: "success",
        logs: snapshot.turns,
        total: snapshot.total,
    })
}

#[derive(Debug, Serialize)]
struct ProbeResult {
    status: &'static str,
    response: String,
}

/// Calls each participant once, outside the transcript
async fn test_apis(State(session): State<Arc<DebateSession>>) -> impl IntoResponse {
    let probes = session.participants().iter().map(|participant| async move {
        let result = match participant.respond(PROBE_MESSAGE).await {
            Ok(text) => ProbeResult {
                status: "success",
                response: truncate_chars(&text, DETAIL_LIMIT),
            },
            Err(e) => ProbeResult {
                status: "error",
                response: truncate_chars(&e.to_string(), DETAIL_LIMIT),
            },
        };
        info!("Probe {}: {}", participant.name(), result.status);
        (participant.name().to_lowercase(), result)
    });

    let results: BTreeMap<String, ProbeResult> =
        futures::future::join_all(probes).await.into_iter().collect();
    Json(results)
}

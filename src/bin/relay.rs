use anyhow::Result;
use dotenvy::dotenv;
use log::{error, info, warn};
use std::sync::Arc;

use debate_relay::core::Config;
use debate_relay::features::debate::DebateSession;
use debate_relay::features::participants::{HttpParticipant, Participant};
use debate_relay::server;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting debate relay v{}...", env!("CARGO_PKG_VERSION"));

    let claude = HttpParticipant::new(config.claude.clone())?;
    let grok = HttpParticipant::new(config.grok.clone())?;
    for participant in [&claude as &dyn Participant, &grok] {
        if !participant.has_credential() {
            warn!(
                "{} API key not configured; its turns will be recorded as errors",
                participant.name()
            );
        }
    }

    let session = Arc::new(DebateSession::new(
        config.debate.clone(),
        Arc::new(claude),
        Arc::new(grok),
    ));
    session.start_if_not_running();

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    info!("🌐 Listening on {}", listener.local_addr()?);

    let shutdown_session = session.clone();
    axum::serve(listener, server::router(session))
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {e}");
                std::future::pending::<()>().await;
            }
            info!("Shutdown signal received, stopping debate...");
            shutdown_session.stop().await;
        })
        .await?;

    info!("Debate relay stopped");
    Ok(())
}

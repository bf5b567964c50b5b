pub mod config;
pub mod error;
pub mod openai;
pub mod relay;
pub mod slack;
pub mod types;
pub mod webhook;

use std::sync::Arc;

use log::{debug, error, info};
use tokio::net::TcpListener;

use config::Config;
use error::Result;
use openai::OpenAiClient;
use relay::{ConversationStore, InMemoryEventLog, ReplyPipeline};
use slack::SlackClient;
use webhook::{AppState, EVENTS_PATH};

/// Run the webhook server until Ctrl-C.
pub async fn run() -> Result<()> {
    info!("Initializing relay");
    let config = Config::from_env()?;

    debug!("Initializing Slack client");
    let slack = Arc::new(SlackClient::new(
        config.slack_token.clone(),
        config.slack_api_url.clone(),
    ));

    let bot_user_id = match config.bot_user_id.clone() {
        Some(id) => id,
        None => {
            info!("BOT_USER_ID not set, resolving it through auth.test");
            slack.auth_test().await?
        }
    };
    info!("Bot user id: {bot_user_id}");

    debug!("Initializing OpenAI client");
    let completion = Arc::new(OpenAiClient::new(
        config.openai_api_key.clone(),
        config.openai_model.clone(),
        &config.openai_base_url,
    )?);

    let pipeline = Arc::new(ReplyPipeline::new(
        completion,
        slack,
        Arc::new(ConversationStore::new()),
        config.system_prompt,
        config.reply_delay,
    ));

    let state = AppState {
        events: Arc::new(InMemoryEventLog::new()),
        bot_user_id,
        pipeline,
    };

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!(
        "Listening on {} (POST {EVENTS_PATH})",
        listener.local_addr()?
    );

    axum::serve(listener, webhook::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received, shutting down..."),
        Err(e) => error!("Failed to listen for shutdown signal: {e}"),
    }
}

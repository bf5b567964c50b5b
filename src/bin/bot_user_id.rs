//! Prints the Slack user id of the bot token in `SLACK_TOKEN`.
//!
//! Handy for filling in `BOT_USER_ID` before starting the relay.

use std::env;

use supportgpt::error::{BotError, Result};
use supportgpt::slack::SlackClient;

const DEFAULT_SLACK_API_URL: &str = "https://slack.com/api/";

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("supportgpt=warn"))
        .init();
    dotenvy::dotenv().ok();

    let token = env::var("SLACK_TOKEN").map_err(|e| {
        log::error!("Failed to load SLACK_TOKEN from environment: {e}");
        BotError::EnvVar(e)
    })?;
    let base_url = env::var("SLACK_API_URL").unwrap_or_else(|_| DEFAULT_SLACK_API_URL.to_string());
    let base_url = supportgpt::config::parse_base_url("SLACK_API_URL", &base_url)?;

    let user_id = SlackClient::new(token, base_url).auth_test().await?;
    println!("{user_id}");
    Ok(())
}

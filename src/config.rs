use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use log::{debug, error, info};
use url::Url;

use crate::error::{BotError, Result};
use crate::relay::DEFAULT_PREAMBLE;

const DEFAULT_MODEL: &str = "gpt-3.5-turbo-instruct";
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1/";
const DEFAULT_SLACK_API_URL: &str = "https://slack.com/api/";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
const DEFAULT_REPLY_DELAY_SECS: u64 = 5;

#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_model: String,
    pub openai_base_url: Url,
    pub slack_token: String,
    pub slack_api_url: Url,
    /// `None` means the id is looked up through `auth.test` at startup.
    pub bot_user_id: Option<String>,
    pub system_prompt: String,
    pub reply_delay: Duration,
    pub bind_addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        debug!("Loading configuration from environment");
        dotenvy::dotenv().ok();

        let openai_api_key = required("API_KEY")?;
        let slack_token = required("SLACK_TOKEN")?;

        let bot_user_id = optional("BOT_USER_ID");
        let openai_model = optional("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let system_prompt =
            optional("SYSTEM_PROMPT").unwrap_or_else(|| DEFAULT_PREAMBLE.to_string());

        let openai_base_url = parse_base_url(
            "OPENAI_BASE_URL",
            &optional("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
        )?;
        let slack_api_url = parse_base_url(
            "SLACK_API_URL",
            &optional("SLACK_API_URL").unwrap_or_else(|| DEFAULT_SLACK_API_URL.to_string()),
        )?;

        let reply_delay = match optional("REPLY_DELAY_SECS") {
            Some(raw) => Duration::from_secs(raw.parse().map_err(|e| {
                BotError::Config(format!("REPLY_DELAY_SECS must be whole seconds: {e}"))
            })?),
            None => Duration::from_secs(DEFAULT_REPLY_DELAY_SECS),
        };

        let bind_addr = optional("BIND_ADDR")
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDR)
            .parse()
            .map_err(|e| BotError::Config(format!("BIND_ADDR is not a socket address: {e}")))?;

        info!("Configuration loaded successfully");
        debug!("API key length: {} characters", openai_api_key.len());
        debug!("Slack token length: {} characters", slack_token.len());
        debug!("OpenAI model: {openai_model}");
        debug!("System prompt length: {} characters", system_prompt.len());
        debug!("Reply delay: {reply_delay:?}");

        Ok(Self {
            openai_api_key,
            openai_model,
            openai_base_url,
            slack_token,
            slack_api_url,
            bot_user_id,
            system_prompt,
            reply_delay,
            bind_addr,
        })
    }
}

fn required(name: &str) -> Result<String> {
    env::var(name).map_err(|e| {
        error!("Failed to load {name} from environment: {e}");
        BotError::EnvVar(e)
    })
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

/// Parses an API base URL, forcing a trailing slash so `Url::join` appends
/// method names instead of replacing the last path segment.
pub fn parse_base_url(name: &str, raw: &str) -> Result<Url> {
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };
    Url::parse(&normalized).map_err(|e| BotError::Config(format!("{name} is not a valid URL: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gains_trailing_slash() -> Result<()> {
        let url = parse_base_url("SLACK_API_URL", "https://slack.com/api")?;
        assert_eq!(url.as_str(), "https://slack.com/api/");
        assert_eq!(
            url.join("chat.postMessage")
                .map_err(|e| BotError::Config(e.to_string()))?
                .as_str(),
            "https://slack.com/api/chat.postMessage"
        );
        Ok(())
    }

    #[test]
    fn invalid_base_url_is_a_config_error() {
        let err = parse_base_url("OPENAI_BASE_URL", "not a url").unwrap_err();
        assert!(matches!(err, BotError::Config(_)));
    }
}

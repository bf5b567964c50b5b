//! Slack Web API client: posting replies and resolving the bot's identity.

use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{BotError, Result};

/// Delivers text into a conversation channel.
#[async_trait]
pub trait MessagingClient: Send + Sync {
    async fn post_message(&self, channel: &str, text: &str) -> Result<()>;
}

#[derive(Debug, Serialize)]
struct PostMessageRequest<'a> {
    channel: &'a str,
    text: &'a str,
}

/// Every Web API response carries `ok`; failures add an `error` code.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    user_id: Option<String>,
}

impl ApiResponse {
    fn into_result(self) -> Result<Self> {
        if self.ok {
            Ok(self)
        } else {
            Err(BotError::SlackApi(
                self.error.unwrap_or_else(|| "unknown_error".to_string()),
            ))
        }
    }
}

pub struct SlackClient {
    token: String,
    client: reqwest::Client,
    base_url: Url,
}

impl SlackClient {
    pub fn new(token: String, base_url: Url) -> Self {
        Self {
            token,
            client: reqwest::Client::new(),
            base_url,
        }
    }

    fn method_url(&self, method: &str) -> Result<Url> {
        self.base_url
            .join(method)
            .map_err(|e| BotError::Config(format!("Invalid Slack method URL for {method}: {e}")))
    }

    async fn call<B: Serialize + ?Sized>(&self, method: &str, body: &B) -> Result<ApiResponse> {
        let url = self.method_url(method)?;
        debug!("Calling Slack API method {method}");

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await?
            .error_for_status()?;

        response.json::<ApiResponse>().await?.into_result()
    }

    /// Returns the user id the configured token belongs to.
    pub async fn auth_test(&self) -> Result<String> {
        let response = self.call("auth.test", &serde_json::json!({})).await?;
        response
            .user_id
            .ok_or_else(|| BotError::SlackApi("auth.test response had no user_id".to_string()))
    }
}

#[async_trait]
impl MessagingClient for SlackClient {
    async fn post_message(&self, channel: &str, text: &str) -> Result<()> {
        self.call("chat.postMessage", &PostMessageRequest { channel, text })
            .await?;
        debug!("Posted message to channel {channel}");
        Ok(())
    }
}

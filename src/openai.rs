use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{BotError, Result};

// Generation stops at the first newline, so replies are a single line.
const MAX_TOKENS: u32 = 150;

/// Generates text from a prompt.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Fixed sampling parameters: deterministic, capped, no penalties, one line.
#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
    frequency_penalty: f32,
    presence_penalty: f32,
    stop: [&'static str; 1],
}

impl<'a> CompletionRequest<'a> {
    fn new(model: &'a str, prompt: &'a str) -> Self {
        Self {
            model,
            prompt,
            temperature: 0.0,
            max_tokens: MAX_TOKENS,
            top_p: 1.0,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
            stop: ["\n"],
        }
    }
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    text: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

pub struct OpenAiClient {
    api_key: String,
    client: reqwest::Client,
    model: String,
    endpoint: Url,
}

impl OpenAiClient {
    pub fn new(api_key: String, model: String, base_url: &Url) -> Result<Self> {
        let endpoint = base_url
            .join("completions")
            .map_err(|e| BotError::Config(format!("Invalid completions endpoint: {e}")))?;
        Ok(Self {
            api_key,
            client: reqwest::Client::new(),
            model,
            endpoint,
        })
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        debug!(
            "Sending completion request ({} prompt characters) to {}",
            prompt.len(),
            self.endpoint
        );

        let request = CompletionRequest::new(&self.model, prompt);

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("Failed to read error response: {e}"));
            return Err(api_error(status, body));
        }

        let api_response: CompletionResponse = response.json().await?;

        let text = api_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| BotError::OpenAiResponse("No choices in response".to_string()))?
            .text;

        debug!("Received completion from OpenAI API");
        Ok(text)
    }
}

/// Prefers the API's own error message; falls back to status plus raw body.
fn api_error(status: reqwest::StatusCode, body: String) -> BotError {
    match serde_json::from_str::<ErrorResponse>(&body) {
        Ok(parsed) => BotError::Completion(parsed.error.message),
        Err(_) => BotError::OpenAiApi {
            status,
            message: body,
        },
    }
}

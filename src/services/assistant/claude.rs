//! Blocking REST client for the Claude Messages API.
//!
//! Configuration priority: config.toml assistant section for the model,
//! `ANTHROPIC_API_KEY` environment variable for the key.

use anyhow::{bail, Context, Result};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use super::Assistant;
use crate::config::AssistantSettings;

const BASE_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Assistant implementation that talks to the Claude HTTP API.
pub struct ClaudeAssistant {
    client: Client,
    api_key: String,
    model: String,
    command_max_tokens: u32,
    explanation_max_tokens: u32,
}

impl ClaudeAssistant {
    pub fn new(api_key: impl Into<String>, settings: &AssistantSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client for the assistant")?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            model: settings.model.clone(),
            command_max_tokens: settings.command_max_tokens,
            explanation_max_tokens: settings.explanation_max_tokens,
        })
    }

    /// Reads the API key from the `ANTHROPIC_API_KEY` environment variable.
    pub fn try_from_env(settings: &AssistantSettings) -> Result<Self> {
        let api_key = env::var("ANTHROPIC_API_KEY")
            .context("ANTHROPIC_API_KEY not found in the environment")?;
        Self::new(api_key, settings)
    }

    fn send(&self, system: &str, user_text: &str, max_tokens: u32) -> Result<String> {
        let request = CreateMessageRequest {
            model: &self.model,
            max_tokens,
            temperature: 0.0,
            system,
            messages: vec![Message {
                role: "user",
                content: user_text,
            }],
        };
        tracing::debug!(model = %self.model, max_tokens, "calling assistant");
        let response = self
            .client
            .post(BASE_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .context("Assistant request failed")?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().unwrap_or_default();
            bail!("Assistant returned {status}: {detail}");
        }
        let body: CreateMessageResponse = response
            .json()
            .context("Failed to decode assistant response")?;
        let text = body
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .collect::<Vec<_>>()
            .join("\n");
        Ok(text.trim().to_string())
    }
}

impl Assistant for ClaudeAssistant {
    fn propose(&self, system_prompt: &str, user_text: &str) -> Result<String> {
        self.send(system_prompt, user_text, self.command_max_tokens)
    }

    fn explain(&self, prompt: &str) -> Result<String> {
        self.send("", prompt, self.explanation_max_tokens)
    }
}

#[derive(Serialize)]
struct CreateMessageRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct CreateMessageResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

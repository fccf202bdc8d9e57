//! Request and response types for OpenAI-compatible `/chat/completions`
//! endpoints, shared by the Gemini, OpenRouter and Ollama providers.

use anyhow::{Context, Result, anyhow};
use log::{info, warn};
use reqwest::RequestBuilder;
use serde::{Deserialize, Serialize};

use super::SYSTEM_PROMPT;

#[derive(Debug, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<usize>,
    pub temperature: f32,
    pub stream: bool,
}

impl ChatRequest {
    /// A non-streaming request with the interviewer system message.
    pub fn new(model: &str, prompt: &str, temperature: f32, max_tokens: Option<usize>) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            max_tokens,
            temperature,
            stream: false,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: Option<usize>,
    completion_tokens: Option<usize>,
    total_tokens: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorDetails,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetails {
    message: String,
    #[serde(rename = "type")]
    error_type: Option<String>,
    code: Option<serde_json::Value>,
}

/// Send `request` and return the first choice's text.
pub async fn complete(provider: &str, request: RequestBuilder, body: &ChatRequest) -> Result<String> {
    let response = request
        .header("Content-Type", "application/json")
        .json(body)
        .send()
        .await
        .with_context(|| format!("Failed to send request to {}", provider))?;

    let status = response.status();
    let response_text = response.text().await?;

    if !status.is_success() {
        return Err(error_from_body(provider, status, &response_text));
    }

    extract_content(provider, &response_text)
}

fn error_from_body(provider: &str, status: reqwest::StatusCode, body: &str) -> anyhow::Error {
    match serde_json::from_str::<ApiError>(body) {
        Ok(error_response) => anyhow!(
            "{} API error: {} (type: {:?}, code: {:?})",
            provider,
            error_response.error.message,
            error_response.error.error_type,
            error_response.error.code
        ),
        Err(_) => anyhow!("{} API error (status {}): {}", provider, status, body),
    }
}

fn extract_content(provider: &str, body: &str) -> Result<String> {
    let response: ChatResponse = serde_json::from_str(body)
        .with_context(|| format!("Failed to parse {} response", provider))?;

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("No response choices from {}", provider))?;

    match choice.finish_reason.as_deref() {
        Some("length") | Some("max_tokens") => {
            warn!("{} response was truncated; missing questions will be padded.", provider);
        }
        Some("stop") | None => {}
        Some(other) => warn!("{} response finished with reason: {}", provider, other),
    }

    if let Some(usage) = response.usage {
        info!(
            "{} token usage - Prompt: {:?}, Completion: {:?}, Total: {:?}",
            provider, usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
        );
    }

    Ok(choice.message.content)
}

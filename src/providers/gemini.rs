use anyhow::{Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use std::env;

use super::chat::{self, ChatRequest};
use crate::llm_manager::LLMProvider;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

/// Gemini provider, using Google's OpenAI-compatible endpoint
pub struct GeminiProvider {
    api_key: String,
    model: String,
    base_url: String,
    client: Client,
    max_tokens: usize,
    temperature: f32,
}

impl GeminiProvider {
    /// Create a new Gemini provider. The key is read from `GEMINI_API_KEY`,
    /// falling back to `GOOGLE_API_KEY`.
    pub fn new(model: Option<String>, temperature: Option<f32>, base_url: Option<String>) -> Result<Self> {
        let api_key = env::var("GEMINI_API_KEY")
            .or_else(|_| env::var("GOOGLE_API_KEY"))
            .map_err(|_| anyhow!("GEMINI_API_KEY (or GOOGLE_API_KEY) environment variable not set"))?;
        Ok(Self::with_key(api_key, model, temperature, base_url))
    }

    fn with_key(
        api_key: String,
        model: Option<String>,
        temperature: Option<f32>,
        base_url: Option<String>,
    ) -> Self {
        Self {
            api_key,
            model: model.unwrap_or_else(|| "gemini-2.5-flash".to_string()),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            client: Client::new(),
            max_tokens: 8192,
            temperature: temperature.unwrap_or(0.7),
        }
    }
}

#[async_trait]
impl LLMProvider for GeminiProvider {
    fn name(&self) -> &str {
        "Gemini"
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    async fn send_prompt(&self, prompt: &str) -> Result<String> {
        let body = ChatRequest::new(&self.model, prompt, self.temperature, Some(self.max_tokens));
        let request = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key);

        chat::complete(self.name(), request, &body).await
    }
}

use anyhow::{Result, Context};
use async_trait::async_trait;
use std::env;

use super::chat::{self, ChatRequest};
use crate::llm_manager::LLMProvider;

#[derive(Debug, Clone)]
pub struct OpenRouterProvider {
    pub model: String,
    pub temperature: f32,
    api_key: String,
    client: reqwest::Client,
}

impl OpenRouterProvider {
    pub fn new(model: Option<String>, temperature: Option<f32>) -> Result<Self> {
        let api_key = env::var("OPENROUTER_API_KEY")
            .context("OPENROUTER_API_KEY environment variable not set")?;
        Ok(Self {
            model: model.unwrap_or_else(|| "google/gemini-2.5-flash".to_string()),
            temperature: temperature.unwrap_or(0.7),
            api_key,
            client: reqwest::Client::new(),
        })
    }
}

#[async_trait]
impl LLMProvider for OpenRouterProvider {
    fn name(&self) -> &str { "openrouter" }
    fn model_name(&self) -> &str { &self.model }

    async fn send_prompt(&self, prompt: &str) -> Result<String> {
        let body = ChatRequest::new(&self.model, prompt, self.temperature, None);
        let request = self.client
            .post("https://openrouter.ai/api/v1/chat/completions")
            .bearer_auth(&self.api_key)
            .header("X-Title", "interview_gen");
        chat::complete(self.name(), request, &body).await
    }
}

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;

use super::chat::{self, ChatRequest};
use crate::llm_manager::LLMProvider;

/// Ollama local LLM provider implementation
pub struct OllamaProvider {
    model: String,
    base_url: String,
    client: Client,
    max_tokens: usize,
    temperature: f32,
}

impl OllamaProvider {
    /// Create a new Ollama provider; no key is needed for a local server.
    pub fn new(model: Option<String>, temperature: Option<f32>, base_url: Option<String>) -> Self {
        Self {
            model: model.unwrap_or_else(|| "qwen3:8b".to_string()),
            base_url: base_url.unwrap_or_else(|| "http://localhost:11434".to_string()),
            client: Client::new(),
            max_tokens: 8192,
            temperature: temperature.unwrap_or(0.7),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl LLMProvider for OllamaProvider {
    fn name(&self) -> &str {
        "Ollama"
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    async fn send_prompt(&self, prompt: &str) -> Result<String> {
        let body = ChatRequest::new(&self.model, prompt, self.temperature, Some(self.max_tokens));
        chat::complete(self.name(), self.client.post(self.endpoint()), &body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint() {
        let provider = OllamaProvider::new(None, None, Some("http://gpu-box:11434/".to_string()));
        assert_eq!(provider.endpoint(), "http://gpu-box:11434/v1/chat/completions");
        assert_eq!(provider.model_name(), "qwen3:8b");
    }
}

use crate::config::Config;
use crate::event_bus::{Event, EventBus};
use crate::impl_event_emitter;
use crate::providers::{gemini::GeminiProvider, ollama::OllamaProvider, openrouter::OpenRouterProvider};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use log::info;
use std::sync::Arc;

/// Trait representing an LLM provider.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Name of the provider.
    fn name(&self) -> &str;

    /// Send a prompt to the provider and return the response.
    async fn send_prompt(&self, prompt: &str) -> Result<String>;

    /// Model name of the provider.
    fn model_name(&self) -> &str {
        "Unknown"
    }
}

/// Offline provider that answers a question prompt by filling in its own
/// template with sample text.
pub struct LocalProvider;

impl LocalProvider {
    fn role(prompt: &str) -> &str {
        prompt
            .lines()
            .find_map(|line| line.split_once("job role:"))
            .map(|(_, role)| role.trim().trim_end_matches('.'))
            .unwrap_or("the role")
    }
}

#[async_trait]
impl LLMProvider for LocalProvider {
    fn name(&self) -> &str {
        "local"
    }

    fn model_name(&self) -> &str {
        "template"
    }

    async fn send_prompt(&self, prompt: &str) -> Result<String> {
        let role = Self::role(prompt);
        let mut lines = Vec::new();
        let mut number = String::new();

        for line in prompt.lines().map(str::trim) {
            if line.ends_with("Questions:") {
                lines.push(String::new());
                lines.push(line.to_string());
            } else if let Some((label, "<question>")) = line.split_once(": ") {
                number = label.trim_start_matches('Q').to_string();
                lines.push(format!("{}: Sample question {} for a {}?", label, number, role));
            } else if line == "Answer: <answer>" {
                lines.push(format!("Answer: Sample answer {}.", number));
            }
        }

        Ok(lines.join("\n").trim().to_string())
    }
}

/// Manager that keeps track of the configured providers.
pub struct LLMManager {
    providers: Vec<Box<dyn LLMProvider>>,
    event_bus: Option<Arc<EventBus>>,
}

impl LLMManager {
    /// Create a new manager with the given providers.
    pub fn new(providers: Vec<Box<dyn LLMProvider>>) -> Self {
        Self {
            providers,
            event_bus: None,
        }
    }

    /// Build the provider for `name` (or the first enabled one) from config.
    pub fn from_config(
        config: &Config,
        provider_override: Option<&str>,
        model_override: Option<String>,
    ) -> Result<Self> {
        let name = match provider_override {
            Some(name) => name.to_lowercase(),
            None => config
                .ai_providers
                .first_enabled()
                .ok_or_else(|| anyhow!("No provider enabled in config; pass --provider or --offline"))?
                .to_string(),
        };

        let settings = config.ai_providers.get(&name);
        let model = model_override.or_else(|| settings.map(|p| p.model.clone()));
        let temperature = settings.and_then(|p| p.temperature);
        let base_url = settings.and_then(|p| p.base_url.clone());

        let provider: Box<dyn LLMProvider> = match name.as_str() {
            "gemini" => Box::new(GeminiProvider::new(model, temperature, base_url)?),
            "openrouter" => Box::new(OpenRouterProvider::new(model, temperature)?),
            "ollama" => Box::new(OllamaProvider::new(model, temperature, base_url)),
            "local" => Box::new(LocalProvider),
            other => return Err(anyhow!("Unknown provider: {}", other)),
        };

        info!("Using provider {} ({})", provider.name(), provider.model_name());
        Ok(Self::new(vec![provider]))
    }

    pub fn with_event_bus(mut self, bus: Arc<EventBus>) -> Self {
        self.event_bus = Some(bus);
        self
    }

    /// Get the active provider.
    pub fn provider(&self) -> Option<&dyn LLMProvider> {
        self.providers.first().map(|p| &**p)
    }

    /// Send a prompt to the first available provider.
    pub async fn send_prompt(&self, prompt: &str) -> Result<String> {
        let provider = self
            .provider()
            .ok_or_else(|| anyhow!("No providers available"))?;

        if let Some(bus) = &self.event_bus {
            let _ = bus
                .emit(Event::APICallStarted {
                    provider: provider.name().to_string(),
                    model: provider.model_name().to_string(),
                })
                .await;
        }

        let result = provider.send_prompt(prompt).await;

        if let Some(bus) = &self.event_bus {
            let event = match &result {
                Ok(response) => Event::APICallCompleted {
                    provider: provider.name().to_string(),
                    tokens: estimate_tokens(prompt) + estimate_tokens(response),
                },
                Err(e) => Event::APIError {
                    provider: provider.name().to_string(),
                    error: e.to_string(),
                },
            };
            let _ = bus.emit(event).await;
        }

        result
    }
}

/// Rough token estimate: 1 token ≈ 4 characters.
fn estimate_tokens(text: &str) -> usize {
    text.len() / 4
}

impl_event_emitter!(LLMManager);

use std::sync::Arc;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::GenerationError;
use crate::event_bus::{Event, EventBus, EventEmitter};
use crate::impl_event_emitter;
use crate::llm_manager::LLMManager;
use crate::parser::{PLACEHOLDER_ANSWER, PLACEHOLDER_QUESTION};
use crate::prompt::build_prompt;

/// Inputs for one round of question generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub role: String,
    pub difficulty: String,
    #[serde(default = "default_total_questions")]
    pub total_questions: usize,
}

fn default_total_questions() -> usize {
    16
}

/// Upper bound on questions per request; keeps the prompt a sane size.
pub const MAX_TOTAL_QUESTIONS: usize = 200;

/// Either the model's cleaned text or an error message.
/// Serializes as `{"questions": ...}` or `{"error": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationOutcome {
    Questions(String),
    Error(String),
}

/// Drives prompt building and the model call for a request.
pub struct QuestionGenerator {
    llm_manager: Arc<LLMManager>,
    event_bus: Option<Arc<EventBus>>,
}

impl QuestionGenerator {
    pub fn new(llm_manager: Arc<LLMManager>) -> Self {
        Self {
            llm_manager,
            event_bus: None,
        }
    }

    pub fn with_event_bus(mut self, bus: Arc<EventBus>) -> Self {
        self.event_bus = Some(bus);
        self
    }

    /// Generate questions for `request`. Failures are returned as
    /// `GenerationOutcome::Error` rather than propagated.
    pub async fn generate_questions(&self, request: &GenerationRequest) -> GenerationOutcome {
        match self.try_generate(request).await {
            Ok(text) => {
                let _ = self
                    .emit_event(Event::GenerationCompleted {
                        role: request.role.clone(),
                        characters: text.len(),
                    })
                    .await;
                GenerationOutcome::Questions(text)
            }
            Err(e) => {
                warn!("Question generation failed: {}", e);
                let _ = self
                    .emit_event(Event::GenerationFailed {
                        error: e.to_string(),
                    })
                    .await;
                GenerationOutcome::Error(e.to_string())
            }
        }
    }

    async fn try_generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        validate(request)?;

        let _ = self
            .emit_event(Event::GenerationStarted {
                role: request.role.clone(),
                difficulty: request.difficulty.clone(),
                total_questions: request.total_questions,
            })
            .await;

        let prompt = build_prompt(request.role.trim(), &request.difficulty, request.total_questions);
        info!(
            "Requesting {} {} questions for {}",
            request.total_questions, request.difficulty, request.role
        );

        let response = self
            .llm_manager
            .send_prompt(&prompt)
            .await
            .map_err(|e| GenerationError::Provider {
                provider: self
                    .llm_manager
                    .provider()
                    .map(|p| p.name().to_string())
                    .unwrap_or_else(|| "llm".to_string()),
                message: format!("{:#}", e),
            })?;

        if response.trim().is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        // May be empty when the model only echoed placeholders; the parser pads it.
        Ok(clean_response(&response))
    }
}

impl_event_emitter!(QuestionGenerator);

fn validate(request: &GenerationRequest) -> Result<(), GenerationError> {
    if request.role.trim().is_empty() {
        return Err(GenerationError::MissingRole);
    }
    if request.total_questions == 0 || request.total_questions > MAX_TOTAL_QUESTIONS {
        return Err(GenerationError::InvalidQuestionCount(request.total_questions));
    }
    Ok(())
}

/// Trim the response and drop lines where the model echoed placeholder text.
pub fn clean_response(text: &str) -> String {
    text.trim()
        .lines()
        .filter(|line| !line.contains(PLACEHOLDER_QUESTION) && !line.contains(PLACEHOLDER_ANSWER))
        .collect::<Vec<_>>()
        .join("\n")
}

pub mod chat;
pub mod gemini;
pub mod ollama;
pub mod openrouter;

/// System message sent ahead of every question prompt.
pub const SYSTEM_PROMPT: &str =
    "You are an experienced hiring manager who writes clear interview questions with concise model answers.";

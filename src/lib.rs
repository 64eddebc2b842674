pub mod chat;
pub mod classifier;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod fetcher;
pub mod llm_interaction;
pub mod markdown;
pub mod prompts;
pub mod sanitize;
pub mod session;
pub mod suggestions;
pub mod web_server;

pub use classifier::{DomainVerdict, TopicClassifier};
pub use engine::{ChatEngine, TurnOutcome};
pub use error::{FetchError, LlmError, TurnError};
pub use fetcher::ContentFetcher;
pub use llm_interaction::{CompletionService, OpenAiClient};
pub use session::{ConversationSession, TopicLabel, TurnPhase};
pub use suggestions::SuggestionSet;

use serde::Serialize;

/// Who authored a message in the conversation history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Role {
    Human,
    Assistant,
}

impl Role {
    /// Label shown next to the message bubble.
    pub fn label(&self) -> &'static str {
        match self {
            Role::Human => "Human",
            Role::Assistant => "AI",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub role: Role,
    pub text: String,
}

impl Message {
    pub fn human(text: impl Into<String>) -> Self {
        Self {
            role: Role::Human,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_constructors() {
        let human = Message::human("What is CPF?");
        assert_eq!(human.role, Role::Human);
        assert_eq!(human.text, "What is CPF?");

        let assistant = Message::assistant("CPF is a savings scheme.");
        assert_eq!(assistant.role, Role::Assistant);
        assert_eq!(assistant.text, "CPF is a savings scheme.");
    }

    #[test]
    fn test_role_labels() {
        assert_eq!(Role::Human.label(), "Human");
        assert_eq!(Role::Assistant.label(), "AI");
    }

    #[test]
    fn test_message_equality() {
        assert_eq!(Message::human("Hello"), Message::human("Hello"));
        assert_ne!(Message::human("Hello"), Message::assistant("Hello"));
    }
}

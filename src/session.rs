use std::fmt;

use serde::Serialize;

use crate::suggestions::SuggestionSet;
use crate::Message;

/// Open-vocabulary sub-topic label. Equality is exact string identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicLabel(String);

impl TopicLabel {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TopicLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a turn is in its processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TurnPhase {
    Idle,
    Sanitizing,
    ClassifyingGranular,
    ClassifyingDomain,
    Composing,
    AwaitingCompletion,
    Updating,
}

/// All state for one user session. Nothing here outlives the process.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationSession {
    history: Vec<Message>,
    current_topic: Option<TopicLabel>,
    suggestions: SuggestionSet,
    context: String,
    notice: Option<String>,
    #[serde(skip)]
    phase: TurnPhase,
}

impl ConversationSession {
    /// Fresh session over the given scraped article text.
    pub fn new(context: impl Into<String>) -> Self {
        Self {
            history: Vec::new(),
            current_topic: None,
            suggestions: SuggestionSet::default(),
            context: context.into(),
            notice: None,
            phase: TurnPhase::Idle,
        }
    }

    pub fn with_notice(mut self, notice: impl Into<String>) -> Self {
        self.notice = Some(notice.into());
        self
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    pub fn current_topic(&self) -> Option<&TopicLabel> {
        self.current_topic.as_ref()
    }

    pub fn suggestions(&self) -> &SuggestionSet {
        &self.suggestions
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    /// Non-fatal message for the user, e.g. a failed article load.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub(crate) fn set_phase(&mut self, phase: TurnPhase) {
        tracing::trace!(from = ?self.phase, to = ?phase, "Turn phase");
        self.phase = phase;
    }

    pub(crate) fn set_topic(&mut self, topic: TopicLabel, suggestions: SuggestionSet) {
        self.current_topic = Some(topic);
        self.suggestions = suggestions;
    }

    pub(crate) fn push(&mut self, message: Message) {
        self.history.push(message);
    }

    /// Undo the trailing Human message of a turn that produced no answer.
    pub(crate) fn rollback_human(&mut self) {
        if self.history.len() % 2 == 1 {
            self.history.pop();
        }
    }
}

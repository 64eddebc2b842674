//! One turn of the conversation, from raw input to rendered answer.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::classifier::{DomainVerdict, TopicClassifier};
use crate::error::TurnError;
use crate::fetcher::ContentFetcher;
use crate::llm_interaction::CompletionService;
use crate::prompts;
use crate::sanitize::sanitize;
use crate::session::{ConversationSession, TurnPhase};
use crate::suggestions::SuggestionSet;
use crate::Message;

/// What a completed turn produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutcome {
    pub sanitized_input: String,
    pub answer: String,
    pub verdict: DomainVerdict,
    /// A regeneration was attempted because the sub-topic changed.
    pub suggestions_refreshed: bool,
}

/// Stateless turn processor; all mutable state lives in the [`ConversationSession`].
#[derive(Clone)]
pub struct ChatEngine {
    llm: Arc<dyn CompletionService>,
    classifier: TopicClassifier,
    fetcher: Option<ContentFetcher>,
}

impl ChatEngine {
    pub fn new(llm: Arc<dyn CompletionService>) -> Self {
        Self {
            classifier: TopicClassifier::new(llm.clone()),
            llm,
            fetcher: None,
        }
    }

    pub fn with_fetcher(mut self, fetcher: ContentFetcher) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Start a session, loading the source article once. A failed load leaves
    /// the context empty and records a notice.
    pub async fn start_session(&self) -> ConversationSession {
        let Some(fetcher) = &self.fetcher else {
            return ConversationSession::new(String::new());
        };
        match fetcher.fetch_or_empty().await {
            (context, None) => ConversationSession::new(context),
            (context, Some(e)) => {
                ConversationSession::new(context).with_notice(format!("Error loading website content: {}", e))
            }
        }
    }

    /// Process one user turn. On error the session's history, topic and
    /// suggestions reflect only the steps that completed; history is never left
    /// with an unanswered Human message.
    #[instrument(skip_all, fields(history_len = session.history().len()))]
    pub async fn process_turn(
        &self,
        session: &mut ConversationSession,
        raw_input: &str,
    ) -> Result<TurnOutcome, TurnError> {
        if raw_input.is_empty() {
            return Err(TurnError::EmptyInput);
        }

        session.set_phase(TurnPhase::Sanitizing);
        let input = sanitize(raw_input);
        if input != raw_input {
            info!("Removed instruction-override phrasing from input");
        }

        session.set_phase(TurnPhase::ClassifyingGranular);
        let suggestions_refreshed = self.refresh_suggestions(session, &input).await;

        session.push(Message::human(input.clone()));

        session.set_phase(TurnPhase::ClassifyingDomain);
        let verdict = match self.classifier.is_in_domain(&input).await {
            Ok(verdict) => verdict,
            Err(e) => {
                warn!(error = %e, "Domain classification failed, treating as off-topic");
                DomainVerdict::OffTopic
            }
        };

        session.set_phase(TurnPhase::Composing);
        let prompt = match verdict {
            DomainVerdict::InDomain => {
                let prior = &session.history()[..session.history().len() - 1];
                prompts::compose_on_topic(&input, session.context(), &prompts::render_history(prior))
            }
            DomainVerdict::OffTopic => prompts::compose_off_topic(&input),
        };

        session.set_phase(TurnPhase::AwaitingCompletion);
        let answer = match self.llm.complete(&prompt).await {
            Ok(answer) => answer,
            Err(e) => {
                warn!(error = %e, "Answer generation failed");
                session.rollback_human();
                session.set_phase(TurnPhase::Idle);
                return Err(e.into());
            }
        };

        session.set_phase(TurnPhase::Updating);
        session.push(Message::assistant(answer.clone()));
        session.set_phase(TurnPhase::Idle);

        debug!(?verdict, suggestions_refreshed, "Turn complete");
        Ok(TurnOutcome {
            sanitized_input: input,
            answer,
            verdict,
            suggestions_refreshed,
        })
    }

    /// Regenerate suggestions when the sub-topic changes. Returns whether a
    /// regeneration was attempted.
    async fn refresh_suggestions(&self, session: &mut ConversationSession, input: &str) -> bool {
        let topic = match self.classifier.granular_topic(input).await {
            Ok(topic) => topic,
            Err(e) => {
                warn!(error = %e, "Granular topic classification failed, keeping suggestions");
                return false;
            }
        };

        if session.current_topic() == Some(&topic) {
            debug!(%topic, "Topic unchanged");
            return false;
        }

        // The suggestions prompt is built from the utterance, not the label.
        let suggestions = self.generate_suggestions(input).await;
        info!(%topic, "Topic changed, suggestions regenerated");
        session.set_topic(topic, suggestions);
        true
    }

    async fn generate_suggestions(&self, input: &str) -> SuggestionSet {
        let reply = match self.llm.complete(&prompts::compose_suggestions(input)).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "Suggestion generation failed, using defaults");
                return SuggestionSet::default();
            }
        };
        SuggestionSet::parse(&reply).unwrap_or_else(|e| {
            warn!(error = %e, reply = %reply, "Unparsable suggestion list, using defaults");
            SuggestionSet::default()
        })
    }
}

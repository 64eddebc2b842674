//! Domain and sub-topic classification of user utterances.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::constants::{CPF_RELATED, DOMAIN_KEYWORDS};
use crate::error::LlmError;
use crate::llm_interaction::CompletionService;
use crate::prompts;
use crate::session::TopicLabel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainVerdict {
    InDomain,
    OffTopic,
}

impl DomainVerdict {
    /// Anything other than the exact in-domain label counts as off-topic.
    pub fn from_label(label: &str) -> Self {
        if label.trim() == CPF_RELATED {
            DomainVerdict::InDomain
        } else {
            DomainVerdict::OffTopic
        }
    }
}

/// Crude case-insensitive substring match, including inside longer words.
pub fn matches_domain_keyword(utterance: &str) -> bool {
    let lowered = utterance.to_lowercase();
    DOMAIN_KEYWORDS.iter().any(|keyword| lowered.contains(keyword))
}

#[derive(Clone)]
pub struct TopicClassifier {
    llm: Arc<dyn CompletionService>,
}

impl TopicClassifier {
    pub fn new(llm: Arc<dyn CompletionService>) -> Self {
        Self { llm }
    }

    /// Keyword shortcut first; only utterances without a keyword reach the model.
    #[instrument(skip(self, utterance))]
    pub async fn is_in_domain(&self, utterance: &str) -> Result<DomainVerdict, LlmError> {
        if matches_domain_keyword(utterance) {
            debug!("Domain keyword matched, skipping model classification");
            return Ok(DomainVerdict::InDomain);
        }

        let reply = self
            .llm
            .complete(&prompts::compose_domain_classification(utterance))
            .await?;
        let verdict = DomainVerdict::from_label(&reply);
        debug!(reply = %reply.trim(), ?verdict, "Model domain classification");
        Ok(verdict)
    }

    /// Always asks the model. The trimmed reply is the label, unvalidated.
    #[instrument(skip(self, utterance))]
    pub async fn granular_topic(&self, utterance: &str) -> Result<TopicLabel, LlmError> {
        let reply = self
            .llm
            .complete(&prompts::compose_granular_classification(utterance))
            .await?;
        let label = TopicLabel::new(reply.trim());
        debug!(%label, "Granular topic");
        Ok(label)
    }
}

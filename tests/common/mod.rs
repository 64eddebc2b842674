//! Scripted completion service for driving turns without a network.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cpf_chat::{ChatEngine, CompletionService, LlmError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptKind {
    Granular,
    Domain,
    Suggestions,
    OnTopic,
    OffTopic,
}

impl PromptKind {
    pub fn of(prompt: &str) -> Self {
        if prompt.contains("into different CPF topics") {
            PromptKind::Granular
        } else if prompt.contains("'CPF_RELATED' or 'OFF_TOPIC'") {
            PromptKind::Domain
        } else if prompt.contains("Generate 3 relevant follow-up questions") {
            PromptKind::Suggestions
        } else if prompt.contains("Respond to the following user query about CPF") {
            PromptKind::OnTopic
        } else if prompt.contains("not related to CPF") {
            PromptKind::OffTopic
        } else {
            panic!("unrecognised prompt: {}", prompt)
        }
    }
}

type Reply = Result<String, u16>;

#[derive(Default)]
pub struct ScriptedLlm {
    queued: Mutex<HashMap<PromptKind, VecDeque<Reply>>>,
    calls: Mutex<Vec<(PromptKind, String)>>,
}

impl ScriptedLlm {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a reply for the next prompt of `kind`.
    pub fn reply(&self, kind: PromptKind, text: &str) -> &Self {
        self.push(kind, Ok(text.to_string()))
    }

    /// Queue an API failure with the given status for the next prompt of `kind`.
    pub fn fail(&self, kind: PromptKind, status: u16) -> &Self {
        self.push(kind, Err(status))
    }

    fn push(&self, kind: PromptKind, reply: Reply) -> &Self {
        self.queued.lock().unwrap().entry(kind).or_default().push_back(reply);
        self
    }

    pub fn calls(&self) -> Vec<(PromptKind, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn kinds(&self) -> Vec<PromptKind> {
        self.calls().into_iter().map(|(kind, _)| kind).collect()
    }

    pub fn prompts_of(&self, kind: PromptKind) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, prompt)| prompt)
            .collect()
    }

    fn fallback(kind: PromptKind) -> String {
        match kind {
            PromptKind::Granular => "CPF in general".to_string(),
            PromptKind::Domain => "OFF_TOPIC".to_string(),
            PromptKind::Suggestions => {
                r#"["What is the OA interest rate?", "Can I use OA for housing?", "How do I top up my SA?"]"#
                    .to_string()
            }
            PromptKind::OnTopic => "On-topic answer.".to_string(),
            PromptKind::OffTopic => "Off-topic answer.".to_string(),
        }
    }
}

#[async_trait]
impl CompletionService for ScriptedLlm {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let kind = PromptKind::of(prompt);
        self.calls.lock().unwrap().push((kind, prompt.to_string()));
        let next = self
            .queued
            .lock()
            .unwrap()
            .get_mut(&kind)
            .and_then(VecDeque::pop_front);
        match next {
            Some(Ok(text)) => Ok(text),
            Some(Err(status)) => Err(LlmError::ApiError {
                status,
                message: "scripted failure".to_string(),
            }),
            None => Ok(Self::fallback(kind)),
        }
    }
}

pub fn engine_with(llm: &Arc<ScriptedLlm>) -> ChatEngine {
    ChatEngine::new(llm.clone())
}

//! Instruction text sent to the completion service.
//!
//! Every function here is pure: same inputs, same string.

use crate::constants::REFERENCE_LINK_SENTENCE;
use crate::Message;

/// Prior turns flattened for the prompt: message bodies joined by single spaces, roles dropped.
pub fn render_history(history: &[Message]) -> String {
    history
        .iter()
        .map(|msg| msg.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn compose_on_topic(utterance: &str, scraped_content: &str, history_text: &str) -> String {
    format!(
        r#"You are an AI assistant specialized in Singapore's CPF (Central Provident Fund).
Your role is to provide accurate and helpful information about CPF, CPF accounts such as Ordinary Account (OA), Special Account (SA), Retirement Account (RA) using CPF for investments, and related topics.

Here's some context information from the article:
{scraped_content}

Previous conversation:
{history_text}

Respond to the following user query about CPF:
{utterance}

Your response should follow this structure:
1. Direct answer to the query (3-4 sentences)
2. Additional relevant information (4-5 sentences, over 2 paragraphs. use bullet points if it's easier to understand)
3. {REFERENCE_LINK_SENTENCE}
"#
    )
}

pub fn compose_off_topic(utterance: &str) -> String {
    format!(
        r#"You are an AI assistant specialized in Singapore's CPF (Central Provident Fund).
The user has asked a question that is not related to CPF.

User query: {utterance}

Respond with the following structure:
1. Polite acknowledgment that the query is not about CPF
2. Brief explanation of what CPF is
3. Suggestion for a CPF-related question the user could ask instead
4. {REFERENCE_LINK_SENTENCE}
"#
    )
}

pub fn compose_suggestions(topic: &str) -> String {
    format!(
        r#"<Instruction>
Based on the current topic of conversation: "{topic}"
Generate 3 relevant follow-up questions or prompts that a user might want to ask next.
</Instruction>

Create 3 concise and diverse questions or prompts related to the topic above.
These should cover different aspects of the topic and encourage further exploration.

Remember, you are generating questions about CPF.

Format your response as a list of 3 double-quoted strings inside square brackets. Only return the list, with no other text.
E.g. of a response: ["What is the purpose of CPF?","Can you use your CPF for investments?","How does CPF helps in your retirement?"]
"#
    )
}

pub fn compose_domain_classification(utterance: &str) -> String {
    format!(
        r#"Classify the following user input as either 'CPF_RELATED' or 'OFF_TOPIC':

User Input: {utterance}

If the input is related to Singapore's CPF (Central Provident Fund), Ordinary Account (OA), Special Account (SA), Medisave Account (MA), Retirement Account (RA), using CPF for investment or any aspect of CPF, classify it as 'CPF_RELATED'.
Otherwise, classify it as 'OFF_TOPIC'."#
    )
}

pub fn compose_granular_classification(utterance: &str) -> String {
    format!(
        r#"Classify the following user input into different CPF topics such as CPF for housing, CPF for retirement, CPF for hospitalisation, CPF for family planning , CPF for investment etc:

User Input: {utterance}
"#
    )
}

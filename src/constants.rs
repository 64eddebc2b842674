// Fixed domain data for the CPF assistant.

use regex::Regex;

pub const DEFAULT_SOURCE_URL: &str = "https://blog.seedly.sg/about-central-provident-fund-cpf/";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_PORT: u16 = 8501;

/// Label the domain classifier must answer with for an in-domain utterance.
pub const CPF_RELATED: &str = "CPF_RELATED";
pub const OFF_TOPIC: &str = "OFF_TOPIC";

/// Closing sentence appended to every answer.
pub const REFERENCE_LINK_SENTENCE: &str = "For more detailed information on CPF and related topics, please visit the official CPF website: [CPF Official Website](https://www.cpf.gov.sg/member).";

/// Lowercase substrings that mark an utterance as in-domain without a model call.
pub const DOMAIN_KEYWORDS: [&str; 10] = [
    "cpf",
    "central provident fund",
    "interest rate",
    "contributions",
    "retirement",
    "payout",
    "ordinary account",
    "special account",
    "medisave",
    "retirement account",
];

pub const DEFAULT_SUGGESTIONS: [&str; 3] = [
    "What is the purpose of CPF?",
    "Can you use your CPF for investments?",
    "How does CPF helps in your retirement?",
];

pub const TURN_FAILED_NOTICE: &str = "Something went wrong while generating a response. Please try again.";

lazy_static::lazy_static! {
    /// Instruction-override phrasings stripped from user input, applied in order.
    pub static ref INJECTION_PATTERNS: [Regex; 2] = [
        Regex::new(r"(?i)ignore .* prompt").expect("valid ignore pattern"),
        Regex::new(r"(?i)forget .* instruction").expect("valid forget pattern"),
    ];
}

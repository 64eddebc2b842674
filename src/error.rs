//! Error types shared across the crate.

use std::time::Duration;
use thiserror::Error;

/// Errors from the hosted completion endpoint.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),
}

/// Errors while loading the background article.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to fetch {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error {status} from {url}")]
    Status { url: String, status: u16 },
}

/// A turn that could not produce an answer. History is left as it was before the turn.
#[derive(Debug, Error)]
pub enum TurnError {
    #[error("Input was empty")]
    EmptyInput,

    #[error("Answer generation failed: {0}")]
    Completion(#[from] LlmError),
}

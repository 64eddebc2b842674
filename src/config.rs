// Command-line/environment configuration for the model endpoint and the source article.

use std::time::Duration;

use clap::Args;

use crate::constants;

/// Settings for the hosted completion endpoint.
#[derive(Args, Clone)]
pub struct LlmArgs {
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true, help = "API key for the completion endpoint.")]
    pub api_key: String,
    #[arg(long, env = "CPF_CHAT_MODEL", default_value = constants::DEFAULT_MODEL, help = "Model identifier.")]
    pub model: String,
    #[arg(long, env = "OPENAI_API_BASE", default_value = constants::DEFAULT_API_BASE, help = "Base URL of the OpenAI-compatible API.")]
    pub api_base: String,
    #[arg(long, env = "CPF_CHAT_TIMEOUT_SECS", default_value_t = constants::DEFAULT_TIMEOUT_SECS, help = "Request timeout in seconds.")]
    pub timeout_secs: u64,
}

// Hand-written so the key never ends up in logs.
impl std::fmt::Debug for LlmArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmArgs")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    #[arg(long, env = "CPF_SOURCE_URL", default_value = constants::DEFAULT_SOURCE_URL, help = "Article scraped for background context.")]
    pub source_url: String,
}

/// Resolved client settings.
#[derive(Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl From<LlmArgs> for LlmConfig {
    fn from(args: LlmArgs) -> Self {
        Self {
            api_key: args.api_key,
            model: args.model,
            api_base: args.api_base.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(args.timeout_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_args_trims_base_url() {
        let config = LlmConfig::from(LlmArgs {
            api_key: "sk-test".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_base: "http://localhost:9000/v1/".to_string(),
            timeout_secs: 5,
        });
        assert_eq!(config.api_base, "http://localhost:9000/v1");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = LlmConfig {
            api_key: "sk-secret".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_base: constants::DEFAULT_API_BASE.to_string(),
            timeout: Duration::from_secs(1),
        };
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}

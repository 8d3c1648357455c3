//! Agent configuration (explicit values > environment > defaults).

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use bon::Builder;
use strum::{Display, EnumString};

use crate::error::{ColloquyError, Result};

pub const DEFAULT_COMPLETIONS_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TRANSCRIPTION_MODEL: &str = "whisper-1";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(3);

/// Chat completion providers with an OpenAI-compatible endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Provider {
    #[default]
    OpenAi,
    Gemini,
    Grok,
    Anthropic,
    DeepSeek,
    Qwen,
}

impl Provider {
    /// Base URL of the provider's OpenAI-compatible API.
    pub fn default_base_url(self) -> &'static str {
        match self {
            Self::OpenAi => "https://api.openai.com/v1/",
            Self::Gemini => "https://generativelanguage.googleapis.com/v1beta/",
            Self::Grok => "https://api.x.ai/v1/",
            Self::Anthropic => "https://api.anthropic.com/v1/",
            Self::DeepSeek => "https://api.deepseek.com/",
            Self::Qwen => "https://dashscope-intl.aliyuncs.com/compatible-mode/v1/",
        }
    }
}

/// Immutable settings handed to an agent at construction.
///
/// ```
/// use colloquy::config::{AgentConfig, Provider};
///
/// let config = AgentConfig::builder()
///     .provider(Provider::DeepSeek)
///     .api_key("sk-test")
///     .completion_model("deepseek-chat")
///     .build();
/// assert_eq!(config.resolved_base_url(), "https://api.deepseek.com/");
/// ```
#[derive(Clone, Builder)]
pub struct AgentConfig {
    #[builder(default)]
    pub provider: Provider,
    /// Overrides the provider's default base URL when set.
    #[builder(into)]
    pub base_url: Option<String>,
    /// Speech-to-text endpoint root. Defaults to OpenAI whatever the chat provider.
    #[builder(into)]
    pub transcription_base_url: Option<String>,
    #[builder(into, default)]
    pub api_key: String,
    #[builder(into, default = DEFAULT_COMPLETIONS_MODEL.to_string())]
    pub completion_model: String,
    #[builder(into, default = DEFAULT_TRANSCRIPTION_MODEL.to_string())]
    pub transcription_model: String,
    #[builder(default = DEFAULT_REQUEST_TIMEOUT)]
    pub request_timeout: Duration,
    #[builder(default = DEFAULT_MAX_RETRIES)]
    pub max_retries: u32,
    #[builder(default = DEFAULT_RETRY_DELAY)]
    pub retry_delay: Duration,
}

impl fmt::Debug for AgentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentConfig")
            .field("provider", &self.provider)
            .field("base_url", &self.base_url)
            .field("transcription_base_url", &self.transcription_base_url)
            .field("api_key", &"<redacted>")
            .field("completion_model", &self.completion_model)
            .field("transcription_model", &self.transcription_model)
            .field("request_timeout", &self.request_timeout)
            .field("max_retries", &self.max_retries)
            .field("retry_delay", &self.retry_delay)
            .finish()
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl AgentConfig {
    /// Load from environment variables (and `.env` if present).
    ///
    /// Recognized: `COLLOQUY_PROVIDER`, `COLLOQUY_BASE_URL`,
    /// `COLLOQUY_TRANSCRIPTION_BASE_URL`, `COLLOQUY_API_KEY`
    /// (falls back to `OPENAI_API_KEY`), `COLLOQUY_COMPLETIONS_MODEL`,
    /// `COLLOQUY_TRANSCRIPTION_MODEL`, `COLLOQUY_REQUEST_TIMEOUT`,
    /// `COLLOQUY_MAX_RETRIES` and `COLLOQUY_RETRY_DELAY` (seconds).
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. `from_env` delegates here.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(provider) = lookup("COLLOQUY_PROVIDER") {
            config.provider = Provider::from_str(provider.trim()).map_err(|_| {
                ColloquyError::Configuration(format!("Unknown provider: {provider}"))
            })?;
        }
        config.base_url = lookup("COLLOQUY_BASE_URL").filter(|url| !url.trim().is_empty());
        config.transcription_base_url =
            lookup("COLLOQUY_TRANSCRIPTION_BASE_URL").filter(|url| !url.trim().is_empty());
        if let Some(key) = lookup("COLLOQUY_API_KEY").or_else(|| lookup("OPENAI_API_KEY")) {
            config.api_key = key;
        }
        if let Some(model) = lookup("COLLOQUY_COMPLETIONS_MODEL") {
            config.completion_model = model;
        }
        if let Some(model) = lookup("COLLOQUY_TRANSCRIPTION_MODEL") {
            config.transcription_model = model;
        }
        if let Some(secs) = lookup("COLLOQUY_REQUEST_TIMEOUT") {
            config.request_timeout = Duration::from_secs(parse_number("COLLOQUY_REQUEST_TIMEOUT", &secs)?);
        }
        if let Some(retries) = lookup("COLLOQUY_MAX_RETRIES") {
            config.max_retries = parse_number("COLLOQUY_MAX_RETRIES", &retries)?;
        }
        if let Some(secs) = lookup("COLLOQUY_RETRY_DELAY") {
            config.retry_delay = Duration::from_secs(parse_number("COLLOQUY_RETRY_DELAY", &secs)?);
        }

        Ok(config)
    }

    /// The endpoint root: explicit override first, then the provider table.
    pub fn resolved_base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.provider.default_base_url())
    }

    /// Where audio is transcribed: explicit override, else OpenAI.
    pub fn resolved_transcription_base_url(&self) -> &str {
        self.transcription_base_url
            .as_deref()
            .unwrap_or_else(|| Provider::OpenAi.default_base_url())
    }
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ColloquyError::Configuration(format!("{key} must be a number, got '{value}'")))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = AgentConfig::default();
        assert_eq!(config.provider, Provider::OpenAi);
        assert_eq!(config.completion_model, "gpt-4o-mini");
        assert_eq!(config.transcription_model, "whisper-1");
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.retry_delay, Duration::from_secs(3));
        assert_eq!(config.request_timeout, Duration::from_secs(60));
        assert_eq!(config.resolved_base_url(), "https://api.openai.com/v1/");
    }

    #[test]
    fn explicit_base_url_wins_over_provider_table() {
        let config = AgentConfig::builder()
            .provider(Provider::Grok)
            .base_url("http://localhost:8080/v1/")
            .build();
        assert_eq!(config.resolved_base_url(), "http://localhost:8080/v1/");
    }

    #[test]
    fn lookup_reads_every_key() {
        let config = AgentConfig::from_lookup(lookup_from(&[
            ("COLLOQUY_PROVIDER", "qwen"),
            ("COLLOQUY_API_KEY", "sk-env"),
            ("COLLOQUY_COMPLETIONS_MODEL", "qwen-max"),
            ("COLLOQUY_TRANSCRIPTION_MODEL", "whisper-large"),
            ("COLLOQUY_REQUEST_TIMEOUT", "5"),
            ("COLLOQUY_MAX_RETRIES", "7"),
            ("COLLOQUY_RETRY_DELAY", "1"),
        ]))
        .unwrap();

        assert_eq!(config.provider, Provider::Qwen);
        assert_eq!(config.api_key, "sk-env");
        assert_eq!(config.completion_model, "qwen-max");
        assert_eq!(config.transcription_model, "whisper-large");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.max_retries, 7);
        assert_eq!(config.retry_delay, Duration::from_secs(1));
        assert!(config.resolved_base_url().starts_with("https://dashscope-intl"));
    }

    #[test]
    fn transcription_stays_on_openai_unless_overridden() {
        let config = AgentConfig::builder()
            .provider(Provider::DeepSeek)
            .base_url("http://localhost:8080/v1/")
            .build();
        assert_eq!(config.resolved_transcription_base_url(), "https://api.openai.com/v1/");

        let config = AgentConfig::from_lookup(lookup_from(&[
            ("COLLOQUY_PROVIDER", "gemini"),
            ("COLLOQUY_TRANSCRIPTION_BASE_URL", "http://127.0.0.1:9000/v1"),
        ]))
        .unwrap();
        assert_eq!(config.resolved_transcription_base_url(), "http://127.0.0.1:9000/v1");
    }

    #[test]
    fn openai_key_is_a_fallback() {
        let config = AgentConfig::from_lookup(lookup_from(&[("OPENAI_API_KEY", "sk-openai")])).unwrap();
        assert_eq!(config.api_key, "sk-openai");
    }

    #[test]
    fn bad_values_are_configuration_errors() {
        let err = AgentConfig::from_lookup(lookup_from(&[("COLLOQUY_MAX_RETRIES", "lots")])).unwrap_err();
        assert!(matches!(err, ColloquyError::Configuration(msg) if msg.contains("COLLOQUY_MAX_RETRIES")));

        let err = AgentConfig::from_lookup(lookup_from(&[("COLLOQUY_PROVIDER", "acme")])).unwrap_err();
        assert!(matches!(err, ColloquyError::Configuration(_)));
    }

    #[test]
    fn debug_redacts_the_key() {
        let config = AgentConfig::builder().api_key("sk-secret").build();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("sk-secret"));
    }
}

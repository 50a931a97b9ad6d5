//! Analysis client configuration.
//!
//! Loaded from environment variables:
//! - `OPENAI_API_KEY` - API key (required to call the model)
//! - `FEATUREFIT_API_BASE` - Base URL (default: `https://api.openai.com/v1`)
//! - `FEATUREFIT_MODEL` - Model name (default: `gpt-4`)
//! - `FEATUREFIT_TEMPERATURE` - Sampling temperature (default: `0.1`)
//! - `FEATUREFIT_MAX_TOKENS` - Completion token cap (default: `3000`)
//! - `FEATUREFIT_MAX_RETRIES` - Retries on 429/5xx (default: `3`)
//! - `FEATUREFIT_TIMEOUT_SECS` - Per-request timeout (default: `60`)

use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4";

#[derive(Clone, Debug)]
pub struct AnalysisConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each further attempt.
    pub initial_backoff: Duration,
    pub timeout: Duration,
}

impl AnalysisConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: std::env::var("OPENAI_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            base_url: std::env::var("FEATUREFIT_API_BASE").unwrap_or(defaults.base_url),
            model: std::env::var("FEATUREFIT_MODEL").unwrap_or(defaults.model),
            temperature: env_or("FEATUREFIT_TEMPERATURE", defaults.temperature),
            max_tokens: env_or("FEATUREFIT_MAX_TOKENS", defaults.max_tokens),
            max_retries: env_or("FEATUREFIT_MAX_RETRIES", defaults.max_retries),
            initial_backoff: defaults.initial_backoff,
            timeout: Duration::from_secs(env_or("FEATUREFIT_TIMEOUT_SECS", 60)),
        }
    }

    /// Config pointing at an explicit endpoint, e.g. a local mock.
    pub fn with_endpoint(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.1,
            max_tokens: 3000,
            max_retries: 3,
            initial_backoff: Duration::from_secs(1),
            timeout: Duration::from_secs(60),
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring invalid {}={:?}, using default", key, raw);
            default
        }),
        Err(_) => default,
    }
}

use thiserror::Error;

/// Errors from building, sending, or parsing a feature analysis.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("No API key configured (set OPENAI_API_KEY)")]
    MissingApiKey,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Chat completion API error: {message}")]
    Api {
        message: String,
        status_code: Option<u16>,
    },

    #[error("Chat completion API rate limited")]
    RateLimited,

    #[error("Model returned no completion")]
    EmptyCompletion,

    #[error("Model reply is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("Model reply does not match the analysis schema: {0}")]
    Schema(String),
}

impl AnalysisError {
    /// Whether retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::RateLimited => true,
            Self::Api {
                status_code: Some(code),
                ..
            } => *code >= 500,
            _ => false,
        }
    }
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::{debug, error, info, warn};

use super::config::AnalysisConfig;
use super::error::{AnalysisError, AnalysisResult};
use super::parse::parse_analysis;
use super::prompt::build_messages;
use super::request::FeatureRequest;
use super::types::*;
use crate::models::FeatureAnalysis;

const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Client for an OpenAI-compatible chat-completion endpoint.
///
/// Holds its own credentials and endpoint; create one per session or share it
/// behind an `Arc`.
#[derive(Debug, Clone)]
pub struct AnalysisClient {
    client: Client,
    api_key: String,
    config: AnalysisConfig,
}

impl AnalysisClient {
    pub fn new(config: AnalysisConfig) -> AnalysisResult<Self> {
        let api_key = config.api_key.clone().ok_or(AnalysisError::MissingApiKey)?;
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            api_key,
            config,
        })
    }

    pub fn from_env() -> AnalysisResult<Self> {
        Self::new(AnalysisConfig::from_env())
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Ask the model to analyze a feature and parse its reply.
    pub async fn analyze(&self, request: &FeatureRequest) -> AnalysisResult<FeatureAnalysis> {
        if let Some(warning) = request.validate()? {
            debug!("Analyzing '{}' despite warning: {}", request.feature_name, warning);
        }

        let messages = build_messages(request);
        let messages = messages.as_slice();
        let reply = self
            .with_retry(move || self.chat_completion(messages), "feature analysis")
            .await?;

        let analysis = parse_analysis(&reply)?;
        info!(
            feature = %request.feature_name,
            rice_score = analysis.rice_scores.final_rice_score,
            questions = analysis.clarifying_questions.len(),
            "Feature analysis complete"
        );
        Ok(analysis)
    }

    async fn with_retry<T, F, Fut>(&self, operation: F, operation_name: &str) -> AnalysisResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = AnalysisResult<T>>,
    {
        let mut retries = 0;
        let mut backoff = self.config.initial_backoff;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_transient() && retries < self.config.max_retries => {
                    warn!(
                        "{} failed ({}), retrying in {:?} (attempt {}/{})",
                        operation_name,
                        e,
                        backoff,
                        retries + 1,
                        self.config.max_retries
                    );
                    tokio::time::sleep(backoff).await;
                    retries += 1;
                    backoff = (backoff * 2).min(MAX_BACKOFF);
                }
                Err(e) => {
                    if retries > 0 {
                        error!("{} failed after {} retries: {}", operation_name, retries, e);
                    }
                    return Err(e);
                }
            }
        }
    }

    async fn chat_completion(&self, messages: &[ChatMessage]) -> AnalysisResult<String> {
        debug!(
            "Creating chat completion with {} messages, model {}",
            messages.len(),
            self.config.model
        );

        let request = ChatCompletionRequest {
            model: &self.config.model,
            messages,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            response_format: ResponseFormat::json_object(),
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();

            if status == StatusCode::TOO_MANY_REQUESTS {
                warn!("Rate limited by chat completion API");
                return Err(AnalysisError::RateLimited);
            }

            let message = match serde_json::from_str::<ApiErrorBody>(&body) {
                Ok(parsed) => {
                    error!(
                        "Chat completion API error: {} (type: {:?})",
                        parsed.error.message, parsed.error.error_type
                    );
                    parsed.error.message
                }
                Err(_) => body,
            };
            return Err(AnalysisError::Api {
                message,
                status_code: Some(status.as_u16()),
            });
        }

        let completion: ChatCompletionResponse = response.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(AnalysisError::EmptyCompletion)
    }
}

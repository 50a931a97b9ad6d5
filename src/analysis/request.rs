use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::error::{AnalysisError, AnalysisResult};
use crate::models::Feature;

const MIN_NAME_LEN: usize = 5;
const VAGUE_TERMS: [&str; 5] = ["feature", "system", "tool", "solution", "platform"];
const NO_CONTEXT: &str = "No additional context provided";

/// What the user tells us about a feature before asking for an analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureRequest {
    pub feature_name: String,
    pub industry: String,
    #[serde(default)]
    pub business_goal: Option<String>,
    #[serde(default)]
    pub business_model: Option<String>,
    #[serde(default)]
    pub context: Option<String>,
    /// Answers to clarifying questions from a previous analysis.
    #[serde(default)]
    pub clarifications: Vec<Clarification>,
}

/// A clarifying question from the model and the user's answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clarification {
    pub question: String,
    pub answer: String,
}

/// Advisory problems with a feature name. The analysis may still run.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum NameWarning {
    #[error("Feature name is too short (min 5 characters)")]
    TooShort,
    #[error("Feature name seems generic. Try to be more specific!")]
    Generic,
}

/// Check whether a feature name is specific enough to analyze well.
pub fn validate_feature_name(name: &str) -> Result<(), NameWarning> {
    let name = name.trim();
    if name.chars().count() < MIN_NAME_LEN {
        return Err(NameWarning::TooShort);
    }
    let lower = name.to_lowercase();
    if VAGUE_TERMS.iter().any(|term| lower.contains(term)) {
        return Err(NameWarning::Generic);
    }
    Ok(())
}

impl FeatureRequest {
    pub fn new(feature_name: impl Into<String>, industry: impl Into<String>) -> Self {
        Self {
            feature_name: feature_name.into(),
            industry: industry.into(),
            ..Default::default()
        }
    }

    /// Build a request from a stored feature; its description becomes the context.
    pub fn from_feature(feature: &Feature) -> Self {
        Self {
            feature_name: feature.name.clone(),
            industry: feature.industry.clone(),
            business_goal: non_empty(&feature.business_goal),
            business_model: non_empty(&feature.business_model),
            context: non_empty(&feature.description),
            clarifications: Vec::new(),
        }
    }

    /// Reject requests that cannot be analyzed at all; surface advisory
    /// name warnings otherwise.
    pub fn validate(&self) -> AnalysisResult<Option<NameWarning>> {
        if self.feature_name.trim().is_empty() {
            return Err(AnalysisError::InvalidRequest(
                "Feature name is required".to_string(),
            ));
        }
        if self.industry.trim().is_empty() {
            return Err(AnalysisError::InvalidRequest(
                "Industry is required".to_string(),
            ));
        }
        Ok(validate_feature_name(&self.feature_name).err())
    }

    /// Record answers to clarifying questions. Blank answers are dropped.
    pub fn add_clarifications(&mut self, answers: impl IntoIterator<Item = Clarification>) {
        self.clarifications
            .extend(answers.into_iter().filter(|c| !c.answer.trim().is_empty()));
    }

    /// Free-text context followed by any answered clarifications.
    pub fn full_context(&self) -> String {
        let mut context = self
            .context
            .as_deref()
            .and_then(non_empty)
            .unwrap_or_else(|| NO_CONTEXT.to_string());

        for clarification in &self.clarifications {
            let answer = clarification.answer.trim();
            if answer.is_empty() {
                continue;
            }
            context.push_str(&format!(
                "\n[QUESTION]: {}\n[ANSWER]: {}\n",
                clarification.question, answer
            ));
        }
        context
    }
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_name_warns() {
        assert_eq!(validate_feature_name("SSO"), Err(NameWarning::TooShort));
    }

    #[test]
    fn test_generic_name_warns() {
        assert_eq!(
            validate_feature_name("Reporting Platform"),
            Err(NameWarning::Generic)
        );
    }

    #[test]
    fn test_specific_name_passes() {
        assert_eq!(validate_feature_name("One-click checkout"), Ok(()));
    }

    #[test]
    fn test_validate_requires_name_and_industry() {
        assert!(FeatureRequest::new("  ", "FinTech").validate().is_err());
        assert!(FeatureRequest::new("Fraud scoring", "").validate().is_err());
        assert_eq!(
            FeatureRequest::new("Fraud scoring", "FinTech").validate().unwrap(),
            None
        );
    }

    #[test]
    fn test_full_context_appends_answered_clarifications() {
        let mut request = FeatureRequest::new("Fraud scoring", "FinTech");
        request.context = Some("Real-time scoring of card payments.".to_string());
        request.add_clarifications([
            Clarification {
                question: "How many transactions per day?".to_string(),
                answer: "About 2 million".to_string(),
            },
            Clarification {
                question: "Which regions?".to_string(),
                answer: "   ".to_string(),
            },
        ]);

        assert_eq!(
            request.full_context(),
            "Real-time scoring of card payments.\n[QUESTION]: How many transactions per day?\n[ANSWER]: About 2 million\n"
        );
    }

    #[test]
    fn test_full_context_placeholder() {
        let request = FeatureRequest::new("Fraud scoring", "FinTech");
        assert_eq!(request.full_context(), NO_CONTEXT);
    }
}

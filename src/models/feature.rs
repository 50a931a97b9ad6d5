use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A product capability under evaluation.
///
/// Features live inside exactly one [`Project`](super::Project) and are
/// identified there by `name`. The last analysis payload returned by the model
/// is kept verbatim in `analysis_result`; the registry only looks inside it to
/// read `rice_scores` when ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub name: String,
    pub description: String,
    pub industry: String,
    pub business_goal: String,
    pub business_model: String,
    /// Last analysis payload, stored as returned by the analysis client.
    #[serde(default)]
    pub analysis_result: Option<Value>,
    pub created_at: DateTime<Utc>,
}

impl Feature {
    /// Build a feature, stamping `created_at` with the current time.
    pub fn new(input: CreateFeatureInput) -> Self {
        Self {
            name: input.name,
            description: input.description,
            industry: input.industry,
            business_goal: input.business_goal,
            business_model: input.business_model,
            analysis_result: input.analysis_result,
            created_at: Utc::now(),
        }
    }

    /// Replace the stored analysis payload.
    pub fn set_analysis(&mut self, payload: Value) {
        self.analysis_result = Some(payload);
    }
}

/// Input for creating a new feature.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateFeatureInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub business_goal: String,
    #[serde(default)]
    pub business_model: String,
    /// Optional analysis payload to attach at creation time.
    #[serde(default)]
    pub analysis_result: Option<Value>,
}

impl CreateFeatureInput {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

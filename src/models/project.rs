use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::feature::Feature;

/// A named grouping of features sharing business context.
///
/// Features are kept in insertion order. Feature names are not enforced
/// unique: `get_feature` returns the first match and `remove_feature`
/// drops every feature carrying the name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub description: String,
    pub industry: String,
    pub business_goals: String,
    pub target_market: String,
    #[serde(default)]
    pub features: Vec<Feature>,
    pub created_at: DateTime<Utc>,
}

impl Project {
    /// Build an empty project, stamping `created_at` with the current time.
    pub fn new(input: CreateProjectInput) -> Self {
        Self {
            name: input.name,
            description: input.description,
            industry: input.industry,
            business_goals: input.business_goals,
            target_market: input.target_market,
            features: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn add_feature(&mut self, feature: Feature) {
        self.features.push(feature);
    }

    /// Remove every feature named `name`. Returns whether anything was removed.
    pub fn remove_feature(&mut self, name: &str) -> bool {
        let before = self.features.len();
        self.features.retain(|f| f.name != name);
        self.features.len() < before
    }

    pub fn get_feature(&self, name: &str) -> Option<&Feature> {
        self.features.iter().find(|f| f.name == name)
    }

    pub fn get_feature_mut(&mut self, name: &str) -> Option<&mut Feature> {
        self.features.iter_mut().find(|f| f.name == name)
    }

    /// Store an analysis payload on the first feature named `name`.
    pub fn set_feature_analysis(&mut self, name: &str, payload: Value) -> bool {
        match self.get_feature_mut(name) {
            Some(feature) => {
                feature.set_analysis(payload);
                true
            }
            None => false,
        }
    }

    /// Dictionary form of the project, features included.
    pub fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    /// Rebuild a project from its dictionary form.
    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }
}

/// Input for creating a new project.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateProjectInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub business_goals: String,
    #[serde(default)]
    pub target_market: String,
}

impl CreateProjectInput {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

use serde::{Deserialize, Serialize};

use super::analysis::RiceScores;
use super::feature::Feature;

/// One row of a RICE comparison across a project's features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedFeature {
    pub name: String,
    pub rice_score: f64,
    pub reach: i64,
    pub impact: i64,
    pub confidence: i64,
    pub effort: i64,
}

impl RankedFeature {
    /// Build a ranking row from a feature's stored analysis.
    ///
    /// Returns `None` when the feature has no analysis, the analysis has no
    /// `rice_scores`, or any of the four components or `final_rice_score`
    /// is missing or not numeric.
    pub fn from_feature(feature: &Feature) -> Option<Self> {
        let rice = feature.analysis_result.as_ref()?.get("rice_scores")?;
        let scores = RiceScores::deserialize(rice).ok()?;
        Some(Self {
            name: feature.name.clone(),
            rice_score: scores.final_rice_score,
            reach: scores.reach.value,
            impact: scores.impact.value,
            confidence: scores.confidence.value,
            effort: scores.effort.value,
        })
    }
}

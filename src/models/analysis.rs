use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A complete feature analysis as returned by the model.
///
/// `rice_scores` and `risks` are required; a reply missing either (or any of
/// their fields) fails to deserialize instead of producing a partial value.
/// Everything else is optional and defaults to empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureAnalysis {
    pub rice_scores: RiceScores,
    pub risks: RiskAssessment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moscow_priority: Option<MoscowPriority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_value: Option<BusinessValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implementation: Option<ImplementationOverview>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mvp_recommendation: Option<String>,
    #[serde(default)]
    pub roadmap: Vec<RoadmapPhase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry_specific_considerations: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended_monetization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_confidence: Option<f64>,
    #[serde(default)]
    pub confidence_improvement_areas: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swot_analysis: Option<SwotAnalysis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assumption_line: Option<String>,
    #[serde(default)]
    pub clarifying_questions: Vec<String>,
}

/// Confidence assumed when the model does not report one.
pub const DEFAULT_CONFIDENCE: f64 = 7.0;

impl FeatureAnalysis {
    /// Parse a raw model reply, tolerating code fences and surrounding prose.
    pub fn parse(reply: &str) -> crate::analysis::AnalysisResult<Self> {
        crate::analysis::parse_analysis(reply)
    }

    pub fn confidence(&self) -> f64 {
        self.overall_confidence.unwrap_or(DEFAULT_CONFIDENCE)
    }

    pub fn confidence_level(&self) -> ConfidenceLevel {
        ConfidenceLevel::from_score(self.confidence())
    }

    pub fn moscow_category(&self) -> Option<MoscowCategory> {
        self.moscow_priority
            .as_ref()
            .map(|p| MoscowCategory::classify(&p.category))
    }
}

/// The four RICE components plus the model's final score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiceScores {
    #[serde(rename = "Reach")]
    pub reach: RiceComponent,
    #[serde(rename = "Impact")]
    pub impact: RiceComponent,
    #[serde(rename = "Confidence")]
    pub confidence: RiceComponent,
    #[serde(rename = "Effort")]
    pub effort: RiceComponent,
    pub final_rice_score: f64,
}

impl RiceScores {
    /// `(Reach × Impact × Confidence) / Effort`, or `None` when Effort is zero.
    ///
    /// The model's `final_rice_score` is authoritative; this is for display
    /// alongside it.
    pub fn computed_score(&self) -> Option<f64> {
        if self.effort.value == 0 {
            return None;
        }
        let numerator =
            self.reach.value as f64 * self.impact.value as f64 * self.confidence.value as f64;
        Some(numerator / self.effort.value as f64)
    }

    /// Components in display order with their labels.
    pub fn components(&self) -> [(&'static str, &RiceComponent); 4] {
        [
            ("Reach", &self.reach),
            ("Impact", &self.impact),
            ("Confidence", &self.confidence),
            ("Effort", &self.effort),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiceComponent {
    pub value: i64,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub technical_complexity: String,
    pub business_model: String,
    pub adoption: String,
    pub competition: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoscowPriority {
    pub category: String,
    #[serde(default)]
    pub justification: String,
}

/// MoSCoW bucket derived from the model's free-text category.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MoscowCategory {
    Must,
    Should,
    Could,
    Wont,
}

impl MoscowCategory {
    /// Classify by substring, case-insensitive. Anything unrecognised is `Wont`.
    pub fn classify(text: &str) -> Self {
        let lower = text.to_lowercase();
        if lower.contains("must") {
            Self::Must
        } else if lower.contains("should") {
            Self::Should
        } else if lower.contains("could") {
            Self::Could
        } else {
            Self::Wont
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Must => "Must have",
            Self::Should => "Should have",
            Self::Could => "Could have",
            Self::Wont => "Won't have",
        }
    }
}

/// Coarse band for the model's overall confidence (0-10).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

impl ConfidenceLevel {
    pub fn from_score(score: f64) -> Self {
        if score < 5.0 {
            Self::Low
        } else if score < 7.0 {
            Self::Medium
        } else {
            Self::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessValue {
    #[serde(default)]
    pub revenue_potential: String,
    #[serde(default)]
    pub cost_savings: String,
    #[serde(default)]
    pub market_positioning: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImplementationOverview {
    #[serde(default)]
    pub complexity: String,
    #[serde(default)]
    pub dependencies: String,
    #[serde(default)]
    pub timeline: String,
}

/// One roadmap phase. All four fields are required on every entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadmapPhase {
    #[serde(rename = "Phase")]
    pub phase: String,
    #[serde(rename = "Timeline")]
    pub timeline: String,
    #[serde(rename = "Milestone")]
    pub milestone: String,
    #[serde(rename = "Success Metric")]
    pub success_metric: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SwotAnalysis {
    #[serde(default)]
    pub strengths: String,
    #[serde(default)]
    pub weaknesses: String,
    #[serde(default)]
    pub opportunities: String,
    #[serde(default)]
    pub threats: String,
}

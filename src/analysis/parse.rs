//! Turning a model reply into a [`FeatureAnalysis`].

use serde_json::Value;

use super::error::{AnalysisError, AnalysisResult};
use crate::models::FeatureAnalysis;

/// Parse a model reply into a fully-populated analysis.
///
/// Syntax errors are `InvalidJson`; well-formed JSON missing required keys
/// is `Schema`.
pub fn parse_analysis(reply: &str) -> AnalysisResult<FeatureAnalysis> {
    let json = extract_json(reply);
    let value: Value = serde_json::from_str(json).map_err(|e| {
        tracing::warn!(error = %e, reply_len = reply.len(), "Model reply is not valid JSON");
        AnalysisError::InvalidJson(e)
    })?;

    serde_json::from_value(value).map_err(|e| {
        tracing::warn!(error = %e, "Model reply does not match the analysis schema");
        AnalysisError::Schema(e.to_string())
    })
}

/// Locate the JSON document inside a reply: a fenced code block first, then
/// the outermost braces, then the whole reply.
pub fn extract_json(reply: &str) -> &str {
    if let Some(json) = extract_from_codeblock(reply) {
        return json;
    }
    if let (Some(start), Some(end)) = (reply.find('{'), reply.rfind('}')) {
        if start < end {
            return &reply[start..=end];
        }
    }
    reply.trim()
}

fn extract_from_codeblock(text: &str) -> Option<&str> {
    for fence in ["```json\n", "```JSON\n", "```\n"] {
        if let Some(start) = text.find(fence) {
            let body = start + fence.len();
            if let Some(end) = text[body..].find("```") {
                return Some(text[body..body + end].trim());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "rice_scores": {
            "Reach": {"value": 8, "reason": "Most users pay by card"},
            "Impact": {"value": 7, "reason": "Cuts chargebacks"},
            "Confidence": {"value": 6, "reason": "Vendor data only"},
            "Effort": {"value": 5, "reason": "New model pipeline"},
            "final_rice_score": 67.2
        },
        "risks": {
            "technical_complexity": "High",
            "business_model": "Low",
            "adoption": "Medium",
            "competition": "Medium"
        }
    }"#;

    #[test]
    fn test_extract_from_fenced_block() {
        let reply = "Here you go:\n```json\n{\"a\": 1}\n```\nThanks";
        assert_eq!(extract_json(reply), "{\"a\": 1}");
    }

    #[test]
    fn test_extract_outermost_braces() {
        let reply = "Sure! {\"a\": {\"b\": 2}} Hope that helps.";
        assert_eq!(extract_json(reply), "{\"a\": {\"b\": 2}}");
    }

    #[test]
    fn test_parse_minimal_reply() {
        let analysis = parse_analysis(MINIMAL).unwrap();
        assert_eq!(analysis.rice_scores.reach.value, 8);
        assert_eq!(analysis.rice_scores.final_rice_score, 67.2);
        assert!(analysis.roadmap.is_empty());
        assert!(analysis.clarifying_questions.is_empty());
        assert_eq!(analysis.confidence(), 7.0);
    }

    #[test]
    fn test_feature_analysis_parse_accepts_fenced_reply() {
        let reply = format!("Analysis below.\n```json\n{}\n```", MINIMAL);
        let analysis = FeatureAnalysis::parse(&reply).unwrap();
        assert_eq!(analysis.rice_scores.effort.value, 5);
    }

    #[test]
    fn test_parse_rejects_non_json() {
        assert!(matches!(
            parse_analysis("I cannot help with that."),
            Err(AnalysisError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_parse_rejects_missing_rice_component() {
        let reply = MINIMAL.replace(
            r#""Effort": {"value": 5, "reason": "New model pipeline"},"#,
            "",
        );
        assert!(matches!(parse_analysis(&reply), Err(AnalysisError::Schema(_))));
    }

    #[test]
    fn test_parse_rejects_missing_risks() {
        let reply = r#"{"rice_scores": {
            "Reach": {"value": 1}, "Impact": {"value": 1},
            "Confidence": {"value": 1}, "Effort": {"value": 1},
            "final_rice_score": 1.0
        }}"#;
        assert!(matches!(parse_analysis(reply), Err(AnalysisError::Schema(_))));
    }

    #[test]
    fn test_parse_rejects_incomplete_roadmap_entry() {
        let mut value: Value = serde_json::from_str(MINIMAL).unwrap();
        value["roadmap"] = serde_json::json!([{"Phase": "Pilot", "Timeline": "4 weeks"}]);
        assert!(matches!(
            parse_analysis(&value.to_string()),
            Err(AnalysisError::Schema(_))
        ));
    }
}

//! Prompt construction for feature analysis.

use serde_json::json;

use super::request::FeatureRequest;
use super::types::ChatMessage;

const NOT_SPECIFIED: &str = "Not specified";

const SYSTEM_PROMPT: &str = "You are an experienced product management assistant specializing in feature analysis.
Your role is to provide comprehensive, realistic, and data-driven analysis of product features.
You must be conservative in scoring and provide detailed justifications for all assessments.
Provide clarifying questions if you need more information from the user.";

const CONFIDENCE_RUBRIC: &str = "Please provide a realistic confidence score on a 0-10 scale:
- 0-3 if the user input is nonsense or severely incomplete,
- 4-6 if there's partial or questionable data,
- 7-8 if the data is decent or typical,
- 9-10 if the input is extremely thorough with no ambiguities.

Score RICE components on 1-10 scales (Effort: 1=low, 10=high).
Return valid JSON only with no extra text or formatting.";

const RESPONSE_SCHEMA: &str = r#"{
  "rice_scores": {
    "Reach": {"value": int, "reason": string},
    "Impact": {"value": int, "reason": string},
    "Confidence": {"value": int, "reason": string},
    "Effort": {"value": int, "reason": string},
    "final_rice_score": float
  },
  "moscow_priority": {"category": string, "justification": string},
  "risks": {
    "technical_complexity": string,
    "business_model": string,
    "adoption": string,
    "competition": string
  },
  "business_value": {
    "revenue_potential": string,
    "cost_savings": string,
    "market_positioning": string
  },
  "implementation": {"complexity": string, "dependencies": string, "timeline": string},
  "mvp_recommendation": string,
  "roadmap": [
    {"Phase": string, "Timeline": string, "Milestone": string, "Success Metric": string}
  ],
  "industry_specific_considerations": string,
  "recommended_monetization": string,
  "overall_confidence": float,
  "confidence_improvement_areas": {
    "Market Understanding": string,
    "Technical Feasibility": string,
    "Business Impact": string,
    "Implementation Clarity": string
  },
  "swot_analysis": {
    "Strengths": string,
    "Weaknesses": string,
    "Opportunities": string,
    "Threats": string
  },
  "assumption_line": string,
  "clarifying_questions": [string]
}"#;

/// System and user messages for one analysis call.
pub fn build_messages(request: &FeatureRequest) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(user_prompt(request)),
    ]
}

pub fn user_prompt(request: &FeatureRequest) -> String {
    let details = json!({
        "feature_name": request.feature_name.trim(),
        "industry": request.industry.trim(),
        "business_goal": or_not_specified(request.business_goal.as_deref()),
        "business_model": or_not_specified(request.business_model.as_deref()),
        "context": request.full_context(),
    });
    let details =
        serde_json::to_string_pretty(&details).unwrap_or_else(|_| details.to_string());

    format!(
        "{CONFIDENCE_RUBRIC}

Act as a senior product manager analyzing features for {industry} companies.
Analyze the following feature and provide a comprehensive evaluation in valid JSON.
Consider industry-specific risks, practical MVP scope, and monetization that fits the business model.
Include any clarifying questions you'd like to ask the user as a JSON array named \"clarifying_questions\".

Feature Details:
{details}

Mandatory JSON Structure:
{RESPONSE_SCHEMA}",
        industry = request.industry.trim(),
    )
}

fn or_not_specified(value: Option<&str>) -> &str {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v,
        _ => NOT_SPECIFIED,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::types::Role;

    #[test]
    fn test_messages_are_system_then_user() {
        let messages = build_messages(&FeatureRequest::new("Fraud scoring", "FinTech"));
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1].role, Role::User);
    }

    #[test]
    fn test_prompt_contains_details_and_schema() {
        let mut request = FeatureRequest::new("Fraud scoring", "FinTech");
        request.business_model = Some("B2B SaaS".to_string());
        let prompt = user_prompt(&request);

        assert!(prompt.contains("\"feature_name\": \"Fraud scoring\""));
        assert!(prompt.contains("\"business_model\": \"B2B SaaS\""));
        assert!(prompt.contains("\"business_goal\": \"Not specified\""));
        assert!(prompt.contains("for FinTech companies"));
        assert!(prompt.contains("\"final_rice_score\": float"));
        assert!(prompt.contains("0-3 if the user input is nonsense"));
    }
}

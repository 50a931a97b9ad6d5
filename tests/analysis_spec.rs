//! Analysis client tests against a mock chat-completion endpoint.

use std::time::Duration;

use featurefit::analysis::{
    AnalysisClient, AnalysisConfig, AnalysisError, Clarification, FeatureRequest,
};
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(mock: &MockServer, max_retries: u32) -> AnalysisClient {
    let config = AnalysisConfig {
        max_retries,
        initial_backoff: Duration::from_millis(10),
        model: "gpt-test".to_string(),
        ..AnalysisConfig::with_endpoint("test-key", mock.uri())
    };
    AnalysisClient::new(config).expect("Failed to create client")
}

fn request() -> FeatureRequest {
    FeatureRequest {
        business_model: Some("B2B SaaS".to_string()),
        context: Some("Scores card payments in real time".to_string()),
        ..FeatureRequest::new("Transaction fraud scoring", "FinTech")
    }
}

fn reply() -> Value {
    json!({
        "rice_scores": {
            "Reach": {"value": 9, "reason": "Every payment"},
            "Impact": {"value": 8, "reason": "Chargebacks drop"},
            "Confidence": {"value": 6, "reason": "Pilot only"},
            "Effort": {"value": 6, "reason": "Model ops"},
            "final_rice_score": 72.0
        },
        "risks": {
            "technical_complexity": "High",
            "business_model": "Low",
            "adoption": "Medium",
            "competition": "High"
        },
        "roadmap": [
            {"Phase": "Pilot", "Timeline": "6 weeks", "Milestone": "Shadow mode", "Success Metric": "Precision > 90%"}
        ],
        "swot_analysis": {
            "Strengths": "Data moat",
            "Weaknesses": "Cold start",
            "Opportunities": "Issuer partnerships",
            "Threats": "Incumbent vendors"
        },
        "confidence_improvement_areas": {"Market Understanding": "Share fraud rates"},
        "clarifying_questions": ["What is the current chargeback rate?"]
    })
}

fn completion(content: &str) -> Value {
    json!({
        "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}]
    })
}

#[tokio::test]
async fn sends_model_settings_and_parses_reply() {
    let mock = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({
            "model": "gpt-test",
            "max_tokens": 3000,
            "response_format": {"type": "json_object"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(&reply().to_string())))
        .expect(1)
        .mount(&mock)
        .await;

    let analysis = client(&mock, 0).analyze(&request()).await.expect("analysis");

    assert_eq!(analysis.rice_scores.final_rice_score, 72.0);
    assert_eq!(analysis.rice_scores.computed_score(), Some(72.0));
    assert_eq!(analysis.roadmap[0].success_metric, "Precision > 90%");
    assert_eq!(
        analysis.swot_analysis.as_ref().map(|s| s.threats.as_str()),
        Some("Incumbent vendors")
    );
    assert_eq!(analysis.clarifying_questions.len(), 1);
}

#[tokio::test]
async fn prompt_carries_feature_details_and_clarifications() {
    let mock = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(&reply().to_string())))
        .mount(&mock)
        .await;

    let mut req = request();
    req.add_clarifications([Clarification {
        question: "What is the current chargeback rate?".to_string(),
        answer: "0.9%".to_string(),
    }]);
    client(&mock, 0).analyze(&req).await.expect("analysis");

    let received = mock.received_requests().await.expect("recording enabled");
    let body: Value = serde_json::from_slice(&received[0].body).expect("json body");
    let messages = body["messages"].as_array().expect("messages");
    assert_eq!(messages[0]["role"], "system");
    let user = messages[1]["content"].as_str().expect("user content");
    assert!(user.contains("Transaction fraud scoring"));
    assert!(user.contains("[ANSWER]: 0.9%"));
    assert!(user.contains("\"business_goal\": \"Not specified\""));
}

#[tokio::test]
async fn accepts_replies_wrapped_in_code_fences() {
    let mock = MockServer::start().await;
    let fenced = format!("Here is the analysis:\n```json\n{}\n```", reply());
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(&fenced)))
        .mount(&mock)
        .await;

    let analysis = client(&mock, 0).analyze(&request()).await.expect("analysis");

    assert_eq!(analysis.rice_scores.reach.value, 9);
}

#[tokio::test]
async fn retries_server_errors_then_succeeds() {
    let mock = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .up_to_n_times(2)
        .mount(&mock)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(&reply().to_string())))
        .mount(&mock)
        .await;

    let analysis = client(&mock, 3).analyze(&request()).await.expect("analysis");

    assert_eq!(analysis.rice_scores.final_rice_score, 72.0);
    assert_eq!(mock.received_requests().await.expect("recording").len(), 3);
}

#[tokio::test]
async fn gives_up_after_max_retries_when_rate_limited() {
    let mock = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&mock)
        .await;

    let result = client(&mock, 2).analyze(&request()).await;

    assert!(matches!(result, Err(AnalysisError::RateLimited)));
    assert_eq!(mock.received_requests().await.expect("recording").len(), 3);
}

#[tokio::test]
async fn surfaces_api_error_message_without_retrying_client_errors() {
    let mock = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}
        })))
        .mount(&mock)
        .await;

    let result = client(&mock, 3).analyze(&request()).await;

    match result {
        Err(AnalysisError::Api {
            message,
            status_code,
        }) => {
            assert_eq!(message, "Incorrect API key provided");
            assert_eq!(status_code, Some(401));
        }
        other => panic!("expected API error, got {:?}", other),
    }
    assert_eq!(mock.received_requests().await.expect("recording").len(), 1);
}

#[tokio::test]
async fn empty_choices_is_an_error() {
    let mock = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&mock)
        .await;

    let result = client(&mock, 0).analyze(&request()).await;

    assert!(matches!(result, Err(AnalysisError::EmptyCompletion)));
}

#[tokio::test]
async fn reply_missing_risks_is_a_schema_error() {
    let mock = MockServer::start().await;
    let mut partial = reply();
    partial.as_object_mut().expect("object").remove("risks");
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(&partial.to_string())))
        .mount(&mock)
        .await;

    let result = client(&mock, 0).analyze(&request()).await;

    assert!(matches!(result, Err(AnalysisError::Schema(_))));
}

#[tokio::test]
async fn blank_feature_name_never_reaches_the_model() {
    let mock = MockServer::start().await;

    let result = client(&mock, 0)
        .analyze(&FeatureRequest::new("   ", "FinTech"))
        .await;

    assert!(matches!(result, Err(AnalysisError::InvalidRequest(_))));
    assert!(mock.received_requests().await.expect("recording").is_empty());
}

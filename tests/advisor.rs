mod common;

use httpmock::Method::POST;
use serde_json::json;
use tickerwatch::advisor::{GeminiAdvisor, TickerAdvisor};
use tickerwatch::AlertError;

#[test]
fn suggest_returns_trimmed_reply_text() {
    let server = common::setup_server();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1beta/models/gemini-1.5-flash:generateContent")
            .query_param("key", "gemini-key")
            .json_body(json!({
                "contents": [{"parts": [{"text": "What is the official stock ticker for maker of the iPhone? Reply with only the ticker and full company name."}]}]
            }));
        then.status(200)
            .header("content-type", "application/json")
            .body(
                json!({
                    "candidates": [{
                        "content": {"role": "model", "parts": [{"text": "AAPL - Apple Inc.\n"}]},
                        "finishReason": "STOP"
                    }]
                })
                .to_string(),
            );
    });

    let advisor = GeminiAdvisor::new(
        common::http(),
        &server.base_url(),
        "gemini-1.5-flash",
        "gemini-key",
    );
    let reply = advisor.suggest("maker of the iPhone").unwrap();
    mock.assert();
    assert_eq!(reply, "AAPL - Apple Inc.");
}

#[test]
fn empty_candidates_are_malformed() {
    let server = common::setup_server();
    server.mock(|when, then| {
        when.method(POST).path("/v1beta/models/gemini-1.5-flash:generateContent");
        then.status(200)
            .header("content-type", "application/json")
            .body(json!({"candidates": []}).to_string());
    });

    let advisor = GeminiAdvisor::new(
        common::http(),
        &server.base_url(),
        "gemini-1.5-flash",
        "gemini-key",
    );
    assert!(matches!(
        advisor.suggest("anything"),
        Err(AlertError::Malformed { .. })
    ));
}

#[test]
fn bad_key_is_status_error() {
    let server = common::setup_server();
    server.mock(|when, then| {
        when.method(POST).path("/v1beta/models/gemini-1.5-flash:generateContent");
        then.status(400).body(json!({"error": {"code": 400, "message": "API key not valid."}}).to_string());
    });

    let advisor = GeminiAdvisor::new(common::http(), &server.base_url(), "gemini-1.5-flash", "bad");
    assert!(matches!(
        advisor.suggest("anything"),
        Err(AlertError::Status { status: 400, .. })
    ));
}

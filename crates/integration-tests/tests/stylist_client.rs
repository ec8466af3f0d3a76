//! Recommendation client against a local stub of the Gemini endpoint.

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use lumistyle_core::{APOLOGY_MESSAGE, UNCONFIGURED_MESSAGE};
use lumistyle_integration_tests::{GeminiStub, StubReply, TEST_API_KEY};
use lumistyle_storefront::catalog::bundled_catalog;
use lumistyle_storefront::config::StorefrontConfig;
use lumistyle_storefront::stylist::{
    AdviceRequest, DEFAULT_USER_PROMPT, GeminiClient, GenerativeModel, ImagePayload, Stylist,
    StylistError,
};

fn advice_request() -> AdviceRequest {
    AdviceRequest {
        system_instruction: "rules".to_string(),
        text: "hi".to_string(),
        image: None,
    }
}

fn stylist_for(stub: &GeminiStub, timeout: Duration) -> Stylist {
    let config = StorefrontConfig {
        stylist: Some(stub.stylist_config(timeout)),
        ..StorefrontConfig::default()
    };
    let catalog = Arc::new(bundled_catalog().expect("bundled catalog"));
    Stylist::from_config(&config, catalog).expect("stylist")
}

#[tokio::test]
async fn test_well_formed_reply_is_returned() {
    let stub = GeminiStub::start(StubReply::model_text(
        r#"{"message":"Try this.","recommendedProductIds":["p1","p4"]}"#,
    ))
    .await;
    let stylist = stylist_for(&stub, Duration::from_secs(5));

    let response = stylist.get_advice("Something for the office", None).await;

    assert_eq!(response.message, "Try this.");
    let ids: Vec<&str> = response
        .recommended_product_ids
        .iter()
        .map(|id| id.as_str())
        .collect();
    assert_eq!(ids, vec!["p1", "p4"]);
}

#[tokio::test]
async fn test_request_shape() {
    let stub = GeminiStub::start(StubReply::model_text(
        r#"{"message":"Nice.","recommendedProductIds":[]}"#,
    ))
    .await;
    let stylist = stylist_for(&stub, Duration::from_secs(5));
    let image = ImagePayload::from_data_uri("data:image/png;base64,aGVsbG8=").expect("image");

    stylist.get_advice("", Some(image)).await;

    let requests = stub.requests();
    let [request] = requests.as_slice() else {
        panic!("expected one request, got {}", requests.len());
    };
    assert_eq!(request.path, "/v1beta/models/gemini-3-flash-preview:generateContent");
    assert_eq!(request.api_key.as_deref(), Some(TEST_API_KEY));

    let parts = &request.body["contents"][0]["parts"];
    assert_eq!(parts[0]["text"], DEFAULT_USER_PROMPT);
    assert_eq!(parts[1]["inlineData"]["mimeType"], "image/png");
    assert_eq!(parts[1]["inlineData"]["data"], "aGVsbG8=");

    let config = &request.body["generationConfig"];
    assert_eq!(config["responseMimeType"], "application/json");
    assert_eq!(config["responseSchema"]["type"], "OBJECT");

    let instruction = request.body["systemInstruction"]["parts"][0]["text"]
        .as_str()
        .expect("instruction text");
    assert!(instruction.contains("LumiStyle"));
    assert!(instruction.contains("\"id\": \"p8\""));
}

#[tokio::test]
async fn test_unknown_ids_pass_through() {
    let stub = GeminiStub::start(StubReply::model_text(
        r#"{"message":"Hi","recommendedProductIds":["p1","p99"]}"#,
    ))
    .await;
    let stylist = stylist_for(&stub, Duration::from_secs(5));

    let response = stylist.get_advice("hi", None).await;
    assert_eq!(response.recommended_product_ids.len(), 2);
}

#[tokio::test]
async fn test_malformed_json_returns_apology() {
    let stub = GeminiStub::start(StubReply::model_text("Sure! Wear the jacket.")).await;
    let stylist = stylist_for(&stub, Duration::from_secs(5));

    let response = stylist.get_advice("hi", None).await;
    assert_eq!(response.message, APOLOGY_MESSAGE);
    assert!(response.recommended_product_ids.is_empty());
}

#[tokio::test]
async fn test_server_error_returns_apology() {
    let stub = GeminiStub::start(StubReply::error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "backend unavailable",
    ))
    .await;
    let stylist = stylist_for(&stub, Duration::from_secs(5));

    let response = stylist.get_advice("hi", None).await;
    assert_eq!(response.message, APOLOGY_MESSAGE);
    assert_eq!(stub.requests().len(), 1);
}

#[tokio::test]
async fn test_server_error_carries_status_name() {
    let stub = GeminiStub::start(StubReply::error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "backend unavailable",
    ))
    .await;
    let client = GeminiClient::new(&stub.stylist_config(Duration::from_secs(5))).expect("client");

    let err = client.generate(&advice_request()).await.expect_err("server error");
    match err {
        StylistError::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "INTERNAL: backend unavailable");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_empty_reply_carries_finish_reason() {
    let stub = GeminiStub::start(StubReply::no_text("MAX_TOKENS")).await;
    let client = GeminiClient::new(&stub.stylist_config(Duration::from_secs(5))).expect("client");

    let err = client.generate(&advice_request()).await.expect_err("empty reply");
    assert!(matches!(
        err,
        StylistError::EmptyResponse { finish_reason: Some(ref reason) } if reason == "MAX_TOKENS"
    ));

    let stylist = stylist_for(&stub, Duration::from_secs(5));
    let response = stylist.get_advice("hi", None).await;
    assert_eq!(response.message, APOLOGY_MESSAGE);
}

#[tokio::test]
async fn test_rate_limit_returns_apology() {
    let stub = GeminiStub::start(StubReply::error(
        StatusCode::TOO_MANY_REQUESTS,
        "quota exceeded",
    ))
    .await;
    let stylist = stylist_for(&stub, Duration::from_secs(5));

    let response = stylist.get_advice("hi", None).await;
    assert_eq!(response.message, APOLOGY_MESSAGE);
}

#[tokio::test]
async fn test_timeout_returns_apology() {
    let stub = GeminiStub::start(
        StubReply::model_text(r#"{"message":"Too late.","recommendedProductIds":[]}"#)
            .delayed(Duration::from_secs(3)),
    )
    .await;
    let stylist = stylist_for(&stub, Duration::from_millis(200));

    let response = stylist.get_advice("hi", None).await;
    assert_eq!(response.message, APOLOGY_MESSAGE);
}

#[tokio::test]
async fn test_unconfigured_returns_notice() {
    let catalog = Arc::new(bundled_catalog().expect("bundled catalog"));
    let stylist =
        Stylist::from_config(&StorefrontConfig::default(), catalog).expect("stylist");
    assert!(!stylist.is_configured());

    let response = stylist.get_advice("hi", None).await;
    assert_eq!(response.message, UNCONFIGURED_MESSAGE);
    assert!(response.recommended_product_ids.is_empty());
}

//! JSON chat API and info endpoints.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use reqwest::StatusCode;
use serde_json::{Value, json};
use serendib_integration_tests::{MockRasa, MockReply, TestContext, unreachable_url};

#[tokio::test]
async fn test_chat_relays_text_replies_in_order() {
    let rasa = MockRasa::start(MockReply::Raw(json!([
        {"recipient_id": "trip-42", "text": "Ayubowan!"},
        {"recipient_id": "trip-42", "image": "https://example.com/sigiriya.jpg"},
        {"recipient_id": "trip-42", "text": "Try Sigiriya at sunrise."}
    ])))
    .await;
    let ctx = TestContext::start(rasa.url.clone()).await;

    let response = ctx
        .post_chat(&json!({"message": "Where should I go?", "session_id": "trip-42"}))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["session_id"], "trip-42");

    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["type"], "bot");
    assert_eq!(messages[0]["content"], "Ayubowan!");
    assert_eq!(messages[1]["content"], "Try Sigiriya at sunrise.");
    assert!(
        chrono::DateTime::parse_from_rfc3339(messages[0]["timestamp"].as_str().unwrap()).is_ok()
    );

    let received = rasa.received();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0]["sender"], "trip-42");
    assert_eq!(received[0]["message"], "Where should I go?");
}

#[tokio::test]
async fn test_chat_without_session_uses_default() {
    let rasa = MockRasa::start(MockReply::texts(&["Hello"])).await;
    let ctx = TestContext::start(rasa.url.clone()).await;

    let body: Value = ctx
        .post_chat(&json!({"message": "hi"}))
        .await
        .json()
        .await
        .unwrap();

    assert_eq!(body["session_id"], "default");
    assert_eq!(rasa.received()[0]["sender"], "default");
}

#[tokio::test]
async fn test_chat_empty_reply_has_no_messages() {
    let rasa = MockRasa::start(MockReply::Raw(json!([]))).await;
    let ctx = TestContext::start(rasa.url.clone()).await;

    let body: Value = ctx
        .post_chat(&json!({"message": "hi", "session_id": "quiet"}))
        .await
        .json()
        .await
        .unwrap();

    assert_eq!(body["success"], true);
    assert_eq!(body["messages"], json!([]));
}

#[tokio::test]
async fn test_chat_blank_message_is_rejected_before_relay() {
    let rasa = MockRasa::start(MockReply::texts(&["unused"])).await;
    let ctx = TestContext::start(rasa.url.clone()).await;

    let response = ctx.post_chat(&json!({"message": "   "})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Message cannot be empty");
    assert!(rasa.received().is_empty());
}

#[tokio::test]
async fn test_chat_invalid_session_id_is_rejected() {
    let rasa = MockRasa::start(MockReply::texts(&["unused"])).await;
    let ctx = TestContext::start(rasa.url.clone()).await;

    let response = ctx
        .post_chat(&json!({"message": "hi", "session_id": "../etc/passwd"}))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(rasa.received().is_empty());
}

#[tokio::test]
async fn test_chat_malformed_json_is_rejected() {
    let rasa = MockRasa::start(MockReply::texts(&["unused"])).await;
    let ctx = TestContext::start(rasa.url.clone()).await;

    let response = ctx
        .client
        .post(ctx.url("/api/chat"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_chat_upstream_error_reports_status() {
    let rasa = MockRasa::start(MockReply::Status(500)).await;
    let ctx = TestContext::start(rasa.url.clone()).await;

    let response = ctx.post_chat(&json!({"message": "hi"})).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Failed to get response from chatbot");
    assert_eq!(body["status_code"], 500);
}

#[tokio::test]
async fn test_chat_unreachable_bot_is_unavailable() {
    let ctx = TestContext::start(unreachable_url().await).await;

    let response = ctx.post_chat(&json!({"message": "hi"})).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["error"],
        "Cannot connect to chatbot server. Please ensure Rasa is running."
    );
}

#[tokio::test]
async fn test_health_reports_connected_bot() {
    let rasa = MockRasa::start(MockReply::texts(&[])).await;
    let ctx = TestContext::start(rasa.url.clone()).await;

    let response = ctx.get("/api/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["rasa_server"], "connected");
}

#[tokio::test]
async fn test_health_reports_disconnected_bot() {
    let ctx = TestContext::start(unreachable_url().await).await;

    let response = ctx.get("/api/health").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "unhealthy");
    assert_eq!(body["rasa_server"], "disconnected");
}

#[tokio::test]
async fn test_health_reports_bot_error_status() {
    let rasa = MockRasa::start(MockReply::Status(502)).await;
    let ctx = TestContext::start(rasa.url.clone()).await;

    let response = ctx.get("/api/health").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["rasa_server"], "error");
}

#[tokio::test]
async fn test_languages_and_tourism_info() {
    let ctx = TestContext::start(unreachable_url().await).await;

    let languages = ctx.get_json("/api/languages").await;
    let codes: Vec<&str> = languages["languages"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|l| l["code"].as_str())
        .collect();
    assert_eq!(codes, ["en", "si", "ta"]);

    let info = ctx.get_json("/api/tourism-info").await;
    assert!(info["quick_info"].is_object());
    assert!(!info["popular_attractions"].as_array().unwrap().is_empty());
    assert!(!info["popular_foods"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_chat_forwards_message_untrimmed() {
    let rasa = MockRasa::start(MockReply::texts(&["ok"])).await;
    let ctx = TestContext::start(rasa.url.clone()).await;

    ctx.post_chat(&json!({"message": "  Kandy?  ", "session_id": "trip-7"}))
        .await;

    assert_eq!(rasa.received()[0]["message"], "  Kandy?  ");
}

//! Server-rendered chat page.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use reqwest::StatusCode;
use serendib_core::FALLBACK_MESSAGE;
use serendib_integration_tests::{MockRasa, MockReply, TestContext, unreachable_url};

const GREETING: &str = "Ayubowan! Ask me about places to visit";

/// The part of the fallback text that survives HTML escaping unchanged.
fn fallback_tail() -> &'static str {
    FALLBACK_MESSAGE
        .split_once('\'')
        .map_or(FALLBACK_MESSAGE, |(_, rest)| rest)
}

#[tokio::test]
async fn test_chat_page_shows_greeting() {
    let ctx = TestContext::start(unreachable_url().await).await;

    let response = ctx.get("/chat").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.text().await.unwrap().contains(GREETING));
}

#[tokio::test]
async fn test_message_and_replies_are_shown() {
    let rasa = MockRasa::start(MockReply::texts(&["Visit Ella.", "Take the train."])).await;
    let ctx = TestContext::start(rasa.url.clone()).await;

    let page = ctx
        .post_form("/chat", &[("message", "Hill country tips?")])
        .await
        .text()
        .await
        .unwrap();

    let user = page.find("Hill country tips?").unwrap();
    let first = page.find("Visit Ella.").unwrap();
    let second = page.find("Take the train.").unwrap();
    assert!(user < first && first < second);
    assert!(!page.contains(GREETING));

    let received = rasa.received();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0]["message"], "Hill country tips?");
}

#[tokio::test]
async fn test_transcript_keeps_session_id_across_messages() {
    let rasa = MockRasa::start(MockReply::texts(&["ok"])).await;
    let ctx = TestContext::start(rasa.url.clone()).await;

    ctx.post_form("/chat", &[("message", "one")]).await;
    let page = ctx
        .post_form("/chat", &[("message", "two")])
        .await
        .text()
        .await
        .unwrap();
    assert!(page.contains("one") && page.contains("two"));

    let received = rasa.received();
    assert_eq!(received.len(), 2);
    assert_eq!(received[0]["sender"], received[1]["sender"]);
}

#[tokio::test]
async fn test_blank_message_is_ignored() {
    let rasa = MockRasa::start(MockReply::texts(&["unused"])).await;
    let ctx = TestContext::start(rasa.url.clone()).await;

    let page = ctx
        .post_form("/chat", &[("message", "  ")])
        .await
        .text()
        .await
        .unwrap();
    assert!(page.contains(GREETING));
    assert!(rasa.received().is_empty());
}

#[tokio::test]
async fn test_unreachable_bot_shows_fallback() {
    let ctx = TestContext::start(unreachable_url().await).await;

    let page = ctx
        .post_form("/chat", &[("message", "hello")])
        .await
        .text()
        .await
        .unwrap();
    assert!(page.contains("hello"));
    assert!(page.contains(fallback_tail()));
}

#[tokio::test]
async fn test_empty_reply_shows_fallback() {
    let rasa = MockRasa::start(MockReply::texts(&[])).await;
    let ctx = TestContext::start(rasa.url.clone()).await;

    let page = ctx
        .post_form("/chat", &[("message", "hello")])
        .await
        .text()
        .await
        .unwrap();
    assert!(page.contains(fallback_tail()));
}

#[tokio::test]
async fn test_reset_clears_transcript() {
    let rasa = MockRasa::start(MockReply::texts(&["Sure."])).await;
    let ctx = TestContext::start(rasa.url.clone()).await;

    ctx.post_form("/chat", &[("message", "remember me")]).await;
    let page = ctx
        .post_form("/chat/reset", &[])
        .await
        .text()
        .await
        .unwrap();

    assert!(!page.contains("remember me"));
    assert!(page.contains(GREETING));
}

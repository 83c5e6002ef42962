//! Integration tests for the webhook endpoint.

mod common;

use axum::http::StatusCode;
use helperbot_core::conversation::ConversationKey;
use helperbot_test_support::SequenceRng;
use serde_json::json;

use common::{callback, group_text_event, post_raw, post_webhook, user_text_event};

#[tokio::test]
async fn test_signed_text_event_gets_a_reply() {
    // Arrange
    let app = common::build_test_app();
    let body = callback(vec![user_text_event("U1", "rt-1", "やることリスト追加 牛乳")]);

    // Act
    let (status, json) = post_webhook(app.router, &body).await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "success");
    assert_eq!(json["results"], json!([{ "status": "ok" }]));
    let sent = app.replies.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].reply_token, "rt-1");
    assert_eq!(sent[0].texts(), vec!["「牛乳」を追加しました。"]);
    assert_eq!(
        app.store.config(&ConversationKey::user("U1")).todo_list,
        vec!["牛乳"]
    );
}

#[tokio::test]
async fn test_bad_signature_is_rejected_without_processing() {
    // Arrange
    let app = common::build_test_app();
    let body = serde_json::to_vec(&callback(vec![user_text_event("U1", "rt", "クイズ")])).unwrap();

    // Act
    let (status, json) = post_raw(app.router, body, Some("bm90LWEtc2lnbmF0dXJl")).await;

    // Assert
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"], "invalid_signature");
    assert!(app.replies.sent().is_empty());
    assert!(app.store.replaced().is_empty());
}

#[tokio::test]
async fn test_missing_signature_is_rejected() {
    // Arrange
    let app = common::build_test_app();
    let body = serde_json::to_vec(&callback(vec![])).unwrap();

    // Act
    let (status, _) = post_raw(app.router, body, None).await;

    // Assert
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_malformed_body_returns_400() {
    // Arrange
    let app = common::build_test_app();
    let body = b"{\"events\": [".to_vec();
    let signature = helperbot_line::signature::sign(common::CHANNEL_SECRET, &body).unwrap();

    // Act
    let (status, json) = post_raw(app.router, body, Some(&signature)).await;

    // Assert
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "malformed_body");
    assert!(json["message"].is_string());
}

#[tokio::test]
async fn test_empty_batch_succeeds() {
    // Arrange
    let app = common::build_test_app();

    // Act
    let (status, json) = post_webhook(app.router, &callback(vec![])).await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["results"], json!([]));
}

#[tokio::test]
async fn test_unmatched_group_text_is_skipped() {
    // Arrange
    let app = common::build_test_app();
    let body = callback(vec![group_text_event("C1", "U1", "rt", "今日は暑いね")]);

    // Act
    let (status, json) = post_webhook(app.router, &body).await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["results"], json!([{ "status": "skipped" }]));
    assert!(app.replies.sent().is_empty());
}

#[tokio::test]
async fn test_unknown_source_fails_only_that_event() {
    // Arrange
    let app = common::build_test_app();
    let unknown = json!({
        "type": "message",
        "replyToken": "rt-x",
        "source": { "type": "bot", "botId": "B1" },
        "message": { "type": "text", "id": "1", "text": "クイズ" }
    });
    let body = callback(vec![unknown, user_text_event("U1", "rt-1", "通知オフ")]);

    // Act
    let (status, json) = post_webhook(app.router, &body).await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["results"][0]["status"], "failed");
    assert!(json["results"][0]["reason"].is_string());
    assert_eq!(json["results"][1]["status"], "ok");
    let sent = app.replies.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].reply_token, "rt-1");
}

#[tokio::test]
async fn test_two_events_for_one_conversation_both_apply() {
    // Arrange
    let app = common::build_test_app();
    let body = callback(vec![
        group_text_event("C1", "U1", "rt-1", "やることリスト追加 卵"),
        group_text_event("C1", "U2", "rt-2", "やることリスト追加 パン"),
    ]);

    // Act
    let (status, json) = post_webhook(app.router, &body).await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["results"], json!([{ "status": "ok" }, { "status": "ok" }]));
    let mut tasks = app.store.config(&ConversationKey::group("C1")).todo_list;
    tasks.sort();
    let mut expected = vec!["パン".to_owned(), "卵".to_owned()];
    expected.sort();
    assert_eq!(tasks, expected);
}

#[tokio::test]
async fn test_quiz_started_over_webhook_is_persisted() {
    // Arrange
    let app = common::build_test_app_with_rng(SequenceRng::new(vec![1]));
    let body = callback(vec![user_text_event("U1", "rt", "クイズ")]);

    // Act
    let (status, _) = post_webhook(app.router, &body).await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        app.replies.sent()[0].texts(),
        vec!["現在のスコア: 0点", "1+1は？", "答えを入力してください！"]
    );
    let stored = app.store.config(&ConversationKey::user("U1"));
    assert!(stored.quiz_status);
    assert_eq!(stored.current_question, 1);
}

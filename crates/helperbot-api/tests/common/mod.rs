//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use helperbot_core::rng::DeterministicRng;
use helperbot_dispatch::application::services::BotServices;
use helperbot_line::signature::{SIGNATURE_HEADER, sign};
use helperbot_test_support::{
    RecordingConversationStore, RecordingReplySender, SequenceRng, StubEarthquakeSource,
    StubWeatherSource,
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use helperbot_api::build_router;
use helperbot_api::state::AppState;

/// Channel secret every test request is signed with.
pub const CHANNEL_SECRET: &str = "test-channel-secret";

/// A router wired to recording doubles.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<RecordingConversationStore>,
    pub replies: Arc<RecordingReplySender>,
}

/// Build the full app router over recording doubles with an empty RNG
/// sequence.
pub fn build_test_app() -> TestApp {
    build_test_app_with_rng(SequenceRng::new(vec![]))
}

/// Build the full app router with a custom `SequenceRng` for tests that need
/// a specific quiz question.
pub fn build_test_app_with_rng(rng: SequenceRng) -> TestApp {
    let store = Arc::new(RecordingConversationStore::new());
    let replies = Arc::new(RecordingReplySender::new());
    let rng: Arc<Mutex<dyn DeterministicRng + Send>> = Arc::new(Mutex::new(rng));
    let services = BotServices::new(
        store.clone(),
        replies.clone(),
        Arc::new(StubWeatherSource::tokyo()),
        Arc::new(StubEarthquakeSource::moderate()),
    )
    .with_rng(rng);

    TestApp {
        router: build_router(AppState::new(services, CHANNEL_SECRET)),
        store,
        replies,
    }
}

/// A text message event from a one-to-one chat.
pub fn user_text_event(user_id: &str, reply_token: &str, text: &str) -> Value {
    json!({
        "type": "message",
        "replyToken": reply_token,
        "source": { "type": "user", "userId": user_id },
        "message": { "type": "text", "id": "1", "text": text }
    })
}

/// A text message event from a group chat.
pub fn group_text_event(group_id: &str, user_id: &str, reply_token: &str, text: &str) -> Value {
    json!({
        "type": "message",
        "replyToken": reply_token,
        "source": { "type": "group", "groupId": group_id, "userId": user_id },
        "message": { "type": "text", "id": "1", "text": text }
    })
}

/// Wraps events in a webhook body.
pub fn callback(events: Vec<Value>) -> Value {
    json!({ "destination": "Ubot", "events": events })
}

/// POST raw bytes to `/webhook` with an optional signature header.
pub async fn post_raw(
    app: Router,
    body: Vec<u8>,
    signature: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/webhook")
        .header("content-type", "application/json");
    if let Some(signature) = signature {
        builder = builder.header(SIGNATURE_HEADER, signature);
    }
    let request = builder.body(Body::from(body)).unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// POST a correctly signed webhook body.
pub async fn post_webhook(app: Router, body: &Value) -> (StatusCode, Value) {
    let bytes = serde_json::to_vec(body).unwrap();
    let signature = sign(CHANNEL_SECRET, &bytes).unwrap();
    post_raw(app, bytes, Some(&signature)).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

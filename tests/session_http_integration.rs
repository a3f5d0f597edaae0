mod common;

use serde_json::json;
use std::sync::Arc;

use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fitcoach::api::{ChatApi, HttpChatApi};
use fitcoach::capture::UnsupportedBackend;
use fitcoach::session::{Role, SessionStore};
use fitcoach::{ChatScreen, FitcoachError};

use common::config_for;

const FAILURE_TEXT: &str = "抱歉，发生了错误。请稍后再试。";

/// First turn: optimistic user bubble, server id adopted, intent attached
#[tokio::test]
async fn test_first_turn_adopts_server_conversation() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat/message"))
        .and(body_partial_json(json!({
            "message": "我想制定一个训练计划",
            "conversation_id": null,
            "include_history": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "conversation_id": "abc123",
            "message": "好的...",
            "intent": "workout_planning"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server.uri(), None);
    let api = HttpChatApi::new(&config.api).unwrap();
    let mut store = SessionStore::new(&config.chat);

    let reply = store
        .submit(&api, "我想制定一个训练计划")
        .await
        .cloned()
        .unwrap();

    assert_eq!(reply.role, Role::Assistant);
    assert_eq!(reply.content, "好的...");
    assert_eq!(reply.intent.as_deref(), Some("workout_planning"));
    assert!(!reply.is_error);
    assert_eq!(store.conversation_id(), Some("abc123"));
    assert!(!store.is_busy());

    let messages = store.messages();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[1].role, Role::User);
    assert_eq!(messages[1].content, "我想制定一个训练计划");
}

/// Second turn reuses the conversation id issued by the first reply
#[tokio::test]
async fn test_follow_up_turn_sends_conversation_id() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat/message"))
        .and(body_partial_json(json!({ "conversation_id": null })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "conversation_id": "abc123",
            "message": "好的"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/chat/message"))
        .and(body_partial_json(json!({
            "message": "每周三次",
            "conversation_id": "abc123"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "conversation_id": "abc123",
            "message": "明白了",
            "intent": "workout_planning",
            "metadata": { "plan_days": 3 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server.uri(), None);
    let api = HttpChatApi::new(&config.api).unwrap();
    let mut store = SessionStore::new(&config.chat);

    store.submit(&api, "我想制定一个训练计划").await;
    let second = store.submit(&api, "每周三次").await.cloned().unwrap();

    assert_eq!(second.content, "明白了");
    assert_eq!(
        second.metadata.as_ref().map(|m| m["plan_days"].clone()),
        Some(json!(3))
    );
    assert_eq!(store.messages().len(), 5);
    assert_eq!(store.conversation_id(), Some("abc123"));
}

/// A server failure appends the fixed failure notice and keeps the id
#[tokio::test]
async fn test_server_error_appends_failure_notice() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat/message"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let config = config_for(&server.uri(), None);
    let api = HttpChatApi::new(&config.api).unwrap();
    let mut store = SessionStore::resume(&config.chat, "abc123");

    let reply = store.submit(&api, "你好").await.cloned().unwrap();

    assert!(reply.is_error);
    assert_eq!(reply.content, FAILURE_TEXT);
    assert_eq!(store.conversation_id(), Some("abc123"));
    assert!(!store.is_busy());
    assert_eq!(store.messages()[store.messages().len() - 2].content, "你好");
}

/// Nothing listening at all behaves like any other failed send
#[tokio::test]
async fn test_unreachable_backend_appends_failure_notice() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let config = config_for(&format!("http://127.0.0.1:{}", port), None);
    let api = HttpChatApi::new(&config.api).unwrap();
    let mut store = SessionStore::new(&config.chat);

    let reply = store.submit(&api, "你好").await.cloned().unwrap();

    assert!(reply.is_error);
    assert_eq!(reply.content, FAILURE_TEXT);
    assert_eq!(store.conversation_id(), None);
}

/// Malformed JSON from the service is a failed turn, not a panic
#[tokio::test]
async fn test_malformed_reply_is_a_failed_turn() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat/message"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("not json", "application/json"))
        .mount(&server)
        .await;

    let config = config_for(&server.uri(), None);
    let api = HttpChatApi::new(&config.api).unwrap();

    let err = api
        .send_message(&fitcoach::api::ChatRequest::new("hi", None, true))
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<FitcoachError>(),
        Some(FitcoachError::Api(_))
    ));
}

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat/message"))
        .and(header("authorization", "Bearer secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "conversation_id": "abc123",
            "message": "ok"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server.uri(), Some("secret-token"));
    let api = HttpChatApi::new(&config.api).unwrap();
    let mut store = SessionStore::new(&config.chat);

    let reply = store.submit(&api, "hi").await.cloned().unwrap();
    assert!(!reply.is_error);
}

#[tokio::test]
async fn test_unauthorized_maps_to_authentication_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat/message"))
        .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
        .mount(&server)
        .await;

    let config = config_for(&server.uri(), Some("expired"));
    let api = HttpChatApi::new(&config.api).unwrap();

    let err = api
        .send_message(&fitcoach::api::ChatRequest::new("hi", None, true))
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<FitcoachError>(),
        Some(FitcoachError::Authentication(_))
    ));
}

#[tokio::test]
async fn test_conversation_history_fetch() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/chat/conversation/abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "conversation_id": "abc123",
            "messages": [
                { "role": "user", "content": "我想制定一个训练计划" },
                { "role": "assistant", "content": "好的..." }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server.uri(), None);
    let api = HttpChatApi::new(&config.api).unwrap();

    let history = api.conversation_history("abc123").await.unwrap();
    assert_eq!(history.conversation_id, "abc123");
    assert_eq!(history.messages.len(), 2);
    assert_eq!(history.messages[1].role, Role::Assistant);
}

#[tokio::test]
async fn test_unknown_conversation_history_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/chat/conversation/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let config = config_for(&server.uri(), None);
    let api = HttpChatApi::new(&config.api).unwrap();

    let err = api.conversation_history("missing").await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<FitcoachError>(),
        Some(FitcoachError::ConversationNotFound(id)) if id == "missing"
    ));
}

/// Base URLs with a path prefix keep it when endpoints are joined
#[tokio::test]
async fn test_base_url_with_prefix() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/coach/api/chat/message"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "conversation_id": "p1",
            "message": "ok"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&format!("{}/coach", server.uri()), None);
    let api = HttpChatApi::new(&config.api).unwrap();

    let reply = api
        .send_message(&fitcoach::api::ChatRequest::new("hi", None, false))
        .await
        .unwrap();
    assert_eq!(reply.conversation_id, "p1");
}

/// Whole screen against the HTTP client: quick action then history
#[tokio::test]
async fn test_screen_quick_action_round_trip() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat/message"))
        .and(body_partial_json(json!({ "message": "帮我分析今天的饮食" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "conversation_id": "diet1",
            "message": "请告诉我你今天吃了什么",
            "intent": "nutrition_analysis"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/chat/conversation/diet1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "conversation_id": "diet1",
            "messages": [{ "role": "user", "content": "帮我分析今天的饮食" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server.uri(), None);
    let api = Arc::new(HttpChatApi::new(&config.api).unwrap());
    let mut screen = ChatScreen::open(&config, api, Box::new(UnsupportedBackend));

    assert!(screen.choose_quick_action(1));
    let reply = screen.submit().await.cloned().unwrap();
    assert_eq!(reply.intent.as_deref(), Some("nutrition_analysis"));
    assert!(screen.quick_actions().is_empty());
    assert!(screen.snapshot().compose_text.is_empty());

    let history = screen.history().await.unwrap().unwrap();
    assert_eq!(history.messages.len(), 1);
}

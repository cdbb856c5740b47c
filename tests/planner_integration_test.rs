//! Integration tests for the planner client against a mock backend.

use futures::StreamExt;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use taskdeck::config::PlannerConfig;
use taskdeck::error::PlannerError;
use taskdeck::models::ChatRequest;
use taskdeck::planner::PlannerClient;
use taskdeck::stream::StreamEvent;

fn sse_body(frames: &[&str]) -> String {
    frames
        .iter()
        .map(|f| format!("data: {}\n", f))
        .collect::<String>()
}

async fn collect_events(
    client: &PlannerClient,
    request: &ChatRequest,
) -> Vec<Result<StreamEvent, PlannerError>> {
    let stream = client.stream(request).await.expect("stream should open");
    stream
        .map(|item| item.map(|received| received.event))
        .collect()
        .await
}

#[tokio::test]
async fn stream_decodes_events_in_order() {
    let server = MockServer::start().await;
    let body = sse_body(&[
        r#"{"type":"status","message":"thinking"}"#,
        r#"{"type":"assistant_message","text":"hello!"}"#,
        r#"{"type":"conversation_done"}"#,
    ]);

    Mock::given(method("POST"))
        .and(path("/planner/stream"))
        .and(header("Accept", "text/event-stream"))
        .and(body_json(json!({"text": "hi"})))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&server)
        .await;

    let client = PlannerClient::with_base_url(server.uri());
    let events = collect_events(&client, &ChatRequest::new("hi")).await;

    let events: Vec<_> = events.into_iter().map(|e| e.unwrap()).collect();
    assert_eq!(
        events,
        vec![
            StreamEvent::Status {
                message: "thinking".to_string()
            },
            StreamEvent::AssistantMessage {
                text: "hello!".to_string()
            },
            StreamEvent::ConversationDone,
        ]
    );
}

#[tokio::test]
async fn stream_skips_malformed_frames() {
    let server = MockServer::start().await;
    let body = format!(
        "{}{}{}{}{}",
        "data: {not json at all\n",
        "data: {\"type\":\"status\",\"message\":\"ok\"}\n",
        "data: {\"type\":\"telemetry\",\"value\":1}\n",
        "data: {\"no_type\":true}\n",
        "data: {\"type\":\"conversation_done\"}\n",
    );

    Mock::given(method("POST"))
        .and(path("/planner/stream"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&server)
        .await;

    let client = PlannerClient::with_base_url(server.uri());
    let events = collect_events(&client, &ChatRequest::new("hi")).await;

    // Only the valid frames survive, in their original order.
    let events: Vec<_> = events.into_iter().map(|e| e.unwrap()).collect();
    assert_eq!(
        events,
        vec![
            StreamEvent::Status {
                message: "ok".to_string()
            },
            StreamEvent::ConversationDone,
        ]
    );
}

#[tokio::test]
async fn stream_ignores_non_data_lines_and_incomplete_tail() {
    let server = MockServer::start().await;
    let body = format!(
        "{}{}{}{}",
        ": keep-alive\n",
        "data: {\"type\":\"status\",\"message\":\"ok\"}\n",
        "\n",
        "data: {\"type\":\"status\",\"mess", // truncated, no newline
    );

    Mock::given(method("POST"))
        .and(path("/planner/stream"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&server)
        .await;

    let client = PlannerClient::with_base_url(server.uri());
    let events = collect_events(&client, &ChatRequest::new("hi")).await;

    let events: Vec<_> = events.into_iter().map(|e| e.unwrap()).collect();
    assert_eq!(
        events,
        vec![StreamEvent::Status {
            message: "ok".to_string()
        }]
    );
}

#[tokio::test]
async fn stream_initial_error_carries_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/planner/stream"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"message": "planner exploded"})),
        )
        .mount(&server)
        .await;

    let client = PlannerClient::with_base_url(server.uri());
    let result = client.stream(&ChatRequest::new("hi")).await;

    match result {
        Err(PlannerError::Server { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "planner exploded");
        }
        other => panic!("expected Server error, got {:?}", other.map(|_| "stream")),
    }
}

#[tokio::test]
async fn stream_initial_error_with_unparseable_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/planner/stream"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
        .mount(&server)
        .await;

    let client = PlannerClient::with_base_url(server.uri());
    let result = client.stream(&ChatRequest::new("hi")).await;

    match result {
        Err(PlannerError::Server { status, message }) => {
            assert_eq!(status, 502);
            assert_eq!(message, "server returned status 502");
        }
        other => panic!("expected Server error, got {:?}", other.map(|_| "stream")),
    }
}

#[tokio::test]
async fn send_returns_response_lines() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/planner/"))
        .and(header("Accept", "application/json"))
        .and(body_json(json!({"text": "hi"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": ["Let me handle that for you.", "All done!"]
        })))
        .mount(&server)
        .await;

    let client = PlannerClient::with_base_url(server.uri());
    let lines = client.send(&ChatRequest::new("hi")).await.unwrap();
    assert_eq!(lines, vec!["Let me handle that for you.", "All done!"]);
}

#[tokio::test]
async fn send_maps_error_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/planner/"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({"error": "bad input"})))
        .mount(&server)
        .await;

    let client = PlannerClient::with_base_url(server.uri());
    let result = client.send(&ChatRequest::new("hi")).await;

    match result {
        Err(PlannerError::Server { status, message }) => {
            assert_eq!(status, 422);
            assert_eq!(message, "bad input");
        }
        other => panic!("expected Server error, got {:?}", other.map(|_| "send")),
    }
}

#[tokio::test]
async fn send_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/planner/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"response": []}))
                .set_delay(std::time::Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let config = PlannerConfig::default()
        .with_base_url(server.uri())
        .with_request_timeout(1);
    let client = PlannerClient::new(&config);
    let result = client.send(&ChatRequest::new("hi")).await;

    assert!(matches!(result, Err(PlannerError::Timeout(1))));
}

#[tokio::test]
async fn health_check_reports_backend_state() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = PlannerClient::with_base_url(server.uri());
    assert!(client.health_check().await.unwrap());
}

#[tokio::test]
async fn health_check_false_on_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = PlannerClient::with_base_url(server.uri());
    assert!(!client.health_check().await.unwrap());
}

//! `GeminiClient` against a local stand-in for the Gemini REST API.

use std::sync::{Arc, Mutex};

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use visuanary::client::{GeminiClient, ModelClient, ModelError};
use visuanary::config::ClientConfig;
use visuanary::mode::Mode;
use visuanary::prompt::UserNote;
use visuanary::request::{ImageBlob, build};

#[derive(Clone, Default)]
struct Captured {
    key: Arc<Mutex<Option<String>>>,
    body: Arc<Mutex<Option<serde_json::Value>>>,
}

/// Spawn a mock that answers every call with `status` and `reply`.
async fn spawn_mock(status: StatusCode, reply: serde_json::Value) -> (String, Captured) {
    let captured = Captured::default();
    let state = (captured.clone(), status, reply);

    let app = Router::new()
        .route(
            "/v1beta/models/gemini-test:generateContent",
            post(
                |State((cap, status, reply)): State<(Captured, StatusCode, serde_json::Value)>,
                 headers: HeaderMap,
                 Json(body): Json<serde_json::Value>| async move {
                    *cap.key.lock().unwrap() = headers
                        .get("x-goog-api-key")
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string);
                    *cap.body.lock().unwrap() = Some(body);
                    (status, Json(reply))
                },
            ),
        )
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), captured)
}

fn client_for(base: &str) -> GeminiClient {
    let config = ClientConfig::new("test-key")
        .with_model("gemini-test")
        .with_base_url(base);
    GeminiClient::new(config).unwrap()
}

#[tokio::test]
async fn sends_image_then_prompt_with_fixed_generation_config() {
    let reply = serde_json::json!({
        "candidates": [{"content": {"role": "model", "parts": [{"text": "Severity: 6/10"}]}, "finishReason": "STOP"}]
    });
    let (base, captured) = spawn_mock(StatusCode::OK, reply).await;
    let client = client_for(&base);

    let request = build(
        Mode::Severity,
        Some(ImageBlob::new(b"hello".to_vec())),
        &UserNote::from("swollen ankle"),
    )
    .unwrap();
    let text = client.invoke(&request).await.unwrap();
    assert_eq!(text, "Severity: 6/10");

    assert_eq!(captured.key.lock().unwrap().as_deref(), Some("test-key"));
    let body = captured.body.lock().unwrap().clone().unwrap();
    let parts = body["contents"][0]["parts"].as_array().unwrap();
    assert_eq!(parts.len(), 2);
    assert_eq!(parts[0]["inlineData"]["mimeType"], "image/jpeg");
    assert_eq!(parts[0]["inlineData"]["data"], "aGVsbG8=");
    assert!(parts[1]["text"].as_str().unwrap().contains("swollen ankle"));

    let generation = &body["generationConfig"];
    assert!((generation["temperature"].as_f64().unwrap() - 0.4).abs() < 1e-6);
    assert_eq!(generation["topP"], 1.0);
    assert_eq!(generation["topK"], 32);
    assert_eq!(generation["maxOutputTokens"], 4096);
}

#[tokio::test]
async fn http_error_surfaces_api_message() {
    let reply = serde_json::json!({
        "error": {"code": 403, "message": "API key not valid. Please pass a valid API key.", "status": "PERMISSION_DENIED"}
    });
    let (base, _) = spawn_mock(StatusCode::FORBIDDEN, reply).await;
    let client = client_for(&base);

    let request = build(Mode::Empathy, None, &UserNote::default()).unwrap();
    let err = client.invoke(&request).await.unwrap_err();
    assert!(matches!(err, ModelError::Api { status: 403, .. }));
    assert_eq!(
        err.to_string(),
        "Gemini API HTTP 403: API key not valid. Please pass a valid API key."
    );
}

#[tokio::test]
async fn blocked_prompt_is_an_error() {
    let reply = serde_json::json!({"promptFeedback": {"blockReason": "SAFETY"}});
    let (base, _) = spawn_mock(StatusCode::OK, reply).await;
    let client = client_for(&base);

    let request = build(Mode::Empathy, None, &UserNote::default()).unwrap();
    let err = client.invoke(&request).await.unwrap_err();
    assert!(matches!(err, ModelError::Blocked(_)));
}

#[tokio::test]
async fn unreachable_endpoint_is_a_request_failure() {
    // Bind and drop to get a port nothing listens on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client_for(&format!("http://{addr}"));
    let request = build(Mode::Empathy, None, &UserNote::default()).unwrap();
    let err = client.invoke(&request).await.unwrap_err();
    assert!(matches!(err, ModelError::RequestFailed(_)));
}

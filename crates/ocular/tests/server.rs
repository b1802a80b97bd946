//! HTTP API tests driving the router directly, plus end-to-end flows
//! against a stub chat-completions server on an ephemeral port.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use http_body_util::BodyExt;
use ocular::server::{router, AppState};
use ocular_core::{Config, Dispatcher};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const BOUNDARY: &str = "ocular-test-boundary";

/// Tiny PNG header, enough to be a non-empty payload.
const PNG_BYTES: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

fn state_with(config: Config) -> AppState {
    let dispatcher = Dispatcher::from_config(&config).expect("dispatcher");
    AppState {
        config: Arc::new(config),
        dispatcher: Arc::new(dispatcher),
    }
}

/// Build a multipart/form-data body by hand.
struct FormBuilder {
    body: Vec<u8>,
}

impl FormBuilder {
    fn new() -> Self {
        Self { body: Vec::new() }
    }

    fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    fn file(mut self, filename: &str, content_type: Option<&str>, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n")
                .as_bytes(),
        );
        if let Some(mime) = content_type {
            self.body
                .extend_from_slice(format!("Content-Type: {mime}\r\n").as_bytes());
        }
        self.body.extend_from_slice(b"\r\n");
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    fn build(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.body
    }
}

fn generate_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/generate")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Stub chat-completions endpoint: echoes the request body back as the
/// generated content so tests can assert exactly what was forwarded.
async fn stub_chat(Json(body): Json<Value>) -> Json<Value> {
    Json(json!({
        "choices": [{"message": {"role": "assistant", "content": body.to_string()}}],
        "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
    }))
}

/// Spawn the stub upstream on an ephemeral port; returns its base URL.
async fn spawn_stub_upstream() -> String {
    let app = Router::new().route("/v1/chat/completions", post(stub_chat));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/v1")
}

#[tokio::test]
async fn health_reports_configuration() {
    let app = router(state_with(Config::default()));
    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["local_model"], "Qwen3-VL-8B-Instruct");
    assert_eq!(body["openrouter_enabled"], false);
}

#[tokio::test]
async fn index_lists_local_and_routed_models() {
    let mut config = Config::default();
    config.openrouter.enabled = true;
    config.openrouter.api_key = "sk-or-test".into();
    config.openrouter.models.push(ocular_core::config::OpenRouterModel {
        name: "google/gemini-2.0-flash-001".into(),
        display_name: "Gemini 2.0 Flash".into(),
    });

    let app = router(state_with(config));
    let response = app
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let page = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(page.contains("value=\"local\""));
    assert!(page.contains("Qwen3-VL-8B-Instruct"));
    assert!(page.contains("value=\"openrouter:google/gemini-2.0-flash-001\""));
    assert!(page.contains("Gemini 2.0 Flash"));
}

#[tokio::test]
async fn index_hides_routed_models_when_disabled() {
    let mut config = Config::default();
    config.openrouter.models.push(ocular_core::config::OpenRouterModel {
        name: "google/gemini-2.0-flash-001".into(),
        display_name: "Gemini 2.0 Flash".into(),
    });

    let app = router(state_with(config));
    let response = app
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let page = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(!page.contains("openrouter:"));
}

#[tokio::test]
async fn generate_rejects_disallowed_content_type() {
    // No backend is reachable in this test; rejection must happen first
    let app = router(state_with(Config::default()));
    let body = FormBuilder::new()
        .file("notes.txt", Some("text/plain"), b"hello")
        .build();

    let response = app.oneshot(generate_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["detail"], "仅支持 PNG / JPEG / SVG 文件");
}

#[tokio::test]
async fn generate_rejects_empty_file() {
    let app = router(state_with(Config::default()));
    let body = FormBuilder::new()
        .file("empty.png", Some("image/png"), b"")
        .build();

    let response = app.oneshot(generate_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["detail"], "文件内容为空");
}

#[tokio::test]
async fn generate_rejects_missing_file_part() {
    let app = router(state_with(Config::default()));
    let body = FormBuilder::new().text("prompt", "describe this").build();

    let response = app.oneshot(generate_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["detail"], "缺少上传文件");
}

#[tokio::test]
async fn generate_rejects_unresolvable_mime_type() {
    // No declared content type and no recognizable extension
    let app = router(state_with(Config::default()));
    let body = FormBuilder::new().file("mystery", None, PNG_BYTES).build();

    let response = app.oneshot(generate_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["detail"], "无法识别的文件类型");
}

#[tokio::test]
async fn generate_rejects_unknown_model_selector() {
    let app = router(state_with(Config::default()));
    let body = FormBuilder::new()
        .text("model", "gpt-x")
        .file("shot.png", Some("image/png"), PNG_BYTES)
        .build();

    let response = app.oneshot(generate_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["detail"], "不支持的模型: gpt-x");
}

#[tokio::test]
async fn generate_rejects_routed_selector_when_disabled() {
    let app = router(state_with(Config::default()));
    let body = FormBuilder::new()
        .text("model", "openrouter:gpt-x")
        .file("shot.png", Some("image/png"), PNG_BYTES)
        .build();

    let response = app.oneshot(generate_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["detail"], "OpenRouter 未启用或未配置 API Key");
}

#[tokio::test]
async fn generate_local_uses_default_prompt_and_buckets() {
    let base_url = spawn_stub_upstream().await;

    let mut config = Config::default();
    config.model.base_url = base_url;
    config
        .model
        .sampling_args
        .insert("temperature".into(), json!(0.7));
    config.model.extra_args.insert("top_k".into(), json!(20));

    let app = router(state_with(config.clone()));
    // prompt and model omitted: default prompt, local backend
    let body = FormBuilder::new()
        .file("shot.png", Some("image/png"), PNG_BYTES)
        .build();

    let response = app.oneshot(generate_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;

    assert!(body["usage"].is_object());
    assert_eq!(body["usage"]["total_tokens"], 15);
    assert!(body["latency"].as_f64().unwrap() >= 0.0);

    // The stub echoes the forwarded request body as content
    let forwarded: Value = serde_json::from_str(body["content"].as_str().unwrap()).unwrap();
    assert_eq!(forwarded["model"], "Qwen3-VL-8B-Instruct");
    assert_eq!(
        forwarded["messages"][0]["content"][0]["text"],
        json!(config.model.default_prompt)
    );
    assert!(forwarded["messages"][0]["content"][1]["image_url"]["url"]
        .as_str()
        .unwrap()
        .starts_with("data:image/png;base64,"));
    assert_eq!(forwarded["temperature"], json!(0.7));
    assert_eq!(forwarded["top_k"], json!(20));
}

#[tokio::test]
async fn generate_infers_mime_type_from_filename() {
    let base_url = spawn_stub_upstream().await;
    let mut config = Config::default();
    config.model.base_url = base_url;

    let app = router(state_with(config));
    let body = FormBuilder::new().file("shot.png", None, PNG_BYTES).build();

    let response = app.oneshot(generate_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;

    let forwarded: Value = serde_json::from_str(body["content"].as_str().unwrap()).unwrap();
    assert!(forwarded["messages"][0]["content"][1]["image_url"]["url"]
        .as_str()
        .unwrap()
        .starts_with("data:image/png;base64,"));
}

#[tokio::test]
async fn generate_routed_forwards_remainder_and_routed_sampling() {
    let base_url = spawn_stub_upstream().await;

    let mut config = Config::default();
    // Local sampling must NOT leak into routed calls
    config
        .model
        .sampling_args
        .insert("temperature".into(), json!(0.7));
    config.openrouter.enabled = true;
    config.openrouter.api_key = "sk-or-test".into();
    config.openrouter.base_url = base_url;
    config
        .openrouter
        .default_sampling_args
        .insert("temperature".into(), json!(0.2));

    let app = router(state_with(config));
    let body = FormBuilder::new()
        .text("model", "openrouter:gpt-x")
        .text("prompt", "请描述这张图片")
        .file("shot.png", Some("image/png"), PNG_BYTES)
        .build();

    let response = app.oneshot(generate_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;

    let forwarded: Value = serde_json::from_str(body["content"].as_str().unwrap()).unwrap();
    assert_eq!(forwarded["model"], "gpt-x");
    assert_eq!(forwarded["temperature"], json!(0.2));
    assert_eq!(forwarded["messages"][0]["content"][0]["text"], "请描述这张图片");
}

#[tokio::test]
async fn generate_blank_prompt_falls_back_to_default() {
    let base_url = spawn_stub_upstream().await;
    let mut config = Config::default();
    config.model.base_url = base_url;

    let app = router(state_with(config.clone()));
    let body = FormBuilder::new()
        .text("prompt", "   ")
        .file("shot.png", Some("image/png"), PNG_BYTES)
        .build();

    let response = app.oneshot(generate_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;

    let forwarded: Value = serde_json::from_str(body["content"].as_str().unwrap()).unwrap();
    assert_eq!(
        forwarded["messages"][0]["content"][0]["text"],
        json!(config.model.default_prompt)
    );
}

#[tokio::test]
async fn generate_maps_transport_failure_to_gateway_error() {
    // Reserve a port, then drop the listener so connections are refused
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut config = Config::default();
    config.model.base_url = format!("http://{addr}/v1");

    let app = router(state_with(config));
    let body = FormBuilder::new()
        .file("shot.png", Some("image/png"), PNG_BYTES)
        .build();

    let response = app.oneshot(generate_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = json_body(response).await;
    assert!(!body["detail"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn generate_maps_upstream_error_status_to_gateway_error() {
    // Upstream that always answers 500
    async fn failing_chat() -> (StatusCode, &'static str) {
        (StatusCode::INTERNAL_SERVER_ERROR, "model exploded")
    }
    let upstream = Router::new().route("/v1/chat/completions", post(failing_chat));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, upstream).await.unwrap();
    });

    let mut config = Config::default();
    config.model.base_url = format!("http://{addr}/v1");

    let app = router(state_with(config));
    let body = FormBuilder::new()
        .file("shot.png", Some("image/png"), PNG_BYTES)
        .build();

    let response = app.oneshot(generate_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = json_body(response).await;
    assert!(body["detail"].as_str().unwrap().contains("model exploded"));
}

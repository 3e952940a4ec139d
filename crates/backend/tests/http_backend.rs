use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
};
use backend::{ConsoleApi, HttpBackend};
use parking_lot::Mutex;
use proto::{BackendError, CreateSessionRequest, SessionId};
use serde_json::{Value, json};

/// Requests seen by the fake backend: (route, payload-or-params).
#[derive(Default)]
struct Recorded {
    calls: Mutex<Vec<(String, Value)>>,
}

impl Recorded {
    fn push(&self, route: &str, payload: Value) {
        self.calls.lock().push((route.to_string(), payload));
    }

    fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().clone()
    }
}

type Shared = Arc<Recorded>;

async fn list_chats(State(rec): State<Shared>) -> Json<Value> {
    rec.push("list", Value::Null);
    Json(json!([
        {"id": "zeta_start_1", "metadata": {"client_name": "Zeta"}},
        {"id": "alpha_start_2", "metadata": {}}
    ]))
}

async fn create_chat(
    State(rec): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    rec.push("create", json!({"body": body, "content_type": content_type}));
    Json(json!({
        "id": "client_start_3",
        "chat": {"metadata": {"client_name": "client"}, "generated": [], "past": [], "messages": []}
    }))
}

async fn get_chat(
    State(rec): State<Shared>,
    Path(id): Path<String>,
) -> Result<Json<Value>, (StatusCode, String)> {
    rec.push("get", Value::from(id.clone()));
    if id == "missing" {
        return Err((
            StatusCode::NOT_FOUND,
            "{\"detail\":\"Chat not found\"}".to_string(),
        ));
    }
    Ok(Json(json!({
        "id": id,
        "chat": {"metadata": {}, "generated": ["hello"], "past": ["hi"], "messages": [{"role": "user"}]}
    })))
}

async fn poll(
    State(rec): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    rec.push("poll", json!(params));
    Json(json!({"messages": [{"sender": "Telegram", "text": "ping", "timestamp": 1700000000.5}]}))
}

async fn telegram_send(State(rec): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    rec.push("telegram_send", body);
    Json(json!({"success": true}))
}

async fn gemini_send(State(rec): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    rec.push("gemini_send", body);
    Json(json!({
        "reply": "try a discount",
        "chat": {"metadata": {}, "generated": ["try a discount"], "past": ["what now?"], "messages": []}
    }))
}

async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

async fn broken() -> (StatusCode, &'static str) {
    (StatusCode::OK, "not json at all")
}

async fn spawn_backend() -> (String, Shared) {
    let rec: Shared = Arc::new(Recorded::default());
    let app = Router::new()
        .route("/api/health", get(health))
        .route("/api/chats", get(list_chats).post(create_chat))
        .route("/api/chats/{id}", get(get_chat))
        .route("/api/telegram/messages", get(poll))
        .route("/api/telegram/send", post(telegram_send))
        .route("/api/gemini/send", post(gemini_send))
        .route("/broken/api/health", get(broken))
        .with_state(rec.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve fake backend");
    });
    (format!("http://{addr}"), rec)
}

#[tokio::test]
async fn health_reports_status() {
    let (base, _rec) = spawn_backend().await;
    let backend = HttpBackend::new(base);
    let status = backend.health().await.expect("health");
    assert_eq!(status.status, "ok");
}

#[tokio::test]
async fn list_sessions_preserves_server_order() {
    let (base, _rec) = spawn_backend().await;
    let backend = HttpBackend::new(base);
    let sessions = backend.list_sessions().await.expect("list");
    let ids: Vec<&str> = sessions.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["zeta_start_1", "alpha_start_2"]);
    assert_eq!(sessions[0].label(), "Zeta");
    assert_eq!(sessions[1].label(), "alpha_start_2");
}

#[tokio::test]
async fn create_session_sends_empty_fields_verbatim() {
    let (base, rec) = spawn_backend().await;
    let backend = HttpBackend::new(base);
    let created = backend
        .create_session(CreateSessionRequest::default())
        .await
        .expect("create");
    assert_eq!(created.id.as_str(), "client_start_3");

    let calls = rec.calls();
    assert_eq!(calls.len(), 1);
    let (route, payload) = &calls[0];
    assert_eq!(route, "create");
    assert_eq!(
        payload["body"],
        json!({"client_phone": "", "client_name": "", "client_details": ""})
    );
    assert_eq!(payload["content_type"], "application/json");
}

#[tokio::test]
async fn get_session_returns_full_record() {
    let (base, rec) = spawn_backend().await;
    let backend = HttpBackend::new(base);
    let env = backend
        .get_session(&SessionId::from("acme start"))
        .await
        .expect("get");
    assert_eq!(env.id.as_str(), "acme start");
    assert_eq!(env.chat.past, vec!["hi".to_string()]);
    assert_eq!(env.chat.generated, vec!["hello".to_string()]);
    assert_eq!(env.chat.messages.len(), 1);
    assert_eq!(rec.calls()[0].1, Value::from("acme start"));
}

#[tokio::test]
async fn non_success_status_surfaces_status_and_raw_body() {
    let (base, _rec) = spawn_backend().await;
    let backend = HttpBackend::new(base);
    let err = backend
        .get_session(&SessionId::from("missing"))
        .await
        .expect_err("404 should fail");
    assert_eq!(
        err,
        BackendError::Request {
            status: 404,
            body: "{\"detail\":\"Chat not found\"}".to_string(),
        }
    );
}

#[tokio::test]
async fn invalid_json_body_is_a_decode_error() {
    let (base, _rec) = spawn_backend().await;
    let backend = HttpBackend::new(format!("{base}/broken"));
    let err = backend.health().await.expect_err("decode should fail");
    match err {
        BackendError::Decode(detail) => assert!(detail.contains("not json at all")),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn poll_channel_passes_chat_id_and_batch_size() {
    let (base, rec) = spawn_backend().await;
    let backend = HttpBackend::new(base).with_poll_batch_size(Some(5));
    let messages = backend
        .poll_channel(&SessionId::from("a&b"))
        .await
        .expect("poll");
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].sender, "Telegram");

    let (_, params) = &rec.calls()[0];
    assert_eq!(params["chat_id"], "a&b");
    assert_eq!(params["batch_size"], "5");
}

#[tokio::test]
async fn poll_channel_omits_batch_size_by_default() {
    let (base, rec) = spawn_backend().await;
    let backend = HttpBackend::new(base);
    backend
        .poll_channel(&SessionId::from("s-1"))
        .await
        .expect("poll");
    let (_, params) = &rec.calls()[0];
    assert!(params.get("batch_size").is_none());
}

#[tokio::test]
async fn send_endpoints_carry_chat_id_and_text() {
    let (base, rec) = spawn_backend().await;
    let backend = HttpBackend::new(base);
    let id = SessionId::from("s-9");

    let ack = backend.send_channel(&id, "hello client").await.expect("send");
    assert!(ack.success);

    let reply = backend.send_assistant(&id, "what now?").await.expect("assist");
    assert_eq!(reply.reply, "try a discount");
    assert_eq!(reply.chat.generated, vec!["try a discount".to_string()]);

    let calls = rec.calls();
    assert_eq!(calls[0].0, "telegram_send");
    assert_eq!(calls[0].1, json!({"chat_id": "s-9", "text": "hello client"}));
    assert_eq!(calls[1].0, "gemini_send");
    assert_eq!(calls[1].1, json!({"chat_id": "s-9", "text": "what now?"}));
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("addr").port();
    drop(listener);

    let backend = HttpBackend::new(format!("http://127.0.0.1:{port}"));
    let err = backend.list_sessions().await.expect_err("nothing listening");
    assert!(matches!(err, BackendError::Transport(_)));
}

//! In-process mock of the generation backend.

#![allow(dead_code)]

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{any, get};
use axum::{Json, Router};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio::sync::{mpsc, oneshot};

use email_preview::{BackendClient, Config};

/// A request as the backend saw it.
#[derive(Debug, Clone)]
pub struct Captured {
    pub method: Method,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl Captured {
    pub fn prompt(&self) -> String {
        prompt_of(&self.body)
    }
}

/// Canned reply: status, content type and raw body.
pub type Reply = (StatusCode, &'static str, String);

type Responder = Arc<dyn Fn(&str) -> Reply + Send + Sync>;

#[derive(Clone)]
struct MockState {
    responder: Responder,
    captured: mpsc::UnboundedSender<Captured>,
    gates: Arc<Mutex<HashMap<String, oneshot::Receiver<()>>>>,
    index: Arc<Mutex<Option<Reply>>>,
}

pub struct MockBackend {
    pub endpoint: String,
    captured: mpsc::UnboundedReceiver<Captured>,
    gates: Arc<Mutex<HashMap<String, oneshot::Receiver<()>>>>,
    index: Arc<Mutex<Option<Reply>>>,
}

impl MockBackend {
    /// Start a backend answering every generation request with `responder(prompt)`.
    pub async fn start<F>(responder: F) -> Self
    where
        F: Fn(&str) -> Reply + Send + Sync + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let gates = Arc::new(Mutex::new(HashMap::new()));
        let index_reply = Arc::new(Mutex::new(None));
        let state = MockState {
            responder: Arc::new(responder),
            captured: tx,
            gates: gates.clone(),
            index: index_reply.clone(),
        };

        let app = Router::new()
            .route("/", get(index))
            .route("/generate-email", any(generate_email))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            endpoint: format!("http://{}/generate-email", addr),
            captured: rx,
            gates,
            index: index_reply,
        }
    }

    /// Backend that wraps each prompt in a paragraph.
    pub async fn echo() -> Self {
        Self::start(|prompt| {
            json_reply(serde_json::json!({ "html": format!("<p>{}</p>", prompt) }))
        })
        .await
    }

    pub fn client(&self) -> BackendClient {
        BackendClient::new(&Config::new(&self.endpoint).unwrap())
    }

    /// Hold the reply to `prompt` until the returned sender fires or is dropped.
    pub fn hold(&self, prompt: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(prompt.to_string(), rx);
        tx
    }

    /// Answer the root route with `reply` instead of the healthy status.
    pub fn set_index_reply(&self, reply: Reply) {
        *self.index.lock().unwrap() = Some(reply);
    }

    /// Next request the backend received.
    pub async fn next_request(&mut self) -> Captured {
        self.captured.recv().await.expect("mock backend stopped")
    }
}

pub fn json_reply(body: serde_json::Value) -> Reply {
    (StatusCode::OK, "application/json", body.to_string())
}

pub fn raw_reply(status: StatusCode, content_type: &'static str, body: &str) -> Reply {
    (status, content_type, body.to_string())
}

fn prompt_of(body: &[u8]) -> String {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("prompt").and_then(|p| p.as_str()).map(str::to_string))
        .unwrap_or_default()
}

async fn index(State(state): State<MockState>) -> Response {
    let reply = { state.index.lock().unwrap().clone() };
    match reply {
        Some((status, content_type, body)) => {
            (status, [(header::CONTENT_TYPE, content_type)], body).into_response()
        }
        None => Json(serde_json::json!({
            "status": "ok",
            "msg": "Email template generator backend running"
        }))
        .into_response(),
    }
}

async fn generate_email(
    State(state): State<MockState>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let prompt = prompt_of(&body);
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let _ = state.captured.send(Captured {
        method,
        content_type,
        body,
    });

    let gate = { state.gates.lock().unwrap().remove(&prompt) };
    if let Some(gate) = gate {
        let _ = gate.await;
    }

    let (status, content_type, body) = (state.responder)(&prompt);
    (status, [(header::CONTENT_TYPE, content_type)], body).into_response()
}

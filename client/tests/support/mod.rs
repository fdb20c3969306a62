//! Shared helpers for client integration tests.
//!
//! Integration tests compile as separate crates under `client/tests/`. This
//! module hosts an in-process fake GraphQL server that answers from a script
//! and records every request it receives.

use std::collections::{BTreeMap, VecDeque};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};

use actix_web::dev::ServerHandle;
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use serde_json::{Value, json};
use url::Url;

/// Upper bound on request bodies the fake server accepts.
const BODY_LIMIT_BYTES: usize = 4 * 1024 * 1024;

/// One scripted HTTP reply.
#[derive(Debug, Clone)]
pub struct FakeReply {
    status: u16,
    body: String,
}

impl FakeReply {
    /// `200` carrying `{ "data": data }`.
    pub fn data(data: Value) -> Self {
        Self::raw(200, json!({ "data": data }).to_string())
    }

    /// `200` carrying a single GraphQL error.
    pub fn error(message: &str, code: Option<&str>) -> Self {
        let mut error = json!({ "message": message });
        if let Some(code) = code {
            error["extensions"] = json!({ "code": code });
        }
        Self::raw(200, json!({ "data": null, "errors": [error] }).to_string())
    }

    /// Arbitrary status and body.
    pub fn raw(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Request as observed by the fake server.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    /// Header values keyed by lower-case name.
    pub headers: BTreeMap<String, String>,
    pub body: Vec<u8>,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("request body should be JSON")
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[derive(Default)]
struct FakeState {
    replies: Mutex<VecDeque<FakeReply>>,
    captured: Mutex<Vec<CapturedRequest>>,
}

async fn graphql(req: HttpRequest, body: web::Bytes, state: web::Data<FakeState>) -> HttpResponse {
    let headers = req
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_owned(),
                value.to_str().unwrap_or_default().to_owned(),
            )
        })
        .collect();
    state
        .captured
        .lock()
        .expect("captured lock")
        .push(CapturedRequest {
            headers,
            body: body.to_vec(),
        });
    let reply = state
        .replies
        .lock()
        .expect("replies lock")
        .pop_front()
        .unwrap_or_else(|| FakeReply::raw(500, "no scripted reply"));
    let status = actix_web::http::StatusCode::from_u16(reply.status).expect("valid status");
    HttpResponse::build(status)
        .content_type("application/json")
        .body(reply.body)
}

/// In-process GraphQL server bound to an ephemeral local port.
pub struct FakeGraphqlServer {
    endpoint: Url,
    handle: ServerHandle,
    state: Arc<FakeState>,
}

impl FakeGraphqlServer {
    /// Start a server answering with `replies` in order, then `500`.
    pub async fn start(replies: Vec<FakeReply>) -> Self {
        let state = Arc::new(FakeState {
            replies: Mutex::new(replies.into()),
            captured: Mutex::new(Vec::new()),
        });
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind fake server");
        let addr = listener.local_addr().expect("local addr");
        let data = web::Data::from(state.clone());

        let server = HttpServer::new(move || {
            App::new()
                .app_data(data.clone())
                .app_data(web::PayloadConfig::new(BODY_LIMIT_BYTES))
                .route("/graphql", web::post().to(graphql))
        })
        .disable_signals()
        .workers(1)
        .listen(listener)
        .expect("listen")
        .run();

        let handle = server.handle();
        actix_web::rt::spawn(server);

        Self {
            endpoint: Url::parse(&format!("http://{addr}/graphql")).expect("endpoint url"),
            handle,
            state,
        }
    }

    pub fn endpoint(&self) -> Url {
        self.endpoint.clone()
    }

    /// Requests received so far, in order.
    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.state.captured.lock().expect("captured lock").clone()
    }

    pub async fn stop(self) {
        self.handle.stop(true).await;
    }
}

/// Endpoint on which nothing listens.
pub fn unreachable_endpoint() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let addr = listener.local_addr().expect("ephemeral addr");
    drop(listener);
    Url::parse(&format!("http://{addr}/graphql")).expect("endpoint url")
}

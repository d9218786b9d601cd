#![allow(dead_code)]

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use axum::{
    extract::State,
    http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri},
    response::IntoResponse,
    Json, Router,
};
use klaviyo_http::{ClientOptions, KlaviyoClient};
use serde_json::{json, Value as JsonValue};

#[derive(Clone)]
pub struct MockResponse {
    status: StatusCode,
    body: JsonValue,
    headers: Vec<(&'static str, String)>,
}

impl MockResponse {
    pub fn json(status: StatusCode, body: JsonValue) -> Self {
        Self {
            status,
            body,
            headers: Vec::new(),
        }
    }

    pub fn ok(body: JsonValue) -> Self {
        Self::json(StatusCode::OK, body)
    }

    pub fn not_found() -> Self {
        Self::json(StatusCode::NOT_FOUND, json!({"detail": "not found"}))
    }

    pub fn rate_limited() -> Self {
        Self::json(StatusCode::TOO_MANY_REQUESTS, json!({"detail": "throttled"}))
    }

    pub fn with_header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }
}

#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub body: String,
}

impl RecordedRequest {
    pub fn body_json(&self) -> JsonValue {
        serde_json::from_str(&self.body).expect("request body must be json")
    }

    /// Decoded value of query parameter `key`.
    pub fn query_param(&self, key: &str) -> Option<String> {
        let url = reqwest::Url::parse(&format!(
            "http://mock{}?{}",
            self.path,
            self.query.as_deref()?
        ))
        .ok()?;
        url.query_pairs()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.into_owned())
    }
}

#[derive(Clone)]
struct MockState {
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

async fn record_and_reply(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    body: String,
) -> impl IntoResponse {
    state
        .requests
        .lock()
        .expect("request log mutex must not be poisoned")
        .push(RecordedRequest {
            method,
            path: uri.path().to_owned(),
            query: uri.query().map(str::to_owned),
            body,
        });

    let response = {
        let mut queue = state
            .responses
            .lock()
            .expect("response queue mutex must not be poisoned");
        queue.pop_front().unwrap_or_else(|| {
            MockResponse::json(
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"error": "no mock response available"}),
            )
        })
    };

    let mut headers = HeaderMap::new();
    for (name, value) in response.headers {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_str(&value).expect("mock header value must be valid"),
        );
    }

    (response.status, headers, Json(response.body))
}

pub struct TestServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    task: tokio::task::JoinHandle<()>,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl TestServer {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .expect("request log mutex must not be poisoned")
            .clone()
    }

    pub fn hits(&self) -> usize {
        self.requests().len()
    }

    /// Client with both credentials and a 1 ms default rate-limit wait.
    pub fn client(&self) -> KlaviyoClient {
        KlaviyoClient::new("pk_test", "pub_test")
            .with_base_url(&self.base_url)
            .with_options(fast_options())
    }
}

pub fn fast_options() -> ClientOptions {
    ClientOptions {
        timeout_ms: 2_000,
        default_retry_after_ms: 1,
        max_rate_limit_retries: None,
    }
}

pub async fn spawn_server(responses: Vec<MockResponse>) -> TestServer {
    let state = MockState {
        responses: Arc::new(Mutex::new(responses.into())),
        requests: Arc::new(Mutex::new(Vec::new())),
    };

    let app = Router::new()
        .fallback(record_and_reply)
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("must bind test listener");
    let address = listener.local_addr().expect("must have local addr");
    let task = tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("mock server must run");
    });

    TestServer {
        base_url: format!("http://{address}"),
        requests: state.requests,
        task,
    }
}

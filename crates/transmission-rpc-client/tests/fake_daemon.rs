//! End-to-end tests of the HTTP transport and session handshake against an in-process fake
//! daemon.

#![allow(unused_crate_dependencies)]
#![allow(missing_docs)]

use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use tokio::{net::TcpListener, task::JoinHandle};
use transmission_rpc_client::{ClientConfig, TransmissionClient};
use transmission_rpc_types::{Arguments, RpcError};

const SESSION_ID: &str = "fake-session-id";

#[derive(Debug, Clone)]
struct Recorded {
    headers: HeaderMap,
    body: String,
}

impl Recorded {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    fn envelope(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

struct Reply {
    status: StatusCode,
    headers: HeaderMap,
    body: String,
}

impl Reply {
    fn json(body: Value) -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: body.to_string(),
        }
    }

    fn status(status: u16, body: &str) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap(),
            headers: HeaderMap::new(),
            body: body.to_owned(),
        }
    }

    fn conflict() -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            "X-Transmission-Session-Id",
            HeaderValue::from_static(SESSION_ID),
        );
        Self {
            status: StatusCode::CONFLICT,
            headers,
            body: "<h1>409: Conflict</h1>".to_owned(),
        }
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        let mut headers = self.headers;
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        (self.status, headers, self.body).into_response()
    }
}

type Handler = Arc<dyn Fn(&Recorded) -> Reply + Send + Sync>;

#[derive(Clone)]
struct DaemonState {
    handler: Handler,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

async fn answer(State(state): State<DaemonState>, headers: HeaderMap, body: Bytes) -> Reply {
    let request = Recorded {
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    };
    state.requests.lock().unwrap().push(request.clone());
    (state.handler)(&request)
}

struct FakeDaemon {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<Recorded>>>,
    task: JoinHandle<()>,
}

impl FakeDaemon {
    /// Answer every request with `handler` until dropped.
    async fn start(handler: impl Fn(&Recorded) -> Reply + Send + Sync + 'static) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));

        let app = Router::new().fallback(answer).with_state(DaemonState {
            handler: Arc::new(handler),
            requests: Arc::clone(&requests),
        });
        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            addr,
            requests,
            task,
        }
    }

    /// A daemon enforcing the session id, answering with `arguments` once it is sent.
    async fn with_session(arguments: Value) -> Self {
        Self::start(move |request| {
            if request.header("x-transmission-session-id") == Some(SESSION_ID) {
                Reply::json(json!({ "result": "success", "arguments": arguments }))
            } else {
                Reply::conflict()
            }
        })
        .await
    }

    fn config(&self) -> ClientConfig {
        ClientConfig {
            host: self.addr.ip().to_string(),
            port: self.addr.port(),
            ..Default::default()
        }
    }

    fn client(&self) -> TransmissionClient {
        TransmissionClient::new(&self.config()).unwrap()
    }

    fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for FakeDaemon {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[test_log::test(tokio::test)]
async fn handshake_is_transparent() {
    let daemon = FakeDaemon::with_session(json!({ "version": "4.0.5" })).await;
    let client = daemon.client();

    let session = client.session_get().await.unwrap();
    assert_eq!(session["version"], "4.0.5");

    let requests = daemon.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].header("x-transmission-session-id"), Some(""));
    assert_eq!(
        requests[1].header("x-transmission-session-id"),
        Some(SESSION_ID)
    );
    assert_eq!(requests[0].body, requests[1].body);
    assert_eq!(
        client.rpc_session().session_id().as_deref(),
        Some(SESSION_ID)
    );

    client.session_get().await.unwrap();
    assert_eq!(daemon.requests().len(), 3);
}

#[tokio::test]
async fn request_carries_protocol_headers() {
    let daemon = FakeDaemon::with_session(json!({})).await;
    let client = daemon.client();

    client.stop(1).await.unwrap();

    let request = daemon.requests().pop().unwrap();
    assert_eq!(request.header("content-type"), Some("application/json"));
    assert_eq!(
        request.header("content-length"),
        Some(request.body.len().to_string().as_str())
    );
    assert_eq!(
        request.header("host"),
        Some(format!("{}:{}", daemon.addr.ip(), daemon.addr.port()).as_str())
    );
    assert!(request.header("x-requested-with").is_some());
    assert!(request.header("authorization").is_none());

    let envelope = request.envelope();
    assert_eq!(envelope["method"], "torrent-stop");
    assert_eq!(envelope["arguments"], json!({ "ids": [1] }));
}

#[tokio::test]
async fn basic_auth_header_is_sent() {
    let daemon = FakeDaemon::with_session(json!({})).await;
    let config = ClientConfig {
        username: Some("user".into()),
        password: Some("pass".into()),
        ..daemon.config()
    };
    let client = TransmissionClient::new(&config).unwrap();

    client.start_all().await.unwrap();

    for request in daemon.requests() {
        assert_eq!(request.header("authorization"), Some("Basic dXNlcjpwYXNz"));
    }
}

#[tokio::test]
async fn server_error_keeps_body() {
    let daemon = FakeDaemon::start(|_| Reply::status(500, "daemon exploded")).await;
    let client = daemon.client();

    let err = client.session_get().await.unwrap_err();

    match &err {
        RpcError::UnexpectedStatus { status, body } => {
            assert_eq!(*status, 500);
            assert_eq!(body, "daemon exploded");
        }
        other => panic!("Expected UnexpectedStatus, got {other:?}"),
    }
    assert_eq!(daemon.requests().len(), 1);
}

#[tokio::test]
async fn unauthorized_is_not_retried() {
    let daemon = FakeDaemon::start(|_| Reply::status(401, "Unauthorized User")).await;
    let client = daemon.client();

    let err = client.session_stats().await.unwrap_err();

    assert!(matches!(err, RpcError::UnexpectedStatus { status: 401, .. }));
    assert_eq!(daemon.requests().len(), 1);
}

#[tokio::test]
async fn daemon_failure_surfaces_result() {
    let daemon = FakeDaemon::start(|request| {
        if request.header("x-transmission-session-id") == Some(SESSION_ID) {
            Reply::json(json!({ "result": "invalid or corrupt torrent file", "arguments": {} }))
        } else {
            Reply::conflict()
        }
    })
    .await;
    let client = daemon.client();

    let err = client
        .add_base64("bm90IGEgdG9ycmVudA==", Arguments::new())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "invalid or corrupt torrent file");
    assert!(err.body().unwrap().contains("invalid or corrupt torrent file"));
}

#[tokio::test]
async fn add_reports_duplicate() {
    let daemon = FakeDaemon::with_session(json!({
        "torrent-duplicate": { "id": 5, "name": "debian.iso", "hashString": "0123abcd" }
    }))
    .await;
    let client = daemon.client();

    let torrent = client
        .add("magnet:?xt=urn:btih:0123abcd", Arguments::new())
        .await
        .unwrap();

    assert!(torrent.duplicate);
    assert_eq!(torrent.id, 5);
    let envelope = daemon.requests().pop().unwrap().envelope();
    assert_eq!(envelope["method"], "torrent-add");
    assert_eq!(
        envelope["arguments"]["filename"],
        "magnet:?xt=urn:btih:0123abcd"
    );
}

#[tokio::test]
async fn stubborn_daemon_fails_negotiation() {
    let daemon = FakeDaemon::start(|_| Reply::conflict()).await;
    let config = ClientConfig {
        max_session_retries: 1,
        ..daemon.config()
    };
    let client = TransmissionClient::new(&config).unwrap();

    let err = client.session_get().await.unwrap_err();

    assert!(matches!(err, RpcError::SessionNegotiation { attempts: 2 }));
    assert_eq!(daemon.requests().len(), 2);
}

#[tokio::test]
async fn connection_refused_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let client =
        TransmissionClient::from_url(&format!("http://127.0.0.1:{port}/transmission/rpc")).unwrap();
    let err = client.session_get().await.unwrap_err();

    assert!(matches!(err, RpcError::Transport(_)), "got {err:?}");
}

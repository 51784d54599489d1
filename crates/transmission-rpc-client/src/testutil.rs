//! Shared test utilities and fixtures.

use reqwest::{
    StatusCode,
    header::{HeaderMap, HeaderValue},
};
use serde_json::Value;

use crate::config::ClientConfig;
use crate::transport::{HttpResponse, SESSION_ID_HEADER};

pub(crate) fn test_config() -> ClientConfig {
    ClientConfig::default()
}

/// A 200 answer with a JSON body.
pub(crate) fn ok(body: Value) -> HttpResponse {
    HttpResponse {
        status: StatusCode::OK,
        headers: HeaderMap::new(),
        body: serde_json::to_vec(&body).unwrap(),
    }
}

/// A successful envelope around `arguments`.
pub(crate) fn success(arguments: Value) -> HttpResponse {
    ok(serde_json::json!({ "result": "success", "arguments": arguments }))
}

/// A 409 answer handing out `session_id`.
pub(crate) fn conflict(session_id: &str) -> HttpResponse {
    let mut headers = HeaderMap::new();
    headers.insert(SESSION_ID_HEADER, HeaderValue::from_str(session_id).unwrap());
    HttpResponse {
        status: StatusCode::CONFLICT,
        headers,
        body: b"<h1>409: Conflict</h1>".to_vec(),
    }
}

/// An answer with an arbitrary status and text body.
pub(crate) fn status(code: u16, body: &str) -> HttpResponse {
    HttpResponse {
        status: StatusCode::from_u16(code).unwrap(),
        headers: HeaderMap::new(),
        body: body.as_bytes().to_vec(),
    }
}

/// The parsed envelope of a request sent through a mock transport.
pub(crate) fn envelope(body: &str) -> Value {
    serde_json::from_str(body).unwrap()
}

pub(crate) fn make_test_torrent(id: i64, name: &str, hash: &str, status: i64) -> Value {
    serde_json::json!({
        "id": id,
        "name": name,
        "hashString": hash,
        "status": status,
        "percentDone": 0.5,
        "downloadDir": "/downloads",
        "totalSize": 1000,
    })
}

pub(crate) fn make_test_stats() -> Value {
    serde_json::json!({
        "activeTorrentCount": 1,
        "cumulative-stats": {
            "downloadedBytes": 1000,
            "filesAdded": 5,
            "secondsActive": 3600,
            "sessionCount": 10,
            "uploadedBytes": 500
        },
        "current-stats": {
            "downloadedBytes": 100,
            "filesAdded": 1,
            "secondsActive": 600,
            "sessionCount": 1,
            "uploadedBytes": 50
        },
        "downloadSpeed": 1000,
        "pausedTorrentCount": 0,
        "torrentCount": 1,
        "uploadSpeed": 500
    })
}

//! HTTP transport abstraction.
//!
//! This module provides the [`Transport`] trait which abstracts the HTTP exchange with the
//! daemon, enabling mocking in tests, and [`HttpTransport`], its `reqwest` implementation.

use reqwest::{
    Client, StatusCode,
    header::{HeaderMap, HeaderName},
};
use transmission_rpc_types::TransportError;
use url::Url;

/// Header carrying the session id.
pub const SESSION_ID_HEADER: HeaderName = HeaderName::from_static("x-transmission-session-id");

/// Header marking the request as scripted.
pub const REQUESTED_WITH_HEADER: HeaderName = HeaderName::from_static("x-requested-with");

/// A fully prepared RPC POST request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// The RPC endpoint.
    pub url: Url,
    /// Request headers, sent as is.
    pub headers: HeaderMap,
    /// Serialized request envelope.
    pub body: String,
}

/// The daemon's answer, with the body fully read.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Raw response body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// The body as text, with invalid UTF-8 replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Sends one HTTP request and reads the whole answer.
///
/// Implementations must not retry; the session layer decides what to re-send.
#[cfg_attr(test, mockall::automock)]
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// POST `request` and return the answer, whatever its status.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// [`Transport`] backed by a `reqwest` client.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport with a default `reqwest` client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport reusing a configured `reqwest` client, e.g. one with timeouts.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let response = self
            .client
            .post(request.url)
            .headers(request.headers)
            .body(request.body)
            .send()
            .await?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

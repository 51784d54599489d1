//! Session-aware RPC exchange.
//!
//! The daemon guards its RPC endpoint with a session id. A request carrying a missing or
//! stale id is answered with `409 Conflict` and the current id in the
//! `X-Transmission-Session-Id` header. [`RpcSession`] remembers that id and re-sends the
//! request with it, so callers only ever see the final answer.

use std::sync::{PoisonError, RwLock};

use reqwest::{
    StatusCode,
    header::{AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE, HOST, HeaderMap, HeaderValue},
};
use tracing::{debug, warn};
use transmission_rpc_types::{Arguments, RpcError, RpcRequest, RpcResponse};
use url::Url;

use crate::config::ClientConfig;
use crate::transport::{
    HttpRequest, HttpResponse, REQUESTED_WITH_HEADER, SESSION_ID_HEADER, Transport,
};

/// Performs RPC calls over a [`Transport`], negotiating the session id on the way.
#[derive(Debug)]
pub struct RpcSession<T> {
    transport: T,
    url: Url,
    host: HeaderValue,
    authorization: Option<HeaderValue>,
    max_session_retries: u32,
    session_id: RwLock<Option<HeaderValue>>,
}

impl<T: Transport> RpcSession<T> {
    /// Create a session for the daemon described by `config`.
    ///
    /// The `Authorization` header is derived here once; no session id is known yet.
    /// At least one retry is required, since the first request always lacks the id.
    pub fn new(config: &ClientConfig, transport: T) -> Result<Self, RpcError> {
        if config.max_session_retries == 0 {
            return Err(RpcError::InvalidConfig(
                "max_session_retries must be at least 1".into(),
            ));
        }
        let url = config.rpc_url()?;
        let host = HeaderValue::try_from(config.authority())
            .map_err(|e| RpcError::InvalidConfig(format!("Invalid host header: {}", e)))?;
        let authorization = config
            .auth_header()
            .map(|value| {
                let mut value = HeaderValue::try_from(value)
                    .map_err(|e| RpcError::InvalidConfig(format!("Invalid credentials: {}", e)))?;
                value.set_sensitive(true);
                Ok::<_, RpcError>(value)
            })
            .transpose()?;

        Ok(Self {
            transport,
            url,
            host,
            authorization,
            max_session_retries: config.max_session_retries,
            session_id: RwLock::new(None),
        })
    }

    /// The session id currently in use, if one was negotiated.
    pub fn session_id(&self) -> Option<String> {
        self.session_id
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
    }

    /// Send `request` and return the `arguments` of a successful answer.
    ///
    /// A 409 answer replaces the stored session id and the same request is sent again, at
    /// most `max_session_retries` times. Transport failures are returned immediately.
    pub async fn call(&self, request: &RpcRequest) -> Result<Arguments, RpcError> {
        let body = serde_json::to_string(request).map_err(RpcError::Encode)?;
        let mut attempts = 0;

        loop {
            attempts += 1;
            debug!(method = %request.method, attempt = attempts, "sending RPC request");
            let response = self
                .transport
                .send(self.prepare(&body))
                .await
                .map_err(RpcError::Transport)?;

            match response.status {
                StatusCode::CONFLICT => {
                    let session_id = response
                        .headers
                        .get(SESSION_ID_HEADER)
                        .cloned()
                        .ok_or_else(|| RpcError::MissingSessionId {
                            body: response.text(),
                        })?;
                    debug!("daemon issued a new session id");
                    self.store_session_id(session_id);

                    if attempts > self.max_session_retries {
                        warn!(
                            method = %request.method,
                            attempts, "daemon keeps rejecting the session id"
                        );
                        return Err(RpcError::SessionNegotiation { attempts });
                    }
                }
                StatusCode::OK => return parse_answer(&response),
                status => {
                    return Err(RpcError::UnexpectedStatus {
                        status: status.as_u16(),
                        body: response.text(),
                    });
                }
            }
        }
    }

    /// Build the HTTP request for a serialized envelope with the current session id.
    fn prepare(&self, body: &str) -> HttpRequest {
        let mut headers = HeaderMap::new();
        headers.insert(HOST, self.host.clone());
        headers.insert(
            REQUESTED_WITH_HEADER,
            HeaderValue::from_static(env!("CARGO_PKG_NAME")),
        );
        headers.insert(
            SESSION_ID_HEADER,
            self.session_id
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
                .unwrap_or_else(|| HeaderValue::from_static("")),
        );
        headers.insert(CONTENT_LENGTH, HeaderValue::from(body.len()));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(authorization) = &self.authorization {
            headers.insert(AUTHORIZATION, authorization.clone());
        }

        HttpRequest {
            url: self.url.clone(),
            headers,
            body: body.to_owned(),
        }
    }

    fn store_session_id(&self, session_id: HeaderValue) {
        *self
            .session_id
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(session_id);
    }
}

/// Unwrap the envelope of a 200 answer.
fn parse_answer(response: &HttpResponse) -> Result<Arguments, RpcError> {
    let answer: RpcResponse =
        serde_json::from_slice(&response.body).map_err(|source| RpcError::Parse {
            source,
            body: response.text(),
        })?;

    if answer.is_success() {
        Ok(answer.arguments)
    } else {
        Err(RpcError::Daemon {
            result: answer.result,
            body: response.text(),
        })
    }
}

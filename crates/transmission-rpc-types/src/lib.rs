//! # Transmission RPC Types
//!
//! This crate defines the protocol types shared by the Transmission RPC client and its
//! callers: the request/response envelopes, the method names, the field allow-lists, the
//! typed results of the daemon methods and the common error type.

use std::{error::Error as StdError, io};

use thiserror::Error;

pub mod fields;
pub mod rpc;
pub mod stats;
pub mod status;

pub use fields::{FieldSet, ensure_allowed};
pub use rpc::{Arguments, Ids, RpcRequest, RpcResponse, SUCCESS, TorrentId, method};
pub use stats::{AddedTorrent, BlocklistUpdate, FreeSpace, PortTest, SessionStats, StatsDetails};
pub use status::TorrentStatus;

/// Boxed error produced by a transport implementation.
pub type TransportError = Box<dyn StdError + Send + Sync + 'static>;

/// Error type for Transmission RPC operations.
#[derive(Error, Debug)]
pub enum RpcError {
    /// A field outside the allow-list of the operation was supplied. Raised before any
    /// request is sent.
    #[error("cannot set field `{field}` with {operation}")]
    InvalidField {
        /// The rejected field name.
        field: String,
        /// The RPC method the field was meant for.
        operation: &'static str,
    },

    /// The transport failed to deliver the request or to read the response.
    #[error("network error: {0}")]
    Transport(#[source] TransportError),

    /// The request envelope could not be serialized.
    #[error("failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),

    /// The daemon answered 200 with a body that is not a valid response envelope.
    #[error("failed to parse daemon response: {source}")]
    Parse {
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
        /// The raw response body.
        body: String,
    },

    /// The daemon answered with a result other than `"success"`.
    #[error("{result}")]
    Daemon {
        /// The result string reported by the daemon.
        result: String,
        /// The raw response body.
        body: String,
    },

    /// The daemon answered with a status other than 200 or 409.
    #[error("status code mismatch: {status}")]
    UnexpectedStatus {
        /// The HTTP status code.
        status: u16,
        /// The raw response body.
        body: String,
    },

    /// The daemon kept rejecting the session id it handed out.
    #[error("session negotiation failed after {attempts} attempts")]
    SessionNegotiation {
        /// Number of requests sent before giving up.
        attempts: u32,
    },

    /// The daemon answered 409 without a session id header.
    #[error("daemon answered 409 without a session id")]
    MissingSessionId {
        /// The raw response body.
        body: String,
    },

    /// A polled torrent is no longer reported by the daemon.
    #[error("no torrent found for id {0}")]
    TorrentNotFound(TorrentId),

    /// A status poll ran out of its poll budget.
    #[error("torrent {id} did not reach {target} after {polls} polls")]
    WaitExhausted {
        /// The polled torrent.
        id: TorrentId,
        /// The awaited status.
        target: TorrentStatus,
        /// Number of polls performed.
        polls: u32,
    },

    /// The daemon answered successfully but the arguments do not have the expected shape.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    /// The RPC URL could not be parsed or turned into request headers.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// File system errors (torrent file not found, permission denied, etc.)
    #[error("file system error on {path}: {source}")]
    FileSystem {
        /// The path being read.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl RpcError {
    /// The raw response body attached to the error, if the daemon sent one.
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Parse { body, .. }
            | Self::Daemon { body, .. }
            | Self::UnexpectedStatus { body, .. }
            | Self::MissingSessionId { body } => Some(body),
            _ => None,
        }
    }
}

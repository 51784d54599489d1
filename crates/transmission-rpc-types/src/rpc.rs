//! Request and response envelopes of the Transmission RPC protocol.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The `arguments` object of a request or response.
pub type Arguments = Map<String, Value>;

/// The `result` value of a successful response.
pub const SUCCESS: &str = "success";

/// RPC method names understood by the daemon.
pub mod method {
    #![allow(missing_docs)]

    pub const TORRENT_START: &str = "torrent-start";
    pub const TORRENT_START_NOW: &str = "torrent-start-now";
    pub const TORRENT_STOP: &str = "torrent-stop";
    pub const TORRENT_VERIFY: &str = "torrent-verify";
    pub const TORRENT_REANNOUNCE: &str = "torrent-reannounce";
    pub const TORRENT_SET: &str = "torrent-set";
    pub const TORRENT_GET: &str = "torrent-get";
    pub const TORRENT_ADD: &str = "torrent-add";
    pub const TORRENT_REMOVE: &str = "torrent-remove";
    pub const TORRENT_SET_LOCATION: &str = "torrent-set-location";
    pub const TORRENT_RENAME_PATH: &str = "torrent-rename-path";
    pub const SESSION_GET: &str = "session-get";
    pub const SESSION_SET: &str = "session-set";
    pub const SESSION_STATS: &str = "session-stats";
    pub const BLOCKLIST_UPDATE: &str = "blocklist-update";
    pub const PORT_TEST: &str = "port-test";
    pub const FREE_SPACE: &str = "free-space";
}

/// A request envelope: `{ method, arguments?, tag? }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
    /// The RPC method name.
    pub method: String,
    /// Method arguments, omitted when `None`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Arguments>,
    /// Opaque correlation tag echoed by the daemon.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl RpcRequest {
    /// Create a request for `method` without arguments or tag.
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            arguments: None,
            tag: None,
        }
    }

    /// Set the arguments object.
    pub fn with_arguments(mut self, arguments: Arguments) -> Self {
        self.arguments = Some(arguments);
        self
    }

    /// Set the correlation tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }
}

/// A response envelope: `{ result, arguments }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcResponse {
    /// `"success"` or the error string reported by the daemon.
    pub result: String,
    /// Result arguments. Error responses may leave them out.
    #[serde(default)]
    pub arguments: Arguments,
    /// The tag of the request this answers, if it carried one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<Value>,
}

impl RpcResponse {
    /// Whether the daemon reported success.
    pub fn is_success(&self) -> bool {
        self.result == SUCCESS
    }
}

/// A torrent identifier: the numeric session id or the info hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TorrentId {
    /// Numeric id, only valid for the lifetime of the daemon session.
    Id(i64),
    /// Hex encoded info hash.
    Hash(String),
}

impl fmt::Display for TorrentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Hash(hash) => f.write_str(hash),
        }
    }
}

impl From<i64> for TorrentId {
    fn from(id: i64) -> Self {
        Self::Id(id)
    }
}

impl From<i32> for TorrentId {
    fn from(id: i32) -> Self {
        Self::Id(id.into())
    }
}

impl From<&str> for TorrentId {
    fn from(hash: &str) -> Self {
        Self::Hash(hash.to_owned())
    }
}

impl From<String> for TorrentId {
    fn from(hash: String) -> Self {
        Self::Hash(hash)
    }
}

/// The set of torrents an operation applies to.
///
/// Singular identifiers convert into a one-element list, so every operation taking
/// `impl Into<Ids>` accepts an id, a hash, or a `Vec` of either.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ids {
    /// Every torrent. The `ids` argument is left out of the request.
    All,
    /// Torrents active in the recent past (`"recently-active"`).
    RecentlyActive,
    /// An explicit list of torrents.
    List(Vec<TorrentId>),
}

impl Ids {
    /// The value of the `ids` argument, `None` when it must be omitted.
    pub fn to_value(&self) -> Option<Value> {
        match self {
            Self::All => None,
            Self::RecentlyActive => Some(Value::from("recently-active")),
            Self::List(ids) => Some(Value::Array(
                ids.iter()
                    .map(|id| match id {
                        TorrentId::Id(id) => Value::from(*id),
                        TorrentId::Hash(hash) => Value::from(hash.as_str()),
                    })
                    .collect(),
            )),
        }
    }
}

impl From<TorrentId> for Ids {
    fn from(id: TorrentId) -> Self {
        Self::List(vec![id])
    }
}

impl From<i64> for Ids {
    fn from(id: i64) -> Self {
        TorrentId::from(id).into()
    }
}

impl From<i32> for Ids {
    fn from(id: i32) -> Self {
        TorrentId::from(id).into()
    }
}

impl From<&str> for Ids {
    fn from(hash: &str) -> Self {
        TorrentId::from(hash).into()
    }
}

impl From<String> for Ids {
    fn from(hash: String) -> Self {
        TorrentId::from(hash).into()
    }
}

impl<T: Into<TorrentId>> From<Vec<T>> for Ids {
    fn from(ids: Vec<T>) -> Self {
        Self::List(ids.into_iter().map(Into::into).collect())
    }
}

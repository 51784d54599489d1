//! Typed results of the daemon methods with a fixed answer shape.

use serde::{Deserialize, Serialize};

/// Session statistics, the answer of `session-stats`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)] // rationale: these are the same fields as in Transmission RPC
pub struct SessionStats {
    pub active_torrent_count: i32,

    #[serde(rename = "cumulative-stats")]
    pub cumulative_stats: StatsDetails,

    #[serde(rename = "current-stats")]
    pub current_stats: StatsDetails,

    pub download_speed: i64,

    pub paused_torrent_count: i32,

    pub torrent_count: i32,

    pub upload_speed: i64,
}

/// Detailed statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct StatsDetails {
    pub downloaded_bytes: i64,

    pub files_added: i64,

    pub seconds_active: i64,

    pub session_count: i64,

    pub uploaded_bytes: i64,
}

/// Free space at a path on the daemon host, the answer of `free-space`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeSpace {
    /// The queried path.
    pub path: String,
    /// Bytes available to the daemon.
    #[serde(rename = "size-bytes")]
    pub size_bytes: i64,
    /// Capacity of the file system, sent by newer daemons only.
    #[serde(default, rename = "total_size", skip_serializing_if = "Option::is_none")]
    pub total_size: Option<i64>,
}

/// The torrent entry returned by `torrent-add`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddedTorrent {
    /// Session id of the torrent.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Info hash.
    pub hash_string: String,
    /// Whether the daemon already knew the torrent (`torrent-duplicate`).
    #[serde(skip)]
    pub duplicate: bool,
}

/// The answer of `port-test`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortTest {
    /// Whether the peer port is reachable from the outside.
    #[serde(rename = "port-is-open")]
    pub port_is_open: bool,
}

/// The answer of `blocklist-update`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlocklistUpdate {
    /// Number of rules in the updated blocklist.
    #[serde(rename = "blocklist-size")]
    pub blocklist_size: i64,
}

//! Field lists and allow-lists of the torrent and session methods.

use crate::{Arguments, RpcError, rpc::method};

/// Fields requested by the default `torrent-get` queries.
pub const TORRENT_FIELDS: &[&str] = &[
    "activityDate",
    "addedDate",
    "bandwidthPriority",
    "comment",
    "corruptEver",
    "creator",
    "dateCreated",
    "desiredAvailable",
    "doneDate",
    "downloadDir",
    "downloadedEver",
    "downloadLimit",
    "downloadLimited",
    "error",
    "errorString",
    "eta",
    "files",
    "fileStats",
    "hashString",
    "haveUnchecked",
    "haveValid",
    "honorsSessionLimits",
    "id",
    "isFinished",
    "isPrivate",
    "leftUntilDone",
    "magnetLink",
    "manualAnnounceTime",
    "maxConnectedPeers",
    "metadataPercentComplete",
    "name",
    "peer-limit",
    "peers",
    "peersConnected",
    "peersFrom",
    "peersGettingFromUs",
    "peersKnown",
    "peersSendingToUs",
    "percentDone",
    "pieces",
    "pieceCount",
    "pieceSize",
    "priorities",
    "rateDownload",
    "rateUpload",
    "recheckProgress",
    "seedIdleLimit",
    "seedIdleMode",
    "seedRatioLimit",
    "seedRatioMode",
    "sizeWhenDone",
    "startDate",
    "status",
    "trackers",
    "trackerStats",
    "totalSize",
    "torrentFile",
    "uploadedEver",
    "uploadLimit",
    "uploadLimited",
    "uploadRatio",
    "wanted",
    "webseeds",
    "webseedsSendingToUs",
];

/// Fields of the lightweight progress query.
pub const FAST_FIELDS: &[&str] = &[
    "id",
    "error",
    "errorString",
    "eta",
    "isFinished",
    "isStalled",
    "leftUntilDone",
    "metadataPercentComplete",
    "peersConnected",
    "peersGettingFromUs",
    "peersSendingToUs",
    "percentDone",
    "queuePosition",
    "rateDownload",
    "rateUpload",
    "recheckProgress",
    "seedRatioMode",
    "seedRatioLimit",
    "sizeWhenDone",
    "status",
    "trackers",
    "uploadedEver",
    "uploadRatio",
];

/// Fields of the peers query.
pub const PEER_FIELDS: &[&str] = &["peers", "hashString", "id"];

/// Fields of the files query.
pub const FILE_FIELDS: &[&str] = &["files", "fileStats", "hashString", "id"];

/// Fields `torrent-set` may modify.
pub const TORRENT_SET_FIELDS: &[&str] = &[
    "bandwidthPriority",
    "downloadLimit",
    "downloadLimited",
    "files-wanted",
    "files-unwanted",
    "honorsSessionLimits",
    "ids",
    "location",
    "peer-limit",
    "priority-high",
    "priority-low",
    "priority-normal",
    "seedRatioLimit",
    "seedRatioMode",
    "uploadLimit",
    "uploadLimited",
];

/// Fields `torrent-add` accepts.
pub const TORRENT_ADD_FIELDS: &[&str] = &[
    "download-dir",
    "filename",
    "metainfo",
    "paused",
    "peer-limit",
    "files-wanted",
    "files-unwanted",
    "priority-high",
    "priority-low",
    "priority-normal",
];

/// Fields `session-set` may modify.
pub const SESSION_SET_FIELDS: &[&str] = &[
    "start-added-torrents",
    "alt-speed-down",
    "alt-speed-enabled",
    "alt-speed-time-begin",
    "alt-speed-time-enabled",
    "alt-speed-time-end",
    "alt-speed-time-day",
    "alt-speed-up",
    "blocklist-enabled",
    "dht-enabled",
    "encryption",
    "download-dir",
    "peer-limit-global",
    "peer-limit-per-torrent",
    "pex-enabled",
    "peer-port",
    "peer-port-random-on-start",
    "port-forwarding-enabled",
    "seedRatioLimit",
    "seedRatioLimited",
    "speed-limit-down",
    "speed-limit-down-enabled",
    "speed-limit-up",
    "speed-limit-up-enabled",
];

/// An allow-list bound to the method it guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSet {
    /// The guarded RPC method.
    pub method: &'static str,
    /// The permitted field names.
    pub fields: &'static [&'static str],
}

impl FieldSet {
    /// Allow-list of `torrent-set`.
    pub const TORRENT_SET: Self = Self {
        method: method::TORRENT_SET,
        fields: TORRENT_SET_FIELDS,
    };

    /// Allow-list of `torrent-add`.
    pub const TORRENT_ADD: Self = Self {
        method: method::TORRENT_ADD,
        fields: TORRENT_ADD_FIELDS,
    };

    /// Allow-list of `session-set`.
    pub const SESSION_SET: Self = Self {
        method: method::SESSION_SET,
        fields: SESSION_SET_FIELDS,
    };

    /// Whether `field` may be set.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains(&field)
    }
}

/// Check every key of `arguments` against `allowed`.
///
/// Fails with [`RpcError::InvalidField`] naming the first key outside the list.
pub fn ensure_allowed(allowed: FieldSet, arguments: &Arguments) -> Result<(), RpcError> {
    match arguments.keys().find(|key| !allowed.contains(key)) {
        Some(field) => Err(RpcError::InvalidField {
            field: field.clone(),
            operation: allowed.method,
        }),
        None => Ok(()),
    }
}

//! Conversions from raw `arguments` objects to the values returned by the client.

use serde::de::DeserializeOwned;
use serde_json::Value;
use transmission_rpc_types::{AddedTorrent, Arguments, RpcError, TorrentStatus};

/// Deserialize a whole `arguments` object into a typed answer.
pub(crate) fn typed<T: DeserializeOwned>(arguments: Arguments) -> Result<T, RpcError> {
    serde_json::from_value(Value::Object(arguments))
        .map_err(|e| RpcError::UnexpectedResponse(e.to_string()))
}

/// Pick the torrent entry out of a `torrent-add` answer.
///
/// The daemon reports a torrent it already knows as `torrent-duplicate` and a new one as
/// `torrent-added`.
pub(crate) fn added_torrent(mut arguments: Arguments) -> Result<AddedTorrent, RpcError> {
    let (entry, duplicate) = match arguments.remove("torrent-duplicate") {
        Some(entry) => (entry, true),
        None => (
            arguments
                .remove("torrent-added")
                .ok_or_else(|| RpcError::UnexpectedResponse("No torrent returned".into()))?,
            false,
        ),
    };

    let mut torrent: AddedTorrent =
        serde_json::from_value(entry).map_err(|e| RpcError::UnexpectedResponse(e.to_string()))?;
    torrent.duplicate = duplicate;
    Ok(torrent)
}

/// Unwrap the `torrents` collection of a `torrent-get` answer.
pub(crate) fn torrents(mut arguments: Arguments) -> Result<Vec<Value>, RpcError> {
    match arguments.remove("torrents") {
        Some(Value::Array(torrents)) => Ok(torrents),
        Some(other) => Err(RpcError::UnexpectedResponse(format!(
            "`torrents` is not a list: {other}"
        ))),
        None => Err(RpcError::UnexpectedResponse("No torrents returned".into())),
    }
}

/// Read the `status` field of a torrent entry.
pub(crate) fn status(torrent: &Value) -> Result<TorrentStatus, RpcError> {
    torrent
        .get("status")
        .and_then(Value::as_i64)
        .ok_or_else(|| RpcError::UnexpectedResponse("torrent has no status".into()))
        .and_then(TorrentStatus::try_from)
}

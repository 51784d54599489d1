//! Transmission RPC client implementation.

use std::{path::Path, time::Duration};

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde_json::Value;
use tracing::debug;
use transmission_rpc_types::{
    AddedTorrent, Arguments, BlocklistUpdate, FieldSet, FreeSpace, Ids, PortTest, RpcError,
    RpcRequest, SessionStats, TorrentId, TorrentStatus, ensure_allowed,
    fields::{FAST_FIELDS, FILE_FIELDS, PEER_FIELDS, TORRENT_FIELDS},
    method,
};
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::conversions::{added_torrent, status, torrents, typed};
use crate::session::RpcSession;
use crate::transport::{HttpTransport, Transport};


/// How [`TransmissionClient::wait_for_status`] polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Delay between two polls.
    pub interval: Duration,
    /// Give up after this many polls. `None` polls until the status is reached, the torrent
    /// disappears, or the future is dropped.
    pub max_polls: Option<u32>,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_polls: None,
        }
    }
}

/// TransmissionClient drives a Transmission daemon over its RPC protocol.
///
/// Every operation builds an `arguments` object and hands it to the underlying
/// [`RpcSession`], which takes care of the session id handshake.
#[derive(Debug)]
pub struct TransmissionClient<T = HttpTransport> {
    session: RpcSession<T>,
}

impl TransmissionClient {
    /// Create a new TransmissionClient talking HTTP to the daemon described by `config`.
    pub fn new(config: &ClientConfig) -> Result<Self, RpcError> {
        debug!("Using Transmission RPC at {:?}", config);
        Self::with_transport(config, HttpTransport::new())
    }

    /// Create a new TransmissionClient from an RPC URL.
    pub fn from_url(rpc_url: &str) -> Result<Self, RpcError> {
        Self::new(&ClientConfig::from_url(rpc_url)?)
    }
}

impl<T: Transport> TransmissionClient<T> {
    /// Create a TransmissionClient with a custom transport implementation.
    pub fn with_transport(config: &ClientConfig, transport: T) -> Result<Self, RpcError> {
        Ok(Self {
            session: RpcSession::new(config, transport)?,
        })
    }

    /// The underlying RPC session.
    pub fn rpc_session(&self) -> &RpcSession<T> {
        &self.session
    }

    /// Call `method` with `arguments` and a fresh correlation tag.
    ///
    /// An empty `arguments` object is left out of the request.
    pub async fn call(&self, method: &str, arguments: Arguments) -> Result<Arguments, RpcError> {
        let mut request = RpcRequest::new(method).with_tag(Uuid::new_v4().to_string());
        if !arguments.is_empty() {
            request = request.with_arguments(arguments);
        }
        self.session.call(&request).await
    }

    // torrent queries

    /// Get every torrent with the default field list.
    pub async fn all(&self) -> Result<Arguments, RpcError> {
        self.get(Ids::All).await
    }

    /// Get the recently active torrents. The answer also lists the ids `removed` since.
    pub async fn active(&self) -> Result<Arguments, RpcError> {
        self.get(Ids::RecentlyActive).await
    }

    /// Get torrents with the default field list.
    pub async fn get(&self, ids: impl Into<Ids>) -> Result<Arguments, RpcError> {
        let ids = ids.into();
        debug!("Getting torrents {ids:?}");
        self.call(method::TORRENT_GET, query(TORRENT_FIELDS, &ids)).await
    }

    /// Get the progress fields of torrents.
    pub async fn fast(&self, ids: impl Into<Ids>) -> Result<Vec<Value>, RpcError> {
        let ids = ids.into();
        debug!("Getting progress of torrents {ids:?}");
        torrents(self.call(method::TORRENT_GET, query(FAST_FIELDS, &ids)).await?)
    }

    /// Get the peers of torrents.
    pub async fn peers(&self, ids: impl Into<Ids>) -> Result<Vec<Value>, RpcError> {
        let ids = ids.into();
        debug!("Getting peers of torrents {ids:?}");
        torrents(self.call(method::TORRENT_GET, query(PEER_FIELDS, &ids)).await?)
    }

    /// Get the files of torrents.
    pub async fn files(&self, ids: impl Into<Ids>) -> Result<Vec<Value>, RpcError> {
        let ids = ids.into();
        debug!("Getting files of torrents {ids:?}");
        torrents(self.call(method::TORRENT_GET, query(FILE_FIELDS, &ids)).await?)
    }

    /// Poll a torrent until it reaches `target` and return its last state.
    ///
    /// Fails with [`RpcError::TorrentNotFound`] once the daemon stops reporting the torrent,
    /// and with [`RpcError::WaitExhausted`] when `options.max_polls` runs out. Dropping the
    /// returned future cancels the wait.
    pub async fn wait_for_status(
        &self,
        id: impl Into<TorrentId>,
        target: TorrentStatus,
        options: WaitOptions,
    ) -> Result<Value, RpcError> {
        let id = id.into();
        let mut polls = 0;

        loop {
            polls += 1;
            let torrent = torrents(self.get(id.clone()).await?)?
                .into_iter()
                .next()
                .ok_or_else(|| RpcError::TorrentNotFound(id.clone()))?;

            let current = status(&torrent)?;
            if current == target {
                debug!("Torrent {id} reached {target} after {polls} polls");
                return Ok(torrent);
            }
            if options.max_polls.is_some_and(|max| polls >= max) {
                return Err(RpcError::WaitExhausted { id, target, polls });
            }

            debug!("Torrent {id} is {current}, waiting for {target}");
            tokio::time::sleep(options.interval).await;
        }
    }

    // adding torrents

    /// Add a torrent by URL or daemon-local path. Same as [`Self::add_url`].
    pub async fn add(&self, source: &str, options: Arguments) -> Result<AddedTorrent, RpcError> {
        self.add_url(source, options).await
    }

    /// Add a torrent from a URL, magnet link, or a path on the daemon host.
    pub async fn add_url(&self, url: &str, options: Arguments) -> Result<AddedTorrent, RpcError> {
        debug!("Adding torrent from {url}");
        self.add_source("filename", Value::from(url), options).await
    }

    /// Add a torrent from base64 encoded metainfo.
    pub async fn add_base64(
        &self,
        metainfo: &str,
        options: Arguments,
    ) -> Result<AddedTorrent, RpcError> {
        debug!("Adding torrent from metainfo");
        self.add_source("metainfo", Value::from(metainfo), options).await
    }

    /// Add a torrent from a local `.torrent` file, uploading its content.
    pub async fn add_file(
        &self,
        path: impl AsRef<Path>,
        options: Arguments,
    ) -> Result<AddedTorrent, RpcError> {
        let path = path.as_ref();
        debug!("Adding torrent from file: {}", path.display());
        let data = tokio::fs::read(path)
            .await
            .map_err(|source| RpcError::FileSystem {
                path: path.display().to_string(),
                source,
            })?;

        self.add_source("metainfo", Value::from(STANDARD.encode(data)), options)
            .await
    }

    async fn add_source(
        &self,
        key: &str,
        source: Value,
        options: Arguments,
    ) -> Result<AddedTorrent, RpcError> {
        ensure_allowed(FieldSet::TORRENT_ADD, &options)?;

        let mut arguments = Arguments::new();
        arguments.insert(key.into(), source);
        arguments.extend(options);

        let torrent = added_torrent(self.call(method::TORRENT_ADD, arguments).await?)?;
        debug!("Added {torrent:?}");
        Ok(torrent)
    }

    // torrent mutators

    /// Set fields of torrents. Fields outside the `torrent-set` allow-list are rejected
    /// before anything is sent.
    pub async fn set(
        &self,
        ids: impl Into<Ids>,
        options: Arguments,
    ) -> Result<Arguments, RpcError> {
        ensure_allowed(FieldSet::TORRENT_SET, &options)?;

        let mut arguments = with_ids(&ids.into());
        arguments.extend(options);
        debug!("Setting torrent fields {arguments:?}");
        self.call(method::TORRENT_SET, arguments).await
    }

    /// Remove torrents. If `delete_local_data` is true, the downloaded data is deleted too.
    pub async fn remove(
        &self,
        ids: impl Into<Ids>,
        delete_local_data: bool,
    ) -> Result<(), RpcError> {
        let ids = ids.into();
        debug!("Removing torrents {ids:?}, delete_local_data={delete_local_data}");
        let mut arguments = with_ids(&ids);
        arguments.insert("delete-local-data".into(), Value::from(delete_local_data));
        self.call(method::TORRENT_REMOVE, arguments).await?;
        debug!("Remove command sent");
        Ok(())
    }

    /// Point torrents at a new location, moving the data there when `move_data` is true.
    pub async fn set_location(
        &self,
        ids: impl Into<Ids>,
        location: &str,
        move_data: bool,
    ) -> Result<(), RpcError> {
        let ids = ids.into();
        debug!("Moving torrents {ids:?} to {location}, move={move_data}");
        let mut arguments = with_ids(&ids);
        arguments.insert("location".into(), Value::from(location));
        arguments.insert("move".into(), Value::from(move_data));
        self.call(method::TORRENT_SET_LOCATION, arguments).await?;
        Ok(())
    }

    /// Rename a file or directory inside a torrent.
    pub async fn rename(
        &self,
        ids: impl Into<Ids>,
        path: &str,
        name: &str,
    ) -> Result<Arguments, RpcError> {
        let ids = ids.into();
        debug!("Renaming {path} to {name} in torrents {ids:?}");
        let mut arguments = with_ids(&ids);
        arguments.insert("path".into(), Value::from(path));
        arguments.insert("name".into(), Value::from(name));
        self.call(method::TORRENT_RENAME_PATH, arguments).await
    }

    /// Start torrents.
    pub async fn start(&self, ids: impl Into<Ids>) -> Result<(), RpcError> {
        self.action(method::TORRENT_START, ids.into()).await
    }

    /// Start every torrent.
    pub async fn start_all(&self) -> Result<(), RpcError> {
        self.action(method::TORRENT_START, Ids::All).await
    }

    /// Start torrents, bypassing the download queue.
    pub async fn start_now(&self, ids: impl Into<Ids>) -> Result<(), RpcError> {
        self.action(method::TORRENT_START_NOW, ids.into()).await
    }

    /// Stop torrents.
    pub async fn stop(&self, ids: impl Into<Ids>) -> Result<(), RpcError> {
        self.action(method::TORRENT_STOP, ids.into()).await
    }

    /// Stop every torrent.
    pub async fn stop_all(&self) -> Result<(), RpcError> {
        self.action(method::TORRENT_STOP, Ids::All).await
    }

    /// Verify the local data of torrents.
    pub async fn verify(&self, ids: impl Into<Ids>) -> Result<(), RpcError> {
        self.action(method::TORRENT_VERIFY, ids.into()).await
    }

    /// Ask the trackers of torrents for more peers.
    pub async fn reannounce(&self, ids: impl Into<Ids>) -> Result<(), RpcError> {
        self.action(method::TORRENT_REANNOUNCE, ids.into()).await
    }

    async fn action(&self, method: &'static str, ids: Ids) -> Result<(), RpcError> {
        debug!("Sending {method} for torrents {ids:?}");
        self.call(method, with_ids(&ids)).await?;
        debug!("{method} command sent");
        Ok(())
    }

    // session

    /// Get the session settings.
    pub async fn session_get(&self) -> Result<Arguments, RpcError> {
        debug!("Getting session settings");
        self.call(method::SESSION_GET, Arguments::new()).await
    }

    /// Change session settings. Fields outside the `session-set` allow-list are rejected
    /// before anything is sent.
    pub async fn session_set(&self, settings: Arguments) -> Result<Arguments, RpcError> {
        ensure_allowed(FieldSet::SESSION_SET, &settings)?;
        debug!("Setting session settings {settings:?}");
        self.call(method::SESSION_SET, settings).await
    }

    /// Get session statistics.
    pub async fn session_stats(&self) -> Result<SessionStats, RpcError> {
        debug!("Getting session statistics");
        let stats = typed(self.call(method::SESSION_STATS, Arguments::new()).await?)?;
        debug!("Session statistics: {stats:?}");
        Ok(stats)
    }

    /// Get the free space at `path` on the daemon host.
    pub async fn free_space(&self, path: &str) -> Result<FreeSpace, RpcError> {
        debug!("Getting free space at {path}");
        let mut arguments = Arguments::new();
        arguments.insert("path".into(), Value::from(path));
        typed(self.call(method::FREE_SPACE, arguments).await?)
    }

    /// Check whether the peer port is reachable from the outside.
    pub async fn port_test(&self) -> Result<PortTest, RpcError> {
        debug!("Testing peer port");
        typed(self.call(method::PORT_TEST, Arguments::new()).await?)
    }

    /// Reload the blocklist from its configured URL.
    pub async fn blocklist_update(&self) -> Result<BlocklistUpdate, RpcError> {
        debug!("Updating blocklist");
        typed(self.call(method::BLOCKLIST_UPDATE, Arguments::new()).await?)
    }
}

/// Arguments holding only `ids`, empty when the operation targets every torrent.
fn with_ids(ids: &Ids) -> Arguments {
    let mut arguments = Arguments::new();
    if let Some(ids) = ids.to_value() {
        arguments.insert("ids".into(), ids);
    }
    arguments
}

/// Arguments of a `torrent-get` query for `fields`.
fn query(fields: &[&str], ids: &Ids) -> Arguments {
    let mut arguments = with_ids(ids);
    arguments.insert("fields".into(), Value::from(fields.to_vec()));
    arguments
}

use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use transmission_rpc_client::ClientConfig;
use transmission_rpc_types::{Arguments, Ids, RpcError, TorrentId, TorrentStatus};

/// Top-level CLI struct for the binary.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub(crate) struct Cli {
    /// RPC URL of the daemon. Falls back to TRANSMISSION_RPC_URL, then to the local daemon.
    #[arg(short, long)]
    pub(crate) url: Option<String>,

    /// Basic auth user name (overrides TRANSMISSION_USERNAME).
    #[arg(long)]
    pub(crate) username: Option<String>,

    /// Basic auth password (overrides TRANSMISSION_PASSWORD).
    #[arg(long)]
    pub(crate) password: Option<String>,

    /// How many times a request is re-sent after a session id challenge (at least 1).
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub(crate) max_session_retries: Option<u32>,

    #[command(subcommand)]
    pub(crate) command: Command,
}

impl Cli {
    /// Resolve the client configuration: flags first, then the environment.
    pub(crate) fn client_config(&self) -> Result<ClientConfig, RpcError> {
        let mut config = match &self.url {
            Some(url) => ClientConfig::from_url(url)?,
            None => ClientConfig::from_env()?,
        };
        if let Some(username) = &self.username {
            config.username = Some(username.clone());
        }
        if let Some(password) = &self.password {
            config.password = Some(password.clone());
        }
        if let Some(retries) = self.max_session_retries {
            config.max_session_retries = retries;
        }
        Ok(config)
    }
}

/// Daemon operations.
#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// List torrents with the default fields.
    List {
        /// Only recently active torrents.
        #[arg(long)]
        active: bool,
    },
    /// Get torrents by id or hash. Without ids, every torrent.
    Get { ids: Vec<String> },
    /// Get the progress fields of torrents.
    Fast { ids: Vec<String> },
    /// Get the peers of torrents.
    Peers { ids: Vec<String> },
    /// Get the files of torrents.
    Files { ids: Vec<String> },
    /// Add a torrent from a URL, magnet link or path.
    Add {
        /// URL, magnet link, or path on the daemon host.
        source: String,

        /// Read `source` locally and upload its content.
        #[arg(long)]
        upload: bool,

        /// Directory to download to.
        #[arg(long)]
        download_dir: Option<String>,

        /// Add without starting.
        #[arg(long)]
        paused: bool,
    },
    /// Start torrents.
    Start(Targets),
    /// Start torrents, bypassing the queue.
    StartNow {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Stop torrents.
    Stop(Targets),
    /// Verify local data of torrents.
    Verify(Targets),
    /// Ask trackers for more peers.
    Reannounce(Targets),
    /// Remove torrents.
    Remove {
        #[arg(required = true)]
        ids: Vec<String>,

        /// Delete downloaded data too.
        #[arg(long)]
        delete_local_data: bool,
    },
    /// Change the location of torrents.
    Move {
        #[arg(required = true)]
        ids: Vec<String>,

        /// New location on the daemon host.
        #[arg(long)]
        location: String,

        /// Only point at the new location, don't move the data.
        #[arg(long)]
        no_move: bool,
    },
    /// Rename a file or directory inside a torrent.
    Rename {
        id: String,
        /// Current path inside the torrent.
        path: String,
        /// New name.
        name: String,
    },
    /// Set torrent fields, given as key=value with JSON values.
    Set {
        #[arg(required = true)]
        ids: Vec<String>,

        /// A field to set, e.g. `--field uploadLimit=100`.
        #[arg(long = "field", value_parser = parse_key_value, required = true)]
        fields: Vec<(String, Value)>,
    },
    /// Poll a torrent until it reaches a status.
    Wait {
        id: String,

        /// Status name, e.g. `seed` or `stopped`.
        status: TorrentStatus,

        /// Delay between polls in milliseconds.
        #[arg(long, default_value_t = 1000)]
        interval_ms: u64,

        /// Give up after this many polls.
        #[arg(long)]
        max_polls: Option<u32>,
    },
    /// Show session settings.
    Session,
    /// Change session settings, given as key=value with JSON values.
    SetSession {
        #[arg(value_parser = parse_key_value, required = true)]
        settings: Vec<(String, Value)>,
    },
    /// Show session statistics.
    Stats,
    /// Show free space at a path on the daemon host.
    FreeSpace { path: String },
    /// Check whether the peer port is open.
    PortTest,
    /// Update the blocklist.
    BlocklistUpdate,
}

/// Torrents an action applies to.
#[derive(Debug, Clone, Args)]
pub(crate) struct Targets {
    /// Torrent ids or hashes.
    #[arg(required_unless_present = "all")]
    pub(crate) ids: Vec<String>,

    /// Every torrent.
    #[arg(long, conflicts_with = "ids")]
    pub(crate) all: bool,
}

impl Targets {
    pub(crate) fn ids(&self) -> Ids {
        if self.all { Ids::All } else { ids(&self.ids) }
    }
}

/// Numeric arguments are session ids, anything else a hash. No arguments means every torrent.
pub(crate) fn ids(raw: &[String]) -> Ids {
    if raw.is_empty() {
        return Ids::All;
    }
    Ids::List(raw.iter().map(|id| torrent_id(id)).collect())
}

pub(crate) fn torrent_id(raw: &str) -> TorrentId {
    raw.parse::<i64>()
        .map(TorrentId::Id)
        .unwrap_or_else(|_| TorrentId::from(raw))
}

/// Collect `key=value` pairs into an arguments object.
pub(crate) fn arguments(pairs: Vec<(String, Value)>) -> Arguments {
    pairs.into_iter().collect()
}

/// Parse `key=value`, reading the value as JSON and falling back to a plain string.
fn parse_key_value(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got `{raw}`"))?;
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::from(value));
    Ok((key.to_owned(), value))
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use serde_json::json;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn ids_split_numbers_and_hashes() {
        let raw = vec!["3".to_owned(), "deadbeef".to_owned()];
        assert_eq!(
            ids(&raw),
            Ids::List(vec![TorrentId::Id(3), TorrentId::from("deadbeef")])
        );
        assert_eq!(ids(&[]), Ids::All);
    }

    #[test]
    fn key_values_parse_as_json() {
        assert_eq!(
            parse_key_value("uploadLimit=100").unwrap(),
            ("uploadLimit".to_owned(), json!(100))
        );
        assert_eq!(
            parse_key_value("download-dir=/data").unwrap(),
            ("download-dir".to_owned(), json!("/data"))
        );
        assert!(parse_key_value("nonsense").is_err());
    }

    #[test]
    fn targets_all_flag() {
        let cli = Cli::try_parse_from(["transmission-remote", "stop", "--all"]).unwrap();
        match cli.command {
            Command::Stop(targets) => assert_eq!(targets.ids(), Ids::All),
            other => panic!("Expected Stop, got {other:?}"),
        }
        assert!(Cli::try_parse_from(["transmission-remote", "stop"]).is_err());
    }

    #[test]
    fn url_flag_wins() {
        let cli = Cli::try_parse_from([
            "transmission-remote",
            "--url",
            "http://seedbox:9091/transmission/rpc",
            "--username",
            "alice",
            "stats",
        ])
        .unwrap();
        let config = cli.client_config().unwrap();
        assert_eq!(config.host, "seedbox");
        assert_eq!(config.username.as_deref(), Some("alice"));
    }

    #[test]
    fn zero_session_retries_is_refused() {
        assert!(
            Cli::try_parse_from(["transmission-remote", "--max-session-retries", "0", "stats"])
                .is_err()
        );
        let cli =
            Cli::try_parse_from(["transmission-remote", "--max-session-retries", "1", "stats"])
                .unwrap();
        assert_eq!(cli.max_session_retries, Some(1));
    }
}

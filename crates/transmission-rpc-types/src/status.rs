//! Torrent activity status as reported in the `status` field.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::RpcError;

/// Torrent status codes, in the daemon's numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum TorrentStatus {
    /// Torrent is stopped.
    Stopped = 0,
    /// Queued to check files.
    CheckWait = 1,
    /// Checking files.
    Check = 2,
    /// Queued to download.
    DownloadWait = 3,
    /// Downloading.
    Download = 4,
    /// Queued to seed.
    SeedWait = 5,
    /// Seeding.
    Seed = 6,
    /// No connection to any peer.
    Isolated = 7,
}

impl TorrentStatus {
    /// All statuses, indexed by their code.
    pub const ALL: [Self; 8] = [
        Self::Stopped,
        Self::CheckWait,
        Self::Check,
        Self::DownloadWait,
        Self::Download,
        Self::SeedWait,
        Self::Seed,
        Self::Isolated,
    ];

    /// The upper-case name used by the daemon's clients, e.g. `SEED_WAIT`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Stopped => "STOPPED",
            Self::CheckWait => "CHECK_WAIT",
            Self::Check => "CHECK",
            Self::DownloadWait => "DOWNLOAD_WAIT",
            Self::Download => "DOWNLOAD",
            Self::SeedWait => "SEED_WAIT",
            Self::Seed => "SEED",
            Self::Isolated => "ISOLATED",
        }
    }
}

impl fmt::Display for TorrentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<i64> for TorrentStatus {
    type Error = RpcError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        usize::try_from(code)
            .ok()
            .and_then(|index| Self::ALL.get(index).copied())
            .ok_or_else(|| RpcError::UnexpectedResponse(format!("unknown torrent status {code}")))
    }
}

impl From<TorrentStatus> for i64 {
    fn from(status: TorrentStatus) -> Self {
        status as i64
    }
}

impl FromStr for TorrentStatus {
    type Err = RpcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('-', "_").to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|status| status.name() == wanted)
            .ok_or_else(|| RpcError::UnexpectedResponse(format!("unknown torrent status `{s}`")))
    }
}

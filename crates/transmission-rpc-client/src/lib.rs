//! # Transmission RPC client.
//!
//! usage:
//!
//! ```rust,ignore
//! use transmission_rpc_client::{ClientConfig, TransmissionClient};
//! use transmission_rpc_types::Arguments;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::from_url("http://localhost:9091/transmission/rpc")?;
//!     let client = TransmissionClient::new(&config)?;
//!     let torrent = client.add_file("path/to/file.torrent", Arguments::new()).await?;
//!     println!("Added torrent: {:?}", torrent);
//!     client.stop(torrent.id).await?;
//!     Ok(())
//! }
//! ```
//!
//! The daemon hands out a session id through a `409 Conflict` answer; [`RpcSession`]
//! stores it and re-sends the request, so the handshake never reaches the caller.

pub mod client;
pub mod config;
mod conversions;
pub mod session;
pub mod transport;

#[cfg(test)]
mod testutil;

// Only used by the integration tests and through test-log.
#[cfg(test)]
use axum as _;
#[cfg(test)]
use tracing_subscriber as _;

pub use client::{TransmissionClient, WaitOptions};
pub use config::{ClientConfig, DEFAULT_RPC_URL};
pub use session::RpcSession;
pub use transport::{HttpRequest, HttpResponse, HttpTransport, Transport};

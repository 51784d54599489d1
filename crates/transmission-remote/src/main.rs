//! # Transmission Remote
//!
//! Drive a Transmission daemon from the command line. Results are printed as JSON.
//!
//! ## Usage
//!
//! ```sh,ignore
//! TRANSMISSION_RPC_URL=http://localhost:9091/transmission/rpc \
//!     cargo run --release -p transmission-remote -- list
//! cargo run -p transmission-remote -- add 'magnet:?xt=urn:btih:...' --paused
//! cargo run -p transmission-remote -- wait 3 seed --max-polls 600
//! ```

mod cli;

use std::time::Duration;

use clap::Parser;
use serde_json::{Value, json};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use transmission_rpc_client::{TransmissionClient, WaitOptions};
use transmission_rpc_types::{Arguments, RpcError};

use crate::cli::{Cli, Command, arguments, ids, torrent_id};

/// Initializes the tracing subscriber. Logs go to stderr, results to stdout.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Run one command against the daemon and return what should be printed.
async fn run(client: &TransmissionClient, command: Command) -> Result<Value, RpcError> {
    let output = match command {
        Command::List { active: false } => Value::Object(client.all().await?),
        Command::List { active: true } => Value::Object(client.active().await?),
        Command::Get { ids: raw } => Value::Object(client.get(ids(&raw)).await?),
        Command::Fast { ids: raw } => Value::Array(client.fast(ids(&raw)).await?),
        Command::Peers { ids: raw } => Value::Array(client.peers(ids(&raw)).await?),
        Command::Files { ids: raw } => Value::Array(client.files(ids(&raw)).await?),
        Command::Add {
            source,
            upload,
            download_dir,
            paused,
        } => {
            let mut options = Arguments::new();
            if let Some(dir) = download_dir {
                options.insert("download-dir".into(), Value::from(dir));
            }
            if paused {
                options.insert("paused".into(), Value::from(true));
            }
            let torrent = if upload {
                client.add_file(&source, options).await?
            } else {
                client.add(&source, options).await?
            };
            json!({ "duplicate": torrent.duplicate, "torrent": torrent })
        }
        Command::Start(targets) => {
            client.start(targets.ids()).await?;
            Value::Null
        }
        Command::StartNow { ids: raw } => {
            client.start_now(ids(&raw)).await?;
            Value::Null
        }
        Command::Stop(targets) => {
            client.stop(targets.ids()).await?;
            Value::Null
        }
        Command::Verify(targets) => {
            client.verify(targets.ids()).await?;
            Value::Null
        }
        Command::Reannounce(targets) => {
            client.reannounce(targets.ids()).await?;
            Value::Null
        }
        Command::Remove {
            ids: raw,
            delete_local_data,
        } => {
            client.remove(ids(&raw), delete_local_data).await?;
            Value::Null
        }
        Command::Move {
            ids: raw,
            location,
            no_move,
        } => {
            client.set_location(ids(&raw), &location, !no_move).await?;
            Value::Null
        }
        Command::Rename { id, path, name } => {
            Value::Object(client.rename(torrent_id(&id), &path, &name).await?)
        }
        Command::Set { ids: raw, fields } => {
            Value::Object(client.set(ids(&raw), arguments(fields)).await?)
        }
        Command::Wait {
            id,
            status,
            interval_ms,
            max_polls,
        } => {
            let options = WaitOptions {
                interval: Duration::from_millis(interval_ms),
                max_polls,
            };
            client
                .wait_for_status(torrent_id(&id), status, options)
                .await?
        }
        Command::Session => Value::Object(client.session_get().await?),
        Command::SetSession { settings } => {
            Value::Object(client.session_set(arguments(settings)).await?)
        }
        Command::Stats => to_output(client.session_stats().await?)?,
        Command::FreeSpace { path } => to_output(client.free_space(&path).await?)?,
        Command::PortTest => to_output(client.port_test().await?)?,
        Command::BlocklistUpdate => to_output(client.blocklist_update().await?)?,
    };
    Ok(output)
}

fn to_output(value: impl serde::Serialize) -> Result<Value, RpcError> {
    serde_json::to_value(value).map_err(RpcError::Encode)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();
    let config = cli.client_config()?;
    debug!("Connecting to {}", config.rpc_url()?);

    let client = TransmissionClient::new(&config)?;
    let output = run(&client, cli.command).await?;

    if !output.is_null() {
        println!("{}", serde_json::to_string_pretty(&output)?);
    }
    Ok(())
}

//! # Deluge CLI
//!
//! ## Usage
//!
//! ```sh,ignore
//! DELUGE_PASSWORD=deluge cargo run --release --bin deluge -- list --status
//! cargo run --release --bin deluge -- --host http://nas.local:8112 add-magnet 'magnet:?...'
//! ```

use std::collections::HashMap;

use clap::Parser;
use deluge_rpc_client::{DelugeClient, DelugeConfig};
use deluge_rpc_types::{AddTorrentOptions, Torrent, TorrentClient};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{Cli, Command};

/// Initializes the tracing subscriber.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Prints a torrent's latest status snapshot as pretty JSON.
fn print_status(torrent: &Torrent<'_, DelugeClient>) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(status) = torrent.status() {
        println!("{}", serde_json::to_string_pretty(status)?);
    }
    Ok(())
}

async fn run(client: &DelugeClient, command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Methods => {
            for method in client.methods() {
                println!("{method}");
            }
        }
        Command::List { status } => {
            let torrents = client.list_torrents().await?;
            debug!("Session holds {} torrents", torrents.len());
            for mut torrent in torrents {
                if status {
                    torrent.fetch_status().await?;
                    print_status(&torrent)?;
                } else {
                    println!("{}", torrent.id());
                }
            }
        }
        Command::Status { id, fields } => {
            let keys: Vec<&str> = fields.iter().map(String::as_str).collect();
            let mut torrent = client.torrent(id);
            torrent.fetch_status_fields(&keys).await?;
            print_status(&torrent)?;
        }
        Command::AddMagnet { uri, options } => {
            let torrent = client.add_torrent_magnet(&uri, &options.into()).await?;
            info!("Added torrent {}", torrent.id());
            println!("{}", torrent.id());
        }
        Command::AddUrl {
            url,
            headers,
            options,
        } => {
            let headers: HashMap<String, String> = headers.into_iter().collect();
            let headers = (!headers.is_empty()).then_some(&headers);
            let options: AddTorrentOptions = options.into();
            let torrent = client.add_torrent_url(&url, headers, &options).await?;
            info!("Added torrent {}", torrent.id());
            println!("{}", torrent.id());
        }
        Command::AddFile { path, options } => {
            let torrent = client.add_torrent_file([path], &options.into()).await?;
            info!("Added torrent {}", torrent.id());
            println!("{}", torrent.id());
        }
        Command::Pause { id } => {
            let mut torrent = client.torrent(id);
            torrent.pause().await?;
            print_status(&torrent)?;
        }
        Command::Resume { id } => {
            let mut torrent = client.torrent(id);
            torrent.resume().await?;
            print_status(&torrent)?;
        }
        Command::Remove { id, remove_data } => {
            client.remove_torrent(&id, remove_data).await?;
            info!("Removed torrent {id}");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();
    let config = cli.apply(DelugeConfig::from_env());
    debug!("Using {config:?}");

    let client = DelugeClient::connect(&config).await?;
    run(&client, cli.command).await
}

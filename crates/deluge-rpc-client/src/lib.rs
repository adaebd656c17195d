//! # Deluge client using the Web UI JSON-RPC interface.
//!
//! usage:
//!
//! ```rust,ignore
//! use deluge_rpc_client::{DelugeClient, DelugeConfig};
//! use deluge_rpc_types::{AddTorrentOptions, TorrentClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DelugeConfig::new("http://localhost:8112", "deluge");
//!     let client = DelugeClient::connect(&config).await?;
//!     let mut torrent = client
//!         .add_torrent_magnet(
//!             "magnet:?xt=urn:btih:375ae3280cd80a8e9d7212e11dfaf7c45069dd35",
//!             &AddTorrentOptions::new().add_paused(true),
//!         )
//!         .await?;
//!     torrent.resume().await?;
//!     println!("Added torrent: {:?}", torrent.status());
//!     Ok(())
//! }
//! ```
//!

mod client;
mod config;
mod envelope;
#[cfg(test)]
mod testutil;
mod transport;

pub use client::DelugeClient;
pub use config::{DEFAULT_HOST, DEFAULT_TIMEOUT, DelugeConfig, ResultCheck};
pub use transport::HttpTransport;

// Only exercised by the integration tests.
#[cfg(test)]
use {mockito as _, test_log as _, tracing_subscriber as _};

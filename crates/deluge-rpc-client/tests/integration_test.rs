//! Integration test for DelugeClient with a chained sequence:
//! connect -> add -> list -> status -> pause/resume -> remove.
//! Requires a running Deluge Web UI and environment configuration:
//! - DELUGE_HOST (default: http://localhost:8112)
//! - DELUGE_PASSWORD (default: deluge)
//!
//! Run with `cargo test -- --ignored`.

#![allow(unused_crate_dependencies)]

use std::env;

use deluge_rpc_client::{DelugeClient, DelugeConfig};
use deluge_rpc_types::{AddTorrentOptions, TorrentClient};

const MAGNET: &str = "magnet:?xt=urn:btih:375ae3280cd80a8e9d7212e11dfaf7c45069dd35&dn=archlinux";

fn config() -> DelugeConfig {
    let mut config = DelugeConfig::from_env();
    if env::var("DELUGE_PASSWORD").is_err() {
        config.password = "deluge".into();
    }
    config
}

#[tokio::test]
#[test_log::test]
#[ignore = "requires a running Deluge Web UI"]
async fn deluge_client_chained_flow() {
    // Arrange client
    let client = DelugeClient::connect(&config())
        .await
        .expect("failed to connect to Deluge");
    let methods = client.methods();
    assert!(methods.iter().any(|m| m == "core.add_torrent_magnet"));

    // 1. Add a paused torrent
    let download_dir = tempfile::tempdir().expect("failed to create download dir");
    let options = AddTorrentOptions::new()
        .add_paused(true)
        .name("test-magnet")
        .download_location(download_dir.path().to_string_lossy());
    let mut added = client
        .add_torrent_magnet(MAGNET, &options)
        .await
        .expect("failed to add torrent");

    // 2. It shows up in the session
    let list = client
        .list_torrents()
        .await
        .expect("failed to list torrents");
    assert!(
        list.iter().any(|t| t.id() == added.id()),
        "added torrent not listed"
    );

    // 3. Status reflects the paused add
    added.fetch_status().await.expect("failed to fetch status");
    assert_eq!(added.is_paused(), Some(true));

    // 4. Resume, then pause again
    added.resume().await.expect("failed to resume torrent");
    assert_eq!(added.is_paused(), Some(false));
    added.pause().await.expect("failed to pause torrent");
    assert_eq!(added.is_paused(), Some(true));

    // 5. Remove with its data
    let id = added.id().to_string();
    added.remove(true).await.expect("failed to remove torrent");

    // 6. Ensure our torrent is gone
    let final_list = client
        .list_torrents()
        .await
        .expect("failed to list torrents");
    assert!(
        !final_list.iter().any(|t| t.id() == id),
        "torrent was not removed"
    );
}

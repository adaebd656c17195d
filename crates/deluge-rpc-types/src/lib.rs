//! # Deluge RPC Types
//!
//! This crate defines the common types and traits shared by Deluge JSON-RPC clients: the error
//! type, the torrent status record, the options accepted when adding a torrent, and the
//! [`Torrent`] handle that forwards its operations to a [`TorrentClient`].

use std::{collections::HashMap, path::Path};

use thiserror::Error;

mod options;
mod status;
mod torrent;

pub use options::AddTorrentOptions;
pub use status::TorrentStatus;
pub use torrent::Torrent;

/// Error type for Deluge RPC operations.
#[derive(Error, Debug)]
pub enum DelugeError {
    /// The daemon rejected the password passed to `auth.login`.
    #[error("failed to authenticate: the daemon rejected the password")]
    Authentication,

    /// The daemon answered with an error object.
    #[error("remote error (code {code}): {message}")]
    Remote {
        /// Error code reported by the daemon.
        code: i64,
        /// Error message reported by the daemon.
        message: String,
    },

    /// Reading a local torrent file failed.
    #[error("file system error: {0}")]
    Io(#[from] std::io::Error),

    /// Network-related errors (connection failures, timeouts, etc.)
    #[error("network error: {0}")]
    Network(String),

    /// The daemon answered with something that is not a JSON-RPC response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The configured host is not a usable URL.
    #[error("invalid host url: {0}")]
    InvalidUrl(String),
}

/// The operations a torrent daemon client exposes.
///
/// Operations that create or reference a torrent hand back a [`Torrent`] borrowing the client,
/// so that follow-up queries and mutations go through the same session.
#[allow(async_fn_in_trait)]
pub trait TorrentClient: Sized {
    /// Add a torrent from a magnet URI.
    async fn add_torrent_magnet(
        &self,
        uri: &str,
        options: &AddTorrentOptions,
    ) -> Result<Torrent<'_, Self>, DelugeError>;

    /// Add a torrent from a URL the daemon downloads itself. `headers` are forwarded with the
    /// daemon's download request.
    async fn add_torrent_url(
        &self,
        url: &str,
        headers: Option<&HashMap<String, String>>,
        options: &AddTorrentOptions,
    ) -> Result<Torrent<'_, Self>, DelugeError>;

    /// Add a torrent from a local `.torrent` file. The path segments are joined into one path
    /// and the file is uploaded as part of the request.
    async fn add_torrent_file<I, S>(
        &self,
        path_segments: I,
        options: &AddTorrentOptions,
    ) -> Result<Torrent<'_, Self>, DelugeError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<Path>;

    /// Remove a torrent. If `remove_data` is true, the downloaded data is deleted as well.
    async fn remove_torrent(&self, id: &str, remove_data: bool) -> Result<(), DelugeError>;

    /// Pause a torrent.
    async fn pause_torrent(&self, id: &str) -> Result<(), DelugeError>;

    /// Resume a paused torrent.
    async fn resume_torrent(&self, id: &str) -> Result<(), DelugeError>;

    /// List all torrents known to the session.
    async fn list_torrents(&self) -> Result<Vec<Torrent<'_, Self>>, DelugeError>;

    /// Get the status of a torrent. An empty `keys` slice requests every field.
    async fn torrent_status(&self, id: &str, keys: &[&str]) -> Result<TorrentStatus, DelugeError>;
}

#[cfg(test)]
mod tests {
    use super::DelugeError;

    #[test]
    fn remote_error_display_carries_code_and_message() {
        let err = DelugeError::Remote {
            code: 2,
            message: "Torrent already in session".into(),
        };
        assert_eq!(
            err.to_string(),
            "remote error (code 2): Torrent already in session"
        );
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.torrent");
        let err: DelugeError = io.into();
        assert!(matches!(err, DelugeError::Io(_)));
    }
}

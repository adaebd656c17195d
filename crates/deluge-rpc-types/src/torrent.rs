//! Handle to a single torrent held by the daemon.

use std::fmt;

use tracing::debug;

use crate::{DelugeError, TorrentClient, TorrentStatus};

/// A reference to one torrent in the daemon's session.
///
/// The handle borrows the client that produced it and forwards every query and mutation
/// through it. The status it carries is only as fresh as the last fetch.
pub struct Torrent<'a, C> {
    client: &'a C,
    id: String,
    status: Option<TorrentStatus>,
}

impl<C> fmt::Debug for Torrent<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Torrent")
            .field("id", &self.id)
            .field("status", &self.status)
            .finish()
    }
}

impl<'a, C: TorrentClient> Torrent<'a, C> {
    /// Wraps a torrent ID issued by the daemon.
    pub fn new(client: &'a C, id: impl Into<String>) -> Self {
        Self {
            client,
            id: id.into(),
            status: None,
        }
    }

    /// The daemon's ID for this torrent (its info hash).
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The status from the last fetch, if any.
    pub fn status(&self) -> Option<&TorrentStatus> {
        self.status.as_ref()
    }

    /// Whether the last fetched status reported the torrent as paused. Does not query the
    /// daemon; returns `None` until a status has been fetched.
    pub fn is_paused(&self) -> Option<bool> {
        self.status.as_ref().and_then(TorrentStatus::paused)
    }

    /// Fetches every status field from the daemon and stores it on the handle.
    pub async fn fetch_status(&mut self) -> Result<&TorrentStatus, DelugeError> {
        self.fetch_status_fields(&[]).await
    }

    /// Fetches only the given status fields and stores them on the handle, replacing the
    /// previous snapshot.
    pub async fn fetch_status_fields(
        &mut self,
        keys: &[&str],
    ) -> Result<&TorrentStatus, DelugeError> {
        debug!("Refreshing status of torrent {}", self.id);
        let status = self.client.torrent_status(&self.id, keys).await?;
        Ok(&*self.status.insert(status))
    }

    /// Pauses the torrent and refreshes its status.
    pub async fn pause(&mut self) -> Result<(), DelugeError> {
        self.client.pause_torrent(&self.id).await?;
        self.fetch_status().await?;
        Ok(())
    }

    /// Resumes the torrent and refreshes its status.
    pub async fn resume(&mut self) -> Result<(), DelugeError> {
        self.client.resume_torrent(&self.id).await?;
        self.fetch_status().await?;
        Ok(())
    }

    /// Removes the torrent from the session, consuming the handle.
    pub async fn remove(self, remove_data: bool) -> Result<(), DelugeError> {
        self.client.remove_torrent(&self.id, remove_data).await
    }
}

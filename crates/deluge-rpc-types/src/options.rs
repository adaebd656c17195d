//! Options passed to the daemon when a torrent is added.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Per-torrent options sent along with an add request.
///
/// The daemon accepts an open set of keys; the named setters cover the common ones and
/// [`AddTorrentOptions::set`] passes anything else through unchecked.
///
/// ```
/// use deluge_rpc_types::AddTorrentOptions;
///
/// let options = AddTorrentOptions::new().add_paused(true).name("ubuntu");
/// assert_eq!(options.get("add_paused"), Some(&serde_json::Value::Bool(true)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AddTorrentOptions(Map<String, Value>);

impl AddTorrentOptions {
    /// Empty options, leaving everything to the daemon's defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an arbitrary option.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Add the torrent in the paused state.
    pub fn add_paused(self, paused: bool) -> Self {
        self.set("add_paused", paused)
    }

    /// Override the torrent's name.
    pub fn name(self, name: impl Into<String>) -> Self {
        self.set("name", name.into())
    }

    /// Directory the data is downloaded to.
    pub fn download_location(self, path: impl Into<String>) -> Self {
        self.set("download_location", path.into())
    }

    /// Move the data here once the download completes.
    pub fn move_completed_path(self, path: impl Into<String>) -> Self {
        self.set("move_completed", true)
            .set("move_completed_path", path.into())
    }

    /// Download speed cap in KiB/s. `-1` means unlimited.
    pub fn max_download_speed(self, kib_per_sec: f64) -> Self {
        self.set("max_download_speed", kib_per_sec)
    }

    /// Upload speed cap in KiB/s. `-1` means unlimited.
    pub fn max_upload_speed(self, kib_per_sec: f64) -> Self {
        self.set("max_upload_speed", kib_per_sec)
    }

    #[allow(missing_docs)]
    pub fn sequential_download(self, sequential: bool) -> Self {
        self.set("sequential_download", sequential)
    }

    /// Returns the value set for `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for AddTorrentOptions {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let fields = iter.into_iter().map(|(k, v)| (k.into(), v.into()));
        Self(fields.collect())
    }
}

impl From<AddTorrentOptions> for Value {
    fn from(options: AddTorrentOptions) -> Self {
        Value::Object(options.0)
    }
}

//! Torrent status as reported by `core.get_torrent_status`.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::DelugeError;

/// A point-in-time snapshot of the status fields the daemon reports for one torrent.
///
/// The record is kept exactly as the daemon sent it. The accessors below read the common fields
/// and return `None` when a field is missing or has an unexpected JSON type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TorrentStatus(Map<String, Value>);

impl TorrentStatus {
    /// Every status key the daemon knows about.
    pub const FIELDS: &'static [&'static str] = &[
        "active_time",
        "seeding_time",
        "finished_time",
        "all_time_download",
        "storage_mode",
        "distributed_copies",
        "download_payload_rate",
        "file_priorities",
        "hash",
        "auto_managed",
        "is_auto_managed",
        "is_finished",
        "max_connections",
        "max_download_speed",
        "max_upload_slots",
        "max_upload_speed",
        "message",
        "move_on_completed_path",
        "move_on_completed",
        "move_completed_path",
        "move_completed",
        "next_announce",
        "num_peers",
        "num_seeds",
        "owner",
        "paused",
        "prioritize_first_last",
        "prioritize_first_last_pieces",
        "sequential_download",
        "progress",
        "shared",
        "remove_at_ratio",
        "save_path",
        "download_location",
        "seeds_peers_ratio",
        "seed_rank",
        "state",
        "stop_at_ratio",
        "stop_ratio",
        "time_added",
        "total_done",
        "total_payload_download",
        "total_payload_upload",
        "total_peers",
        "total_seeds",
        "total_uploaded",
        "total_wanted",
        "total_remaining",
        "tracker",
        "tracker_host",
        "trackers",
        "tracker_status",
        "upload_payload_rate",
        "comment",
        "creator",
        "num_files",
        "num_pieces",
        "piece_length",
        "private",
        "total_size",
        "eta",
        "file_progress",
        "files",
        "orig_files",
        "is_seed",
        "peers",
        "queue",
        "ratio",
        "completed_time",
        "last_seen_complete",
        "name",
        "pieces",
        "seed_mode",
        "super_seeding",
        "time_since_download",
        "time_since_upload",
        "time_since_transfer",
    ];

    /// Wraps a raw status map.
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Returns the raw value of a status field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns the raw status map.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consumes the status and returns the raw map.
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// Returns true if the daemon reported no fields at all, which is what it answers for an
    /// unknown torrent ID.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Deserializes the status into a caller-defined record type.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, DelugeError> {
        serde_json::from_value(Value::Object(self.0.clone()))
            .map_err(|e| DelugeError::InvalidResponse(e.to_string()))
    }

    /// Whether the torrent is paused.
    pub fn paused(&self) -> Option<bool> {
        self.get("paused").and_then(Value::as_bool)
    }

    /// Download progress in percent (0.0 to 100.0).
    pub fn progress(&self) -> Option<f64> {
        self.get("progress").and_then(Value::as_f64)
    }

    /// Daemon state string, e.g. `Downloading`, `Seeding`, `Paused`.
    pub fn state(&self) -> Option<&str> {
        self.str_field("state")
    }

    /// Torrent name.
    pub fn name(&self) -> Option<&str> {
        self.str_field("name")
    }

    /// Info hash.
    pub fn hash(&self) -> Option<&str> {
        self.str_field("hash")
    }

    /// Where the torrent's data is stored.
    pub fn save_path(&self) -> Option<&str> {
        self.str_field("save_path")
    }

    #[allow(missing_docs)]
    pub fn is_finished(&self) -> Option<bool> {
        self.get("is_finished").and_then(Value::as_bool)
    }

    #[allow(missing_docs)]
    pub fn is_seed(&self) -> Option<bool> {
        self.get("is_seed").and_then(Value::as_bool)
    }

    /// Payload download rate in bytes per second.
    pub fn download_payload_rate(&self) -> Option<i64> {
        self.int_field("download_payload_rate")
    }

    /// Payload upload rate in bytes per second.
    pub fn upload_payload_rate(&self) -> Option<i64> {
        self.int_field("upload_payload_rate")
    }

    #[allow(missing_docs)]
    pub fn num_peers(&self) -> Option<i64> {
        self.int_field("num_peers")
    }

    #[allow(missing_docs)]
    pub fn num_seeds(&self) -> Option<i64> {
        self.int_field("num_seeds")
    }

    /// Estimated seconds until the download completes.
    pub fn eta(&self) -> Option<i64> {
        self.int_field("eta")
    }

    /// Total size in bytes.
    pub fn total_size(&self) -> Option<i64> {
        self.int_field("total_size")
    }

    /// Share ratio.
    pub fn ratio(&self) -> Option<f64> {
        self.get("ratio").and_then(Value::as_f64)
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    // The daemon is not consistent about sending integral fields as JSON integers.
    fn int_field(&self, key: &str) -> Option<i64> {
        let value = self.get(key)?;
        value.as_i64().or_else(|| value.as_f64().map(|f| f as i64))
    }
}

impl TryFrom<Value> for TorrentStatus {
    type Error = DelugeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(DelugeError::InvalidResponse(format!(
                "expected torrent status object, got {other}"
            ))),
        }
    }
}

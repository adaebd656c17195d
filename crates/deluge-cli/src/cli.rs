use std::{path::PathBuf, time::Duration};

use clap::{Args, Parser, Subcommand};
use deluge_rpc_client::{DelugeConfig, ResultCheck};
use deluge_rpc_types::AddTorrentOptions;

/// Top-level CLI struct for the binary.
///
/// Connection settings default to the `DELUGE_*` environment variables (a `.env` file is read
/// first); flags override them.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub(crate) struct Cli {
    /// Full URL of the Deluge Web UI, e.g. http://localhost:8112.
    #[arg(long)]
    pub(crate) host: Option<String>,

    /// Web UI password.
    #[arg(long)]
    pub(crate) password: Option<String>,

    /// Per-call timeout in seconds, 0 to wait indefinitely.
    #[arg(long)]
    pub(crate) timeout_secs: Option<u64>,

    /// How responses are judged successful: `error-field`, or `truthy` to treat falsy
    /// results as failures the way older clients did.
    #[arg(long)]
    pub(crate) result_check: Option<ResultCheck>,

    #[command(subcommand)]
    pub(crate) command: Command,
}

impl Cli {
    /// Applies the flags given on the command line on top of `config`.
    pub(crate) fn apply(&self, mut config: DelugeConfig) -> DelugeConfig {
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(password) = &self.password {
            config.password = password.clone();
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }
        if let Some(check) = self.result_check {
            config.result_check = check;
        }
        config
    }
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// List the RPC methods the daemon supports.
    Methods,

    /// List the torrents in the session.
    List {
        /// Also fetch and print each torrent's status.
        #[arg(long)]
        status: bool,
    },

    /// Print a torrent's status as JSON.
    Status {
        id: String,

        /// Only fetch these fields. Repeatable.
        #[arg(long = "field")]
        fields: Vec<String>,
    },

    /// Add a torrent from a magnet URI.
    AddMagnet {
        uri: String,

        #[command(flatten)]
        options: CliAddOptions,
    },

    /// Add a torrent from a URL the daemon downloads.
    AddUrl {
        url: String,

        /// Header sent with the daemon's download, as `Name: value`. Repeatable.
        #[arg(long = "header", value_parser = parse_header)]
        headers: Vec<(String, String)>,

        #[command(flatten)]
        options: CliAddOptions,
    },

    /// Add a torrent from a local .torrent file.
    AddFile {
        path: PathBuf,

        #[command(flatten)]
        options: CliAddOptions,
    },

    /// Pause a torrent.
    Pause { id: String },

    /// Resume a torrent.
    Resume { id: String },

    /// Remove a torrent.
    Remove {
        id: String,

        /// Also delete the downloaded data.
        #[arg(long, default_value_t = false)]
        remove_data: bool,
    },
}

/// CLI representation of the options sent when adding a torrent.
#[derive(Debug, Clone, Default, Args)]
pub(crate) struct CliAddOptions {
    /// Add the torrent paused.
    #[arg(long, default_value_t = false)]
    pub(crate) paused: bool,

    /// Override the torrent's name.
    #[arg(long)]
    pub(crate) name: Option<String>,

    /// Download directory.
    #[arg(long)]
    pub(crate) download_location: Option<String>,

    /// Download speed cap in KiB/s.
    #[arg(long)]
    pub(crate) max_download_speed: Option<f64>,

    /// Upload speed cap in KiB/s.
    #[arg(long)]
    pub(crate) max_upload_speed: Option<f64>,
}

impl From<CliAddOptions> for AddTorrentOptions {
    fn from(cli: CliAddOptions) -> Self {
        let mut options = AddTorrentOptions::new();
        if cli.paused {
            options = options.add_paused(true);
        }

        // optional fields
        if let Some(name) = cli.name {
            options = options.name(name);
        }
        if let Some(location) = cli.download_location {
            options = options.download_location(location);
        }
        if let Some(speed) = cli.max_download_speed {
            options = options.max_download_speed(speed);
        }
        if let Some(speed) = cli.max_upload_speed {
            options = options.max_upload_speed(speed);
        }
        options
    }
}

fn parse_header(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once(':')
        .ok_or_else(|| format!("expected 'Name: value', got '{s}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("empty header name in '{s}'"));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn flags_override_config() {
        let cli = Cli::try_parse_from([
            "deluge",
            "--host",
            "https://nas.local:8112",
            "--timeout-secs",
            "0",
            "--result-check",
            "truthy",
            "methods",
        ])
        .unwrap();
        let config = cli.apply(DelugeConfig::new("http://localhost:8112", "env-password"));

        assert_eq!(config.host, "https://nas.local:8112");
        assert_eq!(config.password, "env-password");
        assert_eq!(config.timeout, None);
        assert_eq!(config.result_check, ResultCheck::Truthy);
    }

    #[test]
    fn add_magnet_options() {
        let cli = Cli::try_parse_from([
            "deluge",
            "add-magnet",
            "magnet:?xt=urn:btih:abc",
            "--paused",
            "--name",
            "test-magnet",
            "--max-upload-speed",
            "50",
        ])
        .unwrap();
        let Command::AddMagnet { uri, options } = cli.command else {
            panic!("Expected add-magnet, got {:?}", cli.command);
        };
        assert_eq!(uri, "magnet:?xt=urn:btih:abc");
        assert_eq!(
            serde_json::Value::from(AddTorrentOptions::from(options)),
            json!({"add_paused": true, "name": "test-magnet", "max_upload_speed": 50.0})
        );
    }

    #[test]
    fn add_url_headers() {
        let cli = Cli::try_parse_from([
            "deluge",
            "add-url",
            "https://tracker.example.org/42",
            "--header",
            "Authorization: Bearer t0ken",
        ])
        .unwrap();
        let Command::AddUrl { headers, options, .. } = cli.command else {
            panic!("Expected add-url, got {:?}", cli.command);
        };
        assert_eq!(
            headers,
            vec![("Authorization".to_string(), "Bearer t0ken".to_string())]
        );
        assert!(AddTorrentOptions::from(options).is_empty());
    }

    #[test]
    fn unknown_result_check_is_rejected() {
        let args = ["deluge", "--result-check", "lenient", "methods"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn malformed_header_is_rejected() {
        assert!(parse_header("no-colon").is_err());
        assert!(parse_header(": value").is_err());
    }

    #[test]
    fn remove_defaults_to_keeping_data() {
        let cli = Cli::try_parse_from(["deluge", "remove", "abc123"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Remove { ref id, remove_data: false } if id == "abc123"
        ));
    }
}

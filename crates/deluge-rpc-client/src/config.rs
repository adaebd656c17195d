//! Client configuration.

use std::{env, fmt, str::FromStr, time::Duration};

/// Where the Deluge Web UI listens by default.
pub const DEFAULT_HOST: &str = "http://localhost:8112";

/// How long a single RPC call may take before the transport gives up.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// How a JSON-RPC response is judged successful.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResultCheck {
    /// A response succeeds unless it carries an `error` object. Legitimate results such as
    /// `0`, `false` or `[]` are returned as-is.
    #[default]
    ErrorField,
    /// A response succeeds only if its `result` is truthy. This reports legitimate falsy
    /// results as failures and exists for callers that depend on that behavior.
    Truthy,
}

impl FromStr for ResultCheck {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "error-field" => Ok(Self::ErrorField),
            "truthy" => Ok(Self::Truthy),
            other => Err(format!(
                "unknown result check '{other}', expected 'error-field' or 'truthy'"
            )),
        }
    }
}

/// Configuration for a [`DelugeClient`](crate::DelugeClient).
#[derive(Clone, PartialEq, Eq)]
pub struct DelugeConfig {
    /// Full URL of the Web UI, e.g. `http://example.com:8112`.
    pub host: String,
    /// Web UI password.
    pub password: String,
    /// Per-call timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// How responses are judged successful.
    pub result_check: ResultCheck,
}

impl Default for DelugeConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            password: String::new(),
            timeout: Some(DEFAULT_TIMEOUT),
            result_check: ResultCheck::default(),
        }
    }
}

impl DelugeConfig {
    /// Configuration for `host` with the given password and default settings otherwise.
    pub fn new(host: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            password: password.into(),
            ..Default::default()
        }
    }

    /// Reads the configuration from the environment.
    ///
    /// - `DELUGE_HOST` (default: [`DEFAULT_HOST`])
    /// - `DELUGE_PASSWORD` (default: empty)
    /// - `DELUGE_TIMEOUT_SECS` (default: 30, `0` disables the timeout)
    /// - `DELUGE_RESULT_CHECK`, `error-field` or `truthy` (default: `error-field`)
    ///
    /// Unparseable values fall back to their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let timeout = match lookup("DELUGE_TIMEOUT_SECS").and_then(|s| s.parse::<u64>().ok()) {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => defaults.timeout,
        };

        Self {
            host: lookup("DELUGE_HOST").unwrap_or(defaults.host),
            password: lookup("DELUGE_PASSWORD").unwrap_or(defaults.password),
            timeout,
            result_check: lookup("DELUGE_RESULT_CHECK")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.result_check),
        }
    }
}

impl fmt::Debug for DelugeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print the password.
        write!(
            f,
            "Deluge(host=\"{}\", password=<{}>, timeout={:?}, result_check={:?})",
            self.host,
            if self.password.is_empty() {
                "unset"
            } else {
                "set"
            },
            self.timeout,
            self.result_check,
        )
    }
}

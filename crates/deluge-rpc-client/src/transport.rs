//! Internal trait abstracting how RPC envelopes reach the daemon.
//!
//! This module provides the [`RpcTransport`] trait, which lets the client be driven by a mock in
//! tests, and [`HttpTransport`], which posts envelopes to the Web UI's `/json` endpoint.

use std::{fmt, time::Duration};

use deluge_rpc_types::DelugeError;
use reqwest::header::{CONTENT_TYPE, COOKIE, HOST, ORIGIN, SET_COOKIE, USER_AGENT};
use tracing::debug;
use url::Url;

use crate::envelope::{RpcReply, RpcRequest, RpcResponse, SESSION_COOKIE, session_cookie};

/// The Web UI rejects requests that do not look like they come from a browser.
const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 6.1; Win64; x64; rv:47.0) Gecko/20100101 Firefox/47.0";

/// Internal trait that abstracts sending one envelope and reading the reply.
/// This allows for mocking in tests.
#[cfg_attr(test, mockall::automock)]
#[allow(async_fn_in_trait)]
pub(crate) trait RpcTransport {
    /// Sends `request`, attaching `session_id` as the session cookie when present.
    async fn send(
        &self,
        request: RpcRequest,
        session_id: Option<String>,
    ) -> Result<RpcReply, DelugeError>;
}

/// Posts JSON-RPC envelopes to `{host}/json` over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    endpoint: Url,
    origin: String,
    authority: String,
}

impl HttpTransport {
    /// Creates a transport for the Web UI at `host`, e.g. `https://example.com:8112`.
    /// No connection is made until the first call.
    pub fn try_new(host: &str, timeout: Option<Duration>) -> Result<Self, DelugeError> {
        let origin = host.trim_end_matches('/').to_string();
        let base = Url::parse(&origin).map_err(|e| invalid_url(host, e))?;
        if !matches!(base.scheme(), "http" | "https") {
            let reason = format!("unsupported scheme '{}'", base.scheme());
            return Err(invalid_url(host, reason));
        }
        let authority = match (base.host_str(), base.port()) {
            (Some(h), Some(port)) => format!("{h}:{port}"),
            (Some(h), None) => h.to_string(),
            (None, _) => return Err(invalid_url(host, "missing host")),
        };
        let endpoint = Url::parse(&format!("{origin}/json")).map_err(|e| invalid_url(host, e))?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(map_http_error)?;

        Ok(Self {
            http,
            endpoint,
            origin,
            authority,
        })
    }
}

impl RpcTransport for HttpTransport {
    async fn send(
        &self,
        request: RpcRequest,
        session_id: Option<String>,
    ) -> Result<RpcReply, DelugeError> {
        debug!(
            "POST {} id={} method={}",
            self.endpoint, request.id, request.method
        );
        let mut builder = self
            .http
            .post(self.endpoint.clone())
            .header(HOST, &self.authority)
            .header(ORIGIN, &self.origin)
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .header(CONTENT_TYPE, "application/json")
            .json(&request);
        if let Some(session_id) = session_id {
            builder = builder.header(COOKIE, format!("{SESSION_COOKIE}={session_id}"));
        }

        let response = builder.send().await.map_err(map_http_error)?;
        let status = response.status();
        let session_id = session_cookie(
            response
                .headers()
                .get_all(SET_COOKIE)
                .iter()
                .filter_map(|value| value.to_str().ok()),
        );
        let body = response.bytes().await.map_err(map_http_error)?;
        let response = serde_json::from_slice::<RpcResponse>(&body)
            .map_err(|e| DelugeError::InvalidResponse(format!("HTTP {status}: {e}")))?;

        Ok(RpcReply {
            response,
            session_id,
        })
    }
}

/// Maps transport failures to Deluge errors.
fn map_http_error(err: reqwest::Error) -> DelugeError {
    DelugeError::Network(err.to_string())
}

fn invalid_url(host: &str, reason: impl fmt::Display) -> DelugeError {
    DelugeError::InvalidUrl(format!("{host}: {reason}"))
}

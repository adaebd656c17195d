//! Deluge Web UI JSON-RPC client implementation.

use std::{
    collections::HashMap,
    fmt, io,
    path::{Path, PathBuf},
    sync::{
        PoisonError, RwLock,
        atomic::{AtomicU64, Ordering},
    },
};

use base64::prelude::*;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use deluge_rpc_types::{AddTorrentOptions, DelugeError, Torrent, TorrentClient, TorrentStatus};

use crate::config::{DelugeConfig, ResultCheck};
use crate::envelope::{RpcReply, RpcRequest, is_truthy};
use crate::transport::{HttpTransport, RpcTransport};


/// DelugeClient talks to a single Deluge daemon through its Web UI JSON-RPC endpoint.
///
/// The call counter and the session token live behind an atomic and a lock, so a client can be
/// shared by reference; each call still runs to completion before it returns.
#[allow(private_bounds)]
pub struct DelugeClient<T: RpcTransport = HttpTransport> {
    transport: T,
    host: String,
    result_check: ResultCheck,
    call_id: AtomicU64,
    session_id: RwLock<Option<String>>,
    methods: Vec<String>,
}

#[allow(private_bounds)]
impl<T: RpcTransport> fmt::Debug for DelugeClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print the session token.
        f.debug_struct("DelugeClient")
            .field("host", &self.host)
            .field("result_check", &self.result_check)
            .field("call_id", &self.call_id)
            .field("authenticated", &self.is_authenticated())
            .field("methods", &self.methods.len())
            .finish()
    }
}

impl DelugeClient {
    /// Create a new DelugeClient for the configured host.
    ///
    /// No request is made: call [`DelugeClient::login`] before using it, or use
    /// [`DelugeClient::connect`] to do both in one step.
    pub fn try_new(config: &DelugeConfig) -> Result<Self, DelugeError> {
        let transport = HttpTransport::try_new(&config.host, config.timeout)?;
        let client = Self::with_transport(transport, &config.host, config.result_check);
        Ok(client)
    }

    /// Create a new DelugeClient and log in with the configured password.
    ///
    /// Fails if the daemon rejects the password or cannot be reached, so a returned client is
    /// always authenticated.
    pub async fn connect(config: &DelugeConfig) -> Result<Self, DelugeError> {
        debug!("Connecting to Deluge Web UI at {}", config.host);
        let mut client = Self::try_new(config)?;
        client.login(&config.password).await?;
        Ok(client)
    }
}

#[allow(private_bounds)]
impl<T: RpcTransport> DelugeClient<T> {
    /// Create a DelugeClient on top of a custom transport.
    pub(crate) fn with_transport(transport: T, host: &str, result_check: ResultCheck) -> Self {
        Self {
            transport,
            host: host.to_string(),
            result_check,
            call_id: AtomicU64::new(1),
            session_id: RwLock::new(None),
            methods: Vec::new(),
        }
    }

    /// The host this client talks to.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// RPC methods the daemon advertised at login. Empty before [`DelugeClient::login`].
    pub fn methods(&self) -> &[String] {
        &self.methods
    }

    /// The session token issued at login, if the daemon set one.
    pub fn session_id(&self) -> Option<String> {
        self.session_id
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether a session token is held.
    pub fn is_authenticated(&self) -> bool {
        self.session_id
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Authenticates and caches the daemon's supported methods.
    pub async fn login(&mut self, password: &str) -> Result<(), DelugeError> {
        self.authenticate(password).await?;
        self.methods = self.list_methods().await?;
        info!(
            "Logged in to Deluge at {}, {} methods available",
            self.host,
            self.methods.len()
        );
        Ok(())
    }

    /// Sends `auth.login` and stores the session token the daemon sets.
    ///
    /// Login always starts a fresh session. Any token held from an earlier login is dropped
    /// before the request goes out: a rejected login leaves the client unauthenticated, and a
    /// login accepted without a cookie sends no cookie afterwards.
    ///
    /// An expired session is not renewed automatically; the next call fails with
    /// [`DelugeError::Remote`] and the caller decides whether to log in again.
    pub async fn authenticate(&self, password: &str) -> Result<(), DelugeError> {
        debug!("Authenticating against {}", self.host);
        self.set_session(None);
        let request = self.next_request("auth.login", vec![json!(password)]);
        let RpcReply {
            response,
            session_id,
        } = self.transport.send(request, None).await?;

        if response.result.is_null() {
            return Err(match response.error {
                Some(fault) => fault.into(),
                None => DelugeError::InvalidResponse(
                    "auth.login returned neither a result nor an error".into(),
                ),
            });
        }
        if !is_truthy(&response.result) {
            warn!("Deluge at {} rejected the password", self.host);
            return Err(DelugeError::Authentication);
        }

        match &session_id {
            Some(_) => debug!("Session established"),
            None => debug!("Login accepted without a session cookie"),
        }
        self.set_session(session_id);
        Ok(())
    }

    /// Lists the RPC methods the daemon supports.
    pub async fn list_methods(&self) -> Result<Vec<String>, DelugeError> {
        let methods = self.call("system.listMethods", Vec::new()).await?;
        decode("system.listMethods", methods)
    }

    /// Invokes an arbitrary RPC method and returns its raw result.
    pub async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value, DelugeError> {
        let request = self.next_request(method, params);
        let id = request.id;
        let session_id = self.session_id();
        let reply = self.transport.send(request, session_id).await?;
        let result = reply.response.into_result(self.result_check);
        if let Err(e) = &result {
            debug!("Call {id} ({method}) failed: {e}");
        }
        result
    }

    /// Wraps a known torrent ID in a handle without querying the daemon.
    pub fn torrent(&self, id: impl Into<String>) -> Torrent<'_, Self> {
        Torrent::new(self, id)
    }

    fn set_session(&self, session_id: Option<String>) {
        let mut slot = self
            .session_id
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *slot = session_id;
    }

    fn next_request(&self, method: &str, params: Vec<Value>) -> RpcRequest {
        RpcRequest {
            id: self.call_id.fetch_add(1, Ordering::Relaxed),
            method: method.to_string(),
            params,
        }
    }

    async fn add_torrent(
        &self,
        method: &str,
        params: Vec<Value>,
    ) -> Result<Torrent<'_, Self>, DelugeError> {
        let id: String = decode(method, self.call(method, params).await?)?;
        debug!("Added torrent {id}");
        Ok(Torrent::new(self, id))
    }
}

#[allow(private_bounds)]
impl<T: RpcTransport> TorrentClient for DelugeClient<T> {
    async fn add_torrent_magnet(
        &self,
        uri: &str,
        options: &AddTorrentOptions,
    ) -> Result<Torrent<'_, Self>, DelugeError> {
        debug!("Adding torrent from magnet URI: {uri}");
        self.add_torrent(
            "core.add_torrent_magnet",
            vec![json!(uri), options.clone().into()],
        )
        .await
    }

    async fn add_torrent_url(
        &self,
        url: &str,
        headers: Option<&HashMap<String, String>>,
        options: &AddTorrentOptions,
    ) -> Result<Torrent<'_, Self>, DelugeError> {
        debug!("Adding torrent from URL: {url}");
        self.add_torrent(
            "core.add_torrent_url",
            vec![json!(url), options.clone().into(), json!(headers)],
        )
        .await
    }

    async fn add_torrent_file<I, S>(
        &self,
        path_segments: I,
        options: &AddTorrentOptions,
    ) -> Result<Torrent<'_, Self>, DelugeError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<Path>,
    {
        let path: PathBuf = path_segments.into_iter().collect();
        debug!("Adding torrent from file: {}", path.display());
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("{} does not name a file", path.display()),
                )
            })?;
        let data = BASE64_STANDARD.encode(tokio::fs::read(&path).await?);

        self.add_torrent(
            "core.add_torrent_file",
            vec![json!(filename), json!(data), options.clone().into()],
        )
        .await
    }

    async fn remove_torrent(&self, id: &str, remove_data: bool) -> Result<(), DelugeError> {
        debug!("Removing torrent {id}, remove_data={remove_data}");
        self.call("core.remove_torrent", vec![json!(id), json!(remove_data)])
            .await?;
        debug!("Remove command sent");
        Ok(())
    }

    async fn pause_torrent(&self, id: &str) -> Result<(), DelugeError> {
        debug!("Pausing torrent {id}");
        self.call("core.pause_torrent", vec![json!(id)]).await?;
        Ok(())
    }

    async fn resume_torrent(&self, id: &str) -> Result<(), DelugeError> {
        debug!("Resuming torrent {id}");
        self.call("core.resume_torrent", vec![json!(id)]).await?;
        Ok(())
    }

    async fn list_torrents(&self) -> Result<Vec<Torrent<'_, Self>>, DelugeError> {
        debug!("Listing session torrents");
        let ids: Vec<String> = decode(
            "core.get_session_state",
            self.call("core.get_session_state", Vec::new()).await?,
        )?;
        debug!("Session torrents: {ids:?}");

        Ok(ids.into_iter().map(|id| Torrent::new(self, id)).collect())
    }

    async fn torrent_status(&self, id: &str, keys: &[&str]) -> Result<TorrentStatus, DelugeError> {
        let status = self
            .call("core.get_torrent_status", vec![json!(id), json!(keys)])
            .await?;
        TorrentStatus::try_from(status)
    }
}

/// Decodes a call result into the type the method is documented to return.
fn decode<R: DeserializeOwned>(method: &str, value: Value) -> Result<R, DelugeError> {
    serde_json::from_value(value)
        .map_err(|e| DelugeError::InvalidResponse(format!("{method}: {e}")))
}

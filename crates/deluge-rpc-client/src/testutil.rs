//! Shared test utilities and fixtures.

use serde_json::{Value, json};

use crate::{
    client::DelugeClient,
    config::ResultCheck,
    envelope::{RpcReply, RpcResponse},
    transport::MockRpcTransport,
};

pub(crate) const TEST_HOST: &str = "http://localhost:8112";
pub(crate) const TEST_SESSION: &str = "7f1c2e9ab30d";
pub(crate) const TEST_TORRENT_ID: &str = "375ae3280cd80a8e9d7212e11dfaf7c45069dd35";

/// A reply whose body is `{"result": <result>, "error": null}`.
pub(crate) fn ok_reply(result: Value) -> RpcReply {
    RpcReply {
        response: serde_json::from_value(json!({ "result": result, "error": null })).unwrap(),
        session_id: None,
    }
}

/// A reply carrying a daemon error object.
pub(crate) fn error_reply(code: i64, message: &str) -> RpcReply {
    RpcReply {
        response: serde_json::from_value::<RpcResponse>(json!({
            "result": null,
            "error": { "code": code, "message": message },
        }))
        .unwrap(),
        session_id: None,
    }
}

/// The reply to a successful `auth.login` that sets the session cookie.
pub(crate) fn login_reply() -> RpcReply {
    RpcReply {
        session_id: Some(TEST_SESSION.to_string()),
        ..ok_reply(json!(true))
    }
}

pub(crate) fn make_test_client(mock: MockRpcTransport) -> DelugeClient<MockRpcTransport> {
    DelugeClient::with_transport(mock, TEST_HOST, ResultCheck::ErrorField)
}

pub(crate) fn make_legacy_client(mock: MockRpcTransport) -> DelugeClient<MockRpcTransport> {
    DelugeClient::with_transport(mock, TEST_HOST, ResultCheck::Truthy)
}

/// A status record the way the daemon reports it, trimmed to a handful of fields.
pub(crate) fn make_test_status(paused: bool) -> Value {
    json!({
        "hash": TEST_TORRENT_ID,
        "name": "archlinux-2023.02.01-x86_64.iso",
        "paused": paused,
        "state": if paused { "Paused" } else { "Downloading" },
        "progress": 42.0,
        "is_finished": false,
        "is_seed": false,
        "num_peers": 4,
        "download_payload_rate": 183_500,
        "upload_payload_rate": 0,
        "total_size": 845_152_256_i64,
        "save_path": "/downloads",
    })
}

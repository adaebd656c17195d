//! JSON-RPC request and response envelopes exchanged with the Web UI.

use deluge_rpc_types::DelugeError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::ResultCheck;

/// Name of the cookie carrying the session token.
pub(crate) const SESSION_COOKIE: &str = "_session_id";

/// Body of a JSON-RPC call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct RpcRequest {
    pub(crate) id: u64,
    pub(crate) method: String,
    pub(crate) params: Vec<Value>,
}

/// Error object reported by the daemon.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct RpcFault {
    pub(crate) code: i64,
    #[serde(default)]
    pub(crate) message: String,
}

impl From<RpcFault> for DelugeError {
    fn from(fault: RpcFault) -> Self {
        DelugeError::Remote {
            code: fault.code,
            message: fault.message,
        }
    }
}

/// Body of a JSON-RPC response. A missing `result` reads as `null`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub(crate) struct RpcResponse {
    #[serde(default)]
    pub(crate) result: Value,
    #[serde(default)]
    pub(crate) error: Option<RpcFault>,
}

impl RpcResponse {
    /// Extracts the call result, judging success according to `check`.
    pub(crate) fn into_result(self, check: ResultCheck) -> Result<Value, DelugeError> {
        match check {
            ResultCheck::ErrorField => match self.error {
                Some(fault) => Err(fault.into()),
                None => Ok(self.result),
            },
            ResultCheck::Truthy if is_truthy(&self.result) => Ok(self.result),
            ResultCheck::Truthy => Err(self.error.map(DelugeError::from).unwrap_or_else(|| {
                DelugeError::InvalidResponse(format!(
                    "falsy result {} without an error object",
                    self.result
                ))
            })),
        }
    }
}

/// A parsed response together with the session token the daemon set on it, if any.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct RpcReply {
    pub(crate) response: RpcResponse,
    pub(crate) session_id: Option<String>,
}

/// JSON truthiness: `null`, `false`, zero, and empty strings, arrays and objects are falsy.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Picks the session token out of `Set-Cookie` header values.
///
/// The `_session_id` cookie wins; otherwise the first cookie's value is taken.
pub(crate) fn session_cookie<'a>(
    set_cookies: impl IntoIterator<Item = &'a str>,
) -> Option<String> {
    let mut first = None;
    for header in set_cookies {
        let pair = header.split(';').next().unwrap_or_default();
        let Some((name, value)) = pair.split_once('=') else {
            continue;
        };
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        if name.trim() == SESSION_COOKIE {
            return Some(value.to_string());
        }
        if first.is_none() {
            first = Some(value.to_string());
        }
    }
    first
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn response(body: Value) -> RpcResponse {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn request_serializes_as_envelope() {
        let request = RpcRequest {
            id: 7,
            method: "core.pause_torrent".into(),
            params: vec![json!("abc123")],
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"id": 7, "method": "core.pause_torrent", "params": ["abc123"]})
        );
    }

    #[test]
    fn error_object_becomes_remote_error() {
        let resp = response(json!({
            "id": 1,
            "result": null,
            "error": {"code": 1, "message": "Not authenticated"}
        }));
        match resp.into_result(ResultCheck::ErrorField).unwrap_err() {
            DelugeError::Remote { code, message } => {
                assert_eq!(code, 1);
                assert_eq!(message, "Not authenticated");
            }
            other => panic!("Expected Remote error, got {other:?}"),
        }
    }

    #[test]
    fn falsy_results_pass_error_field_check() {
        for result in [json!(0), json!([]), json!(false), json!(""), json!(null)] {
            let resp = response(json!({"id": 1, "result": result.clone(), "error": null}));
            assert_eq!(resp.into_result(ResultCheck::ErrorField).unwrap(), result);
        }
    }

    #[test]
    fn falsy_results_fail_truthy_check() {
        for result in [json!(0), json!([]), json!(false), json!("")] {
            let resp = response(json!({"id": 1, "result": result, "error": null}));
            assert!(matches!(
                resp.into_result(ResultCheck::Truthy),
                Err(DelugeError::InvalidResponse(_))
            ));
        }
    }

    #[test]
    fn truthy_check_prefers_error_object() {
        let resp = response(json!({"result": 0, "error": {"code": 3, "message": "nope"}}));
        assert!(matches!(
            resp.into_result(ResultCheck::Truthy),
            Err(DelugeError::Remote { code: 3, .. })
        ));
    }

    #[test]
    fn missing_result_reads_as_null() {
        let resp = response(json!({"id": 1}));
        assert_eq!(resp.result, Value::Null);
        assert_eq!(resp.error, None);
    }

    #[test]
    fn truthiness() {
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!(-1)));
        assert!(is_truthy(&json!(0.5)));
        assert!(is_truthy(&json!("x")));
        assert!(is_truthy(&json!(["a"])));
        assert!(is_truthy(&json!({"a": 1})));
        assert!(!is_truthy(&json!(0.0)));
        assert!(!is_truthy(&json!({})));
        assert!(!is_truthy(&Value::Null));
    }

    #[test]
    fn session_cookie_prefers_named_cookie() {
        let headers = [
            "other=1; Path=/",
            "_session_id=9fa1c3; Expires=Tue, 01 Jan 2030 00:00:00 GMT; Path=/json",
        ];
        assert_eq!(session_cookie(headers), Some("9fa1c3".to_string()));
    }

    #[test]
    fn session_cookie_falls_back_to_first_value() {
        assert_eq!(
            session_cookie(["sid=abc; Path=/"]),
            Some("abc".to_string())
        );
    }

    #[test]
    fn session_cookie_ignores_malformed_headers() {
        assert_eq!(session_cookie(["garbage", "_session_id=; Path=/"]), None);
        assert_eq!(session_cookie(std::iter::empty()), None);
    }
}

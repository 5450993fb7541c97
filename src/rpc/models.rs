//! JSON-RPC envelopes exchanged with the API endpoint

use crate::error::{ApiError, RpcError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Parameter mapping passed to API methods
pub type Params = serde_json::Map<String, Value>;

/// Outgoing request envelope
#[derive(Debug, Clone, Serialize)]
pub struct Request<'a> {
    pub jsonrpc: &'static str,

    pub method: &'a str,

    pub params: &'a Value,

    /// Session token, only for servers that expect it in the body
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth: Option<&'a str>,

    pub id: u64,
}

impl<'a> Request<'a> {
    pub fn new(method: &'a str, params: &'a Value, id: u64) -> Self {
        Self {
            jsonrpc: super::JSONRPC_VERSION,
            method,
            params,
            auth: None,
            id,
        }
    }

    /// Attach a body token; empty tokens are left out of the envelope
    pub fn with_auth(mut self, auth: &'a str) -> Self {
        if !auth.is_empty() {
            self.auth = Some(auth);
        }
        self
    }
}

/// Incoming response envelope
///
/// `result` stays a loosely typed [`Value`]; typed decoding belongs to the
/// accessor that issued the call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub jsonrpc: String,

    #[serde(default)]
    pub error: Option<ApiError>,

    #[serde(default)]
    pub result: Value,

    /// Echoed request id; `null` when the server could not parse the request
    #[serde(default)]
    pub id: Option<i64>,
}

impl Response {
    /// True when the server returned an error object
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// The result as a string, as returned by `user.login` and `apiinfo.version`
    pub fn result_str(&self, method: &str) -> Result<&str, RpcError> {
        self.result.as_str().ok_or_else(|| RpcError::UnexpectedResult {
            method: method.to_string(),
            expected: "string",
        })
    }

    /// Decode the result into a typed value
    pub fn decode_result<T: DeserializeOwned>(self, method: &str) -> Result<T, RpcError> {
        serde_json::from_value(self.result).map_err(|source| RpcError::InvalidResult {
            method: method.to_string(),
            source,
        })
    }
}

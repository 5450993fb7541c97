//! Error types for the Zabbix protocol clients

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ZabbixError>;

/// Main error type for the Zabbix clients
#[derive(Error, Debug)]
pub enum ZabbixError {
    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Sender error: {0}")]
    Sender(#[from] SenderError),

    #[error("Agent error: {0}")]
    Agent(#[from] AgentError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ZabbixError {
    /// True when the remote side understood the request and rejected it.
    ///
    /// Remote rejections are not worth retrying; everything else is a
    /// transport or local failure.
    pub fn is_remote(&self) -> bool {
        match self {
            ZabbixError::Api(_) => true,
            ZabbixError::Agent(e) => e.is_remote(),
            _ => false,
        }
    }

    /// True for network, framing, encoding and local validation failures
    pub fn is_transport(&self) -> bool {
        !self.is_remote()
    }
}

/// Error object returned by the API inside a well-formed JSON-RPC response
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{code} ({message}): {data}")]
pub struct ApiError {
    pub code: i64,

    #[serde(default)]
    pub message: String,

    #[serde(default)]
    pub data: String,
}

/// Transport and local errors of the JSON-RPC client
#[derive(Error, Debug)]
pub enum RpcError {
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("failed to encode {method} request: {source}")]
    Encode {
        method: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("request {method} failed: {source}")]
    Request {
        method: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to decode {method} response (HTTP {status}): {source}")]
    Decode {
        method: String,
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid version format: {0}")]
    InvalidVersion(String),

    #[error("unexpected result for {method}: expected {expected}")]
    UnexpectedResult {
        method: String,
        expected: &'static str,
    },

    #[error("failed to convert {method} result: {source}")]
    InvalidResult {
        method: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Expected exactly one result, got {0}.")]
    ExpectedOneResult(usize),

    #[error("Expected {expected}, got {got}.")]
    ExpectedMore { expected: usize, got: usize },
}

/// Errors of the sender protocol client
#[derive(Error, Debug)]
pub enum SenderError {
    #[error("no data to send")]
    EmptyBatch,

    #[error("failed to marshal data: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to connect to {address}: {source}")]
    Connect {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{phase} timed out after {timeout_ms}ms ({address})")]
    Timeout {
        address: String,
        phase: &'static str,
        timeout_ms: u128,
    },

    #[error("failed to send data to {address}: {source}")]
    Write {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read response from {address}: {source}")]
    Read {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid response header: expected ZBXD\\x01, got {found:?}")]
    InvalidHeader { found: Vec<u8> },

    #[error("empty response from server")]
    EmptyResponse,

    #[error("response too large: {size} bytes (max: {max_size} bytes)")]
    ResponseTooLarge { size: u64, max_size: u64 },

    #[error("failed to unmarshal response: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Errors of the agent protocol client
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("key cannot be empty")]
    EmptyKey,

    #[error("failed to connect to {address}: {source}")]
    Connect {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("request for {key} to {address} timed out after {timeout_ms}ms")]
    Timeout {
        address: String,
        key: String,
        timeout_ms: u128,
    },

    #[error("failed to send request for {key}: {source}")]
    Write {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read response for {key}: {source}")]
    Read {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("response for {key} exceeds {max_size} bytes")]
    ValueTooLarge { key: String, max_size: u64 },

    #[error("key not supported: {key}")]
    NotSupported { key: String },

    #[error("agent error: {response}")]
    Failure { response: String },

    #[error("some keys failed: {}", join_failures(.failures))]
    KeysFailed {
        values: HashMap<String, String>,
        failures: Vec<(String, AgentError)>,
    },
}

impl AgentError {
    /// True for the agent's own error sentinels
    pub fn is_remote(&self) -> bool {
        matches!(self, AgentError::NotSupported { .. } | AgentError::Failure { .. })
    }
}

fn join_failures(failures: &[(String, AgentError)]) -> String {
    failures
        .iter()
        .map(|(key, err)| format!("{}: {}", key, err))
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<config::ConfigError> for ZabbixError {
    fn from(err: config::ConfigError) -> Self {
        ZabbixError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_message() {
        let err = ApiError {
            code: -32602,
            message: "Invalid params.".to_string(),
            data: "Not authorised.".to_string(),
        };

        assert_eq!(err.to_string(), "-32602 (Invalid params.): Not authorised.");

        // Wrapping must not alter the message
        let wrapped: ZabbixError = err.into();
        assert_eq!(wrapped.to_string(), "-32602 (Invalid params.): Not authorised.");
        assert!(wrapped.is_remote());
    }

    #[test]
    fn test_error_classification() {
        let transport: ZabbixError = SenderError::EmptyResponse.into();
        assert!(transport.is_transport());

        let not_supported: ZabbixError = AgentError::NotSupported { key: "foo".to_string() }.into();
        assert!(not_supported.is_remote());

        let empty_key: ZabbixError = AgentError::EmptyKey.into();
        assert!(empty_key.is_transport());

        let version: ZabbixError = RpcError::InvalidVersion("7".to_string()).into();
        assert!(version.is_transport());
    }

    #[test]
    fn test_keys_failed_message() {
        let err = AgentError::KeysFailed {
            values: HashMap::new(),
            failures: vec![
                ("a".to_string(), AgentError::NotSupported { key: "a".to_string() }),
                ("b".to_string(), AgentError::Failure { response: "ZBX_ERROR boom".to_string() }),
            ],
        };

        assert_eq!(
            err.to_string(),
            "some keys failed: a: key not supported: a; b: agent error: ZBX_ERROR boom"
        );
    }
}

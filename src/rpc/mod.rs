//! JSON-RPC client for the Zabbix API

pub mod client;
pub mod models;
pub mod version;

pub use client::ApiClient;
pub use models::{Params, Request, Response};
pub use version::VersionInfo;

use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// JSON-RPC protocol version
pub const JSONRPC_VERSION: &str = "2.0";

/// Content type required by the API endpoint
pub const CONTENT_TYPE: &str = "application/json-rpc";

/// Version query; needs no session and never carries a token
pub const VERSION_METHOD: &str = "apiinfo.version";

/// Login method
pub const LOGIN_METHOD: &str = "user.login";

/// The call contract typed accessors are built on
#[async_trait]
pub trait ApiCaller: Send + Sync {
    /// Perform one call.
    ///
    /// Errors only on transport, encoding or decoding failures. An error
    /// object in a well-formed response is returned inside the `Response`.
    async fn call(&self, method: &str, params: Value) -> Result<Response>;

    /// Like [`ApiCaller::call`], but an error object in the response becomes
    /// the returned error.
    async fn call_with_error(&self, method: &str, params: Value) -> Result<Response> {
        let mut response = self.call(method, params).await?;
        match response.error.take() {
            Some(err) => {
                tracing::warn!("API method {} failed: {}", method, err);
                Err(err.into())
            }
            None => Ok(response),
        }
    }
}

pub(crate) fn is_version_method(method: &str) -> bool {
    method.eq_ignore_ascii_case(VERSION_METHOD)
}

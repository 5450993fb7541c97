//! API client with version-dependent authentication

use super::models::{Params, Request, Response};
use super::{is_version_method, ApiCaller, VersionInfo, CONTENT_TYPE, LOGIN_METHOD, VERSION_METHOD};
use crate::config::ApiConfig;
use crate::error::{Result, RpcError};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE as CONTENT_TYPE_HEADER;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::OnceCell;
use tracing::{debug, info, trace, warn};

/// Where the session token travels for one request
#[derive(Debug, Clone, Copy)]
enum Credentials<'a> {
    Anonymous,
    Body(&'a str),
    Bearer(&'a str),
}

/// Client for the Zabbix JSON-RPC API
///
/// Every call opens its own HTTP exchange. The server version is detected on
/// the first call that needs it and decides, for the lifetime of the cached
/// descriptor, whether the token is sent in the body or as a bearer header.
pub struct ApiClient {
    url: String,
    http_client: Client,
    auth: Option<Secret<String>>,
    next_id: AtomicU64,
    version: OnceCell<VersionInfo>,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(config: ApiConfig) -> Result<Self> {
        let mut client_builder = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .pool_max_idle_per_host(0);

        if config.accept_invalid_certs {
            warn!("TLS certificate verification is disabled for {}", config.url);
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }

        let http_client = client_builder
            .build()
            .map_err(RpcError::Client)?;

        info!("Initialized API client for {}", config.url);

        Ok(Self::with_http_client(config.url, http_client).with_token(config.token))
    }

    /// Create a client for `url` with default settings
    pub fn from_url(url: impl Into<String>) -> Result<Self> {
        Self::new(ApiConfig::with_url(url))
    }

    /// Create client with custom HTTP client
    pub fn with_http_client(url: impl Into<String>, http_client: Client) -> Self {
        Self {
            url: url.into(),
            http_client,
            auth: None,
            next_id: AtomicU64::new(0),
            version: OnceCell::new(),
        }
    }

    fn with_token(mut self, token: Option<Secret<String>>) -> Self {
        self.auth = token;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Current session token, if any
    pub fn auth(&self) -> Option<&Secret<String>> {
        self.auth.as_ref()
    }

    /// Cached version descriptor, `None` until the first detection
    pub fn version_info(&self) -> Option<&VersionInfo> {
        self.version.get()
    }

    /// Detect and cache the server version; returns the version string.
    ///
    /// Only the first successful call reaches the server.
    pub async fn ensure_version(&self) -> Result<String> {
        Ok(self.version_descriptor().await?.version.clone())
    }

    /// Call `user.login` and keep the returned token for subsequent calls
    pub async fn login(&mut self, user: &str, password: &str) -> Result<String> {
        let field = self.version_descriptor().await?.login_field();

        let mut params = Params::new();
        params.insert(field.to_string(), Value::from(user));
        params.insert("password".to_string(), Value::from(password));

        let response = self.call_with_error(LOGIN_METHOD, Value::Object(params)).await?;
        let token = response.result_str(LOGIN_METHOD)?.to_string();

        self.auth = Some(Secret::new(token.clone()));
        info!("Logged in to {} as {}", self.url, user);

        Ok(token)
    }

    /// Install a token obtained elsewhere and re-detect the server version
    pub async fn set_auth(&mut self, token: impl Into<String>) -> Result<()> {
        self.auth = Some(Secret::new(token.into()));
        self.version = OnceCell::new();
        self.version_descriptor().await?;
        Ok(())
    }

    async fn version_descriptor(&self) -> Result<&VersionInfo> {
        self.version.get_or_try_init(|| self.query_version()).await
    }

    async fn query_version(&self) -> Result<VersionInfo> {
        let params = json!({});
        let mut response = self
            .exchange(VERSION_METHOD, &params, Credentials::Anonymous)
            .await?;

        if let Some(err) = response.error.take() {
            return Err(err.into());
        }

        let info = VersionInfo::parse(response.result_str(VERSION_METHOD)?)?;
        info!(
            "Detected API version {} (bearer header: {}, username field: {})",
            info.version, info.use_bearer_header, info.use_username_field
        );

        Ok(info)
    }

    /// Pick the token transport for `method`, detecting the version if needed
    async fn credentials(&self, method: &str) -> Result<Credentials<'_>> {
        if is_version_method(method) {
            return Ok(Credentials::Anonymous);
        }

        let use_bearer = self.version_descriptor().await?.use_bearer_header;

        let token = match &self.auth {
            Some(token) if !token.expose_secret().is_empty() => token.expose_secret().as_str(),
            _ => return Ok(Credentials::Anonymous),
        };

        if use_bearer {
            Ok(Credentials::Bearer(token))
        } else {
            Ok(Credentials::Body(token))
        }
    }

    fn next_request_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// One HTTP round trip. The response id is not checked against the request.
    async fn exchange(&self, method: &str, params: &Value, credentials: Credentials<'_>) -> Result<Response> {
        let id = self.next_request_id();

        let mut request = Request::new(method, params, id);
        if let Credentials::Body(token) = credentials {
            request = request.with_auth(token);
        }

        let body = serde_json::to_vec(&request).map_err(|source| RpcError::Encode {
            method: method.to_string(),
            source,
        })?;

        debug!("Calling {} (id={}, {} bytes)", method, id, body.len());

        let mut http_request = self.http_client
            .post(&self.url)
            .header(CONTENT_TYPE_HEADER, CONTENT_TYPE)
            .body(body);

        if let Credentials::Bearer(token) = credentials {
            http_request = http_request.bearer_auth(token);
        }

        let http_response = http_request
            .send()
            .await
            .map_err(|source| RpcError::Request {
                method: method.to_string(),
                source,
            })?;

        let status = http_response.status();
        let bytes = http_response
            .bytes()
            .await
            .map_err(|source| RpcError::Request {
                method: method.to_string(),
                source,
            })?;

        debug!("Response for {} (id={}): HTTP {}, {} bytes", method, id, status.as_u16(), bytes.len());
        trace!("Response body: {}", String::from_utf8_lossy(&bytes));

        let response = serde_json::from_slice(&bytes).map_err(|source| RpcError::Decode {
            method: method.to_string(),
            status: status.as_u16(),
            source,
        })?;

        Ok(response)
    }
}

#[async_trait]
impl ApiCaller for ApiClient {
    async fn call(&self, method: &str, params: Value) -> Result<Response> {
        let credentials = self.credentials(method).await?;
        self.exchange(method, &params, credentials).await
    }
}

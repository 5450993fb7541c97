//! Agent client for the plaintext get protocol

use super::{AGENT_ERROR, MAX_VALUE_SIZE, NOT_SUPPORTED};
use crate::config::{AgentConfig, DEFAULT_AGENT_PORT};
use crate::error::{AgentError, Result};
use crate::net::join_host_port;
use std::collections::HashMap;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tracing::{debug, warn};

/// Client querying a passive Zabbix agent
///
/// One key per connection. A single deadline covers connecting, writing the
/// key and reading the reply.
#[derive(Debug, Clone)]
pub struct AgentClient {
    host: String,
    port: u16,
    timeout: Duration,
}

impl AgentClient {
    /// Create a new agent client from configuration
    pub fn new(config: AgentConfig) -> Self {
        let timeout = config.timeout();
        Self::with_address(config.host, config.port).with_timeout(timeout)
    }

    /// Create a client for `host:port`; port 0 selects 10050
    pub fn with_address(host: impl Into<String>, port: u16) -> Self {
        let defaults = AgentConfig::default();
        Self {
            host: host.into(),
            port: if port == 0 { DEFAULT_AGENT_PORT } else { port },
            timeout: defaults.timeout(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn address(&self) -> String {
        join_host_port(&self.host, self.port)
    }

    /// Fetch the value of one item key
    pub async fn get_value(&self, key: &str) -> Result<String> {
        Ok(self.fetch(key).await?)
    }

    /// Fetch several keys one after another.
    ///
    /// Failures do not stop the loop. If any key failed the error is
    /// [`AgentError::KeysFailed`], which still carries the values that were
    /// retrieved.
    pub async fn get_values<S: AsRef<str>>(&self, keys: &[S]) -> Result<HashMap<String, String>> {
        let mut values = HashMap::with_capacity(keys.len());
        let mut failures = Vec::new();

        for key in keys {
            let key = key.as_ref();
            match self.fetch(key).await {
                Ok(value) => {
                    values.insert(key.to_string(), value);
                }
                Err(err) => failures.push((key.to_string(), err)),
            }
        }

        if failures.is_empty() {
            Ok(values)
        } else {
            Err(AgentError::KeysFailed { values, failures }.into())
        }
    }

    async fn fetch(&self, key: &str) -> std::result::Result<String, AgentError> {
        if key.is_empty() {
            return Err(AgentError::EmptyKey);
        }

        let address = self.address();
        debug!("Requesting key {} from {}", key, address);

        let line = tokio::time::timeout(self.timeout, self.exchange(&address, key))
            .await
            .map_err(|_| AgentError::Timeout {
                address: address.clone(),
                key: key.to_string(),
                timeout_ms: self.timeout.as_millis(),
            })??;

        let value = line.trim_end_matches(&['\r', '\n'][..]).to_string();
        debug!("Received value for {}: {}", key, value);

        if value.starts_with(NOT_SUPPORTED) {
            warn!("Key {} not supported by {}", key, address);
            return Err(AgentError::NotSupported { key: key.to_string() });
        }

        if value.starts_with(AGENT_ERROR) {
            warn!("Agent {} failed on key {}: {}", address, key, value);
            return Err(AgentError::Failure { response: value });
        }

        Ok(value)
    }

    /// Connect, write `key\n` and read one `\n`-terminated line of at most `MAX_VALUE_SIZE` bytes
    async fn exchange(&self, address: &str, key: &str) -> std::result::Result<String, AgentError> {
        let mut stream = TcpStream::connect(address)
            .await
            .map_err(|source| AgentError::Connect {
                address: address.to_string(),
                source,
            })?;

        let request = format!("{}\n", key);
        stream
            .write_all(request.as_bytes())
            .await
            .map_err(|source| AgentError::Write {
                key: key.to_string(),
                source,
            })?;

        let mut reader = BufReader::new(stream).take(MAX_VALUE_SIZE);
        let mut line = Vec::new();
        reader
            .read_until(b'\n', &mut line)
            .await
            .map_err(|source| AgentError::Read {
                key: key.to_string(),
                source,
            })?;

        if line.last() != Some(&b'\n') {
            if line.len() as u64 >= MAX_VALUE_SIZE {
                return Err(AgentError::ValueTooLarge {
                    key: key.to_string(),
                    max_size: MAX_VALUE_SIZE,
                });
            }

            return Err(AgentError::Read {
                key: key.to_string(),
                source: std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    "connection closed before end of line",
                ),
            });
        }

        // Values are opaque bytes; invalid UTF-8 is replaced, not rejected
        Ok(String::from_utf8_lossy(&line).into_owned())
    }
}

//! Sender client pushing trapper values to a Zabbix server

use super::models::{stamp_clocks, SenderData, SenderResponse};
use super::packet::{build_packet, decode_header, HEADER_SIZE};
use crate::config::{SenderConfig, DEFAULT_SENDER_PORT};
use crate::error::{Result, SenderError};
use crate::net::join_host_port;
use std::future::Future;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, info, trace, warn};

/// Client for the sender (trapper) protocol
///
/// Each send opens one connection, writes one packet, reads one reply and
/// closes the connection. The timeout applies separately to connecting,
/// writing and reading.
#[derive(Debug, Clone)]
pub struct Sender {
    server: String,
    port: u16,
    timeout: Duration,
}

impl Sender {
    /// Create a new sender from configuration
    pub fn new(config: SenderConfig) -> Self {
        let timeout = config.timeout();
        Self::with_address(config.server, config.port).with_timeout(timeout)
    }

    /// Create a sender for `server:port`; port 0 selects 10051
    pub fn with_address(server: impl Into<String>, port: u16) -> Self {
        let defaults = SenderConfig::default();
        Self {
            server: server.into(),
            port: if port == 0 { DEFAULT_SENDER_PORT } else { port },
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

    pub fn server(&self) -> &str {
        &self.server
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// `host:port` this sender connects to
    pub fn address(&self) -> String {
        join_host_port(&self.server, self.port)
    }

    /// Send a single value
    pub async fn send(&self, item: SenderData) -> Result<SenderResponse> {
        self.send_batch(std::slice::from_ref(&item)).await
    }

    /// Send several values in one packet.
    ///
    /// Items without a clock all receive the same timestamp, taken once per
    /// call. The batch succeeds or fails as a whole.
    pub async fn send_batch(&self, items: &[SenderData]) -> Result<SenderResponse> {
        if items.is_empty() {
            return Err(SenderError::EmptyBatch.into());
        }

        let now = chrono::Utc::now().timestamp();
        let items = stamp_clocks(items, now);

        let payload = serde_json::to_vec(&items).map_err(SenderError::Encode)?;
        trace!("Sending data: {}", String::from_utf8_lossy(&payload));

        let packet = build_packet(&payload);
        let address = self.address();
        debug!("Sending {} items ({} bytes) to {}", items.len(), packet.len(), address);

        let response = self.exchange(&address, &packet).await?;

        if response.is_success() {
            info!("Sender reply from {}: {}", address, response.info);
        } else {
            warn!("Sender reply from {}: {} ({})", address, response.response, response.info);
        }

        Ok(response)
    }

    async fn exchange(&self, address: &str, packet: &[u8]) -> std::result::Result<SenderResponse, SenderError> {
        let mut stream = self
            .phase(address, "connect", TcpStream::connect(address))
            .await?
            .map_err(|source| SenderError::Connect {
                address: address.to_string(),
                source,
            })?;

        self.phase(address, "write", stream.write_all(packet))
            .await?
            .map_err(|source| SenderError::Write {
                address: address.to_string(),
                source,
            })?;

        let body = self.phase(address, "read", read_reply(&mut stream))
            .await?
            .map_err(|err| match err {
                ReplyError::Io(source) => SenderError::Read {
                    address: address.to_string(),
                    source,
                },
                ReplyError::Frame(err) => err,
            })?;

        trace!("Received response: {}", String::from_utf8_lossy(&body));

        serde_json::from_slice(&body).map_err(SenderError::Decode)
    }

    /// Run one I/O phase under a fresh timeout
    async fn phase<F: Future>(&self, address: &str, phase: &'static str, fut: F) -> std::result::Result<F::Output, SenderError> {
        tokio::time::timeout(self.timeout, fut)
            .await
            .map_err(|_| SenderError::Timeout {
                address: address.to_string(),
                phase,
                timeout_ms: self.timeout.as_millis(),
            })
    }
}

enum ReplyError {
    Io(std::io::Error),
    Frame(SenderError),
}

async fn read_reply(stream: &mut TcpStream) -> std::result::Result<Vec<u8>, ReplyError> {
    let mut header = [0u8; HEADER_SIZE];
    stream.read_exact(&mut header).await.map_err(ReplyError::Io)?;

    let length = decode_header(&header).map_err(ReplyError::Frame)?;

    let mut body = vec![0u8; length as usize];
    stream.read_exact(&mut body).await.map_err(ReplyError::Io)?;

    Ok(body)
}

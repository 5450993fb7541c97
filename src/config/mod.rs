//! Configuration management for the Zabbix clients

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use secrecy::{Secret, ExposeSecret};

pub mod loader;
pub mod validation;

/// Default Zabbix server (trapper) port used by the sender protocol
pub const DEFAULT_SENDER_PORT: u16 = 10051;

/// Default Zabbix agent port used by the get protocol
pub const DEFAULT_AGENT_PORT: u16 = 10050;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub sender: SenderConfig,

    #[serde(default)]
    pub agent: AgentConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Configuration for the JSON-RPC API client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API endpoint, typically `http://host/zabbix/api_jsonrpc.php`
    #[serde(default = "default_api_url")]
    pub url: String,

    /// Login name used by `zbx login`
    #[serde(default)]
    pub username: Option<String>,

    /// Login password (secured)
    #[serde(default, serialize_with = "serialize_optional_secret", deserialize_with = "deserialize_optional_secret")]
    pub password: Option<Secret<String>>,

    /// Pre-issued API token (secured)
    #[serde(default, serialize_with = "serialize_optional_secret", deserialize_with = "deserialize_optional_secret")]
    pub token: Option<Secret<String>>,

    /// Timeout for the whole HTTP exchange in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Skip TLS certificate verification. Off unless set explicitly.
    #[serde(default)]
    pub accept_invalid_certs: bool,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Configuration for the sender (trapper) client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SenderConfig {
    /// Zabbix server host name or address
    #[serde(default = "default_host")]
    pub server: String,

    #[serde(default = "default_sender_port")]
    pub port: u16,

    /// Timeout applied separately to connect, write and read
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

/// Configuration for the agent (get) client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Zabbix agent host name or address
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_agent_port")]
    pub port: u16,

    /// Deadline for the whole exchange
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: `pretty`, `compact` or `json`
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_api_url() -> String { "http://localhost/api_jsonrpc.php".to_string() }
fn default_timeout() -> u64 { 5 }
fn default_user_agent() -> String { format!("zabbix-client/{}", env!("CARGO_PKG_VERSION")) }
fn default_host() -> String { "localhost".to_string() }
fn default_sender_port() -> u16 { DEFAULT_SENDER_PORT }
fn default_agent_port() -> u16 { DEFAULT_AGENT_PORT }
fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "pretty".to_string() }

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: default_api_url(),
            username: None,
            password: None,
            token: None,
            timeout_secs: default_timeout(),
            accept_invalid_certs: false,
            user_agent: default_user_agent(),
        }
    }
}

impl ApiConfig {
    /// Configuration for the given endpoint with every other field defaulted
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for SenderConfig {
    fn default() -> Self {
        Self {
            server: default_host(),
            port: default_sender_port(),
            timeout_secs: default_timeout(),
        }
    }
}

impl SenderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_agent_port(),
            timeout_secs: default_timeout(),
        }
    }
}

impl AgentConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::error::Result<Self> {
        let config = loader::load_config(path)?;
        validation::validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration with `ZABBIX__*` environment variable overrides
    pub fn from_file_with_env<P: AsRef<Path>>(path: P) -> crate::error::Result<Self> {
        let config = loader::load_config_with_env(path)?;
        validation::validate_config(&config)?;
        Ok(config)
    }

    /// Validate this configuration
    pub fn validate(&self) -> crate::error::Result<()> {
        validation::validate_config(self)
    }
}

/// Custom serializer for Option<Secret<String>>
fn serialize_optional_secret<S>(secret: &Option<Secret<String>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match secret {
        Some(s) => serializer.serialize_some(s.expose_secret()),
        None => serializer.serialize_none(),
    }
}

/// Custom deserializer for Option<Secret<String>>
fn deserialize_optional_secret<'de, D>(deserializer: D) -> Result<Option<Secret<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.map(Secret::new))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();

        assert_eq!(config.sender.port, 10051);
        assert_eq!(config.agent.port, 10050);
        assert_eq!(config.api.timeout(), Duration::from_secs(5));
        assert!(!config.api.accept_invalid_certs);
        assert!(config.api.user_agent.starts_with("zabbix-client/"));
    }

    #[test]
    fn test_deserialize_partial_sections() {
        let json = serde_json::json!({
            "api": { "url": "https://zabbix.example.com/api_jsonrpc.php", "token": "abc" },
            "agent": { "host": "10.0.0.5" }
        });

        let config: Config = serde_json::from_value(json).unwrap();
        assert_eq!(config.api.url, "https://zabbix.example.com/api_jsonrpc.php");
        assert_eq!(config.api.token.as_ref().unwrap().expose_secret(), "abc");
        assert!(config.api.password.is_none());
        assert_eq!(config.agent.host, "10.0.0.5");
        assert_eq!(config.agent.port, 10050);
        assert_eq!(config.sender.server, "localhost");
    }
}

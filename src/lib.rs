//! Zabbix Client - API, sender and agent protocol clients
//!
//! This library talks to the three network roles of a Zabbix installation.
//! Each client performs exactly one exchange per call over a fresh
//! connection and keeps no connection between calls.
//!
//! ## Features
//!
//! - **API Client**: JSON-RPC 2.0 over HTTP(S), server version detection and
//!   automatic choice between body tokens (before 7.2) and bearer headers (7.2+)
//! - **Sender**: `ZBXD` framed batches of timestamped values to a server
//! - **Agent Client**: plaintext key/value queries against a passive agent
//! - **Typed Accessors**: hosts, host groups, interfaces and history on top of
//!   any [`rpc::ApiCaller`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use zabbix_client::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let mut api = ApiClient::from_url("https://zabbix.example.com/api_jsonrpc.php")?;
//!     api.login("Admin", "zabbix").await?;
//!     let hosts = api.hosts_get(Params::new()).await?;
//!     println!("{} hosts", hosts.len());
//!
//!     let sender = Sender::with_address("zabbix.example.com", 0);
//!     sender.send(SenderData::new("web01", "app.requests", "42")).await?;
//!
//!     let agent = AgentClient::with_address("web01", 0);
//!     let uptime = agent.get_value("system.uptime").await?;
//!     println!("uptime: {}", uptime);
//!
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod api;
pub mod config;
pub mod error;
pub mod net;
pub mod observability;
pub mod rpc;
pub mod sender;

pub use config::Config;
pub use error::{ZabbixError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::agent::AgentClient;
    pub use crate::api::{HistoryItem, Host, HostGroup, HostInterface, InterfaceType, ZabbixApi};
    pub use crate::config::Config;
    pub use crate::error::{ApiError, Result, ZabbixError};
    pub use crate::rpc::{ApiCaller, ApiClient, Params, Response, VersionInfo};
    pub use crate::sender::{Sender, SenderData, SenderResponse};
}

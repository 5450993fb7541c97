//! Agent get protocol: querying a passive agent for item values

pub mod client;

pub use client::AgentClient;

/// Reply prefix for keys the agent does not know
pub const NOT_SUPPORTED: &str = "ZBX_NOTSUPPORTED";

/// Reply prefix for keys the agent failed to evaluate
pub const AGENT_ERROR: &str = "ZBX_ERROR";

/// Largest reply line accepted from an agent (16 MiB)
pub const MAX_VALUE_SIZE: u64 = 16 * 1024 * 1024;

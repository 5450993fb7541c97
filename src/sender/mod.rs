//! Sender protocol: pushing timestamped values to a Zabbix server

pub mod client;
pub mod models;
pub mod packet;

pub use client::Sender;
pub use models::{SenderData, SenderResponse, SenderSummary};
pub use packet::{build_packet, MAGIC, HEADER_SIZE};

//! Data models for sender requests and server acknowledgements

use serde::{Deserialize, Serialize};

/// One measurement for a trapper item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenderData {
    /// Host name as configured on the server
    pub host: String,

    /// Item key
    pub key: String,

    pub value: String,

    /// Unix timestamp in seconds; unset or 0 means "now" at send time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clock: Option<i64>,
}

impl SenderData {
    pub fn new(host: impl Into<String>, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            key: key.into(),
            value: value.into(),
            clock: None,
        }
    }

    pub fn with_clock(mut self, clock: i64) -> Self {
        self.clock = Some(clock);
        self
    }

    fn has_clock(&self) -> bool {
        matches!(self.clock, Some(clock) if clock != 0)
    }
}

/// Copy `items`, giving every item without a clock the same timestamp `now`
pub fn stamp_clocks(items: &[SenderData], now: i64) -> Vec<SenderData> {
    items
        .iter()
        .map(|item| {
            if item.has_clock() {
                item.clone()
            } else {
                item.clone().with_clock(now)
            }
        })
        .collect()
}

/// Acknowledgement returned by the server
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenderResponse {
    /// `success` when the server accepted the request
    #[serde(default)]
    pub response: String,

    /// Processing summary, e.g. `processed: 1; failed: 0; total: 1; seconds spent: 0.000055`
    #[serde(default)]
    pub info: String,
}

/// Parsed form of [`SenderResponse::info`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SenderSummary {
    pub processed: u64,
    pub failed: u64,
    pub total: u64,
    pub seconds_spent: f64,
}

impl SenderResponse {
    pub fn is_success(&self) -> bool {
        self.response == "success"
    }

    /// Parse the `info` string. Returns `None` if any counter is missing.
    pub fn summary(&self) -> Option<SenderSummary> {
        let mut processed = None;
        let mut failed = None;
        let mut total = None;
        let mut seconds_spent = 0.0;

        for field in self.info.split(';') {
            let (name, value) = match field.split_once(':') {
                Some((name, value)) => (name.trim(), value.trim()),
                None => continue,
            };

            match name {
                "processed" => processed = value.parse().ok(),
                "failed" => failed = value.parse().ok(),
                "total" => total = value.parse().ok(),
                "seconds spent" => seconds_spent = value.parse().unwrap_or(0.0),
                _ => {}
            }
        }

        Some(SenderSummary {
            processed: processed?,
            failed: failed?,
            total: total?,
            seconds_spent,
        })
    }
}

//! Configuration validation

use super::*;
use crate::error::{ZabbixError, Result};

/// Upper bound for any configured timeout
const MAX_TIMEOUT_SECS: u64 = 300;

/// Validate complete configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_api_config(&config.api)?;
    validate_sender_config(&config.sender)?;
    validate_agent_config(&config.agent)?;
    validate_logging_config(&config.logging)?;
    Ok(())
}

/// Validate API client configuration
pub fn validate_api_config(config: &ApiConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(ZabbixError::Config(
            "API URL cannot be empty".to_string()
        ));
    }

    if !config.url.starts_with("http://") && !config.url.starts_with("https://") {
        return Err(ZabbixError::Config(
            "API URL must start with http:// or https://".to_string()
        ));
    }

    if config.accept_invalid_certs && !config.url.starts_with("https://") {
        return Err(ZabbixError::Config(
            "accept_invalid_certs is set but URL does not use https://".to_string()
        ));
    }

    if config.username.is_some() && config.password.is_none() {
        return Err(ZabbixError::Config(
            "API username is set without a password".to_string()
        ));
    }

    validate_timeout("API", config.timeout_secs)?;

    Ok(())
}

/// Validate sender configuration
pub fn validate_sender_config(config: &SenderConfig) -> Result<()> {
    if config.server.trim().is_empty() {
        return Err(ZabbixError::Config(
            "Sender server cannot be empty".to_string()
        ));
    }

    validate_timeout("Sender", config.timeout_secs)
}

/// Validate agent configuration
pub fn validate_agent_config(config: &AgentConfig) -> Result<()> {
    if config.host.trim().is_empty() {
        return Err(ZabbixError::Config(
            "Agent host cannot be empty".to_string()
        ));
    }

    validate_timeout("Agent", config.timeout_secs)
}

fn validate_logging_config(config: &LoggingConfig) -> Result<()> {
    match config.format.as_str() {
        "pretty" | "compact" | "json" => Ok(()),
        other => Err(ZabbixError::Config(
            format!("Unknown log format: {} (expected pretty, compact or json)", other)
        )),
    }
}

fn validate_timeout(component: &str, timeout_secs: u64) -> Result<()> {
    if timeout_secs == 0 {
        return Err(ZabbixError::Config(
            format!("{} timeout must be greater than 0", component)
        ));
    }

    if timeout_secs > MAX_TIMEOUT_SECS {
        return Err(ZabbixError::Config(
            format!("{} timeout too large (max: {} seconds)", component, MAX_TIMEOUT_SECS)
        ));
    }

    Ok(())
}
